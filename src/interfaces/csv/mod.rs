pub mod validation_reader;
pub mod validation_writer;
