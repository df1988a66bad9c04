//! Adapters between the flow and the outside world: batch files, fixtures
//! and a console view.

pub mod console;
pub mod csv;
pub mod json;
