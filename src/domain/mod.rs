//! Domain layer: the payment list, operations, results and the ports the
//! flow talks through.

pub mod checkbox;
pub mod interaction;
pub mod message;
pub mod operation;
pub mod ports;
pub mod result;
pub mod session;
