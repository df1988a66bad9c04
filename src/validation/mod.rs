//! Input validation for payment form fields.
//!
//! `ValidationRuleSet` holds the per-network patterns, `Validator` applies
//! them together with the fixed format, checksum and date checks.

pub mod checksum;
pub mod result;
pub mod rules;
pub mod validator;

pub use result::{ValidationError, ValidationResult};
pub use rules::{FieldType, ValidationRule, ValidationRuleSet};
pub use validator::Validator;
