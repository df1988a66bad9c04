pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod validation;

pub use application::presenter::{FlowConfig, FlowState, PaymentFlowPresenter};
pub use error::{CheckoutError, FlowError, Result};
pub use validation::{ValidationRuleSet, Validator};
