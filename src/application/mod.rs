//! Application layer containing the payment flow orchestration.
//!
//! `PaymentFlowPresenter` sequences list loading, operation posting and
//! result interpretation. `PaymentForm` turns the values a user entered for a
//! payment card into a validated `PaymentOperation`.

pub mod form;
pub mod presenter;
