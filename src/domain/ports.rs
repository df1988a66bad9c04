use super::interaction::Interaction;
use super::message::MessageKey;
use super::operation::PaymentOperation;
use super::result::{OperationResult, TerminalOutcome};
use super::session::PaymentSession;
use crate::error::FlowError;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait SessionLoader: Send + Sync {
    async fn load(&self, list_url: &str) -> Result<PaymentSession, FlowError>;
}

#[async_trait]
pub trait OperationSubmitter: Send + Sync {
    async fn submit(&self, operation: &PaymentOperation) -> Result<OperationResult, FlowError>;
}

/// Turns server interactions and local keys into display strings.
/// `None` makes the caller fall back to its own default.
pub trait Translator: Send + Sync {
    fn translate_interaction(&self, interaction: &Interaction) -> Option<String>;
    fn translate(&self, key: MessageKey) -> Option<String>;
}

/// What a pending retry prompt would redo.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RetryAction {
    ReloadSession,
    ResubmitOperation,
}

/// Commands the presenter sends to the screen hosting the flow.
pub trait PaymentView: Send {
    fn show_progress(&mut self);
    /// The host answers with `retry()` or `decline_retry()` on the presenter.
    fn show_retry_prompt(&mut self, action: RetryAction, message: &str);
    fn show_warning(&mut self, message: &str);
    fn emit_terminal(&mut self, outcome: &TerminalOutcome);
}

pub type SessionLoaderRef = Arc<dyn SessionLoader>;
pub type OperationSubmitterRef = Arc<dyn OperationSubmitter>;
pub type TranslatorRef = Arc<dyn Translator>;
pub type PaymentViewBox = Box<dyn PaymentView>;
