use crate::domain::interaction::{Interaction, InteractionCode};
use crate::domain::message::MessageKey;
use crate::domain::operation::PaymentOperation;
use crate::domain::ports::{OperationSubmitter, PaymentView, RetryAction, SessionLoader, Translator};
use crate::domain::result::{OperationResult, TerminalOutcome};
use crate::domain::session::PaymentSession;
use crate::error::FlowError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, Notify};

/// Session loader answering from a queue of scripted replies.
///
/// Each `load` pops the next reply; an empty queue yields an unknown failure.
/// With a gate set, every call waits for the gate to be notified first.
#[derive(Default)]
pub struct InMemorySessionLoader {
    replies: AsyncMutex<VecDeque<Result<PaymentSession, FlowError>>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl InMemorySessionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gate(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub async fn push(&self, reply: Result<PaymentSession, FlowError>) {
        self.replies.lock().await.push_back(reply);
    }

    /// Number of `load` calls that have started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionLoader for InMemorySessionLoader {
    async fn load(&self, list_url: &str) -> Result<PaymentSession, FlowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(FlowError::Unknown(format!("no reply scripted for {list_url}"))))
    }
}

/// Operation submitter answering from a queue of scripted replies and
/// recording every operation it receives.
#[derive(Default)]
pub struct InMemoryOperationSubmitter {
    replies: AsyncMutex<VecDeque<Result<OperationResult, FlowError>>>,
    submitted: AsyncMutex<Vec<PaymentOperation>>,
}

impl InMemoryOperationSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, reply: Result<OperationResult, FlowError>) {
        self.replies.lock().await.push_back(reply);
    }

    pub async fn submitted(&self) -> Vec<PaymentOperation> {
        self.submitted.lock().await.clone()
    }
}

#[async_trait]
impl OperationSubmitter for InMemoryOperationSubmitter {
    async fn submit(&self, operation: &PaymentOperation) -> Result<OperationResult, FlowError> {
        self.submitted.lock().await.push(operation.clone());
        self.replies.lock().await.pop_front().unwrap_or_else(|| {
            Err(FlowError::Unknown(format!(
                "no reply scripted for {}",
                operation.url()
            )))
        })
    }
}

/// Translator backed by plain maps.
///
/// Interaction texts are looked up by code and reason first, then by code
/// alone.
#[derive(Debug, Default, Clone)]
pub struct CatalogTranslator {
    interactions: HashMap<(InteractionCode, Option<String>), String>,
    messages: HashMap<MessageKey, String>,
}

impl CatalogTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interaction(
        mut self,
        code: InteractionCode,
        reason: Option<&str>,
        text: impl Into<String>,
    ) -> Self {
        self.interactions
            .insert((code, reason.map(str::to_string)), text.into());
        self
    }

    pub fn with_message(mut self, key: MessageKey, text: impl Into<String>) -> Self {
        self.messages.insert(key, text.into());
        self
    }
}

impl Translator for CatalogTranslator {
    fn translate_interaction(&self, interaction: &Interaction) -> Option<String> {
        self.interactions
            .get(&(interaction.code, Some(interaction.reason.clone())))
            .or_else(|| self.interactions.get(&(interaction.code, None)))
            .cloned()
    }

    fn translate(&self, key: MessageKey) -> Option<String> {
        self.messages.get(&key).cloned()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    Progress,
    RetryPrompt(RetryAction, String),
    Warning(String),
    Terminal(TerminalOutcome),
}

/// View that stores every command it receives. Clones share the log.
#[derive(Debug, Default, Clone)]
pub struct RecordingView {
    commands: Arc<Mutex<Vec<ViewCommand>>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<ViewCommand> {
        self.lock().clone()
    }

    pub fn terminals(&self) -> Vec<TerminalOutcome> {
        self.lock()
            .iter()
            .filter_map(|c| match c {
                ViewCommand::Terminal(outcome) => Some(outcome.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn retry_prompts(&self) -> Vec<RetryAction> {
        self.lock()
            .iter()
            .filter_map(|c| match c {
                ViewCommand::RetryPrompt(action, _) => Some(*action),
                _ => None,
            })
            .collect()
    }

    pub fn progress_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|c| matches!(c, ViewCommand::Progress))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ViewCommand>> {
        // A poisoned log still holds every command pushed before the panic.
        self.commands.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, command: ViewCommand) {
        self.lock().push(command);
    }
}

impl PaymentView for RecordingView {
    fn show_progress(&mut self) {
        self.push(ViewCommand::Progress);
    }

    fn show_retry_prompt(&mut self, action: RetryAction, message: &str) {
        self.push(ViewCommand::RetryPrompt(action, message.to_string()));
    }

    fn show_warning(&mut self, message: &str) {
        self.push(ViewCommand::Warning(message.to_string()));
    }

    fn emit_terminal(&mut self, outcome: &TerminalOutcome) {
        self.push(ViewCommand::Terminal(outcome.clone()));
    }
}
