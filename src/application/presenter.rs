use crate::domain::message::MessageKey;
use crate::domain::operation::PaymentOperation;
use crate::domain::ports::{
    OperationSubmitterRef, PaymentViewBox, RetryAction, SessionLoaderRef, TranslatorRef,
};
use crate::domain::result::{OperationResult, PaymentResult, ResultCode, TerminalOutcome};
use crate::domain::session::{LINK_OPERATION, PaymentSession};
use crate::error::{ErrorKind, FlowError};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

/// Host supplied settings for one presenter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowConfig {
    /// Self link of the payment list the operation belongs to.
    pub list_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    LoadingSession,
    SessionLoaded,
    Submitting,
    RetryPrompt(RetryAction),
    Terminal(ResultCode),
}

#[derive(Debug)]
pub enum FlowEventKind {
    SessionLoaded(Result<PaymentSession, FlowError>),
    OperationSubmitted(Result<OperationResult, FlowError>),
}

/// Completion of a background load or submit, tagged with the generation
/// that started it.
#[derive(Debug)]
pub struct FlowEvent {
    pub generation: u64,
    pub kind: FlowEventKind,
}

enum Wake {
    Event(Option<FlowEvent>),
    Joined(Result<(), JoinError>),
}

/// Drives one payment from loading the list to a terminal outcome.
///
/// The list is loaded first, the pending operation is checked against the
/// list's operation links, posted, and the returned interaction is mapped to
/// OK, CANCELED or ERROR. Connection failures stop at a retry prompt that the
/// user has to answer.
///
/// All methods must be called from one control task. Background work reports
/// back through an internal channel drained by [`next_event`](Self::next_event);
/// results from work started before the last `stop()` are dropped.
pub struct PaymentFlowPresenter {
    config: FlowConfig,
    session_loader: SessionLoaderRef,
    operation_submitter: OperationSubmitterRef,
    translator: TranslatorRef,
    view: PaymentViewBox,
    state: FlowState,
    session: Option<PaymentSession>,
    operation: Option<PaymentOperation>,
    pending_retry: Option<PaymentResult>,
    outcome: Option<TerminalOutcome>,
    generation: u64,
    task: Option<JoinHandle<()>>,
    events_tx: mpsc::UnboundedSender<FlowEvent>,
    events_rx: mpsc::UnboundedReceiver<FlowEvent>,
}

impl PaymentFlowPresenter {
    pub fn new(
        config: FlowConfig,
        session_loader: SessionLoaderRef,
        operation_submitter: OperationSubmitterRef,
        translator: TranslatorRef,
        view: PaymentViewBox,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            session_loader,
            operation_submitter,
            translator,
            view,
            state: FlowState::Idle,
            session: None,
            operation: None,
            pending_retry: None,
            outcome: None,
            generation: 0,
            task: None,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn session(&self) -> Option<&PaymentSession> {
        self.session.as_ref()
    }

    pub fn outcome(&self) -> Option<&TerminalOutcome> {
        self.outcome.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while a load or submit is in flight.
    pub fn is_active(&self) -> bool {
        matches!(self.state, FlowState::LoadingSession | FlowState::Submitting)
    }

    /// Starts processing `operation`. Ignored while a load or submit is running.
    pub fn start(&mut self, operation: PaymentOperation) {
        if self.is_active() {
            debug!(state = ?self.state, "flow already running, ignoring start");
            return;
        }
        info!(url = operation.url(), "starting payment flow");
        self.operation = Some(operation);
        self.outcome = None;
        self.pending_retry = None;
        self.load_session();
    }

    /// Cancels any background work and returns to `Idle`.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation += 1;
        self.pending_retry = None;
        if self.state != FlowState::Idle {
            debug!(state = ?self.state, "flow stopped");
        }
        self.state = FlowState::Idle;
    }

    /// The user tried to leave while the payment is being processed.
    /// Always consumed: a warning is shown and the flow keeps going.
    pub fn on_back_pressed(&mut self) -> bool {
        let message = self.local_message(MessageKey::OperationInterrupted);
        self.view.show_warning(&message);
        true
    }

    /// Positive answer to the retry prompt.
    pub fn retry(&mut self) {
        match self.state {
            FlowState::RetryPrompt(RetryAction::ReloadSession) => {
                self.pending_retry = None;
                self.load_session();
            }
            FlowState::RetryPrompt(RetryAction::ResubmitOperation) => {
                self.pending_retry = None;
                self.post_operation();
            }
            _ => debug!(state = ?self.state, "no retry prompt pending"),
        }
    }

    /// The user closed the retry prompt instead of retrying.
    pub fn decline_retry(&mut self) {
        if !matches!(self.state, FlowState::RetryPrompt(_)) {
            debug!(state = ?self.state, "no retry prompt pending");
            return;
        }
        let result = self.pending_retry.take().unwrap_or_else(|| {
            PaymentResult::from_error(ErrorKind::Connectivity, "connection error")
        });
        let message = self.local_message(MessageKey::ConnectionError);
        self.emit_terminal(ResultCode::Error, Some(message), result);
    }

    /// Waits for the next background completion and applies it.
    ///
    /// Returns `false` straight away when nothing is in flight. A task that
    /// ends without reporting, e.g. because a collaborator panicked, is
    /// turned into an unknown failure of the running step.
    pub async fn next_event(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        let wake = match self.task.as_mut() {
            Some(task) => tokio::select! {
                biased;
                event = self.events_rx.recv() => Wake::Event(event),
                joined = task => Wake::Joined(joined),
            },
            None => Wake::Event(self.events_rx.recv().await),
        };
        let event = match wake {
            Wake::Event(event) => event,
            Wake::Joined(joined) => {
                self.task = None;
                match joined {
                    // The task sent its event before finishing.
                    Ok(()) => self.events_rx.recv().await,
                    Err(err) => Some(self.failed_task_event(err)),
                }
            }
        };
        match event {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Processes completions until the flow is terminal, idle or waiting on
    /// the retry prompt.
    pub async fn run_until_settled(&mut self) -> &FlowState {
        while self.next_event().await {}
        &self.state
    }

    pub fn handle_event(&mut self, event: FlowEvent) {
        if event.generation != self.generation {
            debug!(
                event_generation = event.generation,
                current_generation = self.generation,
                "dropping stale flow event"
            );
            return;
        }
        match event.kind {
            FlowEventKind::SessionLoaded(Ok(session)) => self.on_session_loaded(session),
            FlowEventKind::SessionLoaded(Err(err)) => self.on_session_load_failed(err),
            FlowEventKind::OperationSubmitted(Ok(result)) => self.on_operation_submitted(result),
            FlowEventKind::OperationSubmitted(Err(err)) => self.on_operation_submit_failed(err),
        }
    }

    pub fn on_session_loaded(&mut self, session: PaymentSession) {
        if self.state != FlowState::LoadingSession {
            debug!(state = ?self.state, "ignoring session outside of loading");
            return;
        }
        self.task = None;
        self.state = FlowState::SessionLoaded;
        let interaction = session.interaction.clone();
        let result_info = session.result_info.clone();
        self.session = Some(session);

        if interaction.is_proceed() {
            self.handle_load_proceed();
        } else {
            info!(%interaction, "list load returned a non proceed interaction");
            self.close_with_canceled(PaymentResult::from_interaction(result_info, interaction));
        }
    }

    pub fn on_session_load_failed(&mut self, err: FlowError) {
        if self.state != FlowState::LoadingSession {
            debug!(state = ?self.state, "ignoring load failure outside of loading");
            return;
        }
        self.task = None;
        match err {
            FlowError::Remote(info) => self.close_with_canceled(PaymentResult::from_error_info(info)),
            FlowError::Connectivity(_) => self.show_retry_prompt(RetryAction::ReloadSession, err),
            other => self.close_with_error(MessageKey::UnknownError, other),
        }
    }

    pub fn on_operation_submitted(&mut self, result: OperationResult) {
        if self.state != FlowState::Submitting {
            debug!(state = ?self.state, "ignoring operation result outside of submitting");
            return;
        }
        self.task = None;
        let proceed = result.interaction.is_proceed();
        let result = PaymentResult::from_operation_result(result);
        if proceed {
            self.close_with_ok(result);
        } else {
            self.handle_operation_interaction(result);
        }
    }

    pub fn on_operation_submit_failed(&mut self, err: FlowError) {
        if self.state != FlowState::Submitting {
            debug!(state = ?self.state, "ignoring submit failure outside of submitting");
            return;
        }
        self.task = None;
        match err {
            FlowError::Remote(info) => {
                self.handle_operation_interaction(PaymentResult::from_error_info(info))
            }
            FlowError::Connectivity(_) => {
                self.show_retry_prompt(RetryAction::ResubmitOperation, err)
            }
            other => self.close_with_error(MessageKey::UnknownError, other),
        }
    }

    fn handle_load_proceed(&mut self) {
        let Some(url) = self.operation.as_ref().map(|op| op.url().to_string()) else {
            self.close_with_error(
                MessageKey::MissingOperation,
                FlowError::Integration("no pending operation".to_string()),
            );
            return;
        };
        let known = self
            .session
            .as_ref()
            .is_some_and(|s| s.contains_link(LINK_OPERATION, &url));
        if !known {
            self.close_with_error(
                MessageKey::MissingOperation,
                FlowError::Integration(format!("operation link {url} is not part of the list")),
            );
            return;
        }
        self.post_operation();
    }

    // An ABORT with DUPLICATE_OPERATION means the operation already went
    // through on the server.
    fn handle_operation_interaction(&mut self, result: PaymentResult) {
        let duplicate = result
            .interaction
            .as_ref()
            .is_some_and(|i| i.is_duplicate_operation());
        if duplicate {
            self.close_with_ok(result);
        } else {
            self.close_with_canceled(result);
        }
    }

    fn load_session(&mut self) {
        self.session = None;
        self.state = FlowState::LoadingSession;
        self.view.show_progress();

        let generation = self.next_generation();
        let loader = SessionLoaderRef::clone(&self.session_loader);
        let list_url = self.config.list_url.clone();
        let events = self.events_tx.clone();
        self.task = Some(tokio::spawn(async move {
            let result = loader.load(&list_url).await;
            // The receiver only goes away together with the presenter.
            let _ = events.send(FlowEvent {
                generation,
                kind: FlowEventKind::SessionLoaded(result),
            });
        }));
    }

    fn post_operation(&mut self) {
        let Some(operation) = self.operation.clone() else {
            self.close_with_error(
                MessageKey::MissingOperation,
                FlowError::Integration("no pending operation".to_string()),
            );
            return;
        };
        self.state = FlowState::Submitting;
        self.view.show_progress();

        let generation = self.next_generation();
        let submitter = OperationSubmitterRef::clone(&self.operation_submitter);
        let events = self.events_tx.clone();
        self.task = Some(tokio::spawn(async move {
            let result = submitter.submit(&operation).await;
            let _ = events.send(FlowEvent {
                generation,
                kind: FlowEventKind::OperationSubmitted(result),
            });
        }));
    }

    fn failed_task_event(&self, err: JoinError) -> FlowEvent {
        error!(error = %err, state = ?self.state, "background task ended without a result");
        let cause = FlowError::Unknown(format!("background task failed: {err}"));
        let kind = match self.state {
            FlowState::Submitting => FlowEventKind::OperationSubmitted(Err(cause)),
            _ => FlowEventKind::SessionLoaded(Err(cause)),
        };
        FlowEvent {
            generation: self.generation,
            kind,
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn show_retry_prompt(&mut self, action: RetryAction, err: FlowError) {
        warn!(error = %err, ?action, "connection failure, asking user to retry");
        self.pending_retry = Some(PaymentResult::from_error(err.kind(), err.to_string()));
        self.state = FlowState::RetryPrompt(action);
        let message = self.local_message(MessageKey::ConnectionError);
        self.view.show_retry_prompt(action, &message);
    }

    /// OK is the one terminal outcome that may carry no message: the host
    /// shows its own success screen unless the interaction has a translation.
    fn close_with_ok(&mut self, result: PaymentResult) {
        let message = result
            .interaction
            .as_ref()
            .and_then(|i| self.translator.translate_interaction(i));
        self.emit_terminal(ResultCode::Ok, message, result);
    }

    fn close_with_canceled(&mut self, result: PaymentResult) {
        let translated = result
            .interaction
            .as_ref()
            .and_then(|i| self.translator.translate_interaction(i))
            .filter(|m| !m.is_empty());
        let message = match translated {
            Some(message) => message,
            None => {
                warn!(
                    result_info = %result.result_info,
                    interaction = ?result.interaction,
                    "no translation for interaction, using generic message"
                );
                self.local_message(MessageKey::UnknownError)
            }
        };
        self.emit_terminal(ResultCode::Canceled, Some(message), result);
    }

    fn close_with_error(&mut self, key: MessageKey, err: FlowError) {
        warn!(error = %err, "closing payment flow with error");
        let result = PaymentResult::from_error(err.kind(), err.to_string());
        let message = self.local_message(key);
        self.emit_terminal(ResultCode::Error, Some(message), result);
    }

    fn emit_terminal(&mut self, code: ResultCode, message: Option<String>, result: PaymentResult) {
        info!(?code, result_info = %result.result_info, "payment flow finished");
        self.task = None;
        self.pending_retry = None;
        self.state = FlowState::Terminal(code);
        let outcome = TerminalOutcome {
            code,
            message,
            result,
        };
        self.view.emit_terminal(&outcome);
        self.outcome = Some(outcome);
    }

    fn local_message(&self, key: MessageKey) -> String {
        self.translator
            .translate(key)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| key.default_text().to_string())
    }
}

impl Drop for PaymentFlowPresenter {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
