mod common;

use async_trait::async_trait;
use checkout_flow::application::presenter::{
    FlowConfig, FlowEvent, FlowEventKind, FlowState, PaymentFlowPresenter,
};
use checkout_flow::domain::interaction::{InteractionCode, reason};
use checkout_flow::domain::message::MessageKey;
use checkout_flow::domain::operation::{OperationType, PaymentOperation};
use checkout_flow::domain::ports::{OperationSubmitter, RetryAction, SessionLoader};
use checkout_flow::domain::result::{ErrorInfo, OperationResult, ResultCode};
use checkout_flow::domain::session::{
    InputElement, LINK_OPERATION, Links, Network, NetworkCard, PaymentCard, PaymentSession,
};
use checkout_flow::error::{ErrorKind, FlowError};
use checkout_flow::infrastructure::in_memory::{
    CatalogTranslator, InMemoryOperationSubmitter, InMemorySessionLoader, RecordingView,
    ViewCommand,
};
use common::*;
use std::sync::Arc;
use tokio::sync::Notify;

#[tokio::test]
async fn test_non_proceed_list_cancels_without_submitting() {
    let mut h = harness();
    h.loader
        .push(Ok(session(InteractionCode::Abort, reason::EXPIRED_SESSION)))
        .await;

    h.presenter.start(operation());
    let state = h.presenter.run_until_settled().await.clone();

    assert_eq!(state, FlowState::Terminal(ResultCode::Canceled));
    assert!(h.submitter.submitted().await.is_empty());
    let outcome = h.presenter.outcome().unwrap();
    assert_eq!(
        outcome.message.as_deref(),
        Some(MessageKey::UnknownError.default_text())
    );
    assert_eq!(
        outcome.result.interaction.as_ref().unwrap().reason,
        reason::EXPIRED_SESSION
    );
    assert!(h.presenter.session().is_some());
}

#[tokio::test]
async fn test_duplicate_operation_counts_as_success() {
    let mut h = harness();
    h.loader
        .push(Ok(session(InteractionCode::Proceed, reason::OK)))
        .await;
    h.submitter
        .push(Err(FlowError::Remote(ErrorInfo::new(
            "already processed",
            interaction(InteractionCode::Abort, reason::DUPLICATE_OPERATION),
        ))))
        .await;

    h.presenter.start(operation());
    let state = h.presenter.run_until_settled().await.clone();

    assert_eq!(state, FlowState::Terminal(ResultCode::Ok));
    let outcome = h.presenter.outcome().unwrap();
    assert!(outcome.result.error_info.is_some());
}

#[tokio::test]
async fn test_duplicate_operation_in_result_counts_as_success() {
    let mut h = harness();
    h.loader
        .push(Ok(session(InteractionCode::Proceed, reason::OK)))
        .await;
    h.submitter
        .push(Ok(operation_result(
            InteractionCode::Abort,
            reason::DUPLICATE_OPERATION,
        )))
        .await;

    h.presenter.start(operation());
    assert_eq!(
        h.presenter.run_until_settled().await,
        &FlowState::Terminal(ResultCode::Ok)
    );
    // OK without a translated interaction carries no message.
    assert_eq!(h.presenter.outcome().unwrap().message, None);
}

#[tokio::test]
async fn test_declined_operation_uses_translated_message() {
    let translator = CatalogTranslator::new().with_interaction(
        InteractionCode::TryOtherAccount,
        Some(reason::DECLINED),
        "Your card was declined",
    );
    let mut h = harness_with(InMemorySessionLoader::new(), translator);
    h.loader
        .push(Ok(session(InteractionCode::Proceed, reason::OK)))
        .await;
    h.submitter
        .push(Ok(operation_result(
            InteractionCode::TryOtherAccount,
            reason::DECLINED,
        )))
        .await;

    h.presenter.start(operation());
    h.presenter.run_until_settled().await;

    let terminals = h.view.terminals();
    assert_eq!(terminals.len(), 1);
    assert_eq!(terminals[0].code, ResultCode::Canceled);
    assert_eq!(
        terminals[0].message.as_deref(),
        Some("Your card was declined")
    );
    assert!(terminals[0].result.operation_result.is_some());
}

#[tokio::test]
async fn test_unknown_operation_url_is_an_integration_error() {
    let mut h = harness();
    h.loader
        .push(Ok(PaymentSession::new(
            "OK",
            interaction(InteractionCode::Proceed, reason::OK),
        )))
        .await;

    h.presenter.start(operation());
    let state = h.presenter.run_until_settled().await.clone();

    assert_eq!(state, FlowState::Terminal(ResultCode::Error));
    assert!(h.submitter.submitted().await.is_empty());
    let outcome = h.presenter.outcome().unwrap();
    assert_eq!(
        outcome.message.as_deref(),
        Some(MessageKey::MissingOperation.default_text())
    );
    assert_eq!(
        outcome.result.error.as_ref().unwrap().kind,
        ErrorKind::Integration
    );
}

#[tokio::test]
async fn test_operation_link_found_on_a_card() {
    let card = PaymentCard::Network(NetworkCard {
        networks: vec![Network {
            code: "VISA".into(),
            label: "Visa".into(),
            method: "CREDIT_CARD".into(),
            operation_type: OperationType::Charge,
            links: Links::from([(LINK_OPERATION.to_string(), CHARGE_URL.to_string())]),
            input_elements: vec![InputElement::new("number")],
            preselected: true,
            registration: None,
            recurrence: None,
        }],
        active: 0,
    });
    let mut h = harness();
    h.loader
        .push(Ok(PaymentSession::new(
            "OK",
            interaction(InteractionCode::Proceed, reason::OK),
        )
        .with_card(card)))
        .await;
    h.submitter
        .push(Ok(operation_result(InteractionCode::Proceed, reason::OK)))
        .await;

    h.presenter.start(operation());
    assert_eq!(
        h.presenter.run_until_settled().await,
        &FlowState::Terminal(ResultCode::Ok)
    );
    assert_eq!(h.submitter.submitted().await, vec![operation()]);
}

#[tokio::test]
async fn test_connection_failure_on_load_is_retried_on_request() {
    let mut h = harness();
    h.loader
        .push(Err(FlowError::Connectivity("offline".into())))
        .await;
    h.loader
        .push(Ok(session(InteractionCode::Proceed, reason::OK)))
        .await;
    h.submitter
        .push(Ok(operation_result(InteractionCode::Proceed, reason::OK)))
        .await;

    h.presenter.start(operation());
    assert_eq!(
        h.presenter.run_until_settled().await,
        &FlowState::RetryPrompt(RetryAction::ReloadSession)
    );
    assert!(h.view.terminals().is_empty());
    assert_eq!(h.view.retry_prompts(), vec![RetryAction::ReloadSession]);

    h.presenter.retry();
    assert_eq!(
        h.presenter.run_until_settled().await,
        &FlowState::Terminal(ResultCode::Ok)
    );
    assert_eq!(h.loader.calls(), 2);
    assert_eq!(h.view.terminals().len(), 1);
}

#[tokio::test]
async fn test_declined_retry_on_submit_closes_with_error() {
    let mut h = harness();
    h.loader
        .push(Ok(session(InteractionCode::Proceed, reason::OK)))
        .await;
    h.submitter
        .push(Err(FlowError::Connectivity("reset by peer".into())))
        .await;

    h.presenter.start(operation());
    assert_eq!(
        h.presenter.run_until_settled().await,
        &FlowState::RetryPrompt(RetryAction::ResubmitOperation)
    );

    h.presenter.decline_retry();
    assert_eq!(h.presenter.state(), &FlowState::Terminal(ResultCode::Error));
    let outcome = h.presenter.outcome().unwrap();
    assert_eq!(
        outcome.result.error.as_ref().unwrap().kind,
        ErrorKind::Connectivity
    );
    assert_eq!(
        outcome.message.as_deref(),
        Some(MessageKey::ConnectionError.default_text())
    );
    assert_eq!(h.submitter.submitted().await.len(), 1);
}

#[tokio::test]
async fn test_resubmit_posts_the_same_operation_again() {
    let mut h = harness();
    h.loader
        .push(Ok(session(InteractionCode::Proceed, reason::OK)))
        .await;
    h.submitter
        .push(Err(FlowError::Connectivity("timeout".into())))
        .await;
    h.submitter
        .push(Ok(operation_result(InteractionCode::Proceed, reason::OK)))
        .await;

    h.presenter.start(operation());
    h.presenter.run_until_settled().await;
    h.presenter.retry();
    h.presenter.run_until_settled().await;

    assert_eq!(h.presenter.state(), &FlowState::Terminal(ResultCode::Ok));
    assert_eq!(h.loader.calls(), 1);
    assert_eq!(h.submitter.submitted().await, vec![operation(), operation()]);
}

#[tokio::test]
async fn test_remote_error_on_load_cancels() {
    let mut h = harness();
    h.loader
        .push(Err(FlowError::Remote(ErrorInfo::new(
            "list expired",
            interaction(InteractionCode::Abort, reason::EXPIRED_SESSION),
        ))))
        .await;

    h.presenter.start(operation());
    assert_eq!(
        h.presenter.run_until_settled().await,
        &FlowState::Terminal(ResultCode::Canceled)
    );
    assert!(h.submitter.submitted().await.is_empty());
}

#[tokio::test]
async fn test_unknown_failures_close_with_error() {
    let mut h = harness();
    h.loader
        .push(Ok(session(InteractionCode::Proceed, reason::OK)))
        .await;
    h.submitter
        .push(Err(FlowError::Unknown("malformed response".into())))
        .await;

    h.presenter.start(operation());
    h.presenter.run_until_settled().await;

    let outcome = h.presenter.outcome().unwrap();
    assert_eq!(outcome.code, ResultCode::Error);
    assert_eq!(
        outcome.message.as_deref(),
        Some(MessageKey::UnknownError.default_text())
    );
    assert_eq!(outcome.result.error.as_ref().unwrap().kind, ErrorKind::Unknown);
}

#[tokio::test]
async fn test_stop_while_loading_drops_the_pending_load() {
    let gate = Arc::new(Notify::new());
    let mut h = harness_with(
        InMemorySessionLoader::with_gate(gate.clone()),
        CatalogTranslator::new(),
    );
    h.loader
        .push(Ok(session(InteractionCode::Proceed, reason::OK)))
        .await;
    h.submitter
        .push(Ok(operation_result(InteractionCode::Proceed, reason::OK)))
        .await;

    h.presenter.start(operation());
    tokio::task::yield_now().await;
    assert_eq!(h.loader.calls(), 1);
    h.presenter.stop();
    tokio::task::yield_now().await;

    assert_eq!(h.presenter.state(), &FlowState::Idle);
    assert!(!h.presenter.next_event().await);
    assert!(h.view.terminals().is_empty());

    h.presenter.start(operation());
    gate.notify_one();
    h.presenter.run_until_settled().await;
    assert_eq!(h.presenter.state(), &FlowState::Terminal(ResultCode::Ok));
    assert_eq!(h.view.terminals().len(), 1);
    assert_eq!(h.loader.calls(), 2);
}

#[tokio::test]
async fn test_event_from_an_earlier_generation_is_ignored() {
    let gate = Arc::new(Notify::new());
    let mut h = harness_with(
        InMemorySessionLoader::with_gate(gate.clone()),
        CatalogTranslator::new(),
    );

    h.presenter.start(operation());
    let stale = h.presenter.generation();
    h.presenter.stop();
    h.presenter.start(operation());
    assert_ne!(h.presenter.generation(), stale);

    h.presenter.handle_event(FlowEvent {
        generation: stale,
        kind: FlowEventKind::SessionLoaded(Ok(session(
            InteractionCode::Abort,
            reason::DECLINED,
        ))),
    });

    assert_eq!(h.presenter.state(), &FlowState::LoadingSession);
    assert!(h.presenter.outcome().is_none());
    h.presenter.stop();
}

#[tokio::test]
async fn test_back_press_warns_and_keeps_going() {
    let mut h = harness();
    h.loader
        .push(Ok(session(InteractionCode::Proceed, reason::OK)))
        .await;
    h.submitter
        .push(Ok(operation_result(InteractionCode::Proceed, reason::OK)))
        .await;

    h.presenter.start(operation());
    assert!(h.presenter.on_back_pressed());
    h.presenter.run_until_settled().await;

    assert!(h.view.commands().contains(&ViewCommand::Warning(
        MessageKey::OperationInterrupted.default_text().to_string()
    )));
    assert_eq!(h.presenter.state(), &FlowState::Terminal(ResultCode::Ok));
}

#[tokio::test]
async fn test_abort_with_other_reason_cancels() {
    let mut h = harness();
    h.loader
        .push(Ok(session(InteractionCode::Proceed, reason::OK)))
        .await;
    h.submitter
        .push(Ok(operation_result(InteractionCode::Abort, reason::DECLINED)))
        .await;

    h.presenter.start(operation());
    assert_eq!(
        h.presenter.run_until_settled().await,
        &FlowState::Terminal(ResultCode::Canceled)
    );
    let outcome = h.presenter.outcome().unwrap();
    assert_eq!(
        outcome.message.as_deref(),
        Some(MessageKey::UnknownError.default_text())
    );
    assert!(outcome.result.operation_result.is_some());

    let mut h = harness();
    h.loader
        .push(Ok(session(InteractionCode::Proceed, reason::OK)))
        .await;
    h.submitter
        .push(Err(FlowError::Remote(ErrorInfo::new(
            "suspected fraud",
            interaction(InteractionCode::Abort, reason::FRAUD),
        ))))
        .await;

    h.presenter.start(operation());
    assert_eq!(
        h.presenter.run_until_settled().await,
        &FlowState::Terminal(ResultCode::Canceled)
    );
    let outcome = h.presenter.outcome().unwrap();
    assert_eq!(
        outcome.message.as_deref(),
        Some(MessageKey::UnknownError.default_text())
    );
    assert_eq!(
        outcome.result.error_info.as_ref().unwrap().interaction.reason,
        reason::FRAUD
    );
    assert_eq!(h.view.terminals().len(), 1);
}

struct PanickingLoader;

#[async_trait]
impl SessionLoader for PanickingLoader {
    async fn load(&self, _list_url: &str) -> Result<PaymentSession, FlowError> {
        panic!("loader exploded");
    }
}

struct PanickingSubmitter;

#[async_trait]
impl OperationSubmitter for PanickingSubmitter {
    async fn submit(&self, _operation: &PaymentOperation) -> Result<OperationResult, FlowError> {
        panic!("submitter exploded");
    }
}

fn presenter_with(
    loader: Arc<dyn SessionLoader>,
    submitter: Arc<dyn OperationSubmitter>,
    view: &RecordingView,
) -> PaymentFlowPresenter {
    PaymentFlowPresenter::new(
        FlowConfig {
            list_url: LIST_URL.to_string(),
        },
        loader,
        submitter,
        Arc::new(CatalogTranslator::new()),
        Box::new(view.clone()),
    )
}

#[tokio::test]
async fn test_panicking_loader_closes_with_error() {
    let view = RecordingView::new();
    let submitter = Arc::new(InMemoryOperationSubmitter::new());
    let mut presenter = presenter_with(Arc::new(PanickingLoader), submitter.clone(), &view);

    presenter.start(operation());
    assert_eq!(
        presenter.run_until_settled().await,
        &FlowState::Terminal(ResultCode::Error)
    );

    let terminals = view.terminals();
    assert_eq!(terminals.len(), 1);
    assert_eq!(
        terminals[0].message.as_deref(),
        Some(MessageKey::UnknownError.default_text())
    );
    assert_eq!(
        terminals[0].result.error.as_ref().unwrap().kind,
        ErrorKind::Unknown
    );
    assert!(submitter.submitted().await.is_empty());
    assert!(!presenter.is_active());
}

#[tokio::test]
async fn test_panicking_submitter_closes_with_error() {
    let view = RecordingView::new();
    let loader = Arc::new(InMemorySessionLoader::new());
    loader
        .push(Ok(session(InteractionCode::Proceed, reason::OK)))
        .await;
    let mut presenter = presenter_with(loader, Arc::new(PanickingSubmitter), &view);

    presenter.start(operation());
    assert_eq!(
        presenter.run_until_settled().await,
        &FlowState::Terminal(ResultCode::Error)
    );
    assert_eq!(view.terminals().len(), 1);
    assert_eq!(
        view.terminals()[0].result.error.as_ref().unwrap().kind,
        ErrorKind::Unknown
    );
}
