#![allow(dead_code)]

use checkout_flow::application::presenter::{FlowConfig, PaymentFlowPresenter};
use checkout_flow::domain::interaction::{Interaction, InteractionCode};
use checkout_flow::domain::operation::{OperationType, PaymentOperation};
use checkout_flow::domain::result::OperationResult;
use checkout_flow::domain::session::{LINK_OPERATION, PaymentSession};
use checkout_flow::infrastructure::in_memory::{
    CatalogTranslator, InMemoryOperationSubmitter, InMemorySessionLoader, RecordingView,
};
use std::io::Error;
use std::path::Path;
use std::sync::Arc;

pub const LIST_URL: &str = "https://api.example/lists/42";
pub const CHARGE_URL: &str = "https://api.example/lists/42/networks/VISA/charge";

pub fn interaction(code: InteractionCode, reason: &str) -> Interaction {
    Interaction::new(code, reason)
}

pub fn session(code: InteractionCode, reason: &str) -> PaymentSession {
    PaymentSession::new(format!("list {reason}"), interaction(code, reason))
        .with_link(LINK_OPERATION, CHARGE_URL)
}

pub fn operation() -> PaymentOperation {
    let mut op = PaymentOperation::new(CHARGE_URL, OperationType::Charge);
    op.put_value("number", "4111111111111111")
        .expect("valid account value");
    op
}

pub fn operation_result(code: InteractionCode, reason: &str) -> OperationResult {
    OperationResult::new(format!("operation {reason}"), interaction(code, reason))
}

pub struct Harness {
    pub presenter: PaymentFlowPresenter,
    pub loader: Arc<InMemorySessionLoader>,
    pub submitter: Arc<InMemoryOperationSubmitter>,
    pub view: RecordingView,
}

pub fn harness() -> Harness {
    harness_with(InMemorySessionLoader::new(), CatalogTranslator::new())
}

pub fn harness_with(loader: InMemorySessionLoader, translator: CatalogTranslator) -> Harness {
    let loader = Arc::new(loader);
    let submitter = Arc::new(InMemoryOperationSubmitter::new());
    let view = RecordingView::new();
    let presenter = PaymentFlowPresenter::new(
        FlowConfig {
            list_url: LIST_URL.to_string(),
        },
        loader.clone(),
        submitter.clone(),
        Arc::new(translator),
        Box::new(view.clone()),
    );
    Harness {
        presenter,
        loader,
        submitter,
        view,
    }
}

pub fn write_batch_csv(path: &Path, rows: &[[&str; 5]]) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(["method", "code", "type", "value1", "value2"])?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
