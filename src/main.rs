use checkout_flow::application::presenter::{FlowConfig, FlowState, PaymentFlowPresenter};
use checkout_flow::domain::ports::{OperationSubmitterRef, SessionLoaderRef, TranslatorRef};
use checkout_flow::domain::result::ResultCode;
use checkout_flow::infrastructure::in_memory::{
    CatalogTranslator, InMemoryOperationSubmitter, InMemorySessionLoader,
};
use checkout_flow::interfaces::console::ConsoleView;
use checkout_flow::interfaces::csv::validation_reader::ValidationRequestReader;
use checkout_flow::interfaces::csv::validation_writer::ValidationReportWriter;
use checkout_flow::interfaces::json::fixture::CheckoutFixture;
use checkout_flow::validation::{FieldType, ValidationRuleSet, Validator};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a single field value
    Validate {
        /// Payment method, e.g. CREDIT_CARD
        #[arg(long)]
        method: String,
        /// Network code, e.g. VISA
        #[arg(long)]
        code: String,
        /// Field type, e.g. number, verificationCode, expiryDate, iban
        #[arg(long)]
        field: String,
        value1: Option<String>,
        /// Second value, the year for expiryDate
        value2: Option<String>,
        /// JSON file with validation rules. Uses the bundled rules if omitted.
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Validate every row of a CSV file with header method,code,type,value1,value2
    ValidateBatch {
        input: PathBuf,
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Run a scripted payment flow from a JSON fixture
    Checkout {
        fixture: PathBuf,
        /// How many times a connection failure is retried before giving up
        #[arg(long, default_value_t = 1)]
        retries: u32,
    },
}

fn load_validator(rules: Option<&Path>) -> Result<Validator> {
    let rules = match rules {
        Some(path) => {
            let file = File::open(path).into_diagnostic()?;
            ValidationRuleSet::from_reader(file).into_diagnostic()?
        }
        None => ValidationRuleSet::bundled().into_diagnostic()?,
    };
    Ok(Validator::new(Arc::new(rules)))
}

fn validate_one(
    method: &str,
    code: &str,
    field: &str,
    value1: Option<String>,
    value2: Option<String>,
    rules: Option<&Path>,
) -> Result<ExitCode> {
    let validator = load_validator(rules)?;
    let result = validator.validate(
        method,
        code,
        &FieldType::from(field),
        value1.as_deref().unwrap_or(""),
        value2.as_deref().unwrap_or(""),
    );
    match result.error {
        None => {
            println!("VALID");
            Ok(ExitCode::SUCCESS)
        }
        Some(error) => {
            println!("{error}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn validate_batch(input: &Path, rules: Option<&Path>) -> Result<ExitCode> {
    let validator = load_validator(rules)?;
    let file = File::open(input).into_diagnostic()?;
    let reader = ValidationRequestReader::new(file);

    let stdout = io::stdout();
    let mut writer = ValidationReportWriter::new(stdout.lock());
    for request in reader.requests() {
        match request {
            Ok(request) => {
                let result = validator.validate(
                    &request.method,
                    &request.code,
                    &request.field,
                    &request.value1,
                    &request.value2,
                );
                writer.write(&request, &result).into_diagnostic()?;
            }
            Err(e) => error!(error = %e, "skipping unreadable row"),
        }
    }
    writer.flush().into_diagnostic()?;
    Ok(ExitCode::SUCCESS)
}

async fn checkout(path: &Path, retries: u32) -> Result<ExitCode> {
    let fixture = CheckoutFixture::from_reader(File::open(path).into_diagnostic()?)
        .into_diagnostic()?;

    let loader = InMemorySessionLoader::new();
    for reply in fixture.session_replies {
        loader.push(reply.into()).await;
    }
    let submitter = InMemoryOperationSubmitter::new();
    for reply in fixture.submission_replies {
        submitter.push(reply.into()).await;
    }

    let loader: SessionLoaderRef = Arc::new(loader);
    let submitter: OperationSubmitterRef = Arc::new(submitter);
    let translator: TranslatorRef = Arc::new(CatalogTranslator::new());
    let mut presenter = PaymentFlowPresenter::new(
        FlowConfig {
            list_url: fixture.list_url,
        },
        loader,
        submitter,
        translator,
        Box::new(ConsoleView::new(io::stdout())),
    );

    presenter.start(fixture.operation);
    let mut retries_left = retries;
    loop {
        let state = presenter.run_until_settled().await.clone();
        match state {
            FlowState::RetryPrompt(action) if retries_left > 0 => {
                retries_left -= 1;
                info!(?action, retries_left, "retrying");
                presenter.retry();
            }
            FlowState::RetryPrompt(_) => presenter.decline_retry(),
            FlowState::Terminal(_) | FlowState::Idle => break,
            state => {
                error!(?state, "flow stalled");
                break;
            }
        }
    }

    let success = presenter
        .outcome()
        .is_some_and(|o| o.code != ResultCode::Error);
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Validate {
            method,
            code,
            field,
            value1,
            value2,
            rules,
        } => validate_one(&method, &code, &field, value1, value2, rules.as_deref()),
        Command::ValidateBatch { input, rules } => validate_batch(&input, rules.as_deref()),
        Command::Checkout { fixture, retries } => checkout(&fixture, retries).await,
    }
}
