use crate::domain::interaction::Interaction;
use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};

/// Error description sent by the server instead of a regular response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    pub result_info: String,
    pub interaction: Interaction,
}

impl ErrorInfo {
    pub fn new(result_info: impl Into<String>, interaction: Interaction) -> Self {
        Self {
            result_info: result_info.into(),
            interaction,
        }
    }
}

/// Response of a posted operation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub result_info: String,
    pub interaction: Interaction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl OperationResult {
    pub fn new(result_info: impl Into<String>, interaction: Interaction) -> Self {
        Self {
            result_info: result_info.into(),
            interaction,
            redirect_url: None,
        }
    }
}

/// Local failure attached to an ERROR outcome.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub message: String,
}

/// Result code handed back to the host when the flow closes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    Ok,
    Canceled,
    Error,
}

/// Payload delivered with every terminal outcome.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub result_info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<Interaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_result: Option<OperationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_info: Option<ErrorInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl PaymentResult {
    pub fn from_interaction(result_info: impl Into<String>, interaction: Interaction) -> Self {
        Self {
            result_info: result_info.into(),
            interaction: Some(interaction),
            operation_result: None,
            error_info: None,
            error: None,
        }
    }

    pub fn from_operation_result(result: OperationResult) -> Self {
        Self {
            result_info: result.result_info.clone(),
            interaction: Some(result.interaction.clone()),
            operation_result: Some(result),
            error_info: None,
            error: None,
        }
    }

    pub fn from_error_info(info: ErrorInfo) -> Self {
        Self {
            result_info: info.result_info.clone(),
            interaction: Some(info.interaction.clone()),
            operation_result: None,
            error_info: Some(info),
            error: None,
        }
    }

    pub fn from_error(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            result_info: message.clone(),
            interaction: None,
            operation_result: None,
            error_info: None,
            error: Some(ErrorDetail { kind, message }),
        }
    }
}

/// What the host receives exactly once per started flow.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TerminalOutcome {
    pub code: ResultCode,
    pub message: Option<String>,
    pub result: PaymentResult,
}
