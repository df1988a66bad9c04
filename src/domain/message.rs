use serde::{Deserialize, Serialize};

/// Local message keys the flow needs regardless of what the server translates.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub enum MessageKey {
    UnknownError,
    MissingOperation,
    ConnectionError,
    OperationInterrupted,
}

impl MessageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::UnknownError => "error.unknown",
            MessageKey::MissingOperation => "error.missingOperation",
            MessageKey::ConnectionError => "error.connection",
            MessageKey::OperationInterrupted => "warning.operationInterrupted",
        }
    }

    /// Built-in text used when no translation is available.
    pub fn default_text(&self) -> &'static str {
        match self {
            MessageKey::UnknownError => "An unknown error occurred, please try again later.",
            MessageKey::MissingOperation => {
                "The payment could not be processed because the operation is not available."
            }
            MessageKey::ConnectionError => {
                "Unable to connect to the payment service. Please check your connection."
            }
            MessageKey::OperationInterrupted => "Please wait until the payment has been processed.",
        }
    }
}
