use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifiers for every way a field value can fail validation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationError {
    MissingAccountNumber,
    InvalidAccountNumber,
    MissingVerificationCode,
    InvalidVerificationCode,
    MissingHolderName,
    MissingExpiryDate,
    InvalidExpiryDate,
    MissingExpiryMonth,
    InvalidExpiryMonth,
    MissingExpiryYear,
    InvalidExpiryYear,
    MissingBankCode,
    MissingIban,
    InvalidIban,
    MissingBic,
    InvalidBic,
}

impl ValidationError {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationError::MissingAccountNumber => "MISSING_ACCOUNT_NUMBER",
            ValidationError::InvalidAccountNumber => "INVALID_ACCOUNT_NUMBER",
            ValidationError::MissingVerificationCode => "MISSING_VERIFICATION_CODE",
            ValidationError::InvalidVerificationCode => "INVALID_VERIFICATION_CODE",
            ValidationError::MissingHolderName => "MISSING_HOLDER_NAME",
            ValidationError::MissingExpiryDate => "MISSING_EXPIRY_DATE",
            ValidationError::InvalidExpiryDate => "INVALID_EXPIRY_DATE",
            ValidationError::MissingExpiryMonth => "MISSING_EXPIRY_MONTH",
            ValidationError::InvalidExpiryMonth => "INVALID_EXPIRY_MONTH",
            ValidationError::MissingExpiryYear => "MISSING_EXPIRY_YEAR",
            ValidationError::InvalidExpiryYear => "INVALID_EXPIRY_YEAR",
            ValidationError::MissingBankCode => "MISSING_BANK_CODE",
            ValidationError::MissingIban => "MISSING_IBAN",
            ValidationError::InvalidIban => "INVALID_IBAN",
            ValidationError::MissingBic => "MISSING_BIC",
            ValidationError::InvalidBic => "INVALID_BIC",
        }
    }

    pub fn is_missing(&self) -> bool {
        self.as_str().starts_with("MISSING_")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating one field. No error means the value is valid.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct ValidationResult {
    pub error: Option<ValidationError>,
    /// Display text, attached by the caller after translating `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn error(error: ValidationError) -> Self {
        Self {
            error: Some(error),
            message: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<Option<ValidationError>> for ValidationResult {
    fn from(error: Option<ValidationError>) -> Self {
        Self {
            error,
            message: None,
        }
    }
}
