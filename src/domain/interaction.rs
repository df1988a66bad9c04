use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome signal the server attaches to a list or operation response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionCode {
    Proceed,
    Abort,
    TryOtherNetwork,
    TryOtherAccount,
    Reload,
    Retry,
}

impl InteractionCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionCode::Proceed => "PROCEED",
            InteractionCode::Abort => "ABORT",
            InteractionCode::TryOtherNetwork => "TRY_OTHER_NETWORK",
            InteractionCode::TryOtherAccount => "TRY_OTHER_ACCOUNT",
            InteractionCode::Reload => "RELOAD",
            InteractionCode::Retry => "RETRY",
        }
    }
}

impl fmt::Display for InteractionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROCEED" => Ok(InteractionCode::Proceed),
            "ABORT" => Ok(InteractionCode::Abort),
            "TRY_OTHER_NETWORK" => Ok(InteractionCode::TryOtherNetwork),
            "TRY_OTHER_ACCOUNT" => Ok(InteractionCode::TryOtherAccount),
            "RELOAD" => Ok(InteractionCode::Reload),
            "RETRY" => Ok(InteractionCode::Retry),
            other => Err(format!("unknown interaction code: {other}")),
        }
    }
}

/// Known interaction reasons. The reason field itself is an open string.
pub mod reason {
    pub const OK: &str = "OK";
    pub const PENDING: &str = "PENDING";
    pub const TAKE_RETURN: &str = "TAKE_RETURN";
    pub const STRONG_AUTHENTICATION: &str = "STRONG_AUTHENTICATION";
    pub const DECLINED: &str = "DECLINED";
    pub const EXCEEDS_LIMIT: &str = "EXCEEDS_LIMIT";
    pub const TEMPORARY_FAILURE: &str = "TEMPORARY_FAILURE";
    pub const NETWORK_FAILURE: &str = "NETWORK_FAILURE";
    pub const BLOCKED: &str = "BLOCKED";
    pub const SYSTEM_FAILURE: &str = "SYSTEM_FAILURE";
    pub const INVALID_ACCOUNT: &str = "INVALID_ACCOUNT";
    pub const FRAUD: &str = "FRAUD";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const NO_NETWORKS: &str = "NO_NETWORKS";
    pub const DUPLICATE_OPERATION: &str = "DUPLICATE_OPERATION";
    pub const RISK_DETECTED: &str = "RISK_DETECTED";
    pub const CUSTOMER_ABORT: &str = "CUSTOMER_ABORT";
    pub const EXPIRED_SESSION: &str = "EXPIRED_SESSION";
    pub const EXPIRED_ACCOUNT: &str = "EXPIRED_ACCOUNT";
    pub const CLIENTSIDE_ERROR: &str = "CLIENTSIDE_ERROR";
    pub const COMMUNICATION_FAILURE: &str = "COMMUNICATION_FAILURE";
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Hash)]
pub struct Interaction {
    pub code: InteractionCode,
    pub reason: String,
}

impl Interaction {
    pub fn new(code: InteractionCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    pub fn is_proceed(&self) -> bool {
        self.code == InteractionCode::Proceed
    }

    /// The server refused the operation because it already went through.
    pub fn is_duplicate_operation(&self) -> bool {
        self.code == InteractionCode::Abort && self.reason == reason::DUPLICATE_OPERATION
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.code, self.reason)
    }
}
