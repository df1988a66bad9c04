use crate::domain::operation::PaymentOperation;
use crate::domain::result::{ErrorInfo, OperationResult};
use crate::domain::session::PaymentSession;
use crate::error::{FlowError, Result};
use serde::Deserialize;
use std::io::Read;

/// Scripted answer of a collaborator.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub enum Reply<T> {
    Success(T),
    Connectivity(String),
    Remote(ErrorInfo),
    Integration(String),
    Failure(String),
}

impl<T> From<Reply<T>> for std::result::Result<T, FlowError> {
    fn from(reply: Reply<T>) -> Self {
        match reply {
            Reply::Success(value) => Ok(value),
            Reply::Connectivity(msg) => Err(FlowError::Connectivity(msg)),
            Reply::Remote(info) => Err(FlowError::Remote(info)),
            Reply::Integration(msg) => Err(FlowError::Integration(msg)),
            Reply::Failure(msg) => Err(FlowError::Unknown(msg)),
        }
    }
}

/// A complete checkout run: the list URL, the operation to post and the
/// replies the loader and submitter give, in order.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutFixture {
    pub list_url: String,
    pub operation: PaymentOperation,
    #[serde(default)]
    pub session_replies: Vec<Reply<PaymentSession>>,
    #[serde(default)]
    pub submission_replies: Vec<Reply<OperationResult>>,
}

impl CheckoutFixture {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}
