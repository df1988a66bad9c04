use crate::error::{CheckoutError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Charge,
    Preset,
    Update,
}

/// Operation posted to the payment API.
///
/// Widgets fill the account block and the register flags one value at a
/// time; the finished operation is handed to the presenter, which owns it for
/// the rest of the submission attempt.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOperation {
    url: String,
    operation_type: OperationType,
    #[serde(default)]
    account: BTreeMap<String, String>,
    #[serde(default)]
    registers: BTreeMap<String, bool>,
}

impl PaymentOperation {
    pub fn new(url: impl Into<String>, operation_type: OperationType) -> Self {
        Self {
            url: url.into(),
            operation_type,
            account: BTreeMap::new(),
            registers: BTreeMap::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    /// Stores an account field, e.g. `number` or `holderName`.
    pub fn put_value(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        if name.is_empty() {
            return Err(CheckoutError::OperationError(
                "account value name may not be empty".to_string(),
            ));
        }
        self.account.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Stores a top-level flag such as `autoRegistration`.
    pub fn put_register(&mut self, name: &str, value: bool) -> Result<()> {
        if name.is_empty() {
            return Err(CheckoutError::OperationError(
                "register name may not be empty".to_string(),
            ));
        }
        if name == "account" {
            return Err(CheckoutError::OperationError(
                "register name clashes with the account block".to_string(),
            ));
        }
        self.registers.insert(name.to_string(), value);
        Ok(())
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.account.get(name).map(String::as_str)
    }

    pub fn register(&self, name: &str) -> Option<bool> {
        self.registers.get(name).copied()
    }

    /// Request body: the register flags at top level plus the `account` object.
    pub fn to_json(&self) -> Result<String> {
        let mut body = Map::new();
        for (name, value) in &self.registers {
            body.insert(name.clone(), Value::Bool(*value));
        }
        let account: Map<String, Value> = self
            .account
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        body.insert("account".to_string(), Value::Object(account));
        Ok(serde_json::to_string(&Value::Object(body))?)
    }
}
