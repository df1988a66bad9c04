use crate::error::{CheckoutError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use tracing::debug;

const BUNDLED_RULES: &str = include_str!("../../resources/validations.json");

/// Input field types the validator knows how to check.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    AccountNumber,
    VerificationCode,
    HolderName,
    ExpiryDate,
    ExpiryMonth,
    ExpiryYear,
    BankCode,
    Iban,
    Bic,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::AccountNumber => "number",
            FieldType::VerificationCode => "verificationCode",
            FieldType::HolderName => "holderName",
            FieldType::ExpiryDate => "expiryDate",
            FieldType::ExpiryMonth => "expiryMonth",
            FieldType::ExpiryYear => "expiryYear",
            FieldType::BankCode => "bankCode",
            FieldType::Iban => "iban",
            FieldType::Bic => "bic",
            FieldType::Other(name) => name,
        }
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        match value {
            "number" => FieldType::AccountNumber,
            "verificationCode" => FieldType::VerificationCode,
            "holderName" => FieldType::HolderName,
            "expiryDate" => FieldType::ExpiryDate,
            "expiryMonth" => FieldType::ExpiryMonth,
            "expiryYear" => FieldType::ExpiryYear,
            "bankCode" => FieldType::BankCode,
            "iban" => FieldType::Iban,
            "bic" => FieldType::Bic,
            other => FieldType::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        FieldType::from(value.as_str())
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiled rule for one field of one network.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pattern: Option<Regex>,
    required: bool,
}

impl ValidationRule {
    /// `pattern` must match the whole value.
    pub fn new(pattern: Option<&str>, required: bool) -> std::result::Result<Self, regex::Error> {
        let pattern = pattern.map(|p| Regex::new(&format!("^(?:{p})$"))).transpose()?;
        Ok(Self { pattern, required })
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// A rule without a pattern accepts anything.
    pub fn matches(&self, value: &str) -> bool {
        self.pattern.as_ref().is_none_or(|re| re.is_match(value))
    }
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    #[serde(default)]
    method: Option<String>,
    code: String,
    items: Vec<RuleItem>,
}

#[derive(Debug, Deserialize)]
struct RuleItem {
    #[serde(rename = "type")]
    field: FieldType,
    #[serde(default)]
    regex: Option<String>,
    #[serde(default = "default_required")]
    required: bool,
}

fn default_required() -> bool {
    true
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
struct RuleKey {
    method: Option<String>,
    code: String,
    field: FieldType,
}

/// Immutable index of rules keyed by (method, network code, field type).
///
/// Entries without a method apply to the network code under every method; a
/// method-specific entry wins over them.
#[derive(Debug, Clone, Default)]
pub struct ValidationRuleSet {
    rules: HashMap<RuleKey, ValidationRule>,
}

impl ValidationRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules shipped with the crate for the common card networks.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_RULES)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<RuleEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let entries: Vec<RuleEntry> = serde_json::from_reader(reader)?;
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<RuleEntry>) -> Result<Self> {
        let mut set = Self::new();
        for entry in entries {
            for item in entry.items {
                let rule = ValidationRule::new(item.regex.as_deref(), item.required).map_err(
                    |source| CheckoutError::InvalidRule {
                        code: entry.code.clone(),
                        field: item.field.to_string(),
                        source,
                    },
                )?;
                set.insert(entry.method.as_deref(), &entry.code, item.field, rule);
            }
        }
        debug!(rules = set.len(), "loaded validation rules");
        Ok(set)
    }

    pub fn insert(
        &mut self,
        method: Option<&str>,
        code: &str,
        field: FieldType,
        rule: ValidationRule,
    ) {
        let key = RuleKey {
            method: method.map(str::to_string),
            code: code.to_string(),
            field,
        };
        self.rules.insert(key, rule);
    }

    pub fn get(&self, method: &str, code: &str, field: &FieldType) -> Option<&ValidationRule> {
        let mut key = RuleKey {
            method: Some(method.to_string()),
            code: code.to_string(),
            field: field.clone(),
        };
        if let Some(rule) = self.rules.get(&key) {
            return Some(rule);
        }
        key.method = None;
        self.rules.get(&key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
