use super::checksum::{is_valid_iban, is_valid_luhn};
use super::result::{ValidationError, ValidationResult};
use super::rules::{FieldType, ValidationRule, ValidationRuleSet};
use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use std::sync::{Arc, LazyLock};

pub const REGEX_MONTH: &str = r"^(0[1-9]|1[0-2])$";
pub const REGEX_YEAR: &str = r"^(20)\d{2}$";
pub const REGEX_BIC: &str = r"^[a-zA-Z]{4}[a-zA-Z]{2}[a-zA-Z0-9]{2}([a-zA-Z0-9]{3})?$";

static MONTH: LazyLock<Regex> = LazyLock::new(|| Regex::new(REGEX_MONTH).expect("month pattern"));
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(REGEX_YEAR).expect("year pattern"));
static BIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(REGEX_BIC).expect("BIC pattern"));

pub mod method {
    pub const CREDIT_CARD: &str = "CREDIT_CARD";
    pub const DEBIT_CARD: &str = "DEBIT_CARD";
    pub const DIRECT_DEBIT: &str = "DIRECT_DEBIT";
    pub const WALLET: &str = "WALLET";
}

fn is_card_method(payment_method: &str) -> bool {
    payment_method == method::CREDIT_CARD || payment_method == method::DEBIT_CARD
}

/// Validates values entered for payment input fields.
///
/// Holds no mutable state; clones share the same rule index and may be used
/// from any number of fields at once.
#[derive(Debug, Clone)]
pub struct Validator {
    rules: Arc<ValidationRuleSet>,
    today: Option<NaiveDate>,
}

impl Validator {
    pub fn new(rules: Arc<ValidationRuleSet>) -> Self {
        Self { rules, today: None }
    }

    /// Pins "today" for expiry checks instead of reading the local clock.
    pub fn with_fixed_date(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn rules(&self) -> &ValidationRuleSet {
        &self.rules
    }

    /// Validates `value1` (and `value2` for combined fields such as the
    /// expiry date, where `value1` is the month and `value2` the year).
    ///
    /// An empty string counts as a missing value.
    pub fn validate(
        &self,
        payment_method: &str,
        code: &str,
        field: &FieldType,
        value1: &str,
        value2: &str,
    ) -> ValidationResult {
        let rule = self.rules.get(payment_method, code, field);

        match field {
            FieldType::AccountNumber => validate_account_number(payment_method, value1, rule),
            FieldType::VerificationCode => validate_verification_code(value1, rule),
            FieldType::HolderName => {
                missing_if_empty(value1, ValidationError::MissingHolderName).into()
            }
            FieldType::ExpiryDate => self.validate_expiry_date(value1, value2),
            FieldType::ExpiryMonth => check_format(
                value1,
                &MONTH,
                ValidationError::MissingExpiryMonth,
                ValidationError::InvalidExpiryMonth,
            ),
            FieldType::ExpiryYear => check_format(
                value1,
                &YEAR,
                ValidationError::MissingExpiryYear,
                ValidationError::InvalidExpiryYear,
            ),
            FieldType::BankCode => missing_if_empty(value1, ValidationError::MissingBankCode).into(),
            FieldType::Iban => validate_iban(value1),
            FieldType::Bic => check_format(
                value1,
                &BIC,
                ValidationError::MissingBic,
                ValidationError::InvalidBic,
            ),
            FieldType::Other(_) => ValidationResult::valid(),
        }
    }

    fn validate_expiry_date(&self, month: &str, year: &str) -> ValidationResult {
        if month.is_empty() || year.is_empty() {
            return ValidationResult::error(ValidationError::MissingExpiryDate);
        }
        if !self.is_valid_expiry_date(month, year) {
            return ValidationResult::error(ValidationError::InvalidExpiryDate);
        }
        ValidationResult::valid()
    }

    fn is_valid_expiry_date(&self, month: &str, year: &str) -> bool {
        if !(MONTH.is_match(month) && YEAR.is_match(year)) {
            return false;
        }
        // Both patterns only admit digits, so parsing cannot fail.
        let (Ok(exp_month), Ok(exp_year)) = (month.parse::<u32>(), year.parse::<i32>()) else {
            return false;
        };
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        (exp_year, exp_month) >= (today.year(), today.month())
    }
}

fn missing_if_empty(value: &str, error: ValidationError) -> Option<ValidationError> {
    value.is_empty().then_some(error)
}

fn check_format(
    value: &str,
    pattern: &Regex,
    missing: ValidationError,
    invalid: ValidationError,
) -> ValidationResult {
    if value.is_empty() {
        ValidationResult::error(missing)
    } else if !pattern.is_match(value) {
        ValidationResult::error(invalid)
    } else {
        ValidationResult::valid()
    }
}

fn validate_account_number(
    payment_method: &str,
    number: &str,
    rule: Option<&ValidationRule>,
) -> ValidationResult {
    if is_card_method(payment_method) {
        return validate_card_number(number, rule);
    }
    missing_if_empty(number, ValidationError::MissingAccountNumber).into()
}

fn validate_card_number(number: &str, rule: Option<&ValidationRule>) -> ValidationResult {
    let Some(rule) = rule else {
        return missing_if_empty(number, ValidationError::MissingAccountNumber).into();
    };
    if number.is_empty() && !rule.required() {
        return ValidationResult::valid();
    }
    if !rule.matches(number) {
        return if number.is_empty() {
            ValidationResult::error(ValidationError::MissingAccountNumber)
        } else {
            ValidationResult::error(ValidationError::InvalidAccountNumber)
        };
    }
    if !is_valid_luhn(number) {
        return ValidationResult::error(ValidationError::InvalidAccountNumber);
    }
    ValidationResult::valid()
}

fn validate_verification_code(code: &str, rule: Option<&ValidationRule>) -> ValidationResult {
    // No rule: this network does not ask for a verification code.
    let Some(rule) = rule else {
        return ValidationResult::valid();
    };
    if code.is_empty() && !rule.required() {
        return ValidationResult::valid();
    }
    if !rule.matches(code) {
        return if code.is_empty() {
            ValidationResult::error(ValidationError::MissingVerificationCode)
        } else {
            ValidationResult::error(ValidationError::InvalidVerificationCode)
        };
    }
    ValidationResult::valid()
}

fn validate_iban(iban: &str) -> ValidationResult {
    if iban.is_empty() {
        ValidationResult::error(ValidationError::MissingIban)
    } else if !is_valid_iban(iban) {
        ValidationResult::error(ValidationError::InvalidIban)
    } else {
        ValidationResult::valid()
    }
}
