use crate::domain::operation::PaymentOperation;
use crate::domain::session::PaymentCard;
use crate::error::CheckoutError;
use crate::validation::{FieldType, ValidationError, ValidationResult, Validator};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Key under which a past month/year combination is reported when a card
/// asks for month and year in separate fields.
pub const EXPIRY_DATE_KEY: &str = "expiryDate";

#[derive(Error, Debug)]
pub enum FormError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(BTreeMap<String, ValidationError>),
    #[error("payment card has no operation link")]
    MissingOperationLink,
    #[error(transparent)]
    Operation(#[from] CheckoutError),
}

/// Values a user entered into the form of one payment card.
pub struct PaymentForm<'a> {
    card: &'a PaymentCard,
    values: HashMap<String, String>,
    checked: HashMap<String, bool>,
}

impl<'a> PaymentForm<'a> {
    pub fn new(card: &'a PaymentCard) -> Self {
        Self {
            card,
            values: HashMap::new(),
            checked: HashMap::new(),
        }
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn set_checked(&mut self, name: &str, checked: bool) {
        self.checked.insert(name.to_string(), checked);
    }

    fn value(&self, name: &str) -> &str {
        self.values.get(name).map_or("", String::as_str)
    }

    /// Validates a single input field, e.g. on focus loss.
    pub fn validate_field(&self, validator: &Validator, name: &str) -> ValidationResult {
        let field = FieldType::from(name);
        let (value1, value2) = match field {
            FieldType::ExpiryDate => (self.value("expiryMonth"), self.value("expiryYear")),
            _ => (self.value(name), ""),
        };
        validator.validate(
            self.card.payment_method(),
            self.card.network_code(),
            &field,
            value1,
            value2,
        )
    }

    /// Validates every input element of the card. Returns the failures keyed
    /// by field name; an empty map means the form may be submitted.
    pub fn validate(&self, validator: &Validator) -> BTreeMap<String, ValidationError> {
        let mut errors = BTreeMap::new();
        for element in self.card.input_elements() {
            if let Some(error) = self.validate_field(validator, &element.name).error {
                errors.insert(element.name.clone(), error);
            }
        }

        let split_expiry = self.card.input_element("expiryMonth").is_some()
            && self.card.input_element("expiryYear").is_some();
        if split_expiry
            && !errors.contains_key("expiryMonth")
            && !errors.contains_key("expiryYear")
            && let Some(error) = self.validate_field(validator, EXPIRY_DATE_KEY).error
        {
            errors.insert(EXPIRY_DATE_KEY.to_string(), error);
        }
        errors
    }

    /// Builds the operation for this card, or vetoes it when any field is invalid.
    pub fn build_operation(&self, validator: &Validator) -> Result<PaymentOperation, FormError> {
        let errors = self.validate(validator);
        if !errors.is_empty() {
            return Err(FormError::Invalid(errors));
        }
        let url = self
            .card
            .operation_link()
            .ok_or(FormError::MissingOperationLink)?;

        let mut operation = PaymentOperation::new(url, self.card.operation_type());
        for element in self.card.input_elements() {
            let value = self.value(&element.name);
            if !value.is_empty() {
                operation.put_value(&element.name, value)?;
            }
        }
        for (name, mode) in self.card.checkboxes() {
            operation.put_register(name, mode.resolve(self.checked.get(name).copied()))?;
        }
        Ok(operation)
    }
}
