use crate::domain::checkbox::CheckboxMode;
use crate::domain::interaction::Interaction;
use crate::domain::operation::OperationType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

pub const LINK_OPERATION: &str = "operation";
pub const LINK_LOGO: &str = "logo";
pub const LINK_LANGUAGE: &str = "lang";
pub const LINK_SELF: &str = "self";

pub type Links = HashMap<String, String>;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrationType {
    MobileNative,
    DisplayNative,
    SelectiveNative,
    PureNative,
    Hosted,
}

impl IntegrationType {
    pub fn is_valid(value: &str) -> bool {
        value.parse::<IntegrationType>().is_ok()
    }
}

impl FromStr for IntegrationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MOBILE_NATIVE" => Ok(IntegrationType::MobileNative),
            "DISPLAY_NATIVE" => Ok(IntegrationType::DisplayNative),
            "SELECTIVE_NATIVE" => Ok(IntegrationType::SelectiveNative),
            "PURE_NATIVE" => Ok(IntegrationType::PureNative),
            "HOSTED" => Ok(IntegrationType::Hosted),
            other => Err(format!("unknown integration type: {other}")),
        }
    }
}

/// One input field a network asks for. The name doubles as the field type
/// the validator dispatches on (`number`, `expiryMonth`, `iban`, ...).
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct InputElement {
    pub name: String,
    #[serde(rename = "type", default = "default_input_kind")]
    pub kind: String,
}

fn default_input_kind() -> String {
    "string".to_string()
}

impl InputElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: default_input_kind(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub code: String,
    pub label: String,
    pub method: String,
    #[serde(default = "default_operation_type")]
    pub operation_type: OperationType,
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub input_elements: Vec<InputElement>,
    #[serde(default)]
    pub preselected: bool,
    #[serde(default)]
    pub registration: Option<CheckboxMode>,
    #[serde(default)]
    pub recurrence: Option<CheckboxMode>,
}

fn default_operation_type() -> OperationType {
    OperationType::Charge
}

/// Card grouping one or more networks that share an input form.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NetworkCard {
    pub networks: Vec<Network>,
    #[serde(default)]
    pub active: usize,
}

impl NetworkCard {
    pub fn active_network(&self) -> Option<&Network> {
        self.networks.get(self.active).or_else(|| self.networks.first())
    }
}

/// Account the customer registered earlier.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AccountCard {
    pub code: String,
    pub method: String,
    pub label: String,
    #[serde(default = "default_operation_type")]
    pub operation_type: OperationType,
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub input_elements: Vec<InputElement>,
    #[serde(default)]
    pub preselected: bool,
}

/// Account chosen in an earlier PRESET operation, charged without a form.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PresetCard {
    pub code: String,
    pub method: String,
    pub label: String,
    #[serde(default)]
    pub links: Links,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PaymentCard {
    Network(NetworkCard),
    Account(AccountCard),
    Preset(PresetCard),
}

static NO_LINKS: std::sync::LazyLock<Links> = std::sync::LazyLock::new(Links::new);

impl PaymentCard {
    pub fn links(&self) -> &Links {
        match self {
            PaymentCard::Network(card) => card.active_network().map_or(&*NO_LINKS, |n| &n.links),
            PaymentCard::Account(card) => &card.links,
            PaymentCard::Preset(card) => &card.links,
        }
    }

    pub fn link(&self, name: &str) -> Option<&str> {
        self.links().get(name).map(String::as_str)
    }

    pub fn operation_link(&self) -> Option<&str> {
        self.link(LINK_OPERATION)
    }

    pub fn logo_link(&self) -> Option<&str> {
        self.link(LINK_LOGO)
    }

    /// A network card matches when any of its networks carries the link.
    pub fn contains_link(&self, name: &str, url: &str) -> bool {
        match self {
            PaymentCard::Network(card) => card
                .networks
                .iter()
                .any(|n| n.links.get(name).is_some_and(|l| l == url)),
            PaymentCard::Account(card) => card.links.get(name).is_some_and(|l| l == url),
            PaymentCard::Preset(card) => card.links.get(name).is_some_and(|l| l == url),
        }
    }

    pub fn operation_type(&self) -> OperationType {
        match self {
            PaymentCard::Network(card) => card
                .active_network()
                .map_or(OperationType::Charge, |n| n.operation_type),
            PaymentCard::Account(card) => card.operation_type,
            PaymentCard::Preset(_) => OperationType::Charge,
        }
    }

    pub fn payment_method(&self) -> &str {
        match self {
            PaymentCard::Network(card) => card.active_network().map_or("", |n| n.method.as_str()),
            PaymentCard::Account(card) => &card.method,
            PaymentCard::Preset(card) => &card.method,
        }
    }

    pub fn network_code(&self) -> &str {
        match self {
            PaymentCard::Network(card) => card.active_network().map_or("", |n| n.code.as_str()),
            PaymentCard::Account(card) => &card.code,
            PaymentCard::Preset(card) => &card.code,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            PaymentCard::Network(card) => card.active_network().map_or("", |n| n.label.as_str()),
            PaymentCard::Account(card) => &card.label,
            PaymentCard::Preset(card) => &card.label,
        }
    }

    pub fn is_preselected(&self) -> bool {
        match self {
            PaymentCard::Network(card) => card.networks.iter().any(|n| n.preselected),
            PaymentCard::Account(card) => card.preselected,
            PaymentCard::Preset(_) => true,
        }
    }

    pub fn input_elements(&self) -> &[InputElement] {
        match self {
            PaymentCard::Network(card) => card
                .active_network()
                .map(|n| n.input_elements.as_slice())
                .unwrap_or(&[]),
            PaymentCard::Account(card) => &card.input_elements,
            PaymentCard::Preset(_) => &[],
        }
    }

    pub fn input_element(&self, name: &str) -> Option<&InputElement> {
        self.input_elements().iter().find(|e| e.name == name)
    }

    /// Checkbox modes for the `autoRegistration` and `allowRecurrence` registers.
    pub fn checkboxes(&self) -> Vec<(&'static str, CheckboxMode)> {
        let PaymentCard::Network(card) = self else {
            return Vec::new();
        };
        let Some(network) = card.active_network() else {
            return Vec::new();
        };
        let mut boxes = Vec::new();
        if let Some(mode) = network.registration {
            boxes.push(("autoRegistration", mode));
        }
        if let Some(mode) = network.recurrence {
            boxes.push(("allowRecurrence", mode));
        }
        boxes
    }
}

/// Parsed list result. Replaced wholesale on every reload.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    pub result_info: String,
    pub interaction: Interaction,
    #[serde(default)]
    pub integration_type: Option<IntegrationType>,
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub cards: Vec<PaymentCard>,
    #[serde(skip)]
    selected_index: Option<usize>,
}

impl PaymentSession {
    pub fn new(result_info: impl Into<String>, interaction: Interaction) -> Self {
        Self {
            result_info: result_info.into(),
            interaction,
            integration_type: None,
            links: Links::new(),
            cards: Vec::new(),
            selected_index: None,
        }
    }

    pub fn with_link(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.links.insert(name.into(), url.into());
        self
    }

    pub fn with_card(mut self, card: PaymentCard) -> Self {
        self.cards.push(card);
        self
    }

    /// True when the list itself or any of its cards declares `name` -> `url`.
    pub fn contains_link(&self, name: &str, url: &str) -> bool {
        self.links.get(name).is_some_and(|l| l == url)
            || self.cards.iter().any(|c| c.contains_link(name, url))
    }

    pub fn link(&self, name: &str) -> Option<&str> {
        self.links.get(name).map(String::as_str)
    }

    pub fn card(&self, index: usize) -> Option<&PaymentCard> {
        self.cards.get(index)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Remembers which card was open so the list can be restored later.
    pub fn set_selected_index(&mut self, index: Option<usize>) {
        self.selected_index = index.filter(|i| *i < self.cards.len());
    }

    pub fn selected_card(&self) -> Option<&PaymentCard> {
        self.selected_index.and_then(|i| self.cards.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::interaction::InteractionCode;

    fn network(code: &str, url: &str) -> Network {
        Network {
            code: code.to_string(),
            label: code.to_string(),
            method: "CREDIT_CARD".to_string(),
            operation_type: OperationType::Charge,
            links: Links::from([(LINK_OPERATION.to_string(), url.to_string())]),
            input_elements: vec![InputElement::new("number")],
            preselected: false,
            registration: None,
            recurrence: None,
        }
    }

    #[test]
    fn test_integration_type_validity() {
        assert!(!IntegrationType::is_valid("foo"));
        for value in [
            "MOBILE_NATIVE",
            "DISPLAY_NATIVE",
            "SELECTIVE_NATIVE",
            "PURE_NATIVE",
            "HOSTED",
        ] {
            assert!(IntegrationType::is_valid(value), "{value}");
        }
    }

    #[test]
    fn test_network_card_checks_every_network() {
        let card = PaymentCard::Network(NetworkCard {
            networks: vec![network("VISA", "https://a/visa"), network("AMEX", "https://a/amex")],
            active: 0,
        });
        assert!(card.contains_link(LINK_OPERATION, "https://a/amex"));
        assert!(!card.contains_link(LINK_OPERATION, "https://a/other"));
        assert_eq!(card.operation_link(), Some("https://a/visa"));
        assert_eq!(card.network_code(), "VISA");
    }

    #[test]
    fn test_session_contains_link_in_cards_or_list() {
        let interaction = Interaction::new(InteractionCode::Proceed, "OK");
        let session = PaymentSession::new("ok", interaction)
            .with_link(LINK_SELF, "https://a/list")
            .with_card(PaymentCard::Network(NetworkCard {
                networks: vec![network("VISA", "https://a/visa")],
                active: 0,
            }));
        assert!(session.contains_link(LINK_OPERATION, "https://a/visa"));
        assert!(session.contains_link(LINK_SELF, "https://a/list"));
        assert!(!session.contains_link(LINK_OPERATION, "https://a/list"));
    }

    #[test]
    fn test_selected_index_is_bounded() {
        let interaction = Interaction::new(InteractionCode::Proceed, "OK");
        let mut session = PaymentSession::new("ok", interaction).with_card(PaymentCard::Preset(
            PresetCard {
                code: "SEPADD".into(),
                method: "DIRECT_DEBIT".into(),
                label: "DE89 ****".into(),
                links: Links::new(),
            },
        ));
        session.set_selected_index(Some(3));
        assert_eq!(session.selected_index(), None);
        session.set_selected_index(Some(0));
        assert_eq!(session.selected_card().unwrap().network_code(), "SEPADD");
    }

    #[test]
    fn test_card_deserializes_from_tagged_json() {
        let json = r#"{"kind":"account","code":"VISA","method":"CREDIT_CARD","label":"41 *** 1111",
                       "links":{"operation":"https://a/acc"}}"#;
        let card: PaymentCard = serde_json::from_str(json).unwrap();
        assert_eq!(card.operation_link(), Some("https://a/acc"));
        assert_eq!(card.operation_type(), OperationType::Charge);
        assert!(card.input_elements().is_empty());
    }
}
