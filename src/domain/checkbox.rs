use serde::{Deserialize, Serialize};

/// How a register checkbox (auto registration, recurrence) is offered.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckboxMode {
    Optional,
    OptionalPreselected,
    Required,
    RequiredPreselected,
    Forced,
    ForcedDisplayed,
    #[serde(other)]
    None,
}

/// Initial presentation of a checkbox.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CheckboxState {
    pub visible: bool,
    pub switch_visible: bool,
    pub checked: bool,
}

impl CheckboxMode {
    // Required modes behave like the optional ones until a "required" message
    // exists in the language files.
    pub fn initial_state(&self) -> CheckboxState {
        let (visible, switch_visible, checked) = match self {
            CheckboxMode::Optional | CheckboxMode::Required => (true, true, false),
            CheckboxMode::OptionalPreselected | CheckboxMode::RequiredPreselected => {
                (true, true, true)
            }
            CheckboxMode::Forced => (false, false, true),
            CheckboxMode::ForcedDisplayed => (true, false, true),
            CheckboxMode::None => (false, false, false),
        };
        CheckboxState {
            visible,
            switch_visible,
            checked,
        }
    }

    /// Register value sent when the user did not touch the checkbox.
    pub fn default_value(&self) -> bool {
        self.initial_state().checked
    }

    /// Forced modes ignore whatever the user chose.
    pub fn resolve(&self, user_choice: Option<bool>) -> bool {
        match self {
            CheckboxMode::Forced | CheckboxMode::ForcedDisplayed => true,
            CheckboxMode::None => false,
            _ => user_choice.unwrap_or_else(|| self.default_value()),
        }
    }
}
