//! Provider operation errors.

use thiserror::Error;

use super::DomError;

#[derive(Debug, Error)]
pub enum AutomationError {
    /// A required control could not be located after the whole fallback chain.
    #[error("{}", control_not_found_message(.control, .hint.as_deref()))]
    ControlNotFound {
        control: String,
        hint: Option<String>,
    },

    #[error(transparent)]
    Dom(#[from] DomError),
}

impl AutomationError {
    pub fn control_not_found(control: impl Into<String>) -> Self {
        AutomationError::ControlNotFound {
            control: control.into(),
            hint: None,
        }
    }

    pub fn control_not_found_with_hint(control: impl Into<String>, hint: impl Into<String>) -> Self {
        AutomationError::ControlNotFound {
            control: control.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn is_control_not_found(&self) -> bool {
        matches!(self, AutomationError::ControlNotFound { .. })
    }
}

fn control_not_found_message(control: &str, hint: Option<&str>) -> String {
    match hint {
        Some(hint) => format!("Could not find {control}. {hint}"),
        None => format!("Could not find {control}."),
    }
}
