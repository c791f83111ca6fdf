//! What a page action asks of the surrounding navigation.

use crate::router::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Stay,
    Navigate(Route),
    /// The user declined the confirmation prompt.
    Declined,
    /// The page was not ready for the action (still loading or mutating).
    Ignored,
}

impl Outcome {
    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::Navigate(route) => Some(route),
            _ => None,
        }
    }
}

/// Question put to the user before a laptop is deleted.
pub fn confirmation_prompt(name: &str) -> String {
    format!("Are you sure you want to delete \"{name}\"?")
}
