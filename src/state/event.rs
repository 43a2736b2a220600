use crate::theme::{ColorScheme, ThemePreference};

use super::model::ThemeState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeEvent {
    /// A preference was selected, by the user or by a load phase.
    Select(ThemePreference),
    /// The system source cannot notify about changes.
    Detach,
    /// The system reported a new color scheme.
    SystemSchemeChanged(ColorScheme),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: Option<ThemeState>,
    pub event: ThemeEvent,
    pub to: ThemeState,
}

impl StateTransition {
    pub const fn new(from: Option<ThemeState>, event: ThemeEvent, to: ThemeState) -> Self {
        Self { from, event, to }
    }
}
