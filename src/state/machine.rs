use std::collections::VecDeque;

use super::error::{StateError, StateResult};
use super::{StateTransition, ThemeEvent, ThemeState};

const MAX_HISTORY: usize = 32;

#[derive(Debug)]
pub struct ThemeStateMachine {
    state: ThemeState,
    transition_history: VecDeque<StateTransition>,
}

impl ThemeStateMachine {
    pub fn new() -> Self {
        Self {
            state: ThemeState::default(),
            transition_history: VecDeque::new(),
        }
    }

    pub fn state(&self) -> ThemeState {
        self.state
    }

    pub fn can_transition(&self, event: ThemeEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: ThemeEvent) -> Option<ThemeState> {
        use ThemeEvent::*;
        match (self.state, event) {
            (_, Select(preference)) => Some(ThemeState::for_selection(preference)),
            (ThemeState::AutoSubscribed, Detach) => Some(ThemeState::AutoDetached),
            (ThemeState::AutoSubscribed, SystemSchemeChanged(_)) => {
                Some(ThemeState::AutoSubscribed)
            }
            _ => None,
        }
    }

    pub fn transition(&mut self, event: ThemeEvent) -> StateResult<ThemeState> {
        tracing::debug!(from = ?self.state, event = ?event, "request theme state transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid theme state transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(Some(self.state), event, next);
        self.state = next;
        if self.transition_history.len() == MAX_HISTORY {
            self.transition_history.pop_front();
        }
        self.transition_history.push_back(record);

        Ok(self.state)
    }

    pub fn history(&self) -> impl Iterator<Item = &StateTransition> {
        self.transition_history.iter()
    }
}

impl Default for ThemeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ThemeStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ThemeState::{:?}", self.state)
    }
}
