use std::ops::Deref;

use tracing::debug;

use crate::state::Action;

/// Actions for one turn. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionList(Vec<Action>);

impl ActionList {
    pub fn into_vec(self) -> Vec<Action> {
        self.0
    }
}

impl Deref for ActionList {
    type Target = [Action];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for ActionList {
    type Item = Action;
    type IntoIter = std::vec::IntoIter<Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

pub struct ActionEmitter;

impl ActionEmitter {
    pub const DEFAULT: Action = Action::Mine;

    /// Anything that would leave the engine without an action becomes a
    /// single mine attempt.
    pub fn emit(decision: Option<Vec<Action>>) -> ActionList {
        match decision {
            Some(actions) if !actions.is_empty() => ActionList(actions),
            _ => {
                debug!("Nothing to do, defaulting to {}", Self::DEFAULT);
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> ActionList {
        ActionList(vec![Self::DEFAULT])
    }
}
