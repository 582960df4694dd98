//! Per-action in-flight flags.
//!
//! The engine lets mutations overlap. Screens that want at most one
//! running add/transfer/delete/save use [`InFlight`] to disable their
//! trigger while one is pending.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Add,
    Transfer,
    Delete,
    Save,
}

#[derive(Debug, Default)]
pub struct InFlight {
    running: Mutex<HashSet<ActionKind>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `kind` as running. `None` if it already is.
    pub fn try_begin(&self, kind: ActionKind) -> Option<InFlightGuard<'_>> {
        let inserted = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind);
        inserted.then_some(InFlightGuard { owner: self, kind })
    }

    pub fn is_running(&self, kind: ActionKind) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&kind)
    }
}

/// Clears its flag when dropped, whether the action succeeded or not.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    kind: ActionKind,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.kind);
    }
}
