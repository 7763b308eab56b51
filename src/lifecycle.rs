//! Process lifecycle: `Uninitialized → Connecting → Ready → ShuttingDown → Closed`.
//!
//! A failed connection goes straight from `Connecting` to `Closed`. Every other
//! move is rejected, and `Closed` is terminal.

use serde::Serialize;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Uninitialized,
    Connecting,
    Ready,
    ShuttingDown,
    Closed,
}

impl LifecycleState {
    fn can_move_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Uninitialized, Connecting)
                | (Connecting, Ready)
                | (Connecting, Closed)
                | (Ready, ShuttingDown)
                | (ShuttingDown, Closed)
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid lifecycle transition: {from:?} -> {to:?}")]
pub struct LifecycleError {
    pub from: LifecycleState,
    pub to: LifecycleState,
}

#[derive(Debug)]
pub struct Lifecycle {
    state: Mutex<LifecycleState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LifecycleState::Uninitialized),
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_ready(&self) -> bool {
        self.state() == LifecycleState::Ready
    }

    pub fn transition(&self, next: LifecycleState) -> Result<(), LifecycleError> {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !state.can_move_to(next) {
            return Err(LifecycleError {
                from: *state,
                to: next,
            });
        }
        debug!("Lifecycle {:?} -> {:?}", *state, next);
        *state = next;
        Ok(())
    }

    pub fn begin_connecting(&self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::Connecting)
    }

    pub fn mark_ready(&self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::Ready)
    }

    pub fn begin_shutdown(&self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::ShuttingDown)
    }

    pub fn mark_closed(&self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::Closed)
    }
}
