//! Chat parameters: driver loop control.
//!
//! [`ChatParams`] groups the static parameters that control the turn loop
//! in [`GroupChat`](crate::use_cases::run_group_chat::GroupChat). These are
//! application-layer concerns, not domain policy.

use groupchat_domain::{DEFAULT_MAXIMUM_ITERATIONS, TurnOrder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turn loop control parameters.
///
/// `maximum_iterations` counts participant turns: one turn is one message
/// produced by a participant. Seed messages (the user's image and
/// question) don't count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatParams {
    /// Hard cap on participant turns per run.
    pub maximum_iterations: usize,
    /// How the next speaker is selected.
    pub turn_order: TurnOrder,
    /// Maximum time to wait for a single participant turn.
    pub turn_timeout: Option<Duration>,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            maximum_iterations: DEFAULT_MAXIMUM_ITERATIONS,
            turn_order: TurnOrder::RoundRobin,
            turn_timeout: None,
        }
    }
}

impl ChatParams {
    // ==================== Builder Methods ====================

    pub fn with_maximum_iterations(mut self, max: usize) -> Self {
        self.maximum_iterations = max;
        self
    }

    pub fn with_turn_order(mut self, order: TurnOrder) -> Self {
        self.turn_order = order;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Set the turn timeout from an optional number of seconds.
    pub fn with_turn_timeout_seconds(self, seconds: Option<u64>) -> Self {
        self.with_turn_timeout(seconds.map(Duration::from_secs))
    }
}
