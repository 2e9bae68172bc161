//! Why a group chat run ended

use serde::{Deserialize, Serialize};

/// Which stop condition fired at the end of a run
///
/// Hitting the turn cap is a normal outcome, not an error; it is only
/// distinguished from approval by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// An authorized participant emitted the trigger phrase
    Approved,
    /// `maximum_iterations` participant turns were used up
    TurnLimitReached,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::Approved => "approved",
            TerminationReason::TurnLimitReached => "turn_limit_reached",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, TerminationReason::Approved)
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        assert_eq!(TerminationReason::Approved.to_string(), "approved");
        assert_eq!(
            TerminationReason::TurnLimitReached.to_string(),
            "turn_limit_reached"
        );
    }

    #[test]
    fn test_reason_serde_matches_display() {
        for reason in [TerminationReason::Approved, TerminationReason::TurnLimitReached] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason));
        }
    }
}
