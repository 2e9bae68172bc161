//! Turn selection for group chats

use serde::{Deserialize, Serialize};

/// How the next speaker is picked
///
/// With a single participant both orders degenerate to repeating that
/// participant, which is how the single-agent Q&A mode runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOrder {
    /// Participants speak in configured order, wrapping around
    #[default]
    RoundRobin,
    /// The first participant speaks every turn
    Fixed,
}

impl TurnOrder {
    /// Index of the participant who speaks on `turn` (0-based).
    ///
    /// Returns `None` when there are no participants.
    ///
    /// ```
    /// use groupchat_domain::TurnOrder;
    ///
    /// let order = TurnOrder::RoundRobin;
    /// assert_eq!(order.next_index(0, 2), Some(0));
    /// assert_eq!(order.next_index(1, 2), Some(1));
    /// assert_eq!(order.next_index(2, 2), Some(0));
    /// assert_eq!(order.next_index(5, 1), Some(0));
    /// ```
    pub fn next_index(&self, turn: usize, participant_count: usize) -> Option<usize> {
        if participant_count == 0 {
            return None;
        }
        match self {
            TurnOrder::RoundRobin => Some(turn % participant_count),
            TurnOrder::Fixed => Some(0),
        }
    }
}

impl std::str::FromStr for TurnOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "round_robin" | "roundrobin" | "sequential" => Ok(TurnOrder::RoundRobin),
            "fixed" | "single" => Ok(TurnOrder::Fixed),
            _ => Err(format!(
                "Unknown turn order: {}. Valid: round_robin, fixed",
                s
            )),
        }
    }
}

impl std::fmt::Display for TurnOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnOrder::RoundRobin => write!(f, "round_robin"),
            TurnOrder::Fixed => write!(f, "fixed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_alternates() {
        let order = TurnOrder::RoundRobin;
        let picks: Vec<_> = (0..5).map(|t| order.next_index(t, 2).unwrap()).collect();
        assert_eq!(picks, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_single_participant_repeats() {
        for order in [TurnOrder::RoundRobin, TurnOrder::Fixed] {
            for turn in 0..4 {
                assert_eq!(order.next_index(turn, 1), Some(0));
            }
        }
    }

    #[test]
    fn test_fixed_ignores_others() {
        assert_eq!(TurnOrder::Fixed.next_index(3, 3), Some(0));
    }

    #[test]
    fn test_no_participants() {
        assert_eq!(TurnOrder::RoundRobin.next_index(0, 0), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("round-robin".parse::<TurnOrder>().ok(), Some(TurnOrder::RoundRobin));
        assert_eq!("FIXED".parse::<TurnOrder>().ok(), Some(TurnOrder::Fixed));
        assert!("random".parse::<TurnOrder>().is_err());
    }

    #[test]
    fn test_default() {
        assert_eq!(TurnOrder::default(), TurnOrder::RoundRobin);
    }
}
