//! Group chat settings from TOML (`[chat]` section)

use super::ConfigValidationError;
use groupchat_domain::{DEFAULT_MAXIMUM_ITERATIONS, DEFAULT_TRIGGER_PHRASE, TurnOrder};
use serde::{Deserialize, Serialize};

/// Raw `[chat]` configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Cap on agent turns per run
    pub maximum_iterations: usize,
    /// Keyword that ends the chat when an authorized agent says it
    pub trigger_phrase: String,
    /// Agents allowed to approve; the review agent when unset
    pub authorized: Option<Vec<String>>,
    /// "round_robin" or "fixed"
    pub turn_order: String,
    /// Per-turn timeout
    pub turn_timeout_seconds: Option<u64>,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            maximum_iterations: DEFAULT_MAXIMUM_ITERATIONS,
            trigger_phrase: DEFAULT_TRIGGER_PHRASE.to_string(),
            authorized: None,
            turn_order: TurnOrder::RoundRobin.to_string(),
            turn_timeout_seconds: None,
        }
    }
}

impl FileChatConfig {
    /// Parse `turn_order`, falling back to round robin on error
    pub fn parse_turn_order(&self) -> (TurnOrder, Option<ConfigValidationError>) {
        match self.turn_order.parse() {
            Ok(order) => (order, None),
            Err(_) => (
                TurnOrder::RoundRobin,
                Some(ConfigValidationError::InvalidTurnOrder(
                    self.turn_order.clone(),
                )),
            ),
        }
    }

    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        if self.maximum_iterations == 0 {
            issues.push(ConfigValidationError::ZeroIterations);
        }
        if self.trigger_phrase.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyTriggerPhrase);
        }
        if let Some(authorized) = &self.authorized
            && authorized.iter().all(|a| a.trim().is_empty())
        {
            issues.push(ConfigValidationError::EmptyAuthorized);
        }
        if self.turn_timeout_seconds == Some(0) {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        issues.extend(self.parse_turn_order().1);
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FileChatConfig::default();
        assert_eq!(config.maximum_iterations, 3);
        assert_eq!(config.trigger_phrase, "APPROVED");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_invalid_values() {
        let config = FileChatConfig {
            maximum_iterations: 0,
            trigger_phrase: " ".to_string(),
            authorized: Some(vec![]),
            turn_order: "random".to_string(),
            turn_timeout_seconds: Some(0),
        };
        let issues = config.validate();
        assert_eq!(
            issues,
            vec![
                ConfigValidationError::ZeroIterations,
                ConfigValidationError::EmptyTriggerPhrase,
                ConfigValidationError::EmptyAuthorized,
                ConfigValidationError::InvalidTimeout,
                ConfigValidationError::InvalidTurnOrder("random".to_string()),
            ]
        );
    }

    #[test]
    fn test_turn_order_fallback() {
        let config = FileChatConfig {
            turn_order: "fixed".to_string(),
            ..Default::default()
        };
        assert_eq!(config.parse_turn_order(), (TurnOrder::Fixed, None));
    }
}
