//! Agent personas from TOML (`[agents.vision]` and `[agents.review]`)

use serde::{Deserialize, Serialize};

/// Raw configuration for one agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Display name, also the participant id
    pub name: Option<String>,
    /// System instructions; built-in persona when unset
    pub instructions: Option<String>,
}

impl FileAgentConfig {
    pub fn name_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(default)
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions
            .as_deref()
            .filter(|i| !i.trim().is_empty())
    }
}

/// Raw `[agents]` configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    pub vision: FileAgentConfig,
    pub review: FileAgentConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_falls_back_when_blank() {
        let agent = FileAgentConfig {
            name: Some("  ".to_string()),
            instructions: Some("".to_string()),
        };
        assert_eq!(agent.name_or("VisionAgent"), "VisionAgent");
        assert!(agent.instructions().is_none());
    }

    #[test]
    fn test_agents_deserialize() {
        let toml_str = r#"
[agents.review]
name = "Critic"
instructions = "Be strict."
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agents.review.name_or("ReviewAgent"), "Critic");
        assert_eq!(config.agents.review.instructions(), Some("Be strict."));
        assert_eq!(config.agents.vision, FileAgentConfig::default());
    }
}
