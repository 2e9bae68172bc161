//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write the transcript as JSONL to this file
    pub conversation_log: Option<PathBuf>,
    /// Also write diagnostic logs to a daily rolling file in this directory
    pub log_dir: Option<PathBuf>,
}
