//! Daemon configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tally_consensus::VotingConfig;
use tally_utils::LogFormat;

use crate::error::DaemonError;

/// Configuration for the tally daemon.
///
/// Loaded from a TOML file via [`DaemonConfig::from_toml_file`]; CLI flags and
/// `TALLY_*` environment variables override individual fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Voting table settings.
    #[serde(default)]
    pub voting: VotingConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, DaemonError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DaemonError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, DaemonError> {
        toml::from_str(s).map_err(|e| DaemonError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, DaemonError> {
        toml::to_string_pretty(self).map_err(|e| DaemonError::Config(e.to_string()))
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            voting: VotingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tally_consensus::QuorumMode;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = DaemonConfig::default();
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = DaemonConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = DaemonConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.voting.quorum_mode, QuorumMode::Total);
    }

    #[test]
    fn nested_voting_section_overrides() {
        let toml = r#"
            log_format = "json"

            [voting]
            quorum_mode = "per_candidate"
        "#;
        let config = DaemonConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.voting.quorum_mode, QuorumMode::PerCandidate);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "log_level = \"debug\"").expect("write");
        let config = DaemonConfig::from_toml_file(file.path()).expect("should load");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = DaemonConfig::from_toml_file(Path::new("/nonexistent/tally.toml"));
        assert!(matches!(result, Err(DaemonError::Config(_))));
    }
}
