use crate::error::{LedgerError, Result};
use log::warn;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

static DEFAULT_NODE_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_PEER_TIMEOUT_MS: u64 = 5000;

const CONFIG_FILE_KEY: &str = "LEDGER_CONFIG";
const NODE_ADDRESS_KEY: &str = "NODE_ADDRESS";
const NODE_ID_KEY: &str = "NODE_ID";
const PEER_TIMEOUT_KEY: &str = "PEER_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub node_addr: String,
    pub node_id: String,
    pub peer_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            node_addr: String::from(DEFAULT_NODE_ADDR),
            node_id: Uuid::new_v4().simple().to_string(),
            peer_timeout_ms: DEFAULT_PEER_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults if it is unusable
    pub fn new() -> Config {
        Self::load().unwrap_or_else(|e| {
            warn!("Using default configuration: {e}");
            Config::default()
        })
    }

    /// Optional TOML file named by `LEDGER_CONFIG`, then environment overrides
    pub fn load() -> Result<Config> {
        let mut config = match env::var(CONFIG_FILE_KEY) {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Config::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| {
            LedgerError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Config> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `NODE_ADDRESS`, `NODE_ID` and `PEER_TIMEOUT_MS` as found by `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(NODE_ADDRESS_KEY) {
            self.node_addr = addr;
        }
        if let Some(node_id) = lookup(NODE_ID_KEY) {
            self.node_id = node_id;
        }
        if let Some(timeout) = lookup(PEER_TIMEOUT_KEY) {
            self.peer_timeout_ms = timeout.parse().map_err(|e| {
                LedgerError::Config(format!("{PEER_TIMEOUT_KEY}={timeout} is not a number: {e}"))
            })?;
        }
        Ok(())
    }

    pub fn get_node_addr(&self) -> &str {
        self.node_addr.as_str()
    }

    pub fn get_node_id(&self) -> &str {
        self.node_id.as_str()
    }

    pub fn peer_timeout(&self) -> Duration {
        Duration::from_millis(self.peer_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.get_node_addr(), DEFAULT_NODE_ADDR);
        assert_eq!(config.get_node_id().len(), 32);
        assert_eq!(config.peer_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_node_ids_are_unique() {
        assert_ne!(Config::default().node_id, Config::default().node_id);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(r#"node_addr = "0.0.0.0:6000""#).unwrap();
        assert_eq!(config.get_node_addr(), "0.0.0.0:6000");
        assert_eq!(config.peer_timeout_ms, DEFAULT_PEER_TIMEOUT_MS);
    }

    #[test]
    fn test_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "node_addr = \"127.0.0.1:7000\"\nnode_id = \"alpha\"\npeer_timeout_ms = 250"
        )
        .unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();

        assert_eq!(
            config,
            Config {
                node_addr: "127.0.0.1:7000".to_string(),
                node_id: "alpha".to_string(),
                peer_timeout_ms: 250,
            }
        );
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        assert!(matches!(
            Config::from_toml_str("peer_timeout_ms = \"soon\""),
            Err(LedgerError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_toml_file(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (NODE_ADDRESS_KEY, "10.0.0.1:5001"),
            (NODE_ID_KEY, "beta"),
            (PEER_TIMEOUT_KEY, "900"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();

        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.get_node_addr(), "10.0.0.1:5001");
        assert_eq!(config.get_node_id(), "beta");
        assert_eq!(config.peer_timeout_ms, 900);
    }

    #[test]
    fn test_bad_timeout_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == PEER_TIMEOUT_KEY).then(|| "later".to_string())
        });
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }
}
