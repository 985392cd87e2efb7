use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_LISTEN_ADDRESS, DEFAULT_LISTEN_PORT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("download_chunk_size must be greater than zero")]
    ZeroChunkSize,

    #[error("idle_timeout_secs must be greater than zero")]
    ZeroIdleTimeout,

    #[error("Start directory is not an existing directory: {0}")]
    InvalidStartDir(PathBuf),
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    pub start_dir: Option<PathBuf>, // None means the process working directory
    pub download_chunk_size: usize,
    pub idle_timeout_secs: Option<u64>, // None means reads block forever
    pub restrict_to_root: bool,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from(DEFAULT_LISTEN_ADDRESS),
            listen_port: DEFAULT_LISTEN_PORT,
            start_dir: None,
            download_chunk_size: DEFAULT_CHUNK_SIZE, // 1 MiB
            idle_timeout_secs: None,
            restrict_to_root: false,
        }
    }
}

impl ServerConfig {
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str)?;
        Ok(config)
    }

    /// Checks the values a TOML file or the command line may have set to
    /// something the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.download_chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.server.idle_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroIdleTimeout);
        }
        if let Some(dir) = &self.server.start_dir {
            if !dir.is_dir() {
                return Err(ConfigError::InvalidStartDir(dir.clone()));
            }
        }
        Ok(())
    }

    /// Returns the directory every new session starts in.
    ///
    /// A configured `start_dir` is canonicalized; otherwise the process
    /// working directory is returned as the OS reports it.
    pub fn root_dir(&self) -> Result<PathBuf> {
        match &self.server.start_dir {
            Some(dir) => {
                let canonical = dir.canonicalize().with_context(|| {
                    format!("Failed to resolve start directory: {}", dir.display())
                })?;
                if !canonical.is_dir() {
                    return Err(ConfigError::InvalidStartDir(canonical).into());
                }
                Ok(canonical)
            }
            None => std::env::current_dir().context("Failed to determine the working directory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.listen_address, "0.0.0.0");
        assert_eq!(config.server.listen_port, 50001);
        assert_eq!(config.server.download_chunk_size, 1024 * 1024);
        assert!(config.server.start_dir.is_none());
        assert!(config.server.idle_timeout().is_none());
        assert!(!config.server.restrict_to_root);
    }

    #[test]
    fn test_parse_server_table() {
        let config = Config::from_toml(
            r#"
            [server]
            listen_address = "127.0.0.1"
            listen_port = 6000
            download_chunk_size = 4096
            idle_timeout_secs = 30
            restrict_to_root = true
            "#,
        )
        .unwrap();
        assert_eq!(config.server.listen_address, "127.0.0.1");
        assert_eq!(config.server.listen_port, 6000);
        assert_eq!(config.server.download_chunk_size, 4096);
        assert_eq!(config.server.idle_timeout(), Some(Duration::from_secs(30)));
        assert!(config.server.restrict_to_root);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = Config::from_toml(include_str!("../etc/rouillebrowsed.conf")).unwrap();
        assert_eq!(config.server.listen_port, 50001);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = Config::default();
        config.server.download_chunk_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroChunkSize)));

        let mut config = Config::default();
        config.server.idle_timeout_secs = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroIdleTimeout)));

        let mut config = Config::default();
        config.server.start_dir = Some(PathBuf::from("/definitely/not/a/real/dir"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStartDir(_))
        ));
    }

    #[test]
    fn test_root_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.start_dir = Some(dir.path().to_path_buf());
        assert_eq!(config.root_dir().unwrap(), dir.path().canonicalize().unwrap());

        let config = Config::default();
        assert_eq!(config.root_dir().unwrap(), std::env::current_dir().unwrap());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]").unwrap();
        writeln!(file, "listen_port = 7000").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.listen_port, 7000);
        assert!(Config::load_from_file(Path::new("/no/such/rouillebrowsed.conf")).is_err());
    }
}
