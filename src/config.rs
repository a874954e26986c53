use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file read when `--config` is not given, if present.
pub const DEFAULT_CONFIG_FILE: &str = "rate-tracker.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root directory holding one CSV file per series.
    pub data_dir: PathBuf,
    pub bind: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("rate_data"),
            bind: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

/// Values given on the command line or through the environment. They win
/// over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
}

impl AppConfig {
    /// Read `path`, or the default config file when it exists, or fall back
    /// to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading config from {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(bind) = overrides.bind {
            self.bind = bind;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        self
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("rate_data"));
        assert_eq!(config.listen_addr(), "127.0.0.1:8501");
    }

    #[test]
    fn test_deserialization_fills_missing_fields() {
        let config: AppConfig = toml::from_str(r#"data_dir = "/var/lib/rates""#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/rates"));
        assert_eq!(config.port, 8501);
    }

    #[test]
    fn test_from_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            "data_dir = \"ratings\"\nbind = \"0.0.0.0\"\nport = 9000\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("ratings"));
        assert_eq!(config.listen_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/rate-tracker.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_win() {
        let config = AppConfig::default().apply(ConfigOverrides {
            data_dir: Some(PathBuf::from("elsewhere")),
            bind: None,
            port: Some(8080),
        });

        assert_eq!(config.data_dir, PathBuf::from("elsewhere"));
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }
}
