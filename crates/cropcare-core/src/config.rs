//! Layered client configuration: CLI flags > environment > config file >
//! defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::Config;

pub const ENV_URL: &str = "CROPCARE_URL";
pub const ENV_LAT: &str = "CROPCARE_LAT";
pub const ENV_LON: &str = "CROPCARE_LON";
pub const ENV_TIMEOUT: &str = "CROPCARE_TIMEOUT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// `config.toml` contents. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Seconds.
    pub timeout: Option<u64>,
}

impl FileConfig {
    /// `~/.config/cropcare/config.toml` (or the platform equivalent).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("cropcare").join("config.toml"))
    }

    /// Load `path`; a missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timeout: Option<u64>,
}

/// Merge the layers. `env` looks up a variable by name; unparseable
/// numeric values are ignored with a warning.
pub fn resolve(cli: Overrides, env: impl Fn(&str) -> Option<String>, file: FileConfig) -> Config {
    let env_num = |key: &str| -> Option<String> { env(key).filter(|v| !v.trim().is_empty()) };
    let env_f64 = |key: &str| parse_env::<f64>(key, env_num(key));
    let env_u64 = |key: &str| parse_env::<u64>(key, env_num(key));

    let defaults = Config::default();
    let base_url = cli
        .url
        .or_else(|| env_num(ENV_URL))
        .or(file.url)
        .unwrap_or(defaults.base_url);
    let timeout = cli.timeout.or_else(|| env_u64(ENV_TIMEOUT)).or(file.timeout);

    Config {
        base_url,
        // 0 disables the timeout, matching the default.
        request_timeout: timeout.filter(|&s| s > 0).map(Duration::from_secs),
        latitude: cli.latitude.or_else(|| env_f64(ENV_LAT)).or(file.latitude),
        longitude: cli.longitude.or_else(|| env_f64(ENV_LON)).or(file.longitude),
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring {key}={value:?}: not a number");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::DEFAULT_BASE_URL;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = resolve(Overrides::default(), env(&[]), FileConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.request_timeout.is_none());
        assert!(config.latitude.is_none());
    }

    #[test]
    fn cli_beats_env_beats_file() {
        let file = FileConfig {
            url: Some("http://file:1".into()),
            latitude: Some(1.0),
            longitude: Some(2.0),
            timeout: Some(5),
        };
        let vars = env(&[(ENV_URL, "http://env:2"), (ENV_LAT, "18.52")]);
        let cli = Overrides {
            url: Some("http://cli:3".into()),
            ..Overrides::default()
        };
        let config = resolve(cli, vars, file);
        assert_eq!(config.base_url, "http://cli:3");
        assert_eq!(config.latitude, Some(18.52));
        assert_eq!(config.longitude, Some(2.0));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn bad_env_number_falls_through() {
        let file = FileConfig {
            timeout: Some(30),
            ..FileConfig::default()
        };
        let config = resolve(Overrides::default(), env(&[(ENV_TIMEOUT, "soon")]), file);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_timeout_means_none() {
        let cli = Overrides {
            timeout: Some(0),
            ..Overrides::default()
        };
        assert!(resolve(cli, env(&[]), FileConfig::default()).request_timeout.is_none());
    }

    #[test]
    fn missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = FileConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(loaded, FileConfig::default());
    }

    #[test]
    fn file_is_parsed_and_unknown_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "url = \"http://farm:5000\"\ntimeout = 20\n").unwrap();
        let loaded = FileConfig::load(&path).unwrap();
        assert_eq!(loaded.url.as_deref(), Some("http://farm:5000"));
        assert_eq!(loaded.timeout, Some(20));

        std::fs::write(&path, "colour = \"green\"\n").unwrap();
        assert!(matches!(FileConfig::load(&path), Err(ConfigError::Parse { .. })));
    }
}
