//! Client configuration stored as TOML.
//!
//! The file is looked up at the explicit path first, then
//! `SOMBRA_CLIENT_CONFIG`, then `<config dir>/sombra/client.toml`. A missing
//! file is not an error and yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::query::coerce::IntegerPolicy;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SOMBRA_CLIENT_CONFIG";

/// Server address used when the config does not name one.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Loaded client configuration.
#[derive(Debug, Default)]
pub struct ClientConfig {
    path: Option<PathBuf>,
    data: RawConfig,
    integers: IntegerPolicy,
}

impl ClientConfig {
    /// Loads the config from `explicit`, the environment or the default location.
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = explicit
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(default_config_path);
        let data = match path.as_ref() {
            Some(config_path) if config_path.exists() => RawConfig::read(config_path)?,
            _ => RawConfig::default(),
        };
        debug!(
            path = ?path,
            found = path.as_ref().is_some_and(|p| p.exists()),
            "config.load"
        );
        let integers = parse_integers(&data)?;
        Ok(Self {
            path,
            data,
            integers,
        })
    }

    /// Resolved file location, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Server base URL.
    pub fn url(&self) -> &str {
        self.data.server.url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Database owner.
    pub fn owner(&self) -> Option<&str> {
        self.data.server.owner.as_deref()
    }

    /// Database name.
    pub fn database(&self) -> Option<&str> {
        self.data.server.database.as_deref()
    }

    /// API token.
    pub fn token(&self) -> Option<&str> {
        self.data.auth.token.as_deref()
    }

    /// How bare integers are tagged.
    pub fn integer_policy(&self) -> IntegerPolicy {
        self.integers
    }

    /// Points the client at a server database.
    pub fn set_server(&mut self, url: &str, owner: &str, database: &str) {
        self.data.server = ServerSection {
            url: Some(url.to_string()),
            owner: Some(owner.to_string()),
            database: Some(database.to_string()),
        };
    }

    /// Stores or clears the API token.
    pub fn set_token(&mut self, token: Option<&str>) {
        self.data.auth.token = token.map(str::to_string);
    }

    /// Changes the integer tagging policy.
    pub fn set_integer_policy(&mut self, policy: IntegerPolicy) {
        self.integers = policy;
        self.data.coercion.integers = Some(policy_to_string(policy));
    }

    /// Renders the config as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        self.data.render()
    }

    /// Writes [`Self::to_toml`] to the config file, creating parent directories.
    pub fn persist(&self) -> Result<PathBuf, ConfigError> {
        let target = self.target_path()?;
        let rendered = self.to_toml()?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::io("create", parent, source))?;
        }
        fs::write(&target, rendered).map_err(|source| ConfigError::io("write", &target, source))?;
        debug!(path = %target.display(), "config.persist");
        Ok(target)
    }

    fn target_path(&self) -> Result<PathBuf, ConfigError> {
        self.path
            .clone()
            .or_else(default_config_path)
            .ok_or(ConfigError::NoConfigPath)
    }
}

fn policy_to_string(policy: IntegerPolicy) -> String {
    match policy {
        IntegerPolicy::Signed => "signed",
        IntegerPolicy::Unsigned => "unsigned",
    }
    .to_string()
}

fn parse_integers(data: &RawConfig) -> Result<IntegerPolicy, ConfigError> {
    match data.coercion.integers.as_deref() {
        Some(value) => {
            IntegerPolicy::parse(value).ok_or_else(|| ConfigError::InvalidIntegerPolicy {
                value: value.to_string(),
            })
        }
        None => Ok(IntegerPolicy::default()),
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RawConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    auth: AuthSection,
    #[serde(default)]
    coercion: CoercionSection,
}

impl RawConfig {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigError::io("read", path, source))?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn render(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct ServerSection {
    url: Option<String>,
    owner: Option<String>,
    database: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct AuthSection {
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct CoercionSection {
    integers: Option<String>,
}

/// Failure to load or save the client config.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    /// `action` is one of `read`, `write` or `create`.
    #[error("cannot {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid TOML in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("cannot render config as TOML: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("integer policy '{value}' is invalid; expected 'signed' or 'unsigned'")]
    InvalidIntegerPolicy { value: String },
    #[error("no config directory found; pass --config or set SOMBRA_CLIENT_CONFIG")]
    NoConfigPath,
}

impl ConfigError {
    fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Default config location under the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("sombra").join("client.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = ClientConfig::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.url(), DEFAULT_SERVER_URL);
        assert_eq!(config.token(), None);
        assert_eq!(config.integer_policy(), IntegerPolicy::Signed);
    }

    #[test]
    fn persist_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("client.toml");
        let mut config = ClientConfig::load(Some(path.clone())).unwrap();
        config.set_server("http://db:3000", "admin", "graph");
        config.set_token(Some("secret"));
        config.set_integer_policy(IntegerPolicy::Unsigned);
        assert_eq!(config.persist().unwrap(), path);

        let reloaded = ClientConfig::load(Some(path)).unwrap();
        assert_eq!(reloaded.url(), "http://db:3000");
        assert_eq!(reloaded.owner(), Some("admin"));
        assert_eq!(reloaded.database(), Some("graph"));
        assert_eq!(reloaded.token(), Some("secret"));
        assert_eq!(reloaded.integer_policy(), IntegerPolicy::Unsigned);
    }

    #[test]
    fn invalid_integer_policy_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.toml");
        fs::write(&path, "[coercion]\nintegers = \"bignum\"\n").unwrap();
        let err = ClientConfig::load(Some(path)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIntegerPolicy { ref value } if value == "bignum"));
    }

    #[test]
    fn malformed_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.toml");
        fs::write(&path, "[server\n").unwrap();
        let err = ClientConfig::load(Some(path.clone())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: ref p, .. } if *p == path));
    }

    #[test]
    fn persist_writes_rendered_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.toml");
        let mut config = ClientConfig::load(Some(path.clone())).unwrap();
        config.set_token(Some("t"));
        config.persist().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), config.to_toml().unwrap());
    }

    #[test]
    fn unreadable_config_reports_io_action() {
        let dir = tempdir().unwrap();
        let err = ClientConfig::load(Some(dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Io { action: "read", ref path, .. } if path == dir.path()));
    }

    #[test]
    fn persist_into_file_parent_fails_on_create() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let config = ClientConfig::load(Some(blocker.join("client.toml"))).unwrap();
        let err = config.persist().unwrap_err();
        assert!(matches!(err, ConfigError::Io { action: "create", .. }), "{err}");
    }
}
