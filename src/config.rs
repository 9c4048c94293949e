use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub render: RenderConfig,
    pub auth: AuthConfig,
}

/// Where the exam-prep backend lives and how long to wait for it
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}

/// CSS classes attached to styled spans in HTML output
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub bold_class: String,
    pub italic_class: String,
    pub code_class: String,
    pub strikethrough_class: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bold_class: "font-bold".to_string(),
            italic_class: "italic".to_string(),
            code_class: "rounded bg-gray-600 px-1 py-0.5 font-mono text-sm".to_string(),
            strikethrough_class: "line-through".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Paths under this prefix require a signed-in user.
    pub protected_prefix: String,
    pub sign_in_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            protected_prefix: "/chat".to_string(),
            sign_in_path: "/api/auth/signin".to_string(),
        }
    }
}

impl Config {
    /// The configuration bundled with the crate.
    ///
    /// `build.rs` rejects an unparsable default file, so the fallback
    /// only guards against a schema drift between the file and the structs.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Ok(Self::compiled_default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}
