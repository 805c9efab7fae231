use std::path::{Path, PathBuf};

use crate::annotate::LinkBuilder;
use crate::error::Error;
use crate::identifier::DEFAULT_CODE_HOSTS;
use crate::link::{DEFAULT_HOST, DEFAULT_STATS_PERIOD};
use crate::types::ProjectConfig;

/// Name of the settings file looked up in the working directory.
pub const CONFIG_FILE: &str = ".logref.toml";

/// Settings loaded from `.logref.toml`.
///
/// `projects` stays `None` when the file (or the key) is absent, which the
/// pipeline reports as unconfigured rather than as "nothing matched".
#[derive(Debug, Clone)]
pub struct Config {
    /// Hosts whose URIs carry a repository.
    pub code_hosts: Vec<String>,
    /// Tracker host.
    pub host: String,
    /// When false, documents get no annotations at all.
    pub inline: bool,
    /// Tracker organization.
    pub organization: Option<String>,
    /// Configured projects in priority order.
    pub projects: Option<Vec<ProjectConfig>>,
    /// Lookback window for scoped links.
    pub stats_period: String,
}

/// Raw TOML structure for `.logref.toml`.
#[derive(serde::Deserialize)]
struct LogrefTomlConfig {
    #[serde(default)]
    code_hosts: Option<Vec<String>>,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    inline: Option<bool>,
    #[serde(default)]
    organization: Option<String>,
    #[serde(default)]
    projects: Option<Vec<ProjectConfig>>,
    #[serde(default)]
    stats_period: Option<String>,
}

impl Config {
    /// Annotation builder for the configured tracker.
    pub fn link_builder(&self) -> LinkBuilder {
        return LinkBuilder {
            host: self.host.clone(),
            organization: self.organization.clone(),
            stats_period: self.stats_period.clone(),
        };
    }

    /// Load config from `.logref.toml` in the given root directory.
    ///
    /// Returns an unconfigured default if the file doesn't exist.
    /// A file that exists but is malformed is an error, never a silent
    /// fallback to defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML or a pattern in it is malformed,
    /// or `Error::ConfigInvalid` for unusable values.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{} not found, using defaults", path.display());
                return Ok(Self::unconfigured());
            },
            Err(e) => return Err(Error::Io(e)),
        };

        return Self::parse(&content, &path);
    }

    /// Parse settings from TOML text. `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` for malformed TOML or patterns,
    /// or `Error::ConfigInvalid` for blank hosts or an empty host list.
    pub fn parse(content: &str, path: &Path) -> Result<Self, Error> {
        let raw: LogrefTomlConfig = toml::from_str(content)?;

        let code_hosts = raw
            .code_hosts
            .unwrap_or_else(|| return DEFAULT_CODE_HOSTS.iter().map(|h| return (*h).to_string()).collect());
        if code_hosts.is_empty() {
            return Err(invalid(path, "`code_hosts` must list at least one host"));
        }

        let host = raw.host.unwrap_or_else(|| return DEFAULT_HOST.to_string());
        if host.trim().is_empty() {
            return Err(invalid(path, "`host` must not be blank"));
        }

        return Ok(Self {
            code_hosts,
            host,
            inline: raw.inline.unwrap_or(true),
            organization: raw.organization,
            projects: raw.projects,
            stats_period: raw.stats_period.unwrap_or_else(|| return DEFAULT_STATS_PERIOD.to_string()),
        });
    }

    /// Defaults used when no settings file exists.
    fn unconfigured() -> Self {
        return Self {
            code_hosts: DEFAULT_CODE_HOSTS.iter().map(|h| return (*h).to_string()).collect(),
            host: DEFAULT_HOST.to_string(),
            inline: true,
            organization: None,
            projects: None,
            stats_period: DEFAULT_STATS_PERIOD.to_string(),
        };
    }
}

/// `Error::ConfigInvalid` for the given file.
fn invalid(path: &Path, reason: &str) -> Error {
    return Error::ConfigInvalid {
        path: PathBuf::from(path),
        reason: reason.to_string(),
    };
}
