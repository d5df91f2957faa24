//! Cerebrus configuration.
//!
//! Loaded from `.github/cerebrus.toml` in the repository being checked.
//! Every key is optional; a missing default file means default settings.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// Where the config file lives when `--config` is not given.
pub const DEFAULT_PATH: &str = ".github/cerebrus.toml";

/// Errors loading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Cerebrus configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// `owner/name` of the repository. `--repo` and `GITHUB_REPOSITORY` take precedence.
    pub repository: Option<String>,

    /// The enumeration source for change notes, relative to the repository root.
    pub releases_info: PathBuf,

    /// Treat warning-level path rules as failures.
    pub fail_on_warnings: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repository: None,
            releases_info: PathBuf::from(
                "editions/tw5.com/tiddlers/releasenotes/ReleasesInfo.multids",
            ),
            fail_on_warnings: false,
        }
    }
}

impl Config {
    /// Load the config file.
    ///
    /// An explicit path must exist. The default path is allowed to be missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit.unwrap_or(Path::new(DEFAULT_PATH));

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Everything a command needs to know about the run, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub pr: u64,

    /// Checked-out repository root, for reading release notes.
    pub root: PathBuf,

    /// Print the report instead of writing it.
    pub dry_run: bool,
}
