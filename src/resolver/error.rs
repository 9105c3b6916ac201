//! Resolver error types

use solc_settings::SettingsError;
use std::fmt;

/// What referenced a compiler version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionReferrer {
    /// The global default version
    Global,
    /// The override rule for this path
    Override(String),
}

impl fmt::Display for VersionReferrer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionReferrer::Global => write!(f, "default_version"),
            VersionReferrer::Override(path) => write!(f, "override for '{}'", path),
        }
    }
}

/// Which settings block failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsScope {
    Global,
    Version(String),
    Override(String),
}

impl fmt::Display for SettingsScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsScope::Global => write!(f, "global settings"),
            SettingsScope::Version(v) => write!(f, "settings of compiler {}", v),
            SettingsScope::Override(path) => write!(f, "settings of override for '{}'", path),
        }
    }
}

/// Construction errors. Any of these means no resolver is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Two compiler entries share an identifier but differ in settings
    #[error("compiler version {version} is registered twice with different settings")]
    ConfigConflict { version: String },

    /// A version identifier that is not registered
    #[error("{referenced_by} references unregistered compiler version {version}")]
    UnknownVersionReference {
        version: String,
        referenced_by: VersionReferrer,
    },

    /// Two override rules for the same file
    #[error("more than one override rule targets '{path}'")]
    DuplicateOverride { path: String },

    /// A settings block carries an invalid value
    #[error("invalid {scope}: {source}")]
    InvalidSettings {
        scope: SettingsScope,
        #[source]
        source: SettingsError,
    },
}

/// Query errors. The resolver stays usable after any of these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to canonicalize compile spec: {0}")]
    Canonicalize(String),
}
