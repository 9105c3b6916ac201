//! Declarative compiler configuration
//!
//! The raw configuration lists the registered compiler versions, the
//! project-wide defaults and the per-file override rules. Documents are
//! loaded from TOML or JSON (native shape) or imported from a Hardhat
//! `solidity` section, optionally layered with CLI assignments.

mod hardhat;
mod load;
mod merge;

pub use hardhat::{import_hardhat, import_hardhat_str};
pub use load::{
    cli_layer, load_file, parse_document, ConfigFormat, ConfigOrigin, ConfigSource, LoadError,
    LoadedConfig,
};
pub use merge::{deep_merge, merge_layers};

use serde::{Deserialize, Serialize};
use solc_settings::SettingsBlock;

/// A registered compiler version and the settings attached to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerVersion {
    /// Version identifier (e.g., "0.8.0")
    pub version: String,

    /// Settings applied to every file compiled with this version
    #[serde(default, skip_serializing_if = "SettingsBlock::is_empty")]
    pub settings: SettingsBlock,
}

impl CompilerVersion {
    pub fn new(version: impl Into<String>, settings: SettingsBlock) -> Self {
        Self {
            version: version.into(),
            settings,
        }
    }

    /// A version with no settings of its own
    pub fn bare(version: impl Into<String>) -> Self {
        Self::new(version, SettingsBlock::default())
    }
}

/// Project-wide defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Version used for any file without an override
    pub default_version: String,

    /// Lowest-precedence settings, applied to every file
    #[serde(default, skip_serializing_if = "SettingsBlock::is_empty")]
    pub settings: SettingsBlock,
}

/// Per-file exception to the default compiler selection (exact path match)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRule {
    /// Source file path, matched exactly
    pub path: String,

    /// Compiler version for this file
    pub version: String,

    /// Highest-precedence settings for this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsBlock>,
}

impl OverrideRule {
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            settings: None,
        }
    }

    pub fn with_settings(mut self, settings: SettingsBlock) -> Self {
        self.settings = Some(settings);
        self
    }
}

/// The unvalidated configuration handed to the resolver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConfig {
    /// Registered compiler versions, in registration order
    #[serde(default)]
    pub compilers: Vec<CompilerVersion>,

    /// Default version and settings
    #[serde(flatten)]
    pub global: GlobalSettings,

    /// Per-file override rules
    #[serde(default)]
    pub overrides: Vec<OverrideRule>,
}

impl RawConfig {
    /// Start a config whose default is `default_version`
    pub fn with_default(default_version: impl Into<String>) -> Self {
        Self {
            global: GlobalSettings {
                default_version: default_version.into(),
                settings: SettingsBlock::default(),
            },
            ..Default::default()
        }
    }

    /// Builder: set the global settings block
    pub fn global_settings(mut self, settings: SettingsBlock) -> Self {
        self.global.settings = settings;
        self
    }

    /// Builder: register a compiler version
    pub fn compiler(mut self, compiler: CompilerVersion) -> Self {
        self.compilers.push(compiler);
        self
    }

    /// Builder: add an override rule
    pub fn override_rule(mut self, rule: OverrideRule) -> Self {
        self.overrides.push(rule);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_native_document_shape() {
        let raw: RawConfig = serde_json::from_value(json!({
            "default_version": "0.8.0",
            "settings": {"optimizerRuns": 200},
            "compilers": [
                {"version": "0.8.0"},
                {"version": "0.6.12", "settings": {"optimizerEnabled": true}}
            ],
            "overrides": [
                {"path": "contracts/SportsBook.sol", "version": "0.6.12", "settings": {"optimizerRuns": 100}}
            ]
        }))
        .unwrap();

        assert_eq!(raw.global.default_version, "0.8.0");
        assert_eq!(raw.global.settings.optimizer_runs, Some(200));
        assert_eq!(raw.compilers.len(), 2);
        assert_eq!(raw.compilers[1].settings.optimizer_enabled, Some(true));
        assert_eq!(raw.overrides[0].path, "contracts/SportsBook.sol");
        assert_eq!(
            raw.overrides[0].settings.as_ref().and_then(|s| s.optimizer_runs),
            Some(100)
        );
    }

    #[test]
    fn test_builder_matches_document() {
        let built = RawConfig::with_default("0.8.0")
            .global_settings(SettingsBlock::new().with_optimizer_runs(200))
            .compiler(CompilerVersion::bare("0.8.0"));

        let parsed: RawConfig = serde_json::from_value(json!({
            "default_version": "0.8.0",
            "settings": {"optimizerRuns": 200},
            "compilers": [{"version": "0.8.0"}]
        }))
        .unwrap();

        assert_eq!(built, parsed);
    }

    #[test]
    fn test_missing_default_version_fails() {
        let result: Result<RawConfig, _> = serde_json::from_value(json!({
            "compilers": [{"version": "0.8.0"}]
        }));
        assert!(result.is_err());
    }
}
