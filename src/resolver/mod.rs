//! Per-file compiler resolution
//!
//! A [`ConfigResolver`] is built once from a [`RawConfig`], validated in
//! full, and then answers "which compiler version and settings compile this
//! file?" for any path. Settings precedence, lowest to highest:
//! global settings → the chosen version's settings → the override's settings.

mod compile_spec;
mod error;

pub use compile_spec::CompileSpec;
pub use error::{ConfigError, ResolveError, SettingsScope, VersionReferrer};

use std::collections::HashMap;

use solc_settings::SettingsBlock;

use crate::config::{CompilerVersion, GlobalSettings, OverrideRule, RawConfig};

/// An override rule with its version already looked up
#[derive(Debug, Clone)]
struct IndexedOverride {
    rule: OverrideRule,
    version_slot: usize,
}

/// Immutable, validated view of a configuration.
///
/// Holds no interior mutability, so a shared reference may be queried from
/// any number of threads.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    versions: Vec<CompilerVersion>,
    global: GlobalSettings,
    default_slot: usize,
    overrides: Vec<IndexedOverride>,
    override_index: HashMap<String, usize>,
}

impl ConfigResolver {
    /// Validate `config` and build the lookup indexes.
    ///
    /// Checks run in order and stop at the first violation:
    /// 1. conflicting duplicate compiler versions (identical duplicates fold)
    /// 2. unregistered default version
    /// 3. overrides naming unregistered versions
    /// 4. two overrides for one path
    /// 5. invalid settings values
    pub fn new(config: RawConfig) -> Result<Self, ConfigError> {
        let RawConfig {
            compilers,
            global,
            overrides: rules,
        } = config;

        let mut versions: Vec<CompilerVersion> = Vec::with_capacity(compilers.len());
        let mut version_index: HashMap<String, usize> = HashMap::new();
        for compiler in compilers {
            match version_index.get(&compiler.version) {
                Some(&slot) if versions[slot].settings == compiler.settings => {
                    tracing::debug!(version = %compiler.version, "folding identical duplicate compiler entry");
                }
                Some(_) => {
                    return Err(ConfigError::ConfigConflict {
                        version: compiler.version,
                    });
                }
                None => {
                    version_index.insert(compiler.version.clone(), versions.len());
                    versions.push(compiler);
                }
            }
        }

        let default_slot = *version_index.get(&global.default_version).ok_or_else(|| {
            ConfigError::UnknownVersionReference {
                version: global.default_version.clone(),
                referenced_by: VersionReferrer::Global,
            }
        })?;

        let mut overrides = Vec::with_capacity(rules.len());
        for rule in rules {
            let version_slot = *version_index.get(&rule.version).ok_or_else(|| {
                ConfigError::UnknownVersionReference {
                    version: rule.version.clone(),
                    referenced_by: VersionReferrer::Override(rule.path.clone()),
                }
            })?;
            overrides.push(IndexedOverride { rule, version_slot });
        }

        let mut override_index = HashMap::with_capacity(overrides.len());
        for (slot, indexed) in overrides.iter().enumerate() {
            if override_index.insert(indexed.rule.path.clone(), slot).is_some() {
                return Err(ConfigError::DuplicateOverride {
                    path: indexed.rule.path.clone(),
                });
            }
        }

        Self::validate_settings(&global, &versions, &overrides)?;

        tracing::info!(
            versions = versions.len(),
            overrides = overrides.len(),
            default_version = %global.default_version,
            "compiler resolver ready"
        );

        Ok(Self {
            versions,
            global,
            default_slot,
            overrides,
            override_index,
        })
    }

    fn validate_settings(
        global: &GlobalSettings,
        versions: &[CompilerVersion],
        overrides: &[IndexedOverride],
    ) -> Result<(), ConfigError> {
        global
            .settings
            .validate()
            .map_err(|source| ConfigError::InvalidSettings {
                scope: SettingsScope::Global,
                source,
            })?;

        for compiler in versions {
            compiler
                .settings
                .validate()
                .map_err(|source| ConfigError::InvalidSettings {
                    scope: SettingsScope::Version(compiler.version.clone()),
                    source,
                })?;
        }

        for indexed in overrides {
            if let Some(settings) = &indexed.rule.settings {
                settings
                    .validate()
                    .map_err(|source| ConfigError::InvalidSettings {
                        scope: SettingsScope::Override(indexed.rule.path.clone()),
                        source,
                    })?;
            }
        }

        Ok(())
    }

    /// Resolve the compiler version and merged settings for `path`.
    ///
    /// Paths match override rules exactly. A path with no rule gets the
    /// global default; that is not an error. Empty paths are rejected.
    pub fn resolve(&self, path: &str) -> Result<CompileSpec, ResolveError> {
        if path.trim().is_empty() {
            return Err(ResolveError::InvalidInput(
                "file path must not be empty".to_string(),
            ));
        }

        let matched = self
            .override_index
            .get(path)
            .map(|&slot| &self.overrides[slot]);

        let version = match matched {
            Some(indexed) => &self.versions[indexed.version_slot],
            None => &self.versions[self.default_slot],
        };

        let mut layers: Vec<&SettingsBlock> = vec![&self.global.settings, &version.settings];
        if let Some(settings) = matched.and_then(|m| m.rule.settings.as_ref()) {
            layers.push(settings);
        }

        tracing::debug!(
            path,
            version = %version.version,
            overridden = matched.is_some(),
            "resolved compile spec"
        );

        Ok(CompileSpec {
            compiler_version: version.version.clone(),
            settings: SettingsBlock::merge_all(layers),
        })
    }

    /// Resolve several paths, in input order; stops at the first invalid path
    pub fn resolve_all<I, S>(&self, paths: I) -> Result<Vec<CompileSpec>, ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .map(|p| self.resolve(p.as_ref()))
            .collect()
    }

    /// Registered versions in registration order, identical duplicates folded
    pub fn list_versions(&self) -> &[CompilerVersion] {
        &self.versions
    }

    /// The version used for files without an override
    pub fn default_version(&self) -> &CompilerVersion {
        &self.versions[self.default_slot]
    }

    /// Global settings block
    pub fn global_settings(&self) -> &SettingsBlock {
        &self.global.settings
    }

    /// Override rules in registration order
    pub fn overrides(&self) -> impl Iterator<Item = &OverrideRule> + '_ {
        self.overrides.iter().map(|o| &o.rule)
    }

    /// True if an override rule targets exactly `path`
    pub fn has_override(&self, path: &str) -> bool {
        self.override_index.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_config() -> RawConfig {
        RawConfig::with_default("0.8.0")
            .global_settings(SettingsBlock::new().with_optimizer_runs(200))
            .compiler(CompilerVersion::bare("0.8.0"))
            .compiler(CompilerVersion::bare("0.6.12"))
    }

    #[test]
    fn test_default_resolution() {
        let resolver = ConfigResolver::new(base_config()).unwrap();
        let spec = resolver.resolve("contracts/Token.sol").unwrap();

        assert_eq!(spec.compiler_version, "0.8.0");
        assert_eq!(spec.settings, SettingsBlock::new().with_optimizer_runs(200));
    }

    #[test]
    fn test_override_resolution() {
        let config = base_config().override_rule(
            OverrideRule::new("contracts/SportsBook.sol", "0.6.12")
                .with_settings(SettingsBlock::new().with_optimizer_runs(100)),
        );
        let resolver = ConfigResolver::new(config).unwrap();

        let spec = resolver.resolve("contracts/SportsBook.sol").unwrap();
        assert_eq!(spec.compiler_version, "0.6.12");
        assert_eq!(spec.settings.optimizer_runs, Some(100));

        let other = resolver.resolve("contracts/Other.sol").unwrap();
        assert_eq!(other.compiler_version, "0.8.0");
        assert_eq!(other.settings.optimizer_runs, Some(200));
    }

    #[test]
    fn test_precedence_global_version_override() {
        let config = RawConfig::with_default("0.8.0")
            .global_settings(
                SettingsBlock::new()
                    .with_optimizer_enabled(false)
                    .with_optimizer_runs(200)
                    .with_extra("evmVersion", json!("istanbul")),
            )
            .compiler(CompilerVersion::new(
                "0.8.0",
                SettingsBlock::new()
                    .with_optimizer_enabled(true)
                    .with_extra("evmVersion", json!("paris")),
            ))
            .override_rule(
                OverrideRule::new("a.sol", "0.8.0")
                    .with_settings(SettingsBlock::new().with_extra("evmVersion", json!("london"))),
            );
        let resolver = ConfigResolver::new(config).unwrap();

        let plain = resolver.resolve("b.sol").unwrap();
        assert_eq!(plain.settings.optimizer_enabled, Some(true));
        assert_eq!(plain.settings.optimizer_runs, Some(200));
        assert_eq!(plain.settings.get("evmVersion"), Some(json!("paris")));

        let overridden = resolver.resolve("a.sol").unwrap();
        assert_eq!(overridden.settings.optimizer_enabled, Some(true));
        assert_eq!(overridden.settings.optimizer_runs, Some(200));
        assert_eq!(overridden.settings.get("evmVersion"), Some(json!("london")));
    }

    #[test]
    fn test_override_without_settings_uses_version_block() {
        let config = RawConfig::with_default("0.8.0")
            .compiler(CompilerVersion::bare("0.8.0"))
            .compiler(CompilerVersion::new(
                "0.5.12",
                SettingsBlock::new().with_optimizer_runs(50),
            ))
            .override_rule(OverrideRule::new("old.sol", "0.5.12"));
        let resolver = ConfigResolver::new(config).unwrap();

        let spec = resolver.resolve("old.sol").unwrap();
        assert_eq!(spec.compiler_version, "0.5.12");
        assert_eq!(spec.settings.optimizer_runs, Some(50));
    }

    #[test]
    fn test_identical_duplicates_fold() {
        let config = base_config().compiler(CompilerVersion::bare("0.8.0"));
        let resolver = ConfigResolver::new(config).unwrap();

        let versions: Vec<&str> = resolver
            .list_versions()
            .iter()
            .map(|v| v.version.as_str())
            .collect();
        assert_eq!(versions, vec!["0.8.0", "0.6.12"]);
    }

    #[test]
    fn test_conflicting_duplicates_rejected() {
        let config = RawConfig::with_default("0.5.12")
            .compiler(CompilerVersion::new(
                "0.5.12",
                SettingsBlock::new().with_optimizer_enabled(true),
            ))
            .compiler(CompilerVersion::new(
                "0.5.12",
                SettingsBlock::new().with_optimizer_enabled(false),
            ));

        let err = ConfigResolver::new(config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ConfigConflict {
                version: "0.5.12".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_default_rejected() {
        let config = RawConfig::with_default("0.9.9").compiler(CompilerVersion::bare("0.8.0"));

        let err = ConfigResolver::new(config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownVersionReference {
                version: "0.9.9".to_string(),
                referenced_by: VersionReferrer::Global,
            }
        );
    }

    #[test]
    fn test_unknown_override_version_rejected() {
        let config = base_config().override_rule(OverrideRule::new("x.sol", "0.9.9"));

        let err = ConfigResolver::new(config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownVersionReference {
                version: "0.9.9".to_string(),
                referenced_by: VersionReferrer::Override("x.sol".to_string()),
            }
        );
        assert!(err.to_string().contains("x.sol"));
    }

    #[test]
    fn test_duplicate_override_rejected() {
        let config = base_config()
            .override_rule(OverrideRule::new("x.sol", "0.6.12"))
            .override_rule(OverrideRule::new("x.sol", "0.8.0"));

        let err = ConfigResolver::new(config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateOverride {
                path: "x.sol".to_string()
            }
        );
    }

    #[test]
    fn test_check_order_conflict_before_unknown() {
        let config = RawConfig::with_default("0.9.9")
            .compiler(CompilerVersion::bare("0.8.0"))
            .compiler(CompilerVersion::new(
                "0.8.0",
                SettingsBlock::new().with_optimizer_runs(1),
            ));

        let err = ConfigResolver::new(config).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigConflict { .. }));
    }

    #[test]
    fn test_unknown_override_before_duplicate() {
        let config = base_config()
            .override_rule(OverrideRule::new("x.sol", "0.8.0"))
            .override_rule(OverrideRule::new("x.sol", "0.8.0"))
            .override_rule(OverrideRule::new("y.sol", "0.1.0"));

        let err = ConfigResolver::new(config).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownVersionReference { .. }));
    }

    #[test]
    fn test_zero_runs_rejected() {
        let config = base_config().override_rule(
            OverrideRule::new("x.sol", "0.8.0")
                .with_settings(SettingsBlock::new().with_optimizer_runs(0)),
        );

        let err = ConfigResolver::new(config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSettings {
                scope: SettingsScope::Override(ref p),
                ..
            } if p == "x.sol"
        ));
    }

    #[test]
    fn test_empty_path_rejected_and_resolver_usable() {
        let resolver = ConfigResolver::new(base_config()).unwrap();

        assert!(matches!(resolver.resolve(""), Err(ResolveError::InvalidInput(_))));
        assert!(matches!(resolver.resolve("   "), Err(ResolveError::InvalidInput(_))));
        assert!(resolver.resolve("contracts/Token.sol").is_ok());
    }

    #[test]
    fn test_exact_match_only() {
        let config = base_config().override_rule(OverrideRule::new("contracts/A.sol", "0.6.12"));
        let resolver = ConfigResolver::new(config).unwrap();

        assert!(resolver.has_override("contracts/A.sol"));
        assert!(!resolver.has_override("./contracts/A.sol"));
        assert_eq!(
            resolver.resolve("./contracts/A.sol").unwrap().compiler_version,
            "0.8.0"
        );
        assert_eq!(
            resolver.resolve("contracts/a.sol").unwrap().compiler_version,
            "0.8.0"
        );
    }

    #[test]
    fn test_resolve_all_preserves_order() {
        let config = base_config().override_rule(OverrideRule::new("b.sol", "0.6.12"));
        let resolver = ConfigResolver::new(config).unwrap();

        let specs = resolver.resolve_all(["a.sol", "b.sol", "c.sol"]).unwrap();
        let versions: Vec<&str> = specs.iter().map(|s| s.compiler_version.as_str()).collect();
        assert_eq!(versions, vec!["0.8.0", "0.6.12", "0.8.0"]);

        assert!(resolver.resolve_all(["a.sol", ""]).is_err());
    }

    #[test]
    fn test_introspection() {
        let config = base_config().override_rule(OverrideRule::new("b.sol", "0.6.12"));
        let resolver = ConfigResolver::new(config).unwrap();

        assert_eq!(resolver.default_version().version, "0.8.0");
        assert_eq!(resolver.global_settings().optimizer_runs, Some(200));
        assert_eq!(resolver.overrides().count(), 1);
    }

    #[test]
    fn test_resolver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConfigResolver>();
    }
}
