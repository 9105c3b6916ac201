//! Import of Hardhat `solidity` configuration sections
//!
//! Accepted forms:
//! - `"0.8.0"`: a single compiler, no settings
//! - `{ version, settings }`: a single compiler with its own settings
//! - `{ compilers: [...], overrides: { path: {...} }, settings }`: multi-version
//!
//! A whole user config may be passed; its `solidity` key is used.
//!
//! `overrides` is a JSON object, and a parsed `Value` keeps only the last of
//! any repeated key. When importing from text, the override entries are
//! scanned straight off the document so repeated paths survive as separate
//! rules (and fail construction) and document order is kept.

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::{Map, Value};
use solc_settings::SettingsBlock;
use std::fmt;

use super::{CompilerVersion, GlobalSettings, LoadError, OverrideRule, RawConfig};

const OVERRIDES_SHAPE: &str = "'overrides' must be an object keyed by file path";

/// Override entries in document order, repeated keys included.
/// A non-object scans as empty.
#[derive(Debug, Default)]
struct OverrideEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for OverrideEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = OverrideEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by file path")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(OverrideEntries::default())
            }

            fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
                Ok(OverrideEntries::default())
            }

            fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
                Ok(OverrideEntries::default())
            }

            fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
                Ok(OverrideEntries::default())
            }

            fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
                Ok(OverrideEntries::default())
            }

            fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
                Ok(OverrideEntries::default())
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(OverrideEntries::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some((path, rule)) = map.next_entry::<String, Value>()? {
                    entries.push((path, rule));
                }
                Ok(OverrideEntries(entries))
            }
        }

        deserializer.deserialize_any(EntriesVisitor)
    }
}

/// The `overrides` entries of a document, at top level and under `solidity`.
///
/// Anything that is not an object scans as empty; shape errors are left to
/// the `Value`-based import.
#[derive(Debug, Default)]
struct OverrideScan {
    solidity: Option<Box<OverrideScan>>,
    overrides: Option<OverrideEntries>,
}

impl<'de> Deserialize<'de> for OverrideScan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScanVisitor;

        impl<'de> Visitor<'de> for ScanVisitor {
            type Value = OverrideScan;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a hardhat configuration")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut scan = OverrideScan::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "solidity" => scan.solidity = Some(Box::new(map.next_value()?)),
                        "overrides" => scan.overrides = Some(map.next_value()?),
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(scan)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(OverrideScan::default())
            }

            fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
                Ok(OverrideScan::default())
            }

            fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
                Ok(OverrideScan::default())
            }

            fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
                Ok(OverrideScan::default())
            }

            fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
                Ok(OverrideScan::default())
            }

            fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
                Ok(OverrideScan::default())
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(OverrideScan::default())
            }
        }

        deserializer.deserialize_any(ScanVisitor)
    }
}

/// Convert a Hardhat `solidity` section into a [`RawConfig`].
///
/// The default version is `defaultVersion` when given, else the first
/// listed compiler.
pub fn import_hardhat(document: &Value) -> Result<RawConfig, LoadError> {
    let section = document.get("solidity").unwrap_or(document);
    let overrides = match section.get("overrides") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(rules)) => rules
            .iter()
            .map(|(path, rule)| (path.clone(), rule.clone()))
            .collect(),
        Some(_) => return Err(LoadError::Format(OVERRIDES_SHAPE.to_string())),
    };
    import_section(section, overrides)
}

/// Import Hardhat JSON text, keeping repeated override paths.
pub fn import_hardhat_str(contents: &str) -> Result<RawConfig, LoadError> {
    let document: Value = serde_json::from_str(contents).map_err(|e| LoadError::Parse {
        path: "<inline>".to_string(),
        message: format!("JSON parse error: {}", e),
    })?;

    let scan: OverrideScan =
        serde_json::from_str(contents).map_err(|e| LoadError::Format(e.to_string()))?;
    let scanned = if document.get("solidity").is_some() {
        scan.solidity.and_then(|s| s.overrides)
    } else {
        scan.overrides
    };

    let section = document.get("solidity").unwrap_or(&document);
    match scanned {
        Some(entries) if section.get("overrides").is_some_and(Value::is_object) => {
            import_section(section, entries.0)
        }
        _ => import_hardhat(&document),
    }
}

fn import_section(
    section: &Value,
    overrides: Vec<(String, Value)>,
) -> Result<RawConfig, LoadError> {
    match section {
        Value::String(version) => Ok(RawConfig::with_default(version.clone())
            .compiler(CompilerVersion::bare(version.clone()))),
        Value::Object(map) if map.contains_key("compilers") => import_multi(map, overrides),
        Value::Object(map) if map.contains_key("version") => {
            let compiler = import_compiler(section, "solidity")?;
            Ok(RawConfig::with_default(compiler.version.clone()).compiler(compiler))
        }
        _ => Err(LoadError::Format(
            "hardhat solidity section must be a version string or an object with 'version' or 'compilers'"
                .to_string(),
        )),
    }
}

fn import_multi(
    map: &Map<String, Value>,
    rules: Vec<(String, Value)>,
) -> Result<RawConfig, LoadError> {
    let entries = map
        .get("compilers")
        .and_then(Value::as_array)
        .ok_or_else(|| LoadError::Format("'compilers' must be an array".to_string()))?;

    let compilers = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| import_compiler(entry, &format!("compilers[{}]", i)))
        .collect::<Result<Vec<_>, _>>()?;

    let default_version = match map.get("defaultVersion") {
        Some(Value::String(v)) => v.clone(),
        Some(_) => {
            return Err(LoadError::Format(
                "'defaultVersion' must be a string".to_string(),
            ))
        }
        None => compilers
            .first()
            .map(|c| c.version.clone())
            .ok_or_else(|| LoadError::Format("'compilers' is empty".to_string()))?,
    };

    let settings = settings_at(map.get("settings"), "settings")?;

    let mut overrides = Vec::with_capacity(rules.len());
    for (path, rule) in rules {
        let scope = format!("overrides[{}]", path);
        let version = version_at(&rule, &scope)?;
        let settings = match rule.get("settings") {
            None | Some(Value::Null) => None,
            Some(value) => Some(settings_at(Some(value), &scope)?),
        };
        overrides.push(OverrideRule {
            path,
            version,
            settings,
        });
    }

    Ok(RawConfig {
        compilers,
        global: GlobalSettings {
            default_version,
            settings,
        },
        overrides,
    })
}

fn import_compiler(entry: &Value, scope: &str) -> Result<CompilerVersion, LoadError> {
    let version = version_at(entry, scope)?;
    let settings = settings_at(entry.get("settings"), scope)?;
    Ok(CompilerVersion { version, settings })
}

fn version_at(entry: &Value, scope: &str) -> Result<String, LoadError> {
    entry
        .get("version")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| LoadError::Format(format!("{}: missing string 'version'", scope)))
}

fn settings_at(value: Option<&Value>, scope: &str) -> Result<SettingsBlock, LoadError> {
    match value {
        None => Ok(SettingsBlock::default()),
        Some(v) => SettingsBlock::from_hardhat(v)
            .map_err(|e| LoadError::Format(format!("{}: {}", scope, e))),
    }
}
