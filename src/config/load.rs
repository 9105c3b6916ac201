//! Loading configuration documents with provenance
//!
//! A document is read once, digested (SHA-256 of the raw bytes), converted
//! to a JSON value, layered with CLI assignments and only then typed into a
//! [`RawConfig`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;

use super::hardhat::import_hardhat_str;
use super::merge::merge_layers;
use super::RawConfig;

/// Where a configuration layer came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    File,
    Inline,
    Cli,
}

/// A contributing layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for inline/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for inline/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Document syntax
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// Native shape, TOML syntax
    Toml,
    /// Native shape, JSON syntax
    Json,
    /// Hardhat `solidity` section (or whole user config) as JSON
    Hardhat,
}

impl ConfigFormat {
    /// Guess the format from a file extension; unknown extensions are TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// A typed configuration plus the layers it was built from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub raw: RawConfig,

    /// Contributing layers in precedence order
    pub sources: Vec<ConfigSource>,
}

/// Loading errors
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid configuration document: {0}")]
    Format(String),

    #[error("invalid assignment '{0}': expected KEY=VALUE")]
    Assignment(String),
}

/// Load a configuration file, layering `cli` assignments over it.
///
/// `format` defaults to a guess from the file extension.
pub fn load_file(
    path: &Path,
    format: Option<ConfigFormat>,
    cli: Option<Value>,
) -> Result<LoadedConfig, LoadError> {
    let display = path.display().to_string();
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes).map_err(|e| LoadError::Parse {
        path: display.clone(),
        message: format!("invalid UTF-8: {}", e),
    })?;

    let format = format.unwrap_or_else(|| ConfigFormat::from_path(path));
    let document = document_value(&contents, format).map_err(|e| match e {
        LoadError::Parse { message, .. } => LoadError::Parse {
            path: display.clone(),
            message,
        },
        other => other,
    })?;

    let mut sources = vec![ConfigSource {
        origin: ConfigOrigin::File,
        path: Some(display),
        digest: Some(digest),
    }];

    let mut layers = vec![document];
    if let Some(cli) = cli {
        layers.push(cli);
        sources.push(ConfigSource {
            origin: ConfigOrigin::Cli,
            path: None,
            digest: None,
        });
    }

    let raw = typed(merge_layers(layers))?;
    tracing::debug!(
        path = sources[0].path.as_deref().unwrap_or_default(),
        compilers = raw.compilers.len(),
        overrides = raw.overrides.len(),
        "loaded configuration"
    );

    Ok(LoadedConfig { raw, sources })
}

/// Parse an in-memory document
pub fn parse_document(contents: &str, format: ConfigFormat) -> Result<RawConfig, LoadError> {
    typed(document_value(contents, format)?)
}

/// Build a CLI layer from `KEY=VALUE` assignments.
///
/// Keys are dotted paths into the native document (`settings.optimizerRuns`).
/// Values parse as JSON (booleans, integers, objects); anything else, and any
/// fractional number, is kept as a string so that `0.8` stays a version.
pub fn cli_layer<S: AsRef<str>>(assignments: &[S]) -> Result<Value, LoadError> {
    let mut root = Map::new();

    for assignment in assignments {
        let assignment = assignment.as_ref();
        let (key, raw_value) = assignment
            .split_once('=')
            .ok_or_else(|| LoadError::Assignment(assignment.to_string()))?;
        let key = key.trim();
        if key.is_empty() || key.split('.').any(str::is_empty) {
            return Err(LoadError::Assignment(assignment.to_string()));
        }

        let value = match serde_json::from_str::<Value>(raw_value) {
            Ok(Value::Number(n)) if n.is_f64() => Value::String(raw_value.to_string()),
            Ok(v) => v,
            Err(_) => Value::String(raw_value.to_string()),
        };

        let mut parts: Vec<&str> = key.split('.').collect();
        let leaf = parts.pop().unwrap_or(key);
        let mut layer = Map::new();
        layer.insert(leaf.to_string(), value);
        let nested = parts.into_iter().rev().fold(layer, |inner, part| {
            let mut outer = Map::new();
            outer.insert(part.to_string(), Value::Object(inner));
            outer
        });

        root = match super::merge::deep_merge(Value::Object(root), Value::Object(nested)) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
    }

    Ok(Value::Object(root))
}

/// Convert document text into the native JSON shape
fn document_value(contents: &str, format: ConfigFormat) -> Result<Value, LoadError> {
    match format {
        ConfigFormat::Toml => {
            let toml_value: toml::Value = toml::from_str(contents).map_err(|e| LoadError::Parse {
                path: "<inline>".to_string(),
                message: format!("TOML parse error: {}", e),
            })?;
            Ok(toml_to_json(toml_value))
        }
        ConfigFormat::Json => serde_json::from_str(contents).map_err(|e| LoadError::Parse {
            path: "<inline>".to_string(),
            message: format!("JSON parse error: {}", e),
        }),
        ConfigFormat::Hardhat => {
            let raw = import_hardhat_str(contents)?;
            serde_json::to_value(&raw).map_err(|e| LoadError::Format(e.to_string()))
        }
    }
}

fn typed(document: Value) -> Result<RawConfig, LoadError> {
    serde_json::from_value(document).map_err(|e| LoadError::Format(e.to_string()))
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
