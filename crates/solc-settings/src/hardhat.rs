//! Import of Hardhat-shaped settings objects
//!
//! Hardhat nests the optimizer under `optimizer: { enabled, runs }`. The
//! nested keys are lifted into the typed fields; any other optimizer key
//! (e.g. `details`) stays under an opaque `optimizer` entry.

use serde_json::{Map, Value};

use crate::{SettingsBlock, SettingsError, KEY_OPTIMIZER_ENABLED, KEY_OPTIMIZER_RUNS};

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_enabled(value: &Value, key: &str) -> Result<Option<bool>, SettingsError> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        _ => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            expected: "a boolean",
        }),
    }
}

fn parse_runs(value: &Value, key: &str) -> Result<Option<u32>, SettingsError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            let runs = n.as_u64().ok_or_else(|| SettingsError::InvalidValue {
                key: key.to_string(),
                expected: "a non-negative integer",
            })?;
            u32::try_from(runs)
                .map(Some)
                .map_err(|_| SettingsError::RunsOutOfRange(runs))
        }
        _ => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            expected: "a non-negative integer",
        }),
    }
}

impl SettingsBlock {
    /// Build a block from a Hardhat `settings` object.
    ///
    /// Flat `optimizerEnabled`/`optimizerRuns` keys are honored too; when both
    /// spellings are present the nested optimizer object wins.
    pub fn from_hardhat(value: &Value) -> Result<Self, SettingsError> {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::default()),
            other => return Err(SettingsError::NotAnObject(kind(other))),
        };

        let mut block = Self::default();
        let mut nested_enabled = None;
        let mut nested_runs = None;

        for (key, val) in map {
            match key.as_str() {
                KEY_OPTIMIZER_ENABLED => block.optimizer_enabled = parse_enabled(val, key)?,
                KEY_OPTIMIZER_RUNS => block.optimizer_runs = parse_runs(val, key)?,
                "optimizer" => {
                    let optimizer = match val {
                        Value::Object(o) => o,
                        Value::Null => continue,
                        other => return Err(SettingsError::NotAnObject(kind(other))),
                    };
                    let mut rest = Map::new();
                    for (okey, oval) in optimizer {
                        match okey.as_str() {
                            "enabled" => nested_enabled = parse_enabled(oval, "optimizer.enabled")?,
                            "runs" => nested_runs = parse_runs(oval, "optimizer.runs")?,
                            _ => {
                                rest.insert(okey.clone(), oval.clone());
                            }
                        }
                    }
                    if !rest.is_empty() {
                        block.extra.insert(key.clone(), Value::Object(rest));
                    }
                }
                _ => {
                    block.extra.insert(key.clone(), val.clone());
                }
            }
        }

        block.optimizer_enabled = nested_enabled.or(block.optimizer_enabled);
        block.optimizer_runs = nested_runs.or(block.optimizer_runs);
        Ok(block)
    }
}
