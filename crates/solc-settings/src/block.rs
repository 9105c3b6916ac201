//! SettingsBlock and per-key override merge
//!
//! Merge semantics:
//! - Typed keys: the overlay value wins when set, otherwise the base value is kept
//! - Opaque keys: replaced whole by key (no nested merge)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::SettingsError;

/// Serialized name of the optimizer toggle
pub const KEY_OPTIMIZER_ENABLED: &str = "optimizerEnabled";

/// Serialized name of the optimizer run count
pub const KEY_OPTIMIZER_RUNS: &str = "optimizerRuns";

/// A mapping from setting name to value.
///
/// `optimizerEnabled` and `optimizerRuns` are typed; any other key lands in
/// `extra` and is passed through to the compiler backend untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsBlock {
    /// Whether the optimizer runs at all
    #[serde(
        rename = "optimizerEnabled",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub optimizer_enabled: Option<bool>,

    /// Expected number of contract executions the optimizer tunes for
    #[serde(
        rename = "optimizerRuns",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub optimizer_runs: Option<u32>,

    /// Forward-compatible keys, kept opaque
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SettingsBlock {
    /// Create an empty block (sets nothing, inherits everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set `optimizerEnabled`
    pub fn with_optimizer_enabled(mut self, enabled: bool) -> Self {
        self.optimizer_enabled = Some(enabled);
        self
    }

    /// Builder: set `optimizerRuns`
    pub fn with_optimizer_runs(mut self, runs: u32) -> Self {
        self.optimizer_runs = Some(runs);
        self
    }

    /// Builder: set an opaque key
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// True when the block sets no key at all
    pub fn is_empty(&self) -> bool {
        self.optimizer_enabled.is_none() && self.optimizer_runs.is_none() && self.extra.is_empty()
    }

    /// Look up any key, typed or opaque, as a JSON value
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            KEY_OPTIMIZER_ENABLED => self.optimizer_enabled.map(Value::Bool),
            KEY_OPTIMIZER_RUNS => self.optimizer_runs.map(Value::from),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Number of keys this block sets
    pub fn len(&self) -> usize {
        usize::from(self.optimizer_enabled.is_some())
            + usize::from(self.optimizer_runs.is_some())
            + self.extra.len()
    }

    /// Apply `top` over `self`; keys set in `top` win.
    pub fn overlay(mut self, top: &SettingsBlock) -> SettingsBlock {
        self.optimizer_enabled = top.optimizer_enabled.or(self.optimizer_enabled);
        self.optimizer_runs = top.optimizer_runs.or(self.optimizer_runs);
        for (key, value) in &top.extra {
            self.extra.insert(key.clone(), value.clone());
        }
        self
    }

    /// Merge `self` over `base` without consuming either
    pub fn merge_over(&self, base: &SettingsBlock) -> SettingsBlock {
        base.clone().overlay(self)
    }

    /// Merge blocks in order (first is lowest precedence, last is highest)
    pub fn merge_all<'a, I>(layers: I) -> SettingsBlock
    where
        I: IntoIterator<Item = &'a SettingsBlock>,
    {
        layers
            .into_iter()
            .fold(SettingsBlock::default(), |acc, layer| acc.overlay(layer))
    }

    /// Check value constraints on the typed keys
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.optimizer_runs == Some(0) {
            return Err(SettingsError::NonPositiveRuns(0));
        }
        Ok(())
    }
}
