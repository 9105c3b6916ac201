//! Resolution report artifact
//!
//! `resolution.json` records, for a batch of files, which compiler and
//! settings each one resolved to, together with the configuration layers
//! that produced the answer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::config::ConfigSource;
use crate::resolver::{CompileSpec, ConfigResolver, ResolveError};

/// Schema version for resolution.json
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "solc-lane/resolution@1";

/// One resolved source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedFile {
    pub path: String,

    /// True when an override rule matched this path
    pub overridden: bool,

    /// SHA-256 hex digest of JCS(spec)
    pub spec_key: String,

    pub spec: CompileSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub schema_version: u32,
    pub schema_id: String,
    pub created_at: DateTime<Utc>,

    /// Contributing configuration layers in precedence order
    pub sources: Vec<ConfigSource>,

    pub default_version: String,

    /// Files in input order
    pub entries: Vec<ResolvedFile>,
}

impl ResolutionReport {
    /// Resolve every path and collect the results
    pub fn build<S: AsRef<str>>(
        resolver: &ConfigResolver,
        sources: Vec<ConfigSource>,
        paths: &[S],
    ) -> Result<Self, ResolveError> {
        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let spec = resolver.resolve(path)?;
            entries.push(ResolvedFile {
                path: path.to_string(),
                overridden: resolver.has_override(path),
                spec_key: spec.spec_key()?,
                spec,
            });
        }

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            sources,
            default_version: resolver.default_version().version.clone(),
            entries,
        })
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }
}
