//! solc-lane - per-file compiler selection for multi-version projects
//!
//! Given the registered compiler versions, project-wide defaults and
//! per-file override rules, this crate decides which compiler version and
//! which merged settings apply to each source file, before any compiler is
//! invoked.

pub mod config;
pub mod logging;
pub mod report;
pub mod resolver;

pub use config::{CompilerVersion, GlobalSettings, OverrideRule, RawConfig};
pub use resolver::{CompileSpec, ConfigError, ConfigResolver, ResolveError};
pub use solc_settings::{SettingsBlock, SettingsError};
