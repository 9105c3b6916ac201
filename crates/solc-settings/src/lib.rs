//! Typed compiler settings blocks.
//!
//! A [`SettingsBlock`] carries the recognized compiler settings as typed
//! fields plus an opaque bag for keys this crate does not know about.
//! Blocks combine by per-key override: the more specific block supplies
//! only the keys it sets and everything else falls through.

mod block;
mod error;
mod hardhat;

pub use block::{SettingsBlock, KEY_OPTIMIZER_ENABLED, KEY_OPTIMIZER_RUNS};
pub use error::SettingsError;
