//! Test fixtures for configuration loading
//!
//! - `solc.toml`: native multi-version config
//! - `hardhat.config.json`: Hardhat user config with a multi-compiler `solidity` section

use std::path::{Path, PathBuf};

/// Path to the native TOML fixture
pub fn native_toml_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/solc.toml")
}

/// Path to the Hardhat fixture
pub fn hardhat_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/hardhat.config.json")
}
