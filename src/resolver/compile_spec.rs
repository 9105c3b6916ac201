//! Resolver output

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use solc_settings::SettingsBlock;

use super::ResolveError;

/// Fully merged compiler selection for one source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileSpec {
    /// Chosen compiler version identifier
    pub compiler_version: String,

    /// Settings after global → version → override merge
    pub settings: SettingsBlock,
}

impl CompileSpec {
    /// Stable identity of this spec.
    ///
    /// spec_key = SHA-256 hex digest of JCS(spec) (RFC 8785), so two specs
    /// with the same content always share a key regardless of field order.
    pub fn spec_key(&self) -> Result<String, ResolveError> {
        let jcs_bytes = serde_json_canonicalizer::to_vec(self)
            .map_err(|e| ResolveError::Canonicalize(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Serialize to JSON (pretty printed)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spec_key_is_stable() {
        let spec = CompileSpec {
            compiler_version: "0.8.0".to_string(),
            settings: SettingsBlock::new().with_optimizer_runs(200),
        };

        let a = spec.spec_key().unwrap();
        let b = spec.clone().spec_key().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_spec_key_distinguishes_settings() {
        let a = CompileSpec {
            compiler_version: "0.8.0".to_string(),
            settings: SettingsBlock::new().with_optimizer_runs(200),
        };
        let b = CompileSpec {
            compiler_version: "0.8.0".to_string(),
            settings: SettingsBlock::new().with_optimizer_runs(100),
        };

        assert_ne!(a.spec_key().unwrap(), b.spec_key().unwrap());
    }

    #[test]
    fn test_json_shape() {
        let spec = CompileSpec {
            compiler_version: "0.6.12".to_string(),
            settings: SettingsBlock::new().with_optimizer_runs(100),
        };

        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value,
            json!({"compiler_version": "0.6.12", "settings": {"optimizerRuns": 100}})
        );
    }
}
