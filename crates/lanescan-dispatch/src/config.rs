//! Dispatch configuration.

use std::path::Path;

use lanescan_core::ops::cumsum::PAR_THRESHOLD;
use serde::{Deserialize, Serialize};

use crate::policy::ExclusionRule;
use crate::Result;

/// Configuration for the dispatcher.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Element count at which the CPU provider scans lanes in parallel.
    pub parallel_threshold: usize,

    /// Providers (optionally per dtype) the dispatcher must skip.
    pub exclusions: Vec<ExclusionRule>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: PAR_THRESHOLD,
            exclusions: Vec::new(),
        }
    }
}

impl DispatchConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DispatchError;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = DispatchConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DispatchConfig::default());
        assert_eq!(config.parallel_threshold, PAR_THRESHOLD);
    }

    #[test]
    fn test_parse_exclusions() {
        let json = r#"{
            "parallel_threshold": 1024,
            "exclusions": [
                { "provider": "gpu", "dtypes": ["f16"] },
                { "provider": "trt" }
            ]
        }"#;
        let config = DispatchConfig::from_json_str(json).unwrap();
        assert_eq!(config.parallel_threshold, 1024);
        assert_eq!(config.exclusions.len(), 2);
        assert_eq!(config.exclusions[0].dtypes, vec!["f16".to_string()]);
        assert!(config.exclusions[1].dtypes.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        let err = DispatchConfig::from_json_str("{ parallel_threshold: }").unwrap_err();
        assert!(matches!(err, DispatchError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = DispatchConfig::from_file(Path::new("/nonexistent/lanescan.json")).unwrap_err();
        assert!(matches!(err, DispatchError::Io(_)));
    }
}
