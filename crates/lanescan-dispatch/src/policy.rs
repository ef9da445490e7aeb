//! Rules that keep specific providers away from specific element types.
//!
//! Exclusion is decided here, before a provider is asked to run; providers
//! and the kernel know nothing about it.

use lanescan_core::DType;
use serde::{Deserialize, Serialize};

use crate::{DispatchError, Result};

/// Exclude `provider` for the listed element types, or for every type when
/// `dtypes` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub provider: String,
    #[serde(default)]
    pub dtypes: Vec<String>,
}

impl ExclusionRule {
    pub fn provider(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            dtypes: Vec::new(),
        }
    }

    pub fn for_dtypes(provider: &str, dtypes: &[DType]) -> Self {
        Self {
            provider: provider.to_string(),
            dtypes: dtypes.iter().map(DType::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CompiledRule {
    provider: String,
    dtypes: Vec<DType>,
}

/// Validated set of exclusion rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionPolicy {
    rules: Vec<CompiledRule>,
}

impl ExclusionPolicy {
    /// Policy that excludes nothing.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Build a policy, rejecting rules that name an unknown element type.
    pub fn from_rules(rules: &[ExclusionRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let dtypes = rule
                    .dtypes
                    .iter()
                    .map(|name| {
                        DType::from_name(name).ok_or_else(|| {
                            DispatchError::Config(format!(
                                "unknown dtype '{}' in exclusion rule for provider '{}'",
                                name, rule.provider
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(CompiledRule {
                    provider: rule.provider.clone(),
                    dtypes,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Whether `provider` may handle an input of `dtype`.
    pub fn allows(&self, provider: &str, dtype: DType) -> bool {
        !self
            .rules
            .iter()
            .any(|r| r.provider == provider && (r.dtypes.is_empty() || r.dtypes.contains(&dtype)))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all() {
        let policy = ExclusionPolicy::allow_all();
        assert!(policy.is_empty());
        assert!(policy.allows("cpu", DType::F16));
    }

    #[test]
    fn test_dtype_scoped_rule() {
        let policy =
            ExclusionPolicy::from_rules(&[ExclusionRule::for_dtypes("gpu", &[DType::F16])]).unwrap();
        assert!(!policy.allows("gpu", DType::F16));
        assert!(policy.allows("gpu", DType::F32));
        assert!(policy.allows("cpu", DType::F16));
    }

    #[test]
    fn test_provider_wide_rule() {
        let policy = ExclusionPolicy::from_rules(&[ExclusionRule::provider("trt")]).unwrap();
        assert!(!policy.allows("trt", DType::F32));
        assert!(!policy.allows("trt", DType::I64));
        assert!(policy.allows("cpu", DType::I64));
    }

    #[test]
    fn test_unknown_dtype_is_config_error() {
        let rule = ExclusionRule {
            provider: "gpu".into(),
            dtypes: vec!["f128".into()],
        };
        let err = ExclusionPolicy::from_rules(&[rule]).unwrap_err();
        assert!(matches!(err, DispatchError::Config(ref msg) if msg.contains("f128")));
    }
}
