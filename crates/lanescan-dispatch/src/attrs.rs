//! Operator attributes as delivered by the caller.

use std::collections::BTreeMap;

use lanescan_core::CumSumConfig;
use serde::{Deserialize, Serialize};

use crate::{DispatchError, Result};

pub const EXCLUSIVE: &str = "exclusive";
pub const REVERSE: &str = "reverse";

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Float(f32),
    String(String),
}

/// Named attributes attached to one operator invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    values: BTreeMap<String, AttrValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style integer attribute.
    pub fn with_int(mut self, name: &str, value: i64) -> Self {
        self.insert(name, AttrValue::Int(value));
        self
    }

    pub fn insert(&mut self, name: &str, value: AttrValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Read an integer flag: absent is false, any nonzero value is true.
    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            None => Ok(false),
            Some(AttrValue::Int(v)) => Ok(*v != 0),
            Some(other) => Err(DispatchError::InvalidAttribute {
                name: name.to_string(),
                reason: format!("expected an integer flag, got {other:?}"),
            }),
        }
    }

    /// Decode the CumSum modifiers. Attributes the operator does not know
    /// are ignored.
    pub fn cumsum_config(&self) -> Result<CumSumConfig> {
        for name in self.names().filter(|n| *n != EXCLUSIVE && *n != REVERSE) {
            tracing::warn!(attribute = name, "ignoring unknown CumSum attribute");
        }
        Ok(CumSumConfig::new(self.flag(EXCLUSIVE)?, self.flag(REVERSE)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_inclusive_forward() {
        let config = Attributes::new().cumsum_config().unwrap();
        assert_eq!(config, CumSumConfig::default());
    }

    #[test]
    fn test_nonzero_is_true() {
        let attrs = Attributes::new().with_int(EXCLUSIVE, 1).with_int(REVERSE, -7);
        assert_eq!(attrs.cumsum_config().unwrap(), CumSumConfig::new(true, true));

        let attrs = Attributes::new().with_int(EXCLUSIVE, 0).with_int(REVERSE, 2);
        assert_eq!(attrs.cumsum_config().unwrap(), CumSumConfig::new(false, true));
    }

    #[test]
    fn test_non_integer_flag_is_rejected() {
        let mut attrs = Attributes::new();
        attrs.insert(REVERSE, AttrValue::Float(1.0));
        let err = attrs.cumsum_config().unwrap_err();
        assert!(matches!(err, DispatchError::InvalidAttribute { ref name, .. } if name == REVERSE));
    }

    #[test]
    fn test_unknown_attribute_is_ignored() {
        let attrs = Attributes::new().with_int("axis_hint", 3).with_int(EXCLUSIVE, 1);
        assert_eq!(attrs.cumsum_config().unwrap(), CumSumConfig::new(true, false));
    }

    #[test]
    fn test_json_round_trip() {
        let attrs: Attributes =
            serde_json::from_str(r#"{"exclusive": 1, "note": "x", "scale": 0.5}"#).unwrap();
        assert_eq!(attrs.get(EXCLUSIVE), Some(&AttrValue::Int(1)));
        assert_eq!(attrs.get("note"), Some(&AttrValue::String("x".into())));
        assert_eq!(attrs.get("scale"), Some(&AttrValue::Float(0.5)));
    }
}
