//! Declarative quota definitions
//!
//! The quota file is a JSON document describing the ResourceQuota and
//! LimitRange objects a project should receive, parameterized by a
//! per-project multiplier. It is loaded once at service startup and is
//! immutable for the lifetime of the process.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

fn default_coefficient() -> f64 {
    1.0
}

/// A value that can be scaled by a per-project multiplier.
///
/// A coefficient of exactly 0 marks a fixed value: the base is emitted
/// unscaled regardless of the multiplier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScaledValue {
    pub base: i64,
    #[serde(default = "default_coefficient")]
    pub coefficient: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl ScaledValue {
    /// Resolve this value into a quantity string.
    ///
    /// The computed value is `base * coefficient * multiplier`, rounded
    /// half-to-even. Callers must reject non-positive multipliers before
    /// resolving.
    ///
    /// The product is computed in f64, so results are exact only up to
    /// 2^53. Quota magnitudes live well below that even for byte counts.
    pub fn resolve(&self, multiplier: i64) -> String {
        let value = if self.coefficient == 0.0 {
            self.base
        } else {
            (self.base as f64 * self.coefficient * multiplier as f64).round_ties_even() as i64
        };

        match &self.units {
            Some(units) => format!("{value}{units}"),
            None => value.to_string(),
        }
    }
}

/// Valid quota scope values.
///
/// `Project` is the unscoped marker: it contributes no scope entry to the
/// generated ResourceQuota.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuotaScope {
    Project,
    BestEffort,
    NotBestEffort,
    Terminating,
    NotTerminating,
}

impl QuotaScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotaScope::Project => "Project",
            QuotaScope::BestEffort => "BestEffort",
            QuotaScope::NotBestEffort => "NotBestEffort",
            QuotaScope::Terminating => "Terminating",
            QuotaScope::NotTerminating => "NotTerminating",
        }
    }
}

impl fmt::Display for QuotaScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quota specification: one generated ResourceQuota per entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QFQuotaSpec {
    pub scopes: Vec<QuotaScope>,
    pub values: BTreeMap<String, ScaledValue>,
}

/// Limit specification: one generated LimitRange item per entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QFLimitSpec {
    /// Limit type (Container, Pod, ...)
    #[serde(rename = "type")]
    pub limit_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<BTreeMap<String, ScaledValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<BTreeMap<String, ScaledValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<BTreeMap<String, ScaledValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_request: Option<BTreeMap<String, ScaledValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_limit_request_ratio: Option<BTreeMap<String, ScaledValue>>,
}

/// Quota definition file.
///
/// Entry order is preserved from the file so that generated objects are
/// stable across calls and can be diffed by consumers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotaFile {
    #[serde(default)]
    pub quotas: Vec<QFQuotaSpec>,
    #[serde(default)]
    pub limits: Vec<QFLimitSpec>,
}

impl QuotaFile {
    /// Load quota definitions from a JSON file.
    ///
    /// A malformed file (missing `type`, `scopes`, or `values`) is a
    /// configuration error here, never a per-request failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| Error::QuotaFile(format!("{}: {e}", path.display())))
    }

    /// Parse quota definitions from a JSON string
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_units() {
        let value = ScaledValue {
            base: 512,
            coefficient: 1.0,
            units: Some("Mi".to_string()),
        };
        assert_eq!(value.resolve(2), "1024Mi");
    }

    #[test]
    fn test_resolve_without_units() {
        let value = ScaledValue {
            base: 2,
            coefficient: 1.0,
            units: None,
        };
        assert_eq!(value.resolve(3), "6");
    }

    #[test]
    fn test_resolve_fixed_value() {
        // coefficient 0 marks a fixed value
        let value = ScaledValue {
            base: 10,
            coefficient: 0.0,
            units: None,
        };
        assert_eq!(value.resolve(1), "10");
        assert_eq!(value.resolve(100), "10");
    }

    #[test]
    fn test_resolve_rounds_half_to_even() {
        let value = ScaledValue {
            base: 5,
            coefficient: 0.5,
            units: None,
        };
        // 5 * 0.5 * 1 = 2.5 -> 2
        assert_eq!(value.resolve(1), "2");
        // 5 * 0.5 * 3 = 7.5 -> 8
        assert_eq!(value.resolve(3), "8");
    }

    #[test]
    fn test_resolve_fractional_coefficient() {
        let value = ScaledValue {
            base: 100,
            coefficient: 1.5,
            units: Some("m".to_string()),
        };
        assert_eq!(value.resolve(2), "300m");
    }

    #[test]
    fn test_resolve_is_exact_for_large_bases() {
        // a terabyte in bytes, still far below the 2^53 exactness bound
        let value = ScaledValue {
            base: 1 << 40,
            coefficient: 1.0,
            units: None,
        };
        assert_eq!(value.resolve(4), (1i64 << 42).to_string());
    }

    #[test]
    fn test_coefficient_defaults_to_one() {
        let value: ScaledValue = serde_json::from_str(r#"{"base": 4}"#).unwrap();
        assert_eq!(value.coefficient, 1.0);
        assert_eq!(value.resolve(2), "8");
    }

    #[test]
    fn test_parse_quota_file() {
        let file = QuotaFile::parse(
            r#"{
                "quotas": [
                    {
                        "scopes": ["Project"],
                        "values": {
                            "requests.cpu": {"base": 2, "coefficient": 1},
                            "requests.memory": {"base": 512, "coefficient": 1, "units": "Mi"}
                        }
                    },
                    {
                        "scopes": ["BestEffort"],
                        "values": {
                            "pods": {"base": 5, "coefficient": 2}
                        }
                    }
                ],
                "limits": [
                    {
                        "type": "Container",
                        "default": {"cpu": {"base": 500, "coefficient": 1, "units": "m"}},
                        "max": {"memory": {"base": 2, "coefficient": 1, "units": "Gi"}}
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(file.quotas.len(), 2);
        assert_eq!(file.quotas[0].scopes, vec![QuotaScope::Project]);
        assert_eq!(file.quotas[0].values.len(), 2);
        assert_eq!(file.limits.len(), 1);
        assert_eq!(file.limits[0].limit_type, "Container");
        assert!(file.limits[0].min.is_none());
    }

    #[test]
    fn test_parse_empty_sections() {
        let file = QuotaFile::parse(r#"{}"#).unwrap();
        assert!(file.quotas.is_empty());
        assert!(file.limits.is_empty());
    }

    #[test]
    fn test_parse_rejects_missing_scopes() {
        let err = QuotaFile::parse(
            r#"{"quotas": [{"values": {"pods": {"base": 1}}}]}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_rejects_missing_type() {
        let err = QuotaFile::parse(
            r#"{"limits": [{"default": {"cpu": {"base": 1}}}]}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_scope() {
        let err = QuotaFile::parse(
            r#"{"quotas": [{"scopes": ["Sideways"], "values": {}}]}"#,
        );
        assert!(err.is_err());
    }
}
