//! Complexity score types.

use serde::{Deserialize, Serialize};

use crate::errors::TasksError;

/// Complexity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComplexityLevel {
    Simple,
    Moderate,
    Complex,
    VeryComplex,
}

impl std::fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Moderate => write!(f, "moderate"),
            Self::Complex => write!(f, "complex"),
            Self::VeryComplex => write!(f, "veryComplex"),
        }
    }
}

impl std::str::FromStr for ComplexityLevel {
    type Err = TasksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "simple" => Ok(Self::Simple),
            "moderate" => Ok(Self::Moderate),
            "complex" => Ok(Self::Complex),
            "verycomplex" => Ok(Self::VeryComplex),
            _ => Err(TasksError::InvalidComplexityLevel {
                level: s.to_string(),
            }),
        }
    }
}

/// Where a complexity value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComplexitySource {
    /// Produced by the built-in scorer
    #[default]
    Computed,
    /// Set directly by the user
    Manual,
    /// Supplied by the external assistant
    Assistant,
}

impl std::fmt::Display for ComplexitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Computed => write!(f, "computed"),
            Self::Manual => write!(f, "manual"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One weighted input to the complexity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityFactor {
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub description: String,
}

/// Complexity estimate attached to a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityScore {
    pub level: ComplexityLevel,

    /// Non-negative weighted total
    pub score: f64,

    #[serde(default)]
    pub factors: Vec<ComplexityFactor>,

    #[serde(default, skip_serializing_if = "ComplexitySource::is_computed")]
    pub source: ComplexitySource,
}

impl ComplexitySource {
    fn is_computed(&self) -> bool {
        *self == Self::Computed
    }
}

impl ComplexityScore {
    /// A user-supplied score. `level` and `score` are taken as given.
    pub fn manual(level: ComplexityLevel, score: f64) -> Self {
        Self {
            level,
            score,
            factors: Vec::new(),
            source: ComplexitySource::Manual,
        }
    }

    /// Whether the scorer must leave this value alone
    pub fn is_override(&self) -> bool {
        self.source != ComplexitySource::Computed
    }

    /// Reject values that cannot be stored
    pub fn validate(&self) -> Result<(), TasksError> {
        if !self.score.is_finite() || self.score < 0.0 {
            return Err(TasksError::Validation {
                reason: format!("complexity score must be a non-negative number, got {}", self.score),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_wire_format() {
        let json = serde_json::to_string(&ComplexityLevel::VeryComplex).unwrap();
        assert_eq!(json, "\"veryComplex\"");
    }

    #[test]
    fn test_level_parsing_accepts_variants() {
        assert_eq!(
            "very-complex".parse::<ComplexityLevel>().unwrap(),
            ComplexityLevel::VeryComplex
        );
        assert_eq!(
            "veryComplex".parse::<ComplexityLevel>().unwrap(),
            ComplexityLevel::VeryComplex
        );
        assert!("huge".parse::<ComplexityLevel>().is_err());
    }

    #[test]
    fn test_source_defaults_to_computed() {
        let score: ComplexityScore =
            serde_json::from_str(r#"{"level": "simple", "score": 1.5}"#).unwrap();
        assert_eq!(score.source, ComplexitySource::Computed);
        assert!(!score.is_override());
    }

    #[test]
    fn test_manual_score_is_override() {
        let score = ComplexityScore::manual(ComplexityLevel::Complex, 2.0);
        assert!(score.is_override());
        let json = serde_json::to_value(&score).unwrap();
        assert_eq!(json["source"], "manual");
    }

    #[test]
    fn test_negative_score_rejected() {
        let score = ComplexityScore::manual(ComplexityLevel::Simple, -1.0);
        assert!(score.validate().is_err());
    }
}
