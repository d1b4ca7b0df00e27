//! Clause extraction and document comparison payloads.
//!
//! These are produced by the backend and consumed by the clause and compare
//! views; the session core only passes them through.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk rating attached to clauses and differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bands an aggregate 0..=100 risk score: below 40 is low, below 70 medium.
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=39 => Self::Low,
            40..=69 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clause extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub id: u32,
    #[serde(rename = "type")]
    pub clause_type: String,
    pub content: String,
    pub page: u32,
    pub section: String,
    pub risk: RiskLevel,
}

/// Kind of change between the two compared documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifferenceKind {
    Modified,
    Missing,
    Added,
    #[serde(untagged)]
    Other(String),
}

/// One difference found by the compare endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    #[serde(rename = "type")]
    pub kind: DifferenceKind,
    pub clause: String,
    #[serde(rename = "doc1Value")]
    pub doc1_value: String,
    #[serde(rename = "doc2Value")]
    pub doc2_value: String,
    pub risk: RiskLevel,
}

/// Result of comparing two documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    #[serde(default)]
    pub differences: Vec<Difference>,
    #[serde(default)]
    pub risk_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc1_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc2_name: Option<String>,
}

impl ComparisonReport {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }
}
