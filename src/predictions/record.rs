//! Prediction record types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which model a prediction was requested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredictionKind {
    MentalWellness,
    AcademicImpact,
    Stress,
}

impl PredictionKind {
    pub const ALL: [PredictionKind; 3] = [Self::MentalWellness, Self::AcademicImpact, Self::Stress];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MentalWellness => "mental-wellness",
            Self::AcademicImpact => "academic-impact",
            Self::Stress => "stress",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::MentalWellness => "Mental wellness score from lifestyle and screen time data",
            Self::AcademicImpact => "Academic impact of social media usage",
            Self::Stress => "Stress level from sleep, activity and workload",
        }
    }
}

impl fmt::Display for PredictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored prediction belonging to one owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: u64,
    pub owner: String,
    #[serde(rename = "type")]
    pub kind: PredictionKind,
    /// Survey answers as submitted
    pub input: Value,
    /// Scores returned by the prediction service, if any
    pub scores: Option<Value>,
    pub created_at: DateTime<Utc>,
}
