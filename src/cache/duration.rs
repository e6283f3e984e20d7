//! Duration Class Module
//!
//! Named freshness thresholds that read routes select when they are cached.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// == Duration Class ==
/// Freshness threshold bound to a cached route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationClass {
    /// 5 minutes
    Short,
    /// 15 minutes
    #[default]
    Medium,
    /// 60 minutes
    Long,
}

impl DurationClass {
    /// All classes, shortest first.
    pub const ALL: [DurationClass; 3] = [Self::Short, Self::Medium, Self::Long];

    // == Millis ==
    /// Returns the threshold in milliseconds.
    pub fn as_millis(self) -> u64 {
        match self {
            Self::Short => 5 * 60 * 1000,
            Self::Medium => 15 * 60 * 1000,
            Self::Long => 60 * 60 * 1000,
        }
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.as_millis())
    }

    // == Ceiling ==
    /// The longest configured class. The sweep never lets an entry outlive it.
    pub fn ceiling() -> Self {
        Self::Long
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for DurationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a duration class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown duration class: {0}")]
pub struct ParseDurationClassError(pub String);

impl FromStr for DurationClass {
    type Err = ParseDurationClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            _ => Err(ParseDurationClassError(s.to_string())),
        }
    }
}
