use serde::{Deserialize, Serialize};

/// Priority levels mapped to integers for sorting
/// Higher number = Higher priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl PriorityLevel {
    /// Parse a priority string. Unrecognized values rank as medium.
    pub fn from_str_lenient(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }

    /// First non-empty candidate wins; nothing set means medium.
    ///
    /// Subtasks pass their own value followed by the parent's.
    pub fn effective(candidates: &[Option<&str>]) -> Self {
        candidates
            .iter()
            .flatten()
            .find(|s| !s.is_empty())
            .map(|s| Self::from_str_lenient(s))
            .unwrap_or(Self::Medium)
    }

    pub fn weight(&self) -> i32 {
        *self as i32
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}
