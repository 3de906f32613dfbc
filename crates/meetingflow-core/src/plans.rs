use crate::error::{MeetingFlowError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Window length used when the requested value is missing or invalid.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Subscription tiers, which bound the reporting window and the depth of
/// insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    /// Up to 30 days, single-bullet insights.
    Free,
    /// Up to 90 days, full insight checklist and metrics.
    Pro,
}

impl FromStr for PlanType {
    type Err = MeetingFlowError;

    /// Case-insensitive; accepts `"free"` and `"pro"`.
    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "free" => Ok(PlanType::Free),
            "pro" => Ok(PlanType::Pro),
            other => Err(MeetingFlowError::InvalidPlan(other.to_string())),
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Free => "free",
            PlanType::Pro => "pro",
        }
    }

    /// Longest window this plan may request.
    pub fn max_days(&self) -> u32 {
        match self {
            PlanType::Free => 30,
            PlanType::Pro => 90,
        }
    }

    /// Whether this plan receives the full insight checklist.
    pub fn has_full_insights(&self) -> bool {
        matches!(self, PlanType::Pro)
    }

    /// Clamp a requested window to this plan (see [`resolve_days`]).
    pub fn resolve_days(&self, requested: Option<f64>) -> u32 {
        resolve_days(requested, self.max_days())
    }
}

/// Normalise a requested window length.
///
/// Missing, non-finite or `< 1` values give [`DEFAULT_WINDOW_DAYS`]; anything
/// else is floored.
pub fn normalize_days(requested: Option<f64>) -> u32 {
    match requested {
        Some(days) if days.is_finite() && days >= 1.0 => {
            days.floor().min(u32::MAX as f64) as u32
        }
        _ => DEFAULT_WINDOW_DAYS,
    }
}

/// [`normalize_days`], then capped at `max_days`.
pub fn resolve_days(requested: Option<f64>, max_days: u32) -> u32 {
    normalize_days(requested).min(max_days)
}
