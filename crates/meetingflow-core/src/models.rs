use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Mapping from attendee email to role name, supplied by the caller.
///
/// A missing entry means the attendee is unassigned.
pub type RoleAssignment = HashMap<String, String>;

/// A normalized meeting record: two timestamps and the attendee emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Start timestamp (RFC 3339, naive date-time or date-only).
    pub start: String,
    /// End timestamp, same formats as `start`.
    pub end: String,
    /// Attendee emails; order is irrelevant and duplicates are kept.
    #[serde(default)]
    pub attendees: Vec<String>,
}

impl CalendarEvent {
    pub fn new<I, S>(start: impl Into<String>, end: impl Into<String>, attendees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            start: start.into(),
            end: end.into(),
            attendees: attendees.into_iter().map(Into::into).collect(),
        }
    }
}

/// Cost of a single billable meeting.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingCostResult {
    /// Parsed start instant; its UTC date is the day bucket.
    pub start: DateTime<Utc>,
    /// Meeting length in fractional hours.
    pub duration_hours: f64,
    /// Number of attendees billed (never less than 1).
    pub attendee_count: usize,
    /// `duration_hours × attendee_count`, unrounded.
    pub people_hours: f64,
    /// Total cost in USD, rounded to cents.
    pub cost_usd: f64,
    /// Attendee emails with no role assignment.
    pub unassigned_emails: BTreeSet<String>,
}

/// Spend accumulated for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendByDay {
    /// Day key, e.g. `"2024-01-15"`.
    pub date: String,
    #[serde(rename = "costUSD")]
    pub cost_usd: f64,
    pub people_hours: f64,
    pub meetings: u32,
}

impl SpendByDay {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            cost_usd: 0.0,
            people_hours: 0.0,
            meetings: 0,
        }
    }
}

/// Aggregate spend for a reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    /// Nominal window length in days (metadata, not a filter).
    pub days: u32,
    pub total_meetings: u32,
    pub total_people_hours: f64,
    #[serde(rename = "totalCostUSD")]
    pub total_cost_usd: f64,
    /// Distinct attendee emails without a role across the window.
    pub unassigned_people_count: usize,
    /// Day rows in ascending date order.
    pub spend_by_day: Vec<SpendByDay>,
}

/// Derived ratios reported alongside insight text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightMetrics {
    pub avg_cost_per_meeting: f64,
    pub avg_people_hours_per_meeting: f64,
    pub cost_per_people_hour: f64,
    /// People-hours expressed as 8-hour workdays.
    pub work_days_lost: f64,
    /// Date of the highest-spend day, if any day had spend.
    pub peak_day_date: Option<String>,
    #[serde(rename = "peakDayCostUSD")]
    pub peak_day_cost_usd: f64,
    pub peak_day_meetings: u32,
}

/// Narrative, bullets and metrics derived from one [`WeeklySummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightOutput {
    pub insight_text: String,
    pub bullets: Vec<String>,
    /// `None` when no ratios are meaningful (zero meetings, basic tier).
    #[serde(default)]
    pub metrics: Option<InsightMetrics>,
}
