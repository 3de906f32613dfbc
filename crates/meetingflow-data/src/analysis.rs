//! Top-level analysis pipeline for MeetingFlow.
//!
//! Resolves the reporting window for the plan, aggregates the events into a
//! [`WeeklySummary`] and attaches plan-appropriate insights, returning an
//! [`AnalysisReport`] ready for rendering.

use std::collections::HashSet;

use meetingflow_core::cost::CostCalculator;
use meetingflow_core::models::{CalendarEvent, InsightOutput, RoleAssignment, WeeklySummary};
use meetingflow_core::plans::PlanType;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregator::SummaryAggregator;
use crate::insights::InsightGenerator;
use crate::reader::EventInput;

// ── Public types ──────────────────────────────────────────────────────────────

/// Input to [`analyze`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeRequest {
    pub events: Vec<CalendarEvent>,
    pub roles: Option<RoleAssignment>,
    /// Requested window length; clamped to the plan.
    pub days: Option<f64>,
}

impl From<EventInput> for AnalyzeRequest {
    fn from(input: EventInput) -> Self {
        Self {
            events: input.events,
            roles: input.roles,
            days: input.days,
        }
    }
}

/// The complete output of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub plan: PlanType,
    /// Window length after plan clamping.
    pub days: u32,
    /// Number of events submitted, billable or not.
    pub event_count: usize,
    pub summary: WeeklySummary,
    pub insights: InsightOutput,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline for one request.
///
/// 1. Clamp the requested window to the plan.
/// 2. Price and aggregate every event.
/// 3. Generate full or basic insights depending on the plan.
pub fn analyze(
    request: &AnalyzeRequest,
    plan: PlanType,
    calculator: &CostCalculator,
) -> AnalysisReport {
    let days = plan.resolve_days(request.days);

    let summary = SummaryAggregator::new(calculator).aggregate(
        &request.events,
        request.roles.as_ref(),
        Some(f64::from(days)),
    );
    let insights = InsightGenerator::generate_for_plan(&summary, plan);

    info!(
        "Analyzed {} events ({} billable) over {} days on the {} plan",
        request.events.len(),
        summary.total_meetings,
        days,
        plan
    );

    AnalysisReport {
        plan,
        days,
        event_count: request.events.len(),
        summary,
        insights,
    }
}

/// Distinct trimmed attendee emails in first-seen order.
pub fn detect_people(events: &[CalendarEvent]) -> Vec<String> {
    let mut seen = HashSet::new();
    events
        .iter()
        .flat_map(|event| event.attendees.iter())
        .map(|email| email.trim())
        .filter(|email| !email.is_empty())
        .filter(|email| seen.insert(*email))
        .map(str::to_string)
        .collect()
}

/// Detected people with no role (or an empty one) in `roles`.
pub fn people_without_role(
    events: &[CalendarEvent],
    roles: Option<&RoleAssignment>,
) -> Vec<String> {
    detect_people(events)
        .into_iter()
        .filter(|email| {
            roles
                .and_then(|r| r.get(email))
                .map(|role| role.is_empty())
                .unwrap_or(true)
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
