//! Plain-text rendering of an [`AnalysisReport`].

use std::fmt::Write as _;

use meetingflow_core::formatting::{format_currency, format_hours, format_number};
use meetingflow_data::analysis::AnalysisReport;
use meetingflow_data::insights::peak_day;

/// Render `report` for the terminal.
///
/// Shows window totals, the peak day (`N/A` when no day had spend), the first
/// `top_insights` bullets and how many detected people still need a role.
pub fn render_text(report: &AnalysisReport, top_insights: usize, missing_roles: usize) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "MeetingFlow report ({} plan, last {} days)",
        report.plan, report.days
    );
    let _ = writeln!(
        out,
        "Meetings:        {} of {} events",
        summary.total_meetings, report.event_count
    );
    let _ = writeln!(
        out,
        "People-hours:    {} ({})",
        format_number(summary.total_people_hours, 1),
        format_hours(summary.total_people_hours)
    );
    let _ = writeln!(out, "Total cost:      {}", format_currency(summary.total_cost_usd));

    let peak = match peak_day(&summary.spend_by_day) {
        Some(day) => format!(
            "{} ({}, {} meetings)",
            day.date,
            format_currency(day.cost_usd),
            day.meetings
        ),
        None => "N/A".to_string(),
    };
    let _ = writeln!(out, "Peak day:        {}", peak);
    let _ = writeln!(out, "Unassigned:      {}", summary.unassigned_people_count);

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.insights.insight_text);
    let _ = writeln!(out);
    let _ = writeln!(out, "Top insights:");
    if report.insights.bullets.is_empty() || top_insights == 0 {
        let _ = writeln!(out, "- No insights returned");
    } else {
        for bullet in report.insights.bullets.iter().take(top_insights) {
            let _ = writeln!(out, "- {}", bullet);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Detected people without a role: {}", missing_roles);

    out
}
