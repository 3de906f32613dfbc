use std::collections::BTreeSet;

use tracing::debug;

use crate::formatting::round2;
use crate::models::{CalendarEvent, MeetingCostResult, RoleAssignment};
use crate::rates::RoleRateTable;
use crate::time_utils::TimestampParser;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Turns one [`CalendarEvent`] into a [`MeetingCostResult`].
///
/// Holds the rate table and timestamp parser; both are immutable, so one
/// calculator can price any number of events.
#[derive(Debug, Clone, Default)]
pub struct CostCalculator {
    rates: RoleRateTable,
    timestamps: TimestampParser,
}

impl CostCalculator {
    pub fn new(rates: RoleRateTable, timestamps: TimestampParser) -> Self {
        Self { rates, timestamps }
    }

    /// Price a single meeting.
    ///
    /// Returns `None` when the event is not billable: a timestamp does not
    /// parse, or `end` is not strictly after `start`.
    ///
    /// An event without attendees is billed as one default-rate person. An
    /// attendee missing from `roles` is billed at the default rate and listed
    /// in [`MeetingCostResult::unassigned_emails`].
    pub fn calculate(
        &self,
        event: &CalendarEvent,
        roles: Option<&RoleAssignment>,
    ) -> Option<MeetingCostResult> {
        let (Some(start), Some(end)) = (
            self.timestamps.parse(&event.start),
            self.timestamps.parse(&event.end),
        ) else {
            debug!(
                "Skipping event with unparsable times: {} -> {}",
                event.start, event.end
            );
            return None;
        };

        let elapsed_ms = (end - start).num_milliseconds();
        if elapsed_ms <= 0 {
            debug!("Skipping event with non-positive duration starting {}", start);
            return None;
        }
        let duration_hours = elapsed_ms as f64 / MILLIS_PER_HOUR;

        let attendees: Vec<&str> = event
            .attendees
            .iter()
            .map(|email| email.trim())
            .filter(|email| !email.is_empty())
            .collect();

        let mut unassigned_emails = BTreeSet::new();
        let (attendee_count, total_hourly_rate) = if attendees.is_empty() {
            (1, self.rates.default_rate())
        } else {
            let mut total = 0.0;
            for email in &attendees {
                let role = roles
                    .and_then(|r| r.get(*email))
                    .map(String::as_str)
                    .filter(|role| !role.is_empty());
                if role.is_none() {
                    unassigned_emails.insert((*email).to_string());
                }
                total += self.rates.rate_for(role);
            }
            (attendees.len(), total)
        };

        Some(MeetingCostResult {
            start,
            duration_hours,
            attendee_count,
            people_hours: duration_hours * attendee_count as f64,
            cost_usd: round2(duration_hours * total_hourly_rate),
            unassigned_emails,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
