//! Folding priced meetings into a day-bucketed [`WeeklySummary`].

use std::collections::{BTreeMap, HashSet};

use meetingflow_core::cost::CostCalculator;
use meetingflow_core::formatting::round2;
use meetingflow_core::models::{
    CalendarEvent, MeetingCostResult, RoleAssignment, SpendByDay, WeeklySummary,
};
use meetingflow_core::plans::normalize_days;
use meetingflow_core::time_utils::day_key;
use tracing::debug;

// ── SpendByDay accumulation ───────────────────────────────────────────────────

/// Add one meeting to a day row.
///
/// Cost and people-hours are re-rounded to cents after every addition, so a
/// row can differ slightly from rounding its exact sum once.
fn add_to_day(row: &mut SpendByDay, meeting: &MeetingCostResult) {
    row.cost_usd = round2(row.cost_usd + meeting.cost_usd);
    row.people_hours = round2(row.people_hours + meeting.people_hours);
    row.meetings += 1;
}

// ── SummaryAccumulator ────────────────────────────────────────────────────────

/// Running state of one aggregation.
///
/// Window totals stay unrounded until [`SummaryAccumulator::finish`].
#[derive(Debug, Default)]
struct SummaryAccumulator {
    total_meetings: u32,
    total_people_hours: f64,
    total_cost_usd: f64,
    unassigned_emails: HashSet<String>,
    days: BTreeMap<String, SpendByDay>,
}

impl SummaryAccumulator {
    fn add(mut self, meeting: MeetingCostResult) -> Self {
        self.total_meetings += 1;
        self.total_people_hours += meeting.people_hours;
        self.total_cost_usd += meeting.cost_usd;

        let key = day_key(meeting.start);
        let row = self
            .days
            .entry(key.clone())
            .or_insert_with(|| SpendByDay::new(key));
        add_to_day(row, &meeting);

        self.unassigned_emails.extend(meeting.unassigned_emails);
        self
    }

    fn finish(self, days: u32) -> WeeklySummary {
        WeeklySummary {
            days,
            total_meetings: self.total_meetings,
            total_people_hours: round2(self.total_people_hours),
            total_cost_usd: round2(self.total_cost_usd),
            unassigned_people_count: self.unassigned_emails.len(),
            // BTreeMap order is ascending ISO date order.
            spend_by_day: self.days.into_values().collect(),
        }
    }
}

// ── SummaryAggregator ─────────────────────────────────────────────────────────

/// Prices a batch of events and folds them into a [`WeeklySummary`].
pub struct SummaryAggregator<'a> {
    calculator: &'a CostCalculator,
}

impl<'a> SummaryAggregator<'a> {
    pub fn new(calculator: &'a CostCalculator) -> Self {
        Self { calculator }
    }

    /// Aggregate `events` (any order) into one summary.
    ///
    /// `days` is normalised (missing, non-finite or `< 1` → 30, else floored)
    /// and carried as metadata only; events are never filtered by date here.
    /// Events the calculator rejects are skipped. Never fails.
    pub fn aggregate(
        &self,
        events: &[CalendarEvent],
        roles: Option<&RoleAssignment>,
        days: Option<f64>,
    ) -> WeeklySummary {
        let accumulator = events
            .iter()
            .filter_map(|event| self.calculator.calculate(event, roles))
            .fold(SummaryAccumulator::default(), SummaryAccumulator::add);

        let skipped = events.len() - accumulator.total_meetings as usize;
        if skipped > 0 {
            debug!("Skipped {} non-billable events of {}", skipped, events.len());
        }

        accumulator.finish(normalize_days(days))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
