//! Executive-style insight text derived from a [`WeeklySummary`].
//!
//! Bullets come from a fixed, ordered checklist: each rule is checked in
//! turn and emits one sentence when its condition holds. The order of
//! [`BULLET_RULES`] is the order of the output.

use meetingflow_core::formatting::{format_amount, round2, safe_average};
use meetingflow_core::models::{InsightMetrics, InsightOutput, SpendByDay, WeeklySummary};
use meetingflow_core::plans::PlanType;

/// Upper bound on emitted bullets.
pub const MAX_BULLETS: usize = 5;

/// Hours in one workday when expressing people-hours as days.
pub const WORKDAY_HOURS: f64 = 8.0;

// ── Bullet checklist ──────────────────────────────────────────────────────────

/// Inputs shared by every bullet rule.
struct InsightContext<'a> {
    summary: &'a WeeklySummary,
    metrics: &'a InsightMetrics,
    peak: Option<&'a SpendByDay>,
}

/// A condition and the sentence it produces.
///
/// `render` is only called once `applies` holds; it returns `None` when the
/// context lacks the data it needs.
struct BulletRule {
    applies: fn(&InsightContext<'_>) -> bool,
    render: fn(&InsightContext<'_>) -> Option<String>,
}

const BULLET_RULES: [BulletRule; 5] = [
    BulletRule {
        applies: has_peak_day,
        render: peak_day_bullet,
    },
    BulletRule {
        applies: has_meetings,
        render: average_cost_bullet,
    },
    BulletRule {
        applies: has_people_hours,
        render: people_hours_bullet,
    },
    BulletRule {
        applies: has_unassigned_people,
        render: unassigned_bullet,
    },
    BulletRule {
        applies: has_people_hours,
        render: cost_per_people_hour_bullet,
    },
];

fn has_peak_day(ctx: &InsightContext<'_>) -> bool {
    ctx.peak.is_some()
}

fn has_meetings(ctx: &InsightContext<'_>) -> bool {
    ctx.summary.total_meetings > 0
}

fn has_people_hours(ctx: &InsightContext<'_>) -> bool {
    ctx.summary.total_people_hours > 0.0
}

fn has_unassigned_people(ctx: &InsightContext<'_>) -> bool {
    ctx.summary.unassigned_people_count > 0
}

fn peak_day_bullet(ctx: &InsightContext<'_>) -> Option<String> {
    let peak = ctx.peak?;
    Some(format!(
        "Peak spend was ${} on {} ({} meetings). Review what drove that day and replicate \
         high-value patterns while cutting low-value blocks.",
        format_amount(peak.cost_usd),
        peak.date,
        peak.meetings
    ))
}

fn average_cost_bullet(ctx: &InsightContext<'_>) -> Option<String> {
    let avg = format_amount(ctx.metrics.avg_cost_per_meeting);
    Some(format!(
        "Average meeting cost is ~${avg}. Cutting one similar low-value meeting saves about \
         ${avg}. Cancel or shorten the next recurring meeting without a clear outcome."
    ))
}

fn people_hours_bullet(ctx: &InsightContext<'_>) -> Option<String> {
    Some(format!(
        "Meetings consumed {} people-hours (~{} workdays at 8h/day). Protect focus time with a \
         recurring no-meeting block each week.",
        format_amount(ctx.summary.total_people_hours),
        format_amount(ctx.metrics.work_days_lost)
    ))
}

fn unassigned_bullet(ctx: &InsightContext<'_>) -> Option<String> {
    Some(format!(
        "{} people have no assigned role, so cost estimates may be understated. Assign missing \
         roles to tighten spend accuracy.",
        ctx.summary.unassigned_people_count
    ))
}

fn cost_per_people_hour_bullet(ctx: &InsightContext<'_>) -> Option<String> {
    Some(format!(
        "Cost is ~${} per people-hour. Reduce this by defaulting to 25-minute meetings and \
         capping attendees to required decision-makers.",
        format_amount(ctx.metrics.cost_per_people_hour)
    ))
}

// ── Metrics ───────────────────────────────────────────────────────────────────

/// The highest-spend day; the earliest date wins ties and a day only
/// qualifies with spend above zero.
pub fn peak_day(days: &[SpendByDay]) -> Option<&SpendByDay> {
    let mut peak: Option<&SpendByDay> = None;
    for day in days {
        if day.cost_usd > peak.map_or(0.0, |p| p.cost_usd) {
            peak = Some(day);
        }
    }
    peak
}

/// Ratios over the summary; zero denominators give `0.0`.
pub fn derive_metrics(summary: &WeeklySummary) -> InsightMetrics {
    let meetings = f64::from(summary.total_meetings);
    let peak = peak_day(&summary.spend_by_day);

    InsightMetrics {
        avg_cost_per_meeting: safe_average(summary.total_cost_usd, meetings),
        avg_people_hours_per_meeting: safe_average(summary.total_people_hours, meetings),
        cost_per_people_hour: safe_average(summary.total_cost_usd, summary.total_people_hours),
        work_days_lost: round2(summary.total_people_hours / WORKDAY_HOURS),
        peak_day_date: peak.map(|p| p.date.clone()),
        peak_day_cost_usd: peak.map_or(0.0, |p| round2(p.cost_usd)),
        peak_day_meetings: peak.map_or(0, |p| p.meetings),
    }
}

// ── InsightGenerator ──────────────────────────────────────────────────────────

/// Stateless generator of narrative, bullets and metrics.
pub struct InsightGenerator;

impl InsightGenerator {
    /// Insights for the given plan: the full checklist for Pro, the basic
    /// single-bullet variant for Free.
    pub fn generate_for_plan(summary: &WeeklySummary, plan: PlanType) -> InsightOutput {
        if plan.has_full_insights() {
            Self::generate(summary)
        } else {
            Self::generate_basic(summary)
        }
    }

    /// Full insights: narrative, up to [`MAX_BULLETS`] bullets and metrics.
    ///
    /// A window without meetings yields a fixed reassuring variant with no
    /// metrics.
    pub fn generate(summary: &WeeklySummary) -> InsightOutput {
        if summary.total_meetings == 0 {
            return Self::zero_meetings(summary);
        }

        let metrics = derive_metrics(summary);
        let ctx = InsightContext {
            summary,
            metrics: &metrics,
            peak: peak_day(&summary.spend_by_day),
        };

        let bullets: Vec<String> = BULLET_RULES
            .iter()
            .filter(|rule| (rule.applies)(&ctx))
            .filter_map(|rule| (rule.render)(&ctx))
            .take(MAX_BULLETS)
            .collect();

        let insight_text = format!(
            "In the last {} days, meetings cost ${} across {} meetings and {} people-hours. \
             Spend concentration and per-meeting cost indicate where time is being converted \
             into avoidable expense. Prioritize reducing low-value recurring meetings and \
             tightening attendance in the next cycle.",
            summary.days,
            format_amount(summary.total_cost_usd),
            summary.total_meetings,
            format_amount(summary.total_people_hours)
        );

        InsightOutput {
            insight_text,
            bullets,
            metrics: Some(metrics),
        }
    }

    /// Basic insights: narrative plus one bullet, no metrics.
    pub fn generate_basic(summary: &WeeklySummary) -> InsightOutput {
        if summary.total_meetings == 0 {
            return InsightOutput {
                insight_text: format!(
                    "In the last {} days, no meetings were recorded, so spend remained $0. Keep \
                     tracking enabled to capture future activity.",
                    summary.days
                ),
                bullets: vec![
                    "No meetings detected in this period. Keep your calendar connected for \
                     future reporting."
                        .to_string(),
                ],
                metrics: None,
            };
        }

        let avg = safe_average(summary.total_cost_usd, f64::from(summary.total_meetings));
        InsightOutput {
            insight_text: format!(
                "In the last {} days, meetings cost ${} across {} meetings and {} people-hours. \
                 Focus first on trimming low-value recurring meetings.",
                summary.days,
                format_amount(summary.total_cost_usd),
                summary.total_meetings,
                format_amount(summary.total_people_hours)
            ),
            bullets: vec![format!(
                "Average cost per meeting is ~${}. Upgrade to Pro for deeper multi-point insights.",
                format_amount(avg)
            )],
            metrics: None,
        }
    }

    fn zero_meetings(summary: &WeeklySummary) -> InsightOutput {
        InsightOutput {
            insight_text: format!(
                "In the last {} days, no meetings were recorded, so total meeting cost remained \
                 $0 across 0 meetings and 0 people-hours. Keep role assignments current so new \
                 activity is measured accurately.",
                summary.days
            ),
            bullets: vec![
                "No meetings detected in the selected window; no meeting-spend action is \
                 required this week."
                    .to_string(),
                "Keep calendars and role mappings current to ensure future reporting remains \
                 accurate."
                    .to_string(),
            ],
            metrics: None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, cost: f64, hours: f64, meetings: u32) -> SpendByDay {
        SpendByDay {
            date: date.to_string(),
            cost_usd: cost,
            people_hours: hours,
            meetings,
        }
    }

    fn summary(days: Vec<SpendByDay>, unassigned: usize) -> WeeklySummary {
        WeeklySummary {
            days: 7,
            total_meetings: days.iter().map(|d| d.meetings).sum(),
            total_people_hours: round2(days.iter().map(|d| d.people_hours).sum()),
            total_cost_usd: round2(days.iter().map(|d| d.cost_usd).sum()),
            unassigned_people_count: unassigned,
            spend_by_day: days,
        }
    }

    fn empty_summary() -> WeeklySummary {
        summary(vec![], 0)
    }

    // ── Zero-meeting variant ─────────────────────────────────────────────────

    #[test]
    fn test_zero_meetings_fixed_variant() {
        let output = InsightGenerator::generate(&empty_summary());
        assert!(output
            .insight_text
            .starts_with("In the last 7 days, no meetings were recorded"));
        assert!(output.insight_text.contains("$0 across 0 meetings"));
        assert_eq!(output.bullets.len(), 2);
        assert!(output.metrics.is_none());
    }

    #[test]
    fn test_zero_meetings_has_no_nan_text() {
        let output = InsightGenerator::generate(&empty_summary());
        assert!(!output.insight_text.contains("NaN"));
        assert!(output.bullets.iter().all(|b| !b.contains("NaN")));
    }

    // ── Full checklist ───────────────────────────────────────────────────────

    #[test]
    fn test_all_five_bullets_in_priority_order() {
        let s = summary(
            vec![day("2024-01-15", 140.0, 2.0, 1), day("2024-01-16", 35.0, 0.5, 1)],
            2,
        );
        let output = InsightGenerator::generate(&s);

        assert_eq!(output.bullets.len(), 5);
        assert_eq!(
            output.bullets[0],
            "Peak spend was $140 on 2024-01-15 (1 meetings). Review what drove that day and \
             replicate high-value patterns while cutting low-value blocks."
        );
        assert_eq!(
            output.bullets[1],
            "Average meeting cost is ~$87.5. Cutting one similar low-value meeting saves about \
             $87.5. Cancel or shorten the next recurring meeting without a clear outcome."
        );
        assert_eq!(
            output.bullets[2],
            "Meetings consumed 2.5 people-hours (~0.31 workdays at 8h/day). Protect focus time \
             with a recurring no-meeting block each week."
        );
        assert!(output.bullets[3].starts_with("2 people have no assigned role"));
        assert!(output.bullets[4].starts_with("Cost is ~$70 per people-hour."));
    }

    #[test]
    fn test_peak_bullet_needs_a_peak_day() {
        let s = summary(vec![day("2024-01-15", 0.0, 1.0, 1)], 0);
        let metrics = derive_metrics(&s);
        let ctx = InsightContext {
            summary: &s,
            metrics: &metrics,
            peak: None,
        };
        assert!(peak_day_bullet(&ctx).is_none());

        let output = InsightGenerator::generate(&s);
        assert!(output.bullets.iter().all(|b| !b.is_empty()));
        assert!(output.bullets.iter().all(|b| !b.starts_with("Peak spend")));
    }

    #[test]
    fn test_unassigned_bullet_omitted_when_all_assigned() {
        let s = summary(vec![day("2024-01-15", 140.0, 2.0, 1)], 0);
        let output = InsightGenerator::generate(&s);
        assert_eq!(output.bullets.len(), 4);
        assert!(output.bullets.iter().all(|b| !b.contains("no assigned role")));
        assert!(output.bullets[3].starts_with("Cost is ~$"));
    }

    #[test]
    fn test_zero_cost_meetings_have_no_peak_bullet() {
        let s = summary(vec![day("2024-01-15", 0.0, 1.0, 1)], 0);
        let output = InsightGenerator::generate(&s);
        assert!(output.bullets[0].starts_with("Average meeting cost is ~$0."));
        assert_eq!(output.metrics.unwrap().peak_day_date, None);
    }

    #[test]
    fn test_narrative_mentions_totals() {
        let s = summary(vec![day("2024-01-15", 150.5, 3.25, 2)], 0);
        let output = InsightGenerator::generate(&s);
        assert!(output.insight_text.starts_with(
            "In the last 7 days, meetings cost $150.5 across 2 meetings and 3.25 people-hours."
        ));
    }

    // ── Metrics ──────────────────────────────────────────────────────────────

    #[test]
    fn test_metrics_values() {
        let s = summary(
            vec![day("2024-01-15", 100.0, 2.0, 2), day("2024-01-16", 50.0, 1.0, 1)],
            0,
        );
        let metrics = InsightGenerator::generate(&s).metrics.unwrap();
        assert_eq!(metrics.avg_cost_per_meeting, 50.0);
        assert_eq!(metrics.avg_people_hours_per_meeting, 1.0);
        assert_eq!(metrics.cost_per_people_hour, 50.0);
        assert_eq!(metrics.work_days_lost, 0.38);
        assert_eq!(metrics.peak_day_date.as_deref(), Some("2024-01-15"));
        assert_eq!(metrics.peak_day_cost_usd, 100.0);
        assert_eq!(metrics.peak_day_meetings, 2);
    }

    #[test]
    fn test_metrics_zero_people_hours_is_zero_ratio() {
        let s = WeeklySummary {
            days: 7,
            total_meetings: 1,
            total_people_hours: 0.0,
            total_cost_usd: 0.0,
            unassigned_people_count: 0,
            spend_by_day: vec![day("2024-01-15", 0.0, 0.0, 1)],
        };
        let metrics = derive_metrics(&s);
        assert_eq!(metrics.cost_per_people_hour, 0.0);
        assert!(!metrics.cost_per_people_hour.is_nan());
    }

    // ── peak_day ─────────────────────────────────────────────────────────────

    #[test]
    fn test_peak_day_earliest_wins_ties() {
        let days = vec![
            day("2024-01-14", 10.0, 1.0, 1),
            day("2024-01-15", 80.0, 1.0, 1),
            day("2024-01-16", 80.0, 1.0, 1),
        ];
        assert_eq!(peak_day(&days).unwrap().date, "2024-01-15");
    }

    #[test]
    fn test_peak_day_none_for_empty() {
        assert!(peak_day(&[]).is_none());
    }

    // ── Plans ────────────────────────────────────────────────────────────────

    #[test]
    fn test_basic_insights_single_bullet() {
        let s = summary(vec![day("2024-01-15", 100.0, 2.0, 3)], 1);
        let output = InsightGenerator::generate_for_plan(&s, PlanType::Free);
        assert_eq!(
            output.bullets,
            vec!["Average cost per meeting is ~$33.33. Upgrade to Pro for deeper multi-point \
                  insights."
                .to_string()]
        );
        assert!(output.metrics.is_none());
        assert!(output
            .insight_text
            .ends_with("Focus first on trimming low-value recurring meetings."));
    }

    #[test]
    fn test_basic_insights_zero_meetings() {
        let output = InsightGenerator::generate_basic(&empty_summary());
        assert!(output.insight_text.contains("spend remained $0"));
        assert_eq!(output.bullets.len(), 1);
    }

    #[test]
    fn test_pro_plan_uses_full_checklist() {
        let s = summary(vec![day("2024-01-15", 100.0, 2.0, 3)], 1);
        let output = InsightGenerator::generate_for_plan(&s, PlanType::Pro);
        assert_eq!(output, InsightGenerator::generate(&s));
        assert!(output.metrics.is_some());
    }
}
