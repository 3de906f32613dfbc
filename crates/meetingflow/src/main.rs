mod bootstrap;
mod report;

use std::collections::HashMap;

use anyhow::{Context, Result};
use meetingflow_core::cost::CostCalculator;
use meetingflow_core::rates::RoleRateTable;
use meetingflow_core::settings::Settings;
use meetingflow_core::time_utils::TimestampParser;
use meetingflow_data::analysis::{analyze, people_without_role, AnalyzeRequest};
use meetingflow_data::reader::{load_events, load_rate_overrides, load_role_assignment};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();
    settings.validate()?;

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("MeetingFlow v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Plan: {}, Format: {}, Timezone: {}",
        settings.plan,
        settings.format,
        settings.timezone
    );

    let plan = settings.plan_type()?;

    let overrides = match &settings.rates {
        Some(path) => load_rate_overrides(path)?,
        None => HashMap::new(),
    };
    let rates = RoleRateTable::with_overrides(overrides, &settings.default_role)?;
    tracing::info!(
        "Unassigned attendees billed as {} at ${}/h",
        rates.default_role(),
        rates.default_rate()
    );
    let timestamps = TimestampParser::new(&settings.timezone);
    tracing::debug!("Timestamps without an offset are read in {}", timestamps.default_tz());
    let calculator = CostCalculator::new(rates, timestamps);

    let events_path = settings
        .events
        .clone()
        .or_else(bootstrap::discover_events_path)
        .context("no events input: pass --events or create ~/.meetingflow/events.json")?;
    tracing::info!("Reading events from {}", events_path.display());

    let mut request = AnalyzeRequest::from(load_events(&events_path)?);
    if let Some(path) = &settings.roles {
        // Roles from --roles win over ones embedded in the events payload.
        request
            .roles
            .get_or_insert_with(HashMap::new)
            .extend(load_role_assignment(path)?);
    }
    if settings.days.is_some() {
        request.days = settings.days;
    }

    let report = analyze(&request, plan, &calculator);

    match settings.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            let missing = people_without_role(&request.events, request.roles.as_ref()).len();
            print!(
                "{}",
                report::render_text(&report, settings.top_insights, missing)
            );
        }
    }

    // Persist only after a successful run.
    if let Err(e) = settings.save_last_used() {
        tracing::warn!("Could not persist last-used settings: {}", e);
    }

    Ok(())
}
