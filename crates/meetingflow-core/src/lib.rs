//! Core types and pure calculations for MeetingFlow.
//!
//! Holds the meeting data model, the role rate table, the per-event cost
//! calculator, plan tiers, timestamp handling, number formatting and the CLI
//! settings shared by the other crates.

pub mod cost;
pub mod error;
pub mod formatting;
pub mod models;
pub mod plans;
pub mod rates;
pub mod settings;
pub mod time_utils;

pub use cost::CostCalculator;
pub use error::{MeetingFlowError, Result};
pub use models::{
    CalendarEvent, InsightMetrics, InsightOutput, MeetingCostResult, RoleAssignment, SpendByDay,
    WeeklySummary,
};
pub use plans::PlanType;
pub use rates::RoleRateTable;
