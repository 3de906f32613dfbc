//! Data layer for MeetingFlow.
//!
//! Reads calendar events and role assignments from JSON files, aggregates
//! per-meeting costs into window summaries, derives insights and runs the
//! top-level analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod insights;
pub mod reader;

pub use meetingflow_core as core;
