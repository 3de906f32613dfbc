//! Loading events, role assignments and rate overrides from JSON files.
//!
//! An events file is either a JSON array of events or an analyze payload
//! object (`{"events": [...], "roleByPersonEmail": {...}, "days": n}`). A
//! directory is scanned recursively for `*.json` files and their contents are
//! concatenated in path order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use meetingflow_core::error::{MeetingFlowError, Result};
use meetingflow_core::models::{CalendarEvent, RoleAssignment};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

// ── Event shapes ──────────────────────────────────────────────────────────────

/// Start or end of a provider event: a timed `dateTime` or an all-day `date`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderTime {
    date_time: Option<String>,
    date: Option<String>,
}

impl ProviderTime {
    fn into_timestamp(self) -> Option<String> {
        self.date_time.or(self.date).filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderAttendee {
    email: Option<String>,
}

/// Event as returned by calendar providers.
#[derive(Debug, Deserialize)]
struct ProviderEvent {
    start: Option<ProviderTime>,
    end: Option<ProviderTime>,
    #[serde(default)]
    attendees: Vec<ProviderAttendee>,
}

/// Either a flat [`CalendarEvent`] or a provider-shaped event.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEvent {
    Flat(CalendarEvent),
    Provider(ProviderEvent),
}

impl RawEvent {
    /// Normalise into a [`CalendarEvent`]; provider events without both
    /// times are dropped.
    fn into_event(self) -> Option<CalendarEvent> {
        match self {
            RawEvent::Flat(event) => Some(event),
            RawEvent::Provider(event) => {
                let start = event.start.and_then(ProviderTime::into_timestamp)?;
                let end = event.end.and_then(ProviderTime::into_timestamp)?;
                let attendees = event
                    .attendees
                    .into_iter()
                    .filter_map(|a| a.email)
                    .map(|email| email.trim().to_string())
                    .filter(|email| !email.is_empty());
                Some(CalendarEvent::new(start, end, attendees))
            }
        }
    }
}

// ── EventInput ────────────────────────────────────────────────────────────────

/// Everything read from one or more events files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventInput {
    pub events: Vec<CalendarEvent>,
    /// Role assignments embedded in analyze payloads.
    pub roles: Option<RoleAssignment>,
    /// Window length requested by an analyze payload (already floored).
    pub days: Option<f64>,
}

impl EventInput {
    /// Append `other`; embedded roles are merged (later files win) and the
    /// first requested window is kept.
    fn extend(&mut self, other: EventInput) {
        self.events.extend(other.events);
        if let Some(roles) = other.roles {
            self.roles.get_or_insert_with(HashMap::new).extend(roles);
        }
        if self.days.is_none() {
            self.days = other.days;
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.json` files recursively under `dir`, sorted by path.
pub fn find_json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "json")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load events from a file or a directory of JSON files.
pub fn load_events(path: &Path) -> Result<EventInput> {
    if !path.exists() {
        return Err(MeetingFlowError::InputPathNotFound(path.to_path_buf()));
    }

    if !path.is_dir() {
        return parse_events_document(read_json(path)?);
    }

    let files = find_json_files(path);
    if files.is_empty() {
        return Err(MeetingFlowError::NoInputFiles(path.to_path_buf()));
    }

    let mut input = EventInput::default();
    for file in &files {
        input.extend(parse_events_document(read_json(file)?)?);
    }
    debug!(
        "Loaded {} events from {} files under {}",
        input.events.len(),
        files.len(),
        path.display()
    );
    Ok(input)
}

/// Interpret a parsed events document.
pub fn parse_events_document(document: Value) -> Result<EventInput> {
    match document {
        Value::Array(items) => {
            let total = items.len();
            let raw: Vec<RawEvent> = serde_json::from_value(Value::Array(items))?;
            let events: Vec<CalendarEvent> =
                raw.into_iter().filter_map(RawEvent::into_event).collect();
            if events.len() < total {
                warn!(
                    "Dropped {} provider events without start/end times",
                    total - events.len()
                );
            }
            Ok(EventInput {
                events,
                roles: None,
                days: None,
            })
        }
        Value::Object(_) => parse_analyze_payload(&document),
        _ => Err(MeetingFlowError::InvalidPayload(
            "expected an array of events or an object with an events array".to_string(),
        )),
    }
}

/// Strictly validate an analyze payload.
///
/// `events` must be an array of `{ start: string, end: string, attendees:
/// string[] }`; `roleByPersonEmail`, when present and not null, must be an
/// object (non-string roles are ignored); a finite numeric `days` is floored,
/// anything else is ignored.
pub fn parse_analyze_payload(payload: &Value) -> Result<EventInput> {
    let events = payload
        .get("events")
        .and_then(Value::as_array)
        .and_then(|items| items.iter().map(strict_event).collect::<Option<Vec<_>>>())
        .ok_or_else(|| {
            MeetingFlowError::InvalidPayload(
                "events must be an array of { start: string, end: string, attendees: string[] }"
                    .to_string(),
            )
        })?;

    let roles = match payload.get("roleByPersonEmail") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(
            map.iter()
                .filter_map(|(email, role)| Some((email.clone(), role.as_str()?.to_string())))
                .collect::<RoleAssignment>(),
        ),
        Some(_) => {
            return Err(MeetingFlowError::InvalidPayload(
                "roleByPersonEmail must be an object of email -> role".to_string(),
            ))
        }
    };

    let days = payload
        .get("days")
        .and_then(Value::as_f64)
        .filter(|d| d.is_finite())
        .map(f64::floor);

    Ok(EventInput {
        events,
        roles,
        days,
    })
}

/// Load an email → role mapping from a JSON object file.
pub fn load_role_assignment(path: &Path) -> Result<RoleAssignment> {
    let value = read_json(path)?;
    if !value.is_object() {
        return Err(MeetingFlowError::InvalidPayload(format!(
            "{}: role assignments must be a JSON object of email -> role",
            path.display()
        )));
    }
    Ok(serde_json::from_value(value)?)
}

/// Load role → hourly rate overrides from a JSON object file.
pub fn load_rate_overrides(path: &Path) -> Result<HashMap<String, f64>> {
    let value = read_json(path)?;
    if !value.is_object() {
        return Err(MeetingFlowError::InvalidPayload(format!(
            "{}: rates must be a JSON object of role -> hourly rate",
            path.display()
        )));
    }
    Ok(serde_json::from_value(value)?)
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| MeetingFlowError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn strict_event(item: &Value) -> Option<CalendarEvent> {
    let start = item.get("start")?.as_str()?;
    let end = item.get("end")?.as_str()?;
    let attendees = item
        .get("attendees")?
        .as_array()?
        .iter()
        .map(|a| a.as_str().map(str::to_string))
        .collect::<Option<Vec<String>>>()?;
    Some(CalendarEvent {
        start: start.to_string(),
        end: end.to_string(),
        attendees,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    // ── parse_events_document: arrays ────────────────────────────────────────

    #[test]
    fn test_flat_event_array() {
        let input = parse_events_document(json!([
            {"start": "2024-01-15T10:00:00Z", "end": "2024-01-15T11:00:00Z", "attendees": ["a@x.com"]},
            {"start": "2024-01-16T10:00:00Z", "end": "2024-01-16T11:00:00Z"}
        ]))
        .unwrap();
        assert_eq!(input.events.len(), 2);
        assert_eq!(input.events[0].attendees, vec!["a@x.com"]);
        assert!(input.events[1].attendees.is_empty());
        assert!(input.roles.is_none());
    }

    #[test]
    fn test_provider_event_array() {
        let input = parse_events_document(json!([
            {
                "start": {"dateTime": "2024-01-15T10:00:00+01:00"},
                "end": {"dateTime": "2024-01-15T11:00:00+01:00"},
                "attendees": [{"email": " a@x.com "}, {"displayName": "Room"}, {"email": ""}]
            },
            {
                "start": {"date": "2024-01-16"},
                "end": {"date": "2024-01-17"}
            }
        ]))
        .unwrap();
        assert_eq!(input.events.len(), 2);
        assert_eq!(input.events[0].start, "2024-01-15T10:00:00+01:00");
        assert_eq!(input.events[0].attendees, vec!["a@x.com"]);
        assert_eq!(input.events[1].start, "2024-01-16");
    }

    #[test]
    fn test_provider_event_without_times_is_dropped() {
        let input = parse_events_document(json!([
            {"start": {}, "end": {"dateTime": "2024-01-15T11:00:00Z"}},
            {"summary": "no times at all"}
        ]))
        .unwrap();
        assert!(input.events.is_empty());
    }

    #[test]
    fn test_scalar_document_rejected() {
        assert!(matches!(
            parse_events_document(json!(42)),
            Err(MeetingFlowError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_array_with_malformed_item_rejected() {
        assert!(parse_events_document(json!([{"start": 5, "end": "x"}])).is_err());
    }

    // ── parse_analyze_payload ────────────────────────────────────────────────

    #[test]
    fn test_payload_with_roles_and_days() {
        let input = parse_events_document(json!({
            "days": 14.7,
            "events": [{"start": "2024-01-15T10:00:00Z", "end": "2024-01-15T11:00:00Z", "attendees": ["a@x.com"]}],
            "roleByPersonEmail": {"a@x.com": "manager", "b@x.com": 3}
        }))
        .unwrap();
        assert_eq!(input.events.len(), 1);
        assert_eq!(input.days, Some(14.0));
        let roles = input.roles.unwrap();
        assert_eq!(roles.get("a@x.com").map(String::as_str), Some("manager"));
        assert!(!roles.contains_key("b@x.com"));
    }

    #[test]
    fn test_payload_null_roles_and_bad_days_ignored() {
        let input = parse_analyze_payload(&json!({
            "events": [],
            "roleByPersonEmail": null,
            "days": "thirty"
        }))
        .unwrap();
        assert!(input.events.is_empty());
        assert!(input.roles.is_none());
        assert!(input.days.is_none());
    }

    #[test]
    fn test_payload_requires_events_array() {
        let err = parse_analyze_payload(&json!({"events": "nope"})).unwrap_err();
        assert!(err.to_string().contains("events must be an array"));
        assert!(parse_analyze_payload(&json!({})).is_err());
    }

    #[test]
    fn test_payload_rejects_non_string_attendee() {
        let payload = json!({"events": [
            {"start": "2024-01-15T10:00:00Z", "end": "2024-01-15T11:00:00Z", "attendees": ["a@x.com", 7]}
        ]});
        assert!(parse_analyze_payload(&payload).is_err());
    }

    #[test]
    fn test_payload_rejects_missing_attendees() {
        let payload = json!({"events": [
            {"start": "2024-01-15T10:00:00Z", "end": "2024-01-15T11:00:00Z"}
        ]});
        assert!(parse_analyze_payload(&payload).is_err());
    }

    #[test]
    fn test_payload_rejects_array_roles() {
        let payload = json!({"events": [], "roleByPersonEmail": ["a@x.com"]});
        let err = parse_analyze_payload(&payload).unwrap_err();
        assert!(err.to_string().contains("roleByPersonEmail"));
    }

    // ── load_events ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_events_missing_path() {
        let tmp = TempDir::new().unwrap();
        let err = load_events(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, MeetingFlowError::InputPathNotFound(_)));
    }

    #[test]
    fn test_load_events_single_file() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "events.json",
            r#"[{"start":"2024-01-15T10:00:00Z","end":"2024-01-15T11:00:00Z","attendees":[]}]"#,
        );
        assert_eq!(load_events(&path).unwrap().events.len(), 1);
    }

    #[test]
    fn test_load_events_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "events.json", "{not json");
        assert!(matches!(
            load_events(&path),
            Err(MeetingFlowError::JsonParse(_))
        ));
    }

    #[test]
    fn test_load_events_directory_concatenates_in_path_order() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "b/second.json",
            r#"{"days": 7, "events": [{"start":"2024-01-16T10:00:00Z","end":"2024-01-16T11:00:00Z","attendees":["b@x.com"]}], "roleByPersonEmail": {"b@x.com": "sales"}}"#,
        );
        write(
            tmp.path(),
            "a.json",
            r#"[{"start":"2024-01-15T10:00:00Z","end":"2024-01-15T11:00:00Z","attendees":["a@x.com"]}]"#,
        );
        write(tmp.path(), "notes.txt", "ignored");

        let input = load_events(tmp.path()).unwrap();
        assert_eq!(input.events.len(), 2);
        assert_eq!(input.events[0].attendees, vec!["a@x.com"]);
        assert_eq!(input.events[1].attendees, vec!["b@x.com"]);
        assert_eq!(input.days, Some(7.0));
        assert_eq!(
            input.roles.unwrap().get("b@x.com").map(String::as_str),
            Some("sales")
        );
    }

    #[test]
    fn test_load_events_empty_directory() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_events(tmp.path()),
            Err(MeetingFlowError::NoInputFiles(_))
        ));
    }

    // ── Role and rate files ──────────────────────────────────────────────────

    #[test]
    fn test_load_role_assignment() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "roles.json",
            r#"{"a@x.com": "Director", "b@x.com": "intern"}"#,
        );
        let roles = load_role_assignment(&path).unwrap();
        assert_eq!(roles.len(), 2);
        assert_eq!(roles["a@x.com"], "Director");
    }

    #[test]
    fn test_load_role_assignment_rejects_array() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "roles.json", r#"["a@x.com"]"#);
        assert!(matches!(
            load_role_assignment(&path),
            Err(MeetingFlowError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_load_role_assignment_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_role_assignment(&tmp.path().join("roles.json")).unwrap_err();
        assert!(matches!(err, MeetingFlowError::FileRead { .. }));
    }

    #[test]
    fn test_load_rate_overrides() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "rates.json", r#"{"engineer": 95, "contractor": 82.5}"#);
        let rates = load_rate_overrides(&path).unwrap();
        assert_eq!(rates["engineer"], 95.0);
        assert_eq!(rates["contractor"], 82.5);
    }

    #[test]
    fn test_load_rate_overrides_rejects_non_numeric() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "rates.json", r#"{"engineer": "lots"}"#);
        assert!(matches!(
            load_rate_overrides(&path),
            Err(MeetingFlowError::JsonParse(_))
        ));
    }
}
