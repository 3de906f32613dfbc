use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone as _, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

/// Date-key format used for day buckets (`"2024-01-15"`).
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Resolve the `"auto"` sentinel to the system timezone; any other value is
/// returned unchanged.
pub fn resolve_timezone_name(name: &str) -> String {
    if name.eq_ignore_ascii_case("auto") {
        get_system_timezone()
    } else {
        name.to_string()
    }
}

/// Validate that `tz_name` is a recognised IANA timezone identifier.
pub fn validate_timezone(tz_name: &str) -> bool {
    tz_name.parse::<Tz>().is_ok()
}

/// UTC calendar-day key for an instant.
pub fn day_key(instant: DateTime<Utc>) -> String {
    instant.format(DAY_KEY_FORMAT).to_string()
}

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Parses event timestamps into UTC instants.
///
/// Strings carrying an offset are exact. Naive date-times and date-only
/// values (all-day events) are interpreted in the parser's default timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampParser {
    default_tz: Tz,
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::utc()
    }
}

impl TimestampParser {
    /// Parser whose naive timestamps are read as UTC.
    pub fn utc() -> Self {
        Self { default_tz: Tz::UTC }
    }

    /// Create a parser for the given IANA timezone name (`"auto"` resolves
    /// to the system zone).
    ///
    /// Unrecognised names fall back to UTC with a warning.
    pub fn new(tz_name: &str) -> Self {
        let resolved = resolve_timezone_name(tz_name);
        let tz = resolved.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimestampParser: unrecognised timezone \"{}\", falling back to UTC",
                resolved
            );
            Tz::UTC
        });
        Self { default_tz: tz }
    }

    /// The timezone used for naive timestamps.
    pub fn default_tz(&self) -> Tz {
        self.default_tz
    }

    /// Parse `s` into a UTC instant, or `None` when it is not a timestamp.
    pub fn parse(&self, s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }

        // Minute precision with an offset, e.g. "2024-01-15T10:00Z".
        let offset_form = match s.strip_suffix(['Z', 'z']) {
            Some(head) => format!("{head}+00:00"),
            None => s.to_string(),
        };
        for fmt in ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"] {
            if let Ok(dt) = DateTime::parse_from_str(&offset_form, fmt) {
                return Some(dt.with_timezone(&Utc));
            }
        }

        const NAIVE_FMTS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
        ];
        for fmt in NAIVE_FMTS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return self.localize(naive);
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, DAY_KEY_FORMAT) {
            return self.localize(date.and_hms_opt(0, 0, 0)?);
        }

        debug!("TimestampParser: could not parse timestamp \"{}\"", s);
        None
    }

    /// Attach the default timezone; ambiguous local times take the earlier
    /// instant, non-existent ones (DST gaps) are rejected.
    fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.default_tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
