use std::collections::HashMap;

use crate::error::{MeetingFlowError, Result};

/// Role billed when an attendee has no (known) role.
pub const DEFAULT_ROLE: &str = "engineer";

// ── Built-in hourly rates (USD) ───────────────────────────────────────────────

const BUILTIN_RATES: &[(&str, f64)] = &[
    ("executive", 120.0),
    ("director", 95.0),
    ("manager", 75.0),
    ("engineer", 70.0),
    ("designer", 65.0),
    ("product", 70.0),
    ("sales", 55.0),
    ("marketing", 55.0),
    ("finance", 60.0),
    ("hr", 50.0),
    ("support", 35.0),
    ("operations", 50.0),
    ("analyst", 55.0),
    ("intern", 20.0),
];

/// Canonical form of a role name: trimmed and lowercased.
pub fn normalize_role(role: &str) -> String {
    role.trim().to_lowercase()
}

/// Hourly rate per role, with one mandatory default role.
///
/// Built once and passed into the cost calculator; lookups are
/// case-insensitive and unknown roles resolve to the default rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleRateTable {
    rates: HashMap<String, f64>,
    default_role: String,
}

impl Default for RoleRateTable {
    fn default() -> Self {
        Self {
            rates: BUILTIN_RATES
                .iter()
                .map(|(role, rate)| ((*role).to_string(), *rate))
                .collect(),
            default_role: DEFAULT_ROLE.to_string(),
        }
    }
}

impl RoleRateTable {
    /// Build a table from explicit rates.
    ///
    /// Fails when `default_role` has no entry or any rate is negative or not
    /// finite.
    pub fn new(rates: HashMap<String, f64>, default_role: &str) -> Result<Self> {
        let mut normalised = HashMap::with_capacity(rates.len());
        for (role, rate) in rates {
            validate_rate(&role, rate)?;
            normalised.insert(normalize_role(&role), rate);
        }

        let default_role = normalize_role(default_role);
        if !normalised.contains_key(&default_role) {
            return Err(MeetingFlowError::MissingDefaultRole(default_role));
        }

        Ok(Self {
            rates: normalised,
            default_role,
        })
    }

    /// The built-in table with `overrides` merged on top and `default_role`
    /// as the fallback.
    pub fn with_overrides(overrides: HashMap<String, f64>, default_role: &str) -> Result<Self> {
        let mut rates = Self::default().rates;
        for (role, rate) in overrides {
            validate_rate(&role, rate)?;
            rates.insert(normalize_role(&role), rate);
        }
        Self::new(rates, default_role)
    }

    /// Name of the fallback role.
    pub fn default_role(&self) -> &str {
        &self.default_role
    }

    /// Hourly rate of the fallback role.
    pub fn default_rate(&self) -> f64 {
        self.rates.get(&self.default_role).copied().unwrap_or(0.0)
    }

    /// Hourly rate for `role`; `None`, blank and unknown roles get the default.
    pub fn rate_for(&self, role: Option<&str>) -> f64 {
        role.map(normalize_role)
            .filter(|r| !r.is_empty())
            .and_then(|r| self.rates.get(&r).copied())
            .unwrap_or_else(|| self.default_rate())
    }
}

fn validate_rate(role: &str, rate: f64) -> Result<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(MeetingFlowError::InvalidRate {
            role: role.to_string(),
            rate,
        });
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
