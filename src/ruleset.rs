//! Per-activity rules: close date, time limit and what happens when it is exceeded.
//!
//! The backend stores the ruleset as an opaque JSON blob on the activity,
//! sometimes as a JSON string and sometimes as an object. Reads are tolerant:
//! anything missing or malformed falls back to an enabled ruleset with no
//! constraints, so old activities never break the editor.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeExceededPenalty {
    NoTimeLimit,
    CloseActivity,
    DeductScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeductionStrategy {
    Flat,
    Percentage,
}

/// Decoded ruleset. Reading goes through [`Ruleset::from_map`], one key at a
/// time, so a single odd value never costs the rest of the ruleset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ruleset {
    pub enabled: bool,

    /// ISO 8601 date after which the activity no longer accepts attempts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_date_time: Option<String>,

    /// seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_exceeded_penalty: Option<TimeExceededPenalty>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deduction_strategy: Option<DeductionStrategy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_deduction: Option<f64>,

    /// unknown keys, and known keys whose value could not be read, kept
    /// verbatim so they survive a save. Setting a field through
    /// [`Ruleset::update`] drops its raw copy here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self {
            enabled: true,
            close_date_time: None,
            time_limit: None,
            time_exceeded_penalty: None,
            deduction_strategy: None,
            points_deduction: None,
            extra: Map::new(),
        }
    }
}

impl<'de> Deserialize<'de> for Ruleset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(map) => Ok(Ruleset::from_map(map)),
            Value::Null => Ok(Ruleset::default()),
            other => Err(serde::de::Error::custom(format!(
                "expected a ruleset object, got {}",
                other
            ))),
        }
    }
}

/// One field of a ruleset, used to edit it a field at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum RulesetField {
    Enabled(bool),
    CloseDateTime(Option<String>),
    TimeLimit(Option<u32>),
    TimeExceededPenalty(Option<TimeExceededPenalty>),
    DeductionStrategy(Option<DeductionStrategy>),
    PointsDeduction(Option<f64>),
}

impl RulesetField {
    /// JSON key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            RulesetField::Enabled(_) => "enabled",
            RulesetField::CloseDateTime(_) => "closeDateTime",
            RulesetField::TimeLimit(_) => "timeLimit",
            RulesetField::TimeExceededPenalty(_) => "timeExceededPenalty",
            RulesetField::DeductionStrategy(_) => "deductionStrategy",
            RulesetField::PointsDeduction(_) => "pointsDeduction",
        }
    }
}

/// Reads a raw ruleset, which may be absent, a JSON string or an object.
pub fn parse_ruleset(raw: Option<&Value>) -> Ruleset {
    match raw {
        None | Some(Value::Null) => Ruleset::default(),
        Some(Value::String(s)) => Ruleset::from_json(s),
        Some(Value::Object(map)) => Ruleset::from_map(map.clone()),
        Some(other) => {
            tracing::debug!("ignoring ruleset of unexpected shape: {}", other);
            Ruleset::default()
        }
    }
}

impl Ruleset {
    /// Only text that is not a JSON object falls back to the default.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Ruleset::from_map(map),
            Ok(other) => {
                tracing::debug!("ignoring ruleset of unexpected shape: {}", other);
                Ruleset::default()
            }
            Err(e) => {
                tracing::debug!("ignoring malformed ruleset {:?}: {}", raw, e);
                Ruleset::default()
            }
        }
    }

    /// Reads the known keys one by one. A value of the wrong type leaves the
    /// field unset and stays in `extra` as it was.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        // always written back, so an unreadable value is dropped instead of kept
        let enabled = take(&mut map, "enabled", read_flag).unwrap_or(true);
        map.remove("enabled");

        Ruleset {
            enabled,
            close_date_time: take(&mut map, "closeDateTime", |v| v.as_str().map(str::to_string)),
            time_limit: take(&mut map, "timeLimit", read_seconds),
            time_exceeded_penalty: take(&mut map, "timeExceededPenalty", decode),
            deduction_strategy: take(&mut map, "deductionStrategy", decode),
            points_deduction: take(&mut map, "pointsDeduction", Value::as_f64),
            extra: map,
        }
    }

    pub fn to_json(&self) -> String {
        // a struct of plain JSON values always serializes
        serde_json::to_string(self).unwrap_or_else(|_| String::from(r#"{"enabled":true}"#))
    }

    pub fn update(&mut self, field: RulesetField) {
        // a typed value replaces whatever unreadable raw value was kept
        self.extra.remove(field.key());
        match field {
            RulesetField::Enabled(enabled) => self.enabled = enabled,
            RulesetField::CloseDateTime(close) => self.close_date_time = close,
            RulesetField::TimeLimit(limit) => self.time_limit = limit,
            RulesetField::TimeExceededPenalty(penalty) => self.time_exceeded_penalty = penalty,
            RulesetField::DeductionStrategy(strategy) => self.deduction_strategy = strategy,
            RulesetField::PointsDeduction(points) => self.points_deduction = points,
        }
    }

    /// Close date as UTC. Accepts RFC 3339 and zone-less `YYYY-MM-DDTHH:MM[:SS]`,
    /// the latter read as UTC.
    pub fn closes_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.close_date_time.as_deref()?.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }

        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        self.enabled && self.closes_at().is_some_and(|close| close <= now)
    }

    /// Points left after the time-exceeded penalty for an attempt that took
    /// `elapsed_secs`. Never negative.
    pub fn apply_time_penalty(&self, points: f64, elapsed_secs: u32) -> f64 {
        let limit = match self.time_limit {
            Some(limit) if self.enabled => limit,
            _ => return points,
        };
        if elapsed_secs <= limit {
            return points;
        }

        match self.time_exceeded_penalty {
            None | Some(TimeExceededPenalty::NoTimeLimit) => points,
            Some(TimeExceededPenalty::CloseActivity) => 0.0,
            Some(TimeExceededPenalty::DeductScore) => {
                let deduction = self.points_deduction.unwrap_or(0.0);
                let remaining = match self.deduction_strategy {
                    Some(DeductionStrategy::Percentage) => {
                        points * (1.0 - validate_percentage(deduction) / 100.0)
                    }
                    Some(DeductionStrategy::Flat) | None => points - deduction.max(0.0),
                };
                remaining.max(0.0)
            }
        }
    }
}

/// Removes `key` from `map` when `read` understands its value.
fn take<T>(
    map: &mut Map<String, Value>,
    key: &str,
    read: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let value = map.get(key)?;
    if value.is_null() {
        map.remove(key);
        return None;
    }

    let parsed = read(value);
    match parsed {
        Some(_) => {
            map.remove(key);
        }
        None => tracing::debug!("keeping unreadable ruleset field {}: {}", key, value),
    }
    parsed
}

fn decode<T: DeserializeOwned>(value: &Value) -> Option<T> {
    T::deserialize(value).ok()
}

fn read_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whole non-negative seconds, also when sent as `600.0`.
fn read_seconds(value: &Value) -> Option<u32> {
    let seconds = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })?;
    u32::try_from(seconds).ok()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeLimitParts {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

pub fn parse_time_limit_parts(total_seconds: Option<u32>) -> TimeLimitParts {
    let total = total_seconds.unwrap_or(0);
    TimeLimitParts {
        hours: total / 3600,
        minutes: (total % 3600) / 60,
        seconds: total % 60,
    }
}

/// Inverse of [`parse_time_limit_parts`]. A zero total means "no limit" and
/// yields `None`, so it is never sent as an active constraint. Totals past
/// `u32::MAX` seconds saturate.
pub fn convert_to_total_seconds(hours: u32, minutes: u32, seconds: u32) -> Option<u32> {
    let total = u64::from(hours) * 3600 + u64::from(minutes) * 60 + u64::from(seconds);
    if total == 0 {
        None
    } else {
        Some(u32::try_from(total).unwrap_or(u32::MAX))
    }
}

/// Clamps to `[0, 100]`; NaN becomes 0.
pub fn validate_percentage(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
