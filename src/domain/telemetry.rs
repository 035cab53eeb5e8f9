// Telemetry value and snapshot domain models
use chrono::{DateTime, TimeZone, Timelike};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

pub const TIMESTAMP_FIELDS: [&str; 5] = [
    "tstamp_unix",
    "tstamp_hr",
    "tstamp_mn",
    "tstamp_sc",
    "tstamp_ms",
];

/// A single signal reading.
///
/// Numeric readings carry their magnitude together with the rule used to
/// present them, so consumers never have to guess whether a field is a number
/// or pre-formatted text. `Text` holds raw string input from outside the
/// generator and is parsed on demand.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalValue {
    Number(f64),
    Fixed { value: f64, decimals: u8 },
    Text(String),
    Bool(bool),
}

impl SignalValue {
    pub fn fixed(value: f64, decimals: u8) -> Self {
        Self::Fixed { value, decimals }
    }

    /// Numeric magnitude, the way a numeric comparison sees it.
    /// Booleans have no magnitude; text is parsed by its leading number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) | Self::Fixed { value: v, .. } => Some(*v),
            Self::Text(s) => parse_leading_float(s),
            Self::Bool(_) => None,
        }
    }

    /// 0/1 state used when comparing against a bool signal's expected value.
    pub fn as_state(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            other => other.as_f64(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(v) | Self::Fixed { value: v, .. } => *v != 0.0 && !v.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{}", v),
            Self::Fixed { value, decimals } => write!(f, "{:.*}", *decimals as usize, value),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for SignalValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for SignalValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for SignalValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

// Fixed values go out as display strings ("42.00"), plain numbers as numbers.
impl Serialize for SignalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(v) => serializer.serialize_f64(*v),
            Self::Fixed { .. } => serializer.collect_str(self),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

/// Parse the longest leading decimal number of `s`, ignoring leading whitespace.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].replace("Infinity", "inf").parse().ok();
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotTimestamp {
    pub unix_ms: i64,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl SnapshotTimestamp {
    pub fn from_datetime<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self {
            unix_ms: now.timestamp_millis(),
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
            // leap seconds report nanoseconds past 1_000_000_000
            millisecond: (now.nanosecond() / 1_000_000).min(999),
        }
    }
}

/// One complete reading of every catalog signal, captured at a single instant.
///
/// Readings keep the order they were supplied in (catalog display order for
/// generated snapshots), and serialize in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    values: Vec<(String, SignalValue)>,
    timestamp: SnapshotTimestamp,
}

impl TelemetrySnapshot {
    /// A repeated name overwrites the earlier reading in place.
    pub fn new<I>(values: I, timestamp: SnapshotTimestamp) -> Self
    where
        I: IntoIterator<Item = (String, SignalValue)>,
    {
        let mut ordered: Vec<(String, SignalValue)> = Vec::new();
        for (name, value) in values {
            match ordered.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = value,
                None => ordered.push((name, value)),
            }
        }
        Self {
            values: ordered,
            timestamp,
        }
    }

    pub fn get(&self, signal: &str) -> Option<&SignalValue> {
        self.values
            .iter()
            .find(|(name, _)| name == signal)
            .map(|(_, value)| value)
    }

    pub fn timestamp(&self) -> SnapshotTimestamp {
        self.timestamp
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

// Flat object: one key per signal plus the five tstamp_* fields.
impl Serialize for TelemetrySnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + TIMESTAMP_FIELDS.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        let ts = &self.timestamp;
        map.serialize_entry(TIMESTAMP_FIELDS[0], &ts.unix_ms)?;
        map.serialize_entry(TIMESTAMP_FIELDS[1], &ts.hour)?;
        map.serialize_entry(TIMESTAMP_FIELDS[2], &ts.minute)?;
        map.serialize_entry(TIMESTAMP_FIELDS[3], &ts.second)?;
        map.serialize_entry(TIMESTAMP_FIELDS[4], &ts.millisecond)?;
        map.end()
    }
}
