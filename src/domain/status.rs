// Signal evaluation - display formatting and status classification
use super::catalog::Catalog;
use super::signal::SignalDefinition;
use super::telemetry::{SignalValue, TelemetrySnapshot};
use serde::Serialize;
use std::fmt;

/// Fraction of the range width, measured in from each end, that counts as the warning band.
pub const WARNING_BAND: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTier {
    Normal,
    Warning,
    Critical,
}

impl StatusTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownReason {
    UnknownSignal,
    MissingValue,
    NotNumeric,
}

/// Outcome of evaluating a reading, keeping "could not evaluate" apart from a real tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Unknown(UnknownReason),
    Status(StatusTier),
}

impl Evaluation {
    /// Unknown readings display as normal.
    pub fn tier(self) -> StatusTier {
        match self {
            Self::Status(tier) => tier,
            Self::Unknown(_) => StatusTier::Normal,
        }
    }
}

/// Result of formatting a reading for display.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayValue {
    /// The signal is not in the catalog; the input comes back untouched.
    Raw(Option<SignalValue>),
    /// A numeric signal with no reading. Only the unit suffix remains.
    Missing { unit: String },
    Formatted(String),
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(Some(value)) => write!(f, "{}", value),
            Self::Raw(None) => Ok(()),
            Self::Missing { unit } => f.write_str(unit),
            Self::Formatted(text) => f.write_str(text),
        }
    }
}

// Absent readings serialize as null; the unit travels on the tile.
impl Serialize for DisplayValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Raw(Some(value)) => value.serialize(serializer),
            Self::Raw(None) | Self::Missing { .. } => serializer.serialize_none(),
            Self::Formatted(text) => serializer.serialize_str(text),
        }
    }
}

fn lookup<'a>(catalog: &'a Catalog, signal: &str, category: &str) -> Option<&'a SignalDefinition> {
    let definition = catalog.signal_definition(category, signal);
    if definition.is_none() {
        tracing::debug!(signal, category, "signal not found in catalog");
    }
    definition
}

pub fn format_display_value(
    catalog: &Catalog,
    signal: &str,
    value: Option<&SignalValue>,
    category: &str,
) -> DisplayValue {
    let Some(definition) = lookup(catalog, signal, category) else {
        return DisplayValue::Raw(value.cloned());
    };

    if definition.is_bool() {
        let on = value.is_some_and(SignalValue::is_truthy);
        return DisplayValue::Formatted(if on { "ON" } else { "OFF" }.to_string());
    }

    match value {
        Some(value) => DisplayValue::Formatted(format!("{}{}", value, definition.unit)),
        None => DisplayValue::Missing {
            unit: definition.unit.clone(),
        },
    }
}

pub fn evaluate(
    catalog: &Catalog,
    signal: &str,
    value: Option<&SignalValue>,
    category: &str,
) -> Evaluation {
    let Some(definition) = lookup(catalog, signal, category) else {
        return Evaluation::Unknown(UnknownReason::UnknownSignal);
    };
    let Some(value) = value else {
        return Evaluation::Unknown(UnknownReason::MissingValue);
    };

    let range = definition.range;

    if definition.is_bool() {
        return match range.expected_state() {
            Some(expected) if value.as_state() != Some(expected) => {
                Evaluation::Status(StatusTier::Warning)
            }
            _ => Evaluation::Status(StatusTier::Normal),
        };
    }

    let number = match value.as_f64() {
        Some(n) if !n.is_nan() => n,
        _ => return Evaluation::Unknown(UnknownReason::NotNumeric),
    };

    if !range.contains(number) {
        return Evaluation::Status(StatusTier::Critical);
    }

    let band = range.width() * WARNING_BAND;
    if number < range.min + band || number > range.max - band {
        return Evaluation::Status(StatusTier::Warning);
    }

    Evaluation::Status(StatusTier::Normal)
}

pub fn classify_status(
    catalog: &Catalog,
    signal: &str,
    value: Option<&SignalValue>,
    category: &str,
) -> StatusTier {
    evaluate(catalog, signal, value, category).tier()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryHealth {
    pub category: String,
    pub total: usize,
    pub warnings: usize,
    pub critical: usize,
    pub health_score: u32,
    pub status: StatusTier,
}

/// Summarize how many of a category's signals are off-nominal in `snapshot`.
/// Signals without a reading count as healthy.
pub fn category_health(
    catalog: &Catalog,
    category: &str,
    snapshot: &TelemetrySnapshot,
) -> Option<CategoryHealth> {
    let signals = catalog.signals(category)?;

    let mut warnings = 0;
    let mut critical = 0;
    for definition in signals {
        let Some(value) = snapshot.get(&definition.name) else {
            continue;
        };
        match classify_status(catalog, &definition.name, Some(value), category) {
            StatusTier::Critical => critical += 1,
            StatusTier::Warning => warnings += 1,
            StatusTier::Normal => {}
        }
    }

    let total = signals.len();
    let health_score = if total == 0 {
        100
    } else {
        (((total - critical - warnings) as f64 / total as f64) * 100.0).round() as u32
    };
    let status = if critical > 0 {
        StatusTier::Critical
    } else if warnings > 0 {
        StatusTier::Warning
    } else {
        StatusTier::Normal
    };

    Some(CategoryHealth {
        category: category.to_string(),
        total,
        warnings,
        critical,
        health_score,
        status,
    })
}

/// Battery protection fault fields, in report order.
pub const BPS_FAULT_SIGNALS: [&str; 14] = [
    "bps_fault",
    "voltage_failsafe",
    "current_failsafe",
    "relay_failsafe",
    "charge_interlock_failsafe",
    "input_power_supply_failsafe",
    "discharge_limit_enforcement_fault",
    "charger_safety_relay_fault",
    "internal_hardware_fault",
    "internal_software_fault",
    "highest_cell_voltage_too_high_fault",
    "lowest_cell_voltage_too_low_fault",
    "pack_too_hot_fault",
    "high_voltage_interlock_signal_fault",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveFault {
    pub name: String,
    pub label: String,
}

/// Fault fields whose reading is boolean `true`.
pub fn active_faults(snapshot: &TelemetrySnapshot) -> Vec<ActiveFault> {
    BPS_FAULT_SIGNALS
        .iter()
        .filter(|name| matches!(snapshot.get(name), Some(SignalValue::Bool(true))))
        .map(|name| ActiveFault {
            name: name.to_string(),
            label: title_case(name),
        })
        .collect()
}

/// Boolean fields that raise a critical alert when `true`, with their alert text.
pub const CRITICAL_ALERT_FIELDS: [(&str, &str); 13] = [
    ("driver_eStop", "Driver Emergency Stop Activated"),
    ("observer_eStop", "Observer Emergency Stop Activated"),
    ("crash", "Crash Detection System Triggered"),
    ("bps_fault", "Battery Protection System Fault"),
    ("voltage_failsafe", "Voltage Failsafe Activated"),
    ("current_failsafe", "Current Failsafe Activated"),
    ("relay_failsafe", "Relay Failsafe Activated"),
    ("internal_hardware_fault", "Internal Hardware Fault"),
    ("internal_software_fault", "Internal Software Fault"),
    ("highest_cell_voltage_too_high_fault", "Cell Voltage Too High"),
    ("lowest_cell_voltage_too_low_fault", "Cell Voltage Too Low"),
    ("pack_too_hot_fault", "Battery Pack Overheating"),
    ("high_voltage_interlock_signal_fault", "HV Interlock Fault"),
];

pub const PACK_TEMP_ALERT_ABOVE: f64 = 50.0;
pub const MOTOR_TEMP_ALERT_ABOVE: f64 = 80.0;
pub const LOW_BATTERY_BELOW: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub name: String,
    pub description: String,
    pub severity: StatusTier,
}

impl Alert {
    fn new(name: &str, description: impl Into<String>, severity: StatusTier) -> Self {
        Self {
            name: name.to_string(),
            description: description.into(),
            severity,
        }
    }
}

/// Vehicle-wide alerts raised by `snapshot`: tripped safety flags first,
/// then temperature and charge thresholds, then the high voltage check.
///
/// Thresholds are strict, so a reading sitting exactly on one raises nothing.
/// Readings without a numeric magnitude are skipped.
pub fn critical_alerts(snapshot: &TelemetrySnapshot) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = CRITICAL_ALERT_FIELDS
        .iter()
        .filter(|(name, _)| matches!(snapshot.get(name), Some(SignalValue::Bool(true))))
        .map(|(name, description)| Alert::new(name, *description, StatusTier::Critical))
        .collect();

    if let Some((value, temp)) = numeric_reading(snapshot, "pack_temp") {
        if temp > PACK_TEMP_ALERT_ABOVE {
            alerts.push(Alert::new(
                "pack_temp_high",
                format!("Battery Temperature High ({}°C)", value),
                StatusTier::Warning,
            ));
        }
    }

    if let Some((value, temp)) = numeric_reading(snapshot, "motor_temp") {
        if temp > MOTOR_TEMP_ALERT_ABOVE {
            alerts.push(Alert::new(
                "motor_temp_high",
                format!("Motor Temperature High ({}°C)", value),
                StatusTier::Warning,
            ));
        }
    }

    if let Some((value, soc)) = numeric_reading(snapshot, "soc") {
        if soc < LOW_BATTERY_BELOW {
            alerts.push(Alert::new(
                "low_battery",
                format!("Low Battery Level ({}%)", value),
                StatusTier::Warning,
            ));
        }
    }

    let disabled = |name: &str| matches!(snapshot.get(name), Some(SignalValue::Bool(false)));
    if disabled("discharge_enabled") && disabled("charge_enabled") {
        alerts.push(Alert::new(
            "hv_system_disabled",
            "High Voltage System Disabled",
            StatusTier::Critical,
        ));
    }

    alerts
}

fn numeric_reading<'a>(snapshot: &'a TelemetrySnapshot, name: &str) -> Option<(&'a SignalValue, f64)> {
    let value = snapshot.get(name)?;
    let number = value.as_f64().filter(|n| !n.is_nan())?;
    Some((value, number))
}

// "bps_fault" -> "Bps Fault"
fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
