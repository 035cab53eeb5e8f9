// Signal definition domain models
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    #[default]
    Continuous,
    Bool,
}

/// Valid operating range of a continuous signal.
///
/// For bool signals the pair encodes the expected steady state instead:
/// `min == max` pins the expected 0/1 value, anything else disables the check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRange {
    pub min: f64,
    pub max: f64,
}

impl SignalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn expected_state(&self) -> Option<f64> {
        if self.min == self.max {
            Some(self.min)
        } else {
            None
        }
    }
}

// Serialized as `[min, max]`
impl Serialize for SignalRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.min, self.max].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SignalRange {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [min, max] = <[f64; 2]>::deserialize(deserializer)?;
        Ok(Self { min, max })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDefinition {
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub range: SignalRange,
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: SignalKind,
}

impl SignalDefinition {
    pub fn continuous(name: &str, unit: &str, min: f64, max: f64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            range: SignalRange::new(min, max),
            description: description.to_string(),
            kind: SignalKind::Continuous,
        }
    }

    pub fn boolean(name: &str, min: f64, max: f64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            unit: String::new(),
            range: SignalRange::new(min, max),
            description: description.to_string(),
            kind: SignalKind::Bool,
        }
    }

    pub fn is_bool(&self) -> bool {
        self.kind == SignalKind::Bool
    }

    /// Case-insensitive substring match on name, description or unit.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self.description.to_lowercase().contains(&q)
            || self.unit.to_lowercase().contains(&q)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub signals: Vec<SignalDefinition>,
}

impl Category {
    pub fn new(name: &str, icon: &str, color: &str, signals: Vec<SignalDefinition>) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            signals,
        }
    }

    pub fn signal(&self, name: &str) -> Option<&SignalDefinition> {
        self.signals.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_state() {
        assert_eq!(SignalRange::new(1.0, 1.0).expected_state(), Some(1.0));
        assert_eq!(SignalRange::new(0.0, 0.0).expected_state(), Some(0.0));
        assert_eq!(SignalRange::new(0.0, 1.0).expected_state(), None);
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = SignalRange::new(-24.4, 48.8);
        assert!(range.contains(-24.4));
        assert!(range.contains(48.8));
        assert!(!range.contains(48.81));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn test_matches_query() {
        let signal = SignalDefinition::continuous("pack_temp", "°C", 0.0, 55.0, "Pack Temperature");
        assert!(signal.matches_query(""));
        assert!(signal.matches_query("PACK"));
        assert!(signal.matches_query("temperature"));
        assert!(signal.matches_query("°c"));
        assert!(!signal.matches_query("voltage"));
    }

    #[test]
    fn test_signal_kind_defaults_to_continuous() {
        let signal: SignalDefinition = toml::from_str(
            r#"
            name = "speed"
            unit = "mph"
            range = [0.0, 100.0]
            description = "Vehicle Speed"
            "#,
        )
        .unwrap();
        assert_eq!(signal.kind, SignalKind::Continuous);
        assert_eq!(signal.range, SignalRange::new(0.0, 100.0));

        let signal: SignalDefinition = toml::from_str(
            r#"
            name = "eco"
            range = [0, 1]
            description = "Eco Mode"
            type = "bool"
            "#,
        )
        .unwrap();
        assert!(signal.is_bool());
        assert_eq!(signal.unit, "");
    }
}
