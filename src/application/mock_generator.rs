// Mock telemetry generator - stand-in for a live data feed
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::catalog::Catalog;
use crate::domain::signal::{SignalDefinition, SignalRange};
use crate::domain::telemetry::{SignalValue, SnapshotTimestamp, TelemetrySnapshot};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Signals kept as plain numbers for map consumers.
const COORDINATE_SIGNALS: [&str; 2] = ["lat", "lon"];
const COORDINATE_DECIMALS: i32 = 6;
const DISPLAY_DECIMALS: u8 = 2;

/// Sample one value for every catalog signal.
///
/// Bool signals are fair coin flips and ignore their expected state, so the
/// evaluator will routinely flag some of them.
pub fn generate_snapshot<R, Tz>(catalog: &Catalog, rng: &mut R, now: &DateTime<Tz>) -> TelemetrySnapshot
where
    R: Rng + ?Sized,
    Tz: TimeZone,
{
    let timestamp = SnapshotTimestamp::from_datetime(now);

    let values = catalog
        .iter_signals()
        .map(|(_, signal)| (signal.name.clone(), sample(signal, rng)));

    TelemetrySnapshot::new(values, timestamp)
}

fn sample<R: Rng + ?Sized>(signal: &SignalDefinition, rng: &mut R) -> SignalValue {
    if signal.is_bool() {
        return SignalValue::Bool(rng.gen_bool(0.5));
    }

    let range = signal.range;
    let raw = rng.r#gen::<f64>() * range.width() + range.min;

    if COORDINATE_SIGNALS.contains(&signal.name.as_str()) {
        SignalValue::Number(round_within(raw, COORDINATE_DECIMALS, range))
    } else {
        SignalValue::fixed(round_within(raw, DISPLAY_DECIMALS as i32, range), DISPLAY_DECIMALS)
    }
}

// Rounding can step past an endpoint with more decimals than `decimals`.
fn round_within(value: f64, decimals: i32, range: SignalRange) -> f64 {
    let scale = 10f64.powi(decimals);
    ((value * scale).round() / scale).clamp(range.min, range.max)
}

pub struct MockTelemetrySource {
    catalog: Arc<Catalog>,
    rng: Mutex<StdRng>,
}

impl MockTelemetrySource {
    /// A fixed seed makes the generated sequence reproducible.
    pub fn new(catalog: Arc<Catalog>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            catalog,
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl TelemetrySource for MockTelemetrySource {
    async fn next_snapshot(&self) -> anyhow::Result<TelemetrySnapshot> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow::anyhow!("mock generator rng lock poisoned"))?;
        Ok(generate_snapshot(&self.catalog, &mut *rng, &Local::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::Category;
    use crate::domain::solar_car::solar_car_catalog;
    use crate::domain::telemetry::TIMESTAMP_FIELDS;
    use chrono::Utc;
    use proptest::prelude::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 4, 9, 30, 15).unwrap() + chrono::Duration::milliseconds(250)
    }

    #[test]
    fn test_snapshot_covers_every_signal() {
        let catalog = solar_car_catalog().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let snapshot = generate_snapshot(&catalog, &mut rng, &fixed_now());

        assert_eq!(snapshot.len(), catalog.signal_count());
        for (_, signal) in catalog.iter_signals() {
            assert!(snapshot.get(&signal.name).is_some(), "missing {}", signal.name);
        }

        let json = serde_json::to_value(&snapshot).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), catalog.signal_count() + TIMESTAMP_FIELDS.len());
        for field in TIMESTAMP_FIELDS {
            assert!(object.contains_key(field));
        }
    }

    #[test]
    fn test_snapshot_follows_catalog_order() {
        let catalog = solar_car_catalog().unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let text = serde_json::to_string(&generate_snapshot(&catalog, &mut rng, &fixed_now())).unwrap();

        let mut keys: Vec<&str> = catalog.iter_signals().map(|(_, s)| s.name.as_str()).collect();
        keys.extend(TIMESTAMP_FIELDS);
        let positions: Vec<usize> = keys
            .iter()
            .map(|key| text.find(&format!("\"{}\":", key)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_timestamp_captured_once() {
        let catalog = solar_car_catalog().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let snapshot = generate_snapshot(&catalog, &mut rng, &fixed_now());
        let ts = snapshot.timestamp();
        assert_eq!((ts.hour, ts.minute, ts.second, ts.millisecond), (9, 30, 15, 250));
        assert_eq!(ts.unix_ms, fixed_now().timestamp_millis());
    }

    #[test]
    fn test_value_representations() {
        let catalog = solar_car_catalog().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let snapshot = generate_snapshot(&catalog, &mut rng, &fixed_now());

        assert!(matches!(snapshot.get("lat"), Some(SignalValue::Number(_))));
        assert!(matches!(snapshot.get("lon"), Some(SignalValue::Number(_))));
        assert!(matches!(
            snapshot.get("soc"),
            Some(SignalValue::Fixed { decimals: 2, .. })
        ));
        assert!(matches!(snapshot.get("eco"), Some(SignalValue::Bool(_))));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["lat"].is_f64());
        let soc = json["soc"].as_str().unwrap();
        assert_eq!(soc.split('.').nth(1).map(str::len), Some(2));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let catalog = solar_car_catalog().unwrap();
        let a = generate_snapshot(&catalog, &mut StdRng::seed_from_u64(99), &fixed_now());
        let b = generate_snapshot(&catalog, &mut StdRng::seed_from_u64(99), &fixed_now());
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_point_range_always_hits_nominal() {
        let catalog = solar_car_catalog().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let snapshot = generate_snapshot(&catalog, &mut rng, &fixed_now());
            assert_eq!(snapshot.get("pack_amphours"), Some(&SignalValue::fixed(57.0, 2)));
        }
    }

    #[test]
    fn test_bool_signals_take_both_values() {
        let catalog = solar_car_catalog().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = (false, false);
        for _ in 0..64 {
            match generate_snapshot(&catalog, &mut rng, &fixed_now()).get("crash") {
                Some(SignalValue::Bool(true)) => seen.0 = true,
                Some(SignalValue::Bool(false)) => seen.1 = true,
                other => panic!("unexpected crash value {:?}", other),
            }
        }
        assert_eq!(seen, (true, true));
    }

    #[test]
    fn test_rounding_stays_inside_fine_grained_range() {
        let catalog = Catalog::new(vec![Category::new(
            "Fine",
            "f",
            "#000",
            vec![SignalDefinition::continuous("x", "", 0.001, 0.004, "X")],
        )])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let snapshot = generate_snapshot(&catalog, &mut rng, &fixed_now());
            let value = snapshot.get("x").and_then(SignalValue::as_f64).unwrap();
            assert!((0.001..=0.004).contains(&value));
        }
    }

    #[tokio::test]
    async fn test_mock_source_produces_snapshots() {
        let catalog = Arc::new(solar_car_catalog().unwrap());
        let source = MockTelemetrySource::new(catalog.clone(), Some(17));
        let first = source.next_snapshot().await.unwrap();
        let second = source.next_snapshot().await.unwrap();
        assert_eq!(first.len(), catalog.signal_count());
        assert_eq!(second.len(), catalog.signal_count());
    }

    proptest! {
        #[test]
        fn test_continuous_values_within_range(seed in any::<u64>()) {
            let catalog = solar_car_catalog().unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let snapshot = generate_snapshot(&catalog, &mut rng, &fixed_now());

            for (_, signal) in catalog.iter_signals().filter(|(_, s)| !s.is_bool()) {
                let value = snapshot.get(&signal.name).and_then(SignalValue::as_f64);
                prop_assert!(value.is_some(), "{} has no magnitude", signal.name);
                let value = value.unwrap();
                prop_assert!(
                    signal.range.contains(value),
                    "{} = {} outside [{}, {}]",
                    signal.name, value, signal.range.min, signal.range.max
                );
            }
        }
    }
}
