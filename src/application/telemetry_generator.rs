// Telemetry stream generator - Synthetic sensor readings over a rolling window
use crate::application::random_source::RandomSource;
use crate::domain::sensor::{PREDICTION_MARGIN, SensorReading};
use chrono::{DateTime, Duration, Local, Utc};

/// Probability that predicted RUL drops by one hour on a tick.
const RUL_DECAY_PROBABILITY: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("telemetry window is empty; initialize it before ticking")]
    EmptyWindow,
}

pub struct TelemetryGenerator<R: RandomSource> {
    rng: R,
}

impl<R: RandomSource> TelemetryGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Build `window_size` historical readings spaced one minute apart, the
    /// last one stamped `now`.
    pub fn initialize(&mut self, window_size: usize, now: DateTime<Utc>) -> Vec<SensorReading> {
        (0..window_size)
            .map(|i| {
                let minutes_back = (window_size - 1 - i) as i64;
                let at = now - Duration::minutes(minutes_back);
                let rul = 500 + self.rng.below(100);
                self.sample(at, rul)
            })
            .collect()
    }

    /// Append one reading stamped `now` and evict the oldest. The input is
    /// left untouched.
    pub fn tick(
        &mut self,
        previous: &[SensorReading],
        now: DateTime<Utc>,
    ) -> Result<Vec<SensorReading>, SimulationError> {
        let last = previous.last().ok_or(SimulationError::EmptyWindow)?;

        let rul = if self.rng.chance(RUL_DECAY_PROBABILITY) {
            last.predicted_rul.saturating_sub(1)
        } else {
            last.predicted_rul
        };
        let next = self.sample(now, rul);

        let mut window = Vec::with_capacity(previous.len());
        window.extend_from_slice(&previous[1..]);
        window.push(next);
        Ok(window)
    }

    fn sample(&mut self, at: DateTime<Utc>, predicted_rul: u32) -> SensorReading {
        let rng = &mut self.rng;
        let oee = rng.uniform(89.0, 6.0);

        SensorReading {
            timestamp: display_time(at),
            time_ms: at.timestamp_millis(),
            pressure: rng.uniform(47.0, 6.0),
            temperature: rng.uniform(70.0, 5.0),
            vibration: rng.uniform(2.2, 2.0),
            oee,
            throughput: rng.uniform(450.0, 50.0),
            quality: rng.uniform(98.8, 0.8),
            energy: rng.uniform(25.0, 3.0),
            anomaly_score: rng.uniform(0.0, 0.1),
            predicted_rul,
            ai_confidence: rng.uniform(0.95, 0.03),
            vision_defect_rate: rng.uniform(0.01, 0.015),
            model_drift: rng.uniform(0.01, 0.01),
            prediction_upper: oee + PREDICTION_MARGIN,
            prediction_lower: oee - PREDICTION_MARGIN,
        }
    }
}

/// Most recent reading, or the zeroed reading for an empty window.
pub fn latest(window: &[SensorReading]) -> SensorReading {
    window.last().cloned().unwrap_or_default()
}

fn display_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}
