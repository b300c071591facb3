// Sensor reading domain model
use serde::{Deserialize, Serialize};

/// Half-width of the confidence band drawn around OEE.
pub const PREDICTION_MARGIN: f64 = 1.5;

/// One synthetic measurement point of the plant telemetry stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    /// Display time, `HH:MM` in local time.
    pub timestamp: String,
    /// Epoch milliseconds of the same instant; the chart x-axis.
    pub time_ms: i64,
    pub pressure: f64,
    pub temperature: f64,
    pub vibration: f64,
    pub oee: f64,
    pub throughput: f64,
    pub quality: f64,
    pub energy: f64,
    pub anomaly_score: f64,
    #[serde(rename = "predictedRUL")]
    pub predicted_rul: u32,
    pub ai_confidence: f64,
    pub vision_defect_rate: f64,
    pub model_drift: f64,
    pub prediction_upper: f64,
    pub prediction_lower: f64,
}

impl SensorReading {
    /// Look up a numeric field by its camelCase name.
    pub fn metric(&self, name: &str) -> Option<f64> {
        let value = match name {
            "pressure" => self.pressure,
            "temperature" => self.temperature,
            "vibration" => self.vibration,
            "oee" => self.oee,
            "throughput" => self.throughput,
            "quality" => self.quality,
            "energy" => self.energy,
            "anomalyScore" => self.anomaly_score,
            "predictedRUL" => f64::from(self.predicted_rul),
            "aiConfidence" => self.ai_confidence,
            "visionDefectRate" => self.vision_defect_rate,
            "modelDrift" => self.model_drift,
            "predictionUpper" => self.prediction_upper,
            "predictionLower" => self.prediction_lower,
            _ => return None,
        };
        Some(value)
    }
}
