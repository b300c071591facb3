// Chart-ready telemetry records
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub label: String,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, label: String, value: f64) -> Self {
        Self {
            time_ms,
            label,
            value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: f64,
    pub precision: i32,
    /// Value rounded to `precision` with the unit appended.
    pub display: String,
}

impl TileData {
    pub fn new(id: String, title: String, unit: String, value: f64, precision: i32) -> Self {
        let display = format_tile(value, precision, &unit);
        Self {
            id,
            title,
            unit,
            value,
            precision,
            display,
        }
    }
}

fn format_tile(value: f64, precision: i32, unit: &str) -> String {
    let digits = precision.max(0) as usize;
    match unit {
        "" => format!("{:.*}", digits, value),
        "%" => format!("{:.*}%", digits, value),
        _ => format!("{:.*} {}", digits, value, unit),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub points: Vec<TimeSeriesPoint>,
}

impl SeriesData {
    pub fn new(id: String, name: String, color: Option<String>, points: Vec<TimeSeriesPoint>) -> Self {
        Self {
            id,
            name,
            color,
            points,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub kind: ChartKind,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub fraction_digits: Option<i32>,
    pub series: Vec<SeriesData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Line,
    MultiLine,
    Step,
    Area,
    Bar,
}

impl ChartKind {
    pub fn from_config(kind: &str) -> Self {
        match kind {
            "line" => ChartKind::Line,
            "multiLine" => ChartKind::MultiLine,
            "step" => ChartKind::Step,
            "area" => ChartKind::Area,
            "bar" => ChartKind::Bar,
            _ => ChartKind::Line,
        }
    }
}

impl ChartData {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        title: String,
        unit: Option<String>,
        kind: ChartKind,
        y_min: Option<f64>,
        y_max: Option<f64>,
        fraction_digits: Option<i32>,
        series: Vec<SeriesData>,
    ) -> Self {
        Self {
            id,
            title,
            unit,
            kind,
            y_min,
            y_max,
            fraction_digits,
            series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_display() {
        let tile = TileData::new("oee".into(), "Overall OEE".into(), "%".into(), 91.234, 1);
        assert_eq!(tile.display, "91.2%");

        let tile = TileData::new("throughput".into(), "Throughput".into(), "UPH".into(), 471.6, 0);
        assert_eq!(tile.display, "472 UPH");
    }

    #[test]
    fn test_chart_kind_from_config() {
        assert_eq!(ChartKind::from_config("step"), ChartKind::Step);
        assert_eq!(ChartKind::from_config("multiLine"), ChartKind::MultiLine);
        assert_eq!(ChartKind::from_config("pie"), ChartKind::Line);
    }
}
