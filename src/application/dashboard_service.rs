// Dashboard service - Use case for building dashboards from the telemetry window
use crate::application::telemetry_generator::latest;
use crate::domain::dashboard::{Dashboard, DashboardSummary};
use crate::domain::sensor::SensorReading;
use crate::domain::telemetry::{ChartData, ChartKind, SeriesData, TileData, TimeSeriesPoint};
use crate::infrastructure::config::{ChartConfig, ModuleConfig, WidgetsConfig};

#[derive(Clone)]
pub struct DashboardService {
    widgets_config: WidgetsConfig,
}

impl DashboardService {
    pub fn new(widgets_config: WidgetsConfig) -> Self {
        Self { widgets_config }
    }

    pub fn modules(&self) -> Vec<DashboardSummary> {
        self.widgets_config
            .modules
            .iter()
            .map(|m| DashboardSummary {
                id: m.id.clone(),
                title: m.title.clone(),
            })
            .collect()
    }

    /// Build the named module's dashboard, or `None` for an unknown module.
    pub fn build(&self, module_id: &str, window: &[SensorReading]) -> Option<Dashboard> {
        let module = self.widgets_config.modules.iter().find(|m| m.id == module_id)?;

        let tiles = self.build_tiles(module, &latest(window));
        let charts = module
            .charts
            .iter()
            .filter_map(|chart_config| self.build_chart(chart_config, window))
            .collect();

        Some(Dashboard::new(
            module.id.clone(),
            module.title.clone(),
            tiles,
            charts,
        ))
    }

    fn build_tiles(&self, module: &ModuleConfig, snapshot: &SensorReading) -> Vec<TileData> {
        let mut tiles = Vec::new();

        for tile_config in &module.tiles {
            match snapshot.metric(&tile_config.field) {
                Some(value) => {
                    tiles.push(TileData::new(
                        tile_config.id.clone(),
                        tile_config.title.clone(),
                        tile_config.unit.clone(),
                        value * tile_config.scale,
                        tile_config.precision,
                    ));
                }
                None => {
                    tracing::warn!("Tile {} references unknown field {}", tile_config.id, tile_config.field);
                }
            }
        }

        tiles
    }

    fn build_chart(&self, chart_config: &ChartConfig, window: &[SensorReading]) -> Option<ChartData> {
        let mut series_list = Vec::new();

        for series_config in &chart_config.series {
            let points: Vec<TimeSeriesPoint> = window
                .iter()
                .filter_map(|reading| {
                    reading
                        .metric(&series_config.field)
                        .map(|value| TimeSeriesPoint::new(reading.time_ms, reading.timestamp.clone(), value))
                })
                .collect();

            if points.is_empty() {
                tracing::debug!(
                    "Skipping series {} for chart {} - no data",
                    series_config.id, chart_config.id
                );
                continue;
            }

            series_list.push(SeriesData::new(
                series_config.id.clone(),
                series_config.name.clone(),
                series_config.color.clone(),
                points,
            ));
        }

        // Only add chart if it has at least one series with data
        if series_list.is_empty() {
            return None;
        }

        Some(ChartData::new(
            chart_config.id.clone(),
            chart_config.title.clone(),
            chart_config.unit.clone(),
            ChartKind::from_config(&chart_config.kind),
            chart_config.y_min,
            chart_config.y_max,
            chart_config.fraction_digits,
            series_list,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::random_source::SeededRandom;
    use crate::application::telemetry_generator::TelemetryGenerator;
    use crate::infrastructure::config::builtin_widgets;
    use chrono::Utc;

    fn service() -> DashboardService {
        DashboardService::new(builtin_widgets().unwrap())
    }

    #[test]
    fn test_lists_modules() {
        let modules = service().modules();
        assert_eq!(modules.len(), 4);
        assert_eq!(modules[0].title, "Operational Core");
    }

    #[test]
    fn test_unknown_module() {
        assert!(service().build("finance", &[]).is_none());
    }

    #[test]
    fn test_tiles_follow_latest_reading() {
        let window = TelemetryGenerator::new(SeededRandom::from_seed(9)).initialize(41, Utc::now());
        let last = window.last().unwrap().clone();

        let dashboard = service().build("data-science-health", &window).unwrap();
        let drift = dashboard.tiles.iter().find(|t| t.id == "drift").unwrap();
        assert!((drift.value - last.model_drift * 100.0).abs() < 1e-9);

        let operational = service().build("operational", &window).unwrap();
        let oee = operational.tiles.iter().find(|t| t.id == "oee").unwrap();
        assert_eq!(oee.value, last.oee);
    }

    #[test]
    fn test_chart_series_cover_window() {
        let window = TelemetryGenerator::new(SeededRandom::from_seed(10)).initialize(41, Utc::now());
        let dashboard = service().build("operational", &window).unwrap();

        let band = dashboard.charts.iter().find(|c| c.id == "oee_band").unwrap();
        assert_eq!(band.kind, ChartKind::MultiLine);
        assert_eq!(band.series.len(), 3);
        for series in &band.series {
            assert_eq!(series.points.len(), 41);
        }
        assert_eq!(band.series[0].points[40].time_ms, window[40].time_ms);
    }

    #[test]
    fn test_empty_window_uses_zero_tiles_and_no_charts() {
        let dashboard = service().build("predictive", &[]).unwrap();
        assert!(dashboard.charts.is_empty());
        assert!(dashboard.tiles.iter().all(|t| t.value == 0.0));
    }
}
