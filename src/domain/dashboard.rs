// Dashboard domain model
use super::telemetry::{ChartData, TileData};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub id: String,
    pub title: String,
    pub tiles: Vec<TileData>,
    pub charts: Vec<ChartData>,
}

impl Dashboard {
    pub fn new(id: String, title: String, tiles: Vec<TileData>, charts: Vec<ChartData>) -> Self {
        Self {
            id,
            title,
            tiles,
            charts,
        }
    }
}

/// Entry in the dashboard module picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub id: String,
    pub title: String,
}
