use anyhow::Context;
use serde::Deserialize;

const BUILTIN_WIDGETS: &str = include_str!("../../config/widgets.toml");

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub insight: InsightSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub contact: ContactSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationSettings {
    pub window_size: usize,
    pub telemetry_interval_ms: u64,
    pub vision_interval_ms: u64,
    /// Fixed RNG seed; random per start when unset.
    pub seed: Option<u64>,
}

impl SimulationSettings {
    /// Tick periods must be non-zero; a zero-length interval cannot be scheduled.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.telemetry_interval_ms == 0 {
            anyhow::bail!("simulation.telemetry_interval_ms must be greater than zero");
        }
        if self.vision_interval_ms == 0 {
            anyhow::bail!("simulation.vision_interval_ms must be greater than zero");
        }
        Ok(())
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            window_size: 41,
            telemetry_interval_ms: 5000,
            vision_interval_ms: 2500,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InsightSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ChatSettings {
    /// Oldest messages are evicted past this length; unbounded when unset.
    pub max_messages: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ContactSettings {
    pub submit_delay_ms: u64,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            submit_delay_ms: 1800,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WidgetsConfig {
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModuleConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tiles: Vec<TileConfig>,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TileConfig {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub precision: i32,
    pub field: String,
    #[serde(default = "unit_scale")]
    pub scale: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub kind: String,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub fraction_digits: Option<i32>,
    #[serde(default)]
    pub series: Vec<SeriesConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeriesConfig {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub field: String,
}

fn unit_scale() -> f64 {
    1.0
}

/// Load `config/app.*` (optional) overlaid with `PLANT__*` environment
/// variables. The insight API key falls back to `API_KEY`.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(config::Environment::with_prefix("PLANT").separator("__"))
        .build()?;

    let mut app: AppConfig = settings
        .try_deserialize()
        .context("Invalid application configuration")?;
    app.simulation.validate()?;

    if app.insight.api_key.is_none() {
        app.insight.api_key = std::env::var("API_KEY").ok().filter(|key| !key.is_empty());
    }

    Ok(app)
}

/// Load `config/widgets.*`, falling back to the built-in layout when the
/// file is absent or defines no modules.
pub fn load_widgets_config() -> anyhow::Result<WidgetsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/widgets").required(false))
        .build()?;

    let widgets: WidgetsConfig = settings.try_deserialize()?;
    if widgets.modules.is_empty() {
        return builtin_widgets();
    }
    Ok(widgets)
}

pub fn builtin_widgets() -> anyhow::Result<WidgetsConfig> {
    toml::from_str(BUILTIN_WIDGETS).context("Built-in widget layout is malformed")
}
