use serde::Deserialize;

use crate::domain::treatment::DosingChart;

/// Connection settings for the hosted record backend.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub backend: BackendSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub host: String,
    pub api_key: String,
}

/// Dosing chart settings. The chart ships calibrated for the reference
/// 1,500 gallon pool; `pool_gallons` rescales it for a deployment with
/// a different volume without touching the curves.
#[derive(Debug, Deserialize, Clone)]
pub struct DosingConfig {
    pub pool_gallons: Option<f64>,
    pub dosing: DosingChart,
}

impl DosingConfig {
    pub fn chart(&self) -> DosingChart {
        match self.pool_gallons {
            Some(gallons) => self.dosing.for_volume(gallons),
            None => self.dosing.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
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
    pub metric: String,
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
    pub metric: String,
}

pub fn load_backend_config() -> anyhow::Result<BackendConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/backend"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_dosing_config() -> anyhow::Result<DosingConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dosing"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dosing_config() {
        let sample = r#"
            pool_gallons = 3000.0

            [dosing]
            reference_gallons = 1500.0

            [dosing.alkalinity]
            target_ppm = 100.0
            treat_below_ppm = 80.0
            cups_per_ten_ppm = 0.5

            [dosing.calcium]
            target_ppm = 300.0
            treat_below_ppm = 200.0
            cups_per_ten_ppm = 0.4
        "#;
        let settings = config::Config::builder()
            .add_source(config::File::from_str(sample, config::FileFormat::Toml))
            .build()
            .unwrap();
        let parsed: DosingConfig = settings.try_deserialize().unwrap();

        let chart = parsed.chart();
        assert_eq!(chart.reference_gallons, 3000.0);
        // Cup factors double with the volume; targets stay put.
        assert_eq!(chart.alkalinity.cups_per_ten_ppm, 1.0);
        assert_eq!(chart.alkalinity.target_ppm, 100.0);
        assert_eq!(chart.calcium.cups_per_ten_ppm, 0.8);
    }

    #[test]
    fn test_parse_dashboard_config() {
        let sample = r##"
            [[tiles]]
            id = "lsi"
            title = "Saturation Index"
            unit = ""
            precision = 2
            metric = "saturation_index"

            [[charts]]
            id = "chemistry"
            title = "Alkalinity and Hardness"
            unit = "ppm"
            kind = "multiLine"

            [[charts.series]]
            id = "alkalinity"
            name = "Alkalinity"
            color = "#10ac84"
            metric = "alkalinity"
        "##;
        let settings = config::Config::builder()
            .add_source(config::File::from_str(sample, config::FileFormat::Toml))
            .build()
            .unwrap();
        let parsed: DashboardConfig = settings.try_deserialize().unwrap();

        assert_eq!(parsed.tiles.len(), 1);
        assert_eq!(parsed.tiles[0].metric, "saturation_index");
        assert_eq!(parsed.charts[0].series[0].color.as_deref(), Some("#10ac84"));
        assert_eq!(parsed.charts[0].y_min, None);
    }
}
