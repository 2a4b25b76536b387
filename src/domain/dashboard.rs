// Water balance dashboard models and stream protocol
use serde::Serialize;

use super::reading::WeeklyRead;
use super::treatment::Treatment;

#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSkeleton {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub precision: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSkeleton {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Line,
    MultiLine,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSkeleton {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub kind: ChartKind,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub fraction_digits: Option<i32>,
    pub series: Vec<SeriesSkeleton>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSkeleton {
    pub pool_id: String,
    pub title: String,
    pub tiles: Vec<TileSkeleton>,
    pub charts: Vec<ChartSkeleton>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileUpdate {
    pub id: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesUpdate {
    pub id: String,
    pub points: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartUpdate {
    pub id: String,
    pub series: Vec<SeriesUpdate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    pub total_widgets: i32,
    pub duration_ms: i64,
}

/// One frame of the progressive dashboard stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum StreamMessage {
    Skeleton(DashboardSkeleton),
    TileUpdate(TileUpdate),
    ChartUpdate(ChartUpdate),
    Complete(CompletionEvent),
}

/// Measurements the dashboard widgets can draw from. Widget configs
/// name metrics by their backend column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Tds,
    Alkalinity,
    CalciumHardness,
    SaturationIndex,
    BicarbCupsAdded,
    CalciumCupsAdded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSource {
    WeeklyReads,
    Treatments,
}

impl Metric {
    pub fn parse(name: &str) -> Option<Metric> {
        match name {
            "tds" => Some(Metric::Tds),
            "alkalinity" => Some(Metric::Alkalinity),
            "calcium_hardness" => Some(Metric::CalciumHardness),
            "saturation_index" => Some(Metric::SaturationIndex),
            "bicarb_cups_added" => Some(Metric::BicarbCupsAdded),
            "calcium_cups_added" => Some(Metric::CalciumCupsAdded),
            _ => None,
        }
    }

    /// Whether values come from weekly reads or the treatment log.
    pub fn source(self) -> MetricSource {
        match self {
            Metric::BicarbCupsAdded | Metric::CalciumCupsAdded => MetricSource::Treatments,
            _ => MetricSource::WeeklyReads,
        }
    }

    pub fn from_weekly(self, read: &WeeklyRead) -> Option<f64> {
        match self {
            Metric::Tds => read.tds,
            Metric::Alkalinity => read.alkalinity,
            Metric::CalciumHardness => read.calcium_hardness,
            Metric::SaturationIndex => read.saturation_index,
            _ => None,
        }
    }

    pub fn from_treatment(self, treatment: &Treatment) -> Option<f64> {
        match self {
            Metric::BicarbCupsAdded => treatment.bicarb_cups_added,
            Metric::CalciumCupsAdded => treatment.calcium_cups_added,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_parsing() {
        assert_eq!(Metric::parse("saturation_index"), Some(Metric::SaturationIndex));
        assert_eq!(Metric::parse("bicarb_cups_added"), Some(Metric::BicarbCupsAdded));
        assert_eq!(Metric::parse("chlorine"), None);
    }

    #[test]
    fn test_metric_sources() {
        assert_eq!(Metric::Alkalinity.source(), MetricSource::WeeklyReads);
        assert_eq!(Metric::CalciumCupsAdded.source(), MetricSource::Treatments);
    }

    #[test]
    fn test_metric_extraction() {
        let read = WeeklyRead {
            read_date: None,
            tds: Some(420.0),
            alkalinity: Some(90.0),
            calcium_hardness: Some(250.0),
            saturation_index: Some(0.0),
            pool_name: None,
            resort_name: None,
            attendant: None,
        };
        assert_eq!(Metric::Alkalinity.from_weekly(&read), Some(90.0));
        // Treatment metrics never come off a weekly read.
        assert_eq!(Metric::BicarbCupsAdded.from_weekly(&read), None);
    }
}
