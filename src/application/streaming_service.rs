// Streaming balance service - Progressive dashboard loading over chunked JSON
use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, NaiveDate, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::reading_repository::ReadingRepository;
use crate::domain::dashboard::{
    ChartKind, ChartSkeleton, ChartUpdate, CompletionEvent, DashboardSkeleton, Metric,
    MetricSource, SeriesSkeleton, SeriesUpdate, StreamMessage, TileSkeleton, TileUpdate,
    TimeSeriesPoint,
};
use crate::domain::reading::WeeklyRead;
use crate::domain::treatment::Treatment;
use crate::infrastructure::config::DashboardConfig;

#[derive(Clone)]
pub struct BalanceStreamService {
    repository: Arc<dyn ReadingRepository>,
    dashboard_config: DashboardConfig,
}

impl BalanceStreamService {
    pub fn new(repository: Arc<dyn ReadingRepository>, dashboard_config: DashboardConfig) -> Self {
        Self {
            repository,
            dashboard_config,
        }
    }

    /// Stream the water balance dashboard for one pool: skeleton first,
    /// then tile values off the latest weekly read, then one chart
    /// update per series as its history fetch lands, then a completion
    /// event once every fetch has settled.
    pub async fn stream_balance(&self, pool_id: &str, weeks: i64) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(100);
        let started = Instant::now();
        let since = Utc::now().date_naive() - Duration::weeks(weeks);

        let pool_name = self
            .repository
            .fetch_pool(pool_id)
            .await
            .ok()
            .flatten()
            .map(|pool| pool.name)
            .unwrap_or_else(|| pool_id.to_string());

        // The latest weekly read drives the tiles and tells us which
        // metrics have any data at all.
        let latest = self
            .repository
            .latest_weekly_read(pool_id)
            .await
            .unwrap_or_default();
        if latest.is_none() {
            tracing::debug!("no weekly reads for pool {pool_id}; dashboard will be sparse");
        }

        // 1. Build and send the skeleton immediately.
        let skeleton = self.build_skeleton(pool_id, &pool_name, weeks, latest.as_ref());
        let total_widgets = (skeleton.tiles.len() + skeleton.charts.len()) as i32;
        let _ = tx.send(StreamMessage::Skeleton(skeleton)).await;

        // 2. Tile updates all come off the one row already fetched.
        if let Some(latest) = &latest {
            for tile in &self.dashboard_config.tiles {
                let Some(metric) = Metric::parse(&tile.metric) else {
                    continue;
                };
                if let Some(value) = metric.from_weekly(latest) {
                    let update = TileUpdate {
                        id: tile.id.clone(),
                        value,
                    };
                    let _ = tx.send(StreamMessage::TileUpdate(update)).await;
                }
            }
        }

        // 3. Spawn a history fetch per chart series.
        let mut fetches: Vec<JoinHandle<()>> = Vec::new();
        for chart in &self.dashboard_config.charts {
            for series in &chart.series {
                let Some(metric) = Metric::parse(&series.metric) else {
                    tracing::warn!(
                        "unknown metric {} for series {} in chart {}",
                        series.metric,
                        series.id,
                        chart.id
                    );
                    continue;
                };

                let tx = tx.clone();
                let repository = self.repository.clone();
                let pool_id = pool_id.to_string();
                let chart_id = chart.id.clone();
                let series_id = series.id.clone();

                fetches.push(tokio::spawn(async move {
                    let points = match metric.source() {
                        MetricSource::WeeklyReads => {
                            match repository.weekly_reads_since(&pool_id, since).await {
                                Ok(reads) => weekly_points(&reads, metric),
                                Err(e) => {
                                    tracing::error!("error fetching weekly reads for series {series_id}: {e}");
                                    return;
                                }
                            }
                        }
                        MetricSource::Treatments => {
                            match repository.treatments_since(&pool_id, since).await {
                                Ok(treatments) => treatment_points(&treatments, metric),
                                Err(e) => {
                                    tracing::error!("error fetching treatments for series {series_id}: {e}");
                                    return;
                                }
                            }
                        }
                    };

                    // Only send if we have data.
                    if points.is_empty() {
                        return;
                    }
                    let update = ChartUpdate {
                        id: chart_id,
                        series: vec![SeriesUpdate {
                            id: series_id,
                            points,
                        }],
                    };
                    let _ = tx.send(StreamMessage::ChartUpdate(update)).await;
                }));
            }
        }

        // 4. Completion fires once every fetch has settled.
        tokio::spawn(async move {
            for fetch in fetches {
                let _ = fetch.await;
            }
            let complete = CompletionEvent {
                total_widgets,
                duration_ms: started.elapsed().as_millis() as i64,
            };
            let _ = tx.send(StreamMessage::Complete(complete)).await;
        });

        rx
    }

    fn build_skeleton(
        &self,
        pool_id: &str,
        pool_name: &str,
        weeks: i64,
        latest: Option<&WeeklyRead>,
    ) -> DashboardSkeleton {
        // Tiles only render for metrics present on the latest read.
        let tiles: Vec<TileSkeleton> = self
            .dashboard_config
            .tiles
            .iter()
            .filter(|tile| {
                Metric::parse(&tile.metric)
                    .and_then(|metric| latest.and_then(|read| metric.from_weekly(read)))
                    .is_some()
            })
            .map(|tile| TileSkeleton {
                id: tile.id.clone(),
                title: tile.title.clone(),
                unit: tile.unit.clone(),
                precision: tile.precision,
            })
            .collect();

        // Charts keep every series with a known metric; the history
        // fetches decide later whether there is anything to draw.
        let charts: Vec<ChartSkeleton> = self
            .dashboard_config
            .charts
            .iter()
            .filter_map(|chart| {
                let series: Vec<SeriesSkeleton> = chart
                    .series
                    .iter()
                    .filter(|series| Metric::parse(&series.metric).is_some())
                    .map(|series| SeriesSkeleton {
                        id: series.id.clone(),
                        name: series.name.clone(),
                        color: series.color.clone(),
                    })
                    .collect();

                if series.is_empty() {
                    return None;
                }

                let kind = match chart.kind.as_str() {
                    "line" => ChartKind::Line,
                    _ => ChartKind::MultiLine,
                };

                Some(ChartSkeleton {
                    id: chart.id.clone(),
                    title: chart.title.clone(),
                    unit: chart.unit.clone(),
                    kind,
                    y_min: chart.y_min,
                    y_max: chart.y_max,
                    fraction_digits: chart.fraction_digits,
                    series,
                })
            })
            .collect();

        DashboardSkeleton {
            pool_id: pool_id.to_string(),
            title: format!("{} Water Balance (last {} weeks)", pool_name, weeks),
            tiles,
            charts,
        }
    }
}

fn weekly_points(reads: &[WeeklyRead], metric: Metric) -> Vec<TimeSeriesPoint> {
    reads
        .iter()
        .filter_map(|read| {
            let date = read.read_date?;
            let value = metric.from_weekly(read)?;
            Some(TimeSeriesPoint::new(date_to_millis(date), value))
        })
        .collect()
}

fn treatment_points(treatments: &[Treatment], metric: Metric) -> Vec<TimeSeriesPoint> {
    treatments
        .iter()
        .filter_map(|treatment| {
            let value = metric.from_treatment(treatment)?;
            Some(TimeSeriesPoint::new(
                date_to_millis(treatment.treatment_date),
                value,
            ))
        })
        .collect()
}

fn date_to_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}
