// Reading service - Use cases for recording reads and assembling reports
use std::sync::Arc;

use crate::application::reading_repository::ReadingRepository;
use crate::domain::chemistry::{self, SaturationIndex};
use crate::domain::reading::{DailyRead, NewDailyRead, NewWeeklyRead, WaterReading, WeeklyRead};

/// The reports page shows the most recent hundred rows of each kind.
const REPORT_LIMIT: usize = 100;

#[derive(Clone)]
pub struct ReadingService {
    repository: Arc<dyn ReadingRepository>,
}

impl ReadingService {
    pub fn new(repository: Arc<dyn ReadingRepository>) -> Self {
        Self { repository }
    }

    /// Record a daily read. Influent and effluent gauges only exist on
    /// pools with a filtration loop; readings for other pools have those
    /// fields dropped before the row is stored.
    pub async fn record_daily(&self, mut read: NewDailyRead) -> anyhow::Result<()> {
        if let Some(pool) = self.repository.fetch_pool(&read.pool_id).await? {
            if !pool.has_flow_loop() {
                read.influent = None;
                read.effluent = None;
            }
        }
        self.repository.insert_daily_read(&read).await
    }

    /// Record a weekly chemistry read, deriving the saturation index
    /// before the row is stored so every consumer sees the same value.
    /// pH and temperature come off the same day's daily sheet.
    pub async fn record_weekly(
        &self,
        mut read: NewWeeklyRead,
        ph: Option<f64>,
        temperature_f: Option<f64>,
    ) -> anyhow::Result<Option<SaturationIndex>> {
        let reading = WaterReading {
            ph,
            temperature_f,
            calcium_hardness: read.calcium_hardness,
            alkalinity: read.alkalinity,
            tds: read.tds,
        };
        let index = chemistry::saturation_index(&reading);
        read.saturation_index = index.map(|i| i.value());

        if let Some(index) = index {
            tracing::info!(
                "weekly read for pool {} scored {} ({})",
                read.pool_id,
                index.value(),
                index.balance().label()
            );
        }

        self.repository.insert_weekly_read(&read).await?;
        Ok(index)
    }

    pub async fn daily_report(&self) -> anyhow::Result<Vec<DailyRead>> {
        self.repository.recent_daily_reads(REPORT_LIMIT).await
    }

    pub async fn weekly_report(&self) -> anyhow::Result<Vec<WeeklyRead>> {
        self.repository.recent_weekly_reads(REPORT_LIMIT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryRepository;
    use crate::domain::pool::Pool;
    use chrono::Utc;

    fn weekly(pool_id: &str) -> NewWeeklyRead {
        NewWeeklyRead {
            pool_id: pool_id.to_string(),
            user_id: None,
            read_date: Utc::now().date_naive(),
            tds: Some(420.0),
            alkalinity: Some(90.0),
            calcium_hardness: Some(250.0),
            saturation_index: None,
        }
    }

    #[tokio::test]
    async fn test_record_weekly_derives_the_saturation_index() {
        let repository = Arc::new(InMemoryRepository::default());
        let service = ReadingService::new(repository.clone());

        let index = service
            .record_weekly(weekly("p1"), Some(7.5), Some(80.0))
            .await
            .unwrap();

        assert_eq!(index.map(|i| i.value()), Some(0.0));
        let inserted = repository.inserted_weekly.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].saturation_index, Some(0.0));
    }

    #[tokio::test]
    async fn test_record_weekly_stores_indeterminate_as_null() {
        let repository = Arc::new(InMemoryRepository::default());
        let service = ReadingService::new(repository.clone());

        let index = service.record_weekly(weekly("p1"), None, Some(80.0)).await.unwrap();

        assert_eq!(index, None);
        let inserted = repository.inserted_weekly.lock().unwrap();
        assert_eq!(inserted[0].saturation_index, None);
    }

    #[tokio::test]
    async fn test_record_daily_drops_flow_loop_fields_for_bungalows() {
        let repository = Arc::new(InMemoryRepository {
            pools: vec![Pool {
                id: "b1".to_string(),
                name: "Bungalow 7".to_string(),
                pool_type: "bungalow".to_string(),
                resort_id: Some("r1".to_string()),
            }],
            ..Default::default()
        });
        let service = ReadingService::new(repository.clone());

        let read = NewDailyRead {
            pool_id: "b1".to_string(),
            user_id: None,
            read_date: Utc::now().date_naive(),
            chlorine: Some(2.0),
            ph: Some(7.4),
            temperature: Some(84.0),
            flow: Some(30.0),
            influent: Some(12.0),
            effluent: Some(11.0),
        };
        service.record_daily(read).await.unwrap();

        let inserted = repository.inserted_daily.lock().unwrap();
        assert_eq!(inserted[0].influent, None);
        assert_eq!(inserted[0].effluent, None);
        assert_eq!(inserted[0].chlorine, Some(2.0));
    }
}
