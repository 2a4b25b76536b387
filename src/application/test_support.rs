// In-memory repository used by the service tests
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::application::reading_repository::ReadingRepository;
use crate::domain::pool::{Pool, Resort};
use crate::domain::reading::{DailyRead, NewDailyRead, NewWeeklyRead, WeeklyRead};
use crate::domain::treatment::{NewTreatment, Treatment};

#[derive(Default)]
pub struct InMemoryRepository {
    pub resorts: Vec<Resort>,
    pub pools: Vec<Pool>,
    pub daily_reads: Vec<DailyRead>,
    pub weekly_reads: Vec<WeeklyRead>,
    pub treatments: Vec<Treatment>,
    pub inserted_daily: Mutex<Vec<NewDailyRead>>,
    pub inserted_weekly: Mutex<Vec<NewWeeklyRead>>,
    pub inserted_treatments: Mutex<Vec<NewTreatment>>,
}

#[async_trait]
impl ReadingRepository for InMemoryRepository {
    async fn list_resorts(&self) -> anyhow::Result<Vec<Resort>> {
        Ok(self.resorts.clone())
    }

    async fn list_pools(&self, resort_id: &str) -> anyhow::Result<Vec<Pool>> {
        Ok(self
            .pools
            .iter()
            .filter(|pool| pool.resort_id.as_deref() == Some(resort_id))
            .cloned()
            .collect())
    }

    async fn fetch_pool(&self, pool_id: &str) -> anyhow::Result<Option<Pool>> {
        Ok(self.pools.iter().find(|pool| pool.id == pool_id).cloned())
    }

    async fn insert_daily_read(&self, read: &NewDailyRead) -> anyhow::Result<()> {
        self.inserted_daily.lock().unwrap().push(read.clone());
        Ok(())
    }

    async fn insert_weekly_read(&self, read: &NewWeeklyRead) -> anyhow::Result<()> {
        self.inserted_weekly.lock().unwrap().push(read.clone());
        Ok(())
    }

    async fn latest_weekly_read(&self, _pool_id: &str) -> anyhow::Result<Option<WeeklyRead>> {
        Ok(self.weekly_reads.last().cloned())
    }

    async fn weekly_reads_since(
        &self,
        _pool_id: &str,
        since: NaiveDate,
    ) -> anyhow::Result<Vec<WeeklyRead>> {
        Ok(self
            .weekly_reads
            .iter()
            .filter(|read| read.read_date.is_some_and(|date| date >= since))
            .cloned()
            .collect())
    }

    async fn treatments_since(
        &self,
        _pool_id: &str,
        since: NaiveDate,
    ) -> anyhow::Result<Vec<Treatment>> {
        Ok(self
            .treatments
            .iter()
            .filter(|treatment| treatment.treatment_date >= since)
            .cloned()
            .collect())
    }

    async fn insert_treatment(&self, treatment: &NewTreatment) -> anyhow::Result<()> {
        self.inserted_treatments.lock().unwrap().push(treatment.clone());
        Ok(())
    }

    async fn recent_daily_reads(&self, limit: usize) -> anyhow::Result<Vec<DailyRead>> {
        Ok(self.daily_reads.iter().rev().take(limit).cloned().collect())
    }

    async fn recent_weekly_reads(&self, limit: usize) -> anyhow::Result<Vec<WeeklyRead>> {
        Ok(self.weekly_reads.iter().rev().take(limit).cloned().collect())
    }
}
