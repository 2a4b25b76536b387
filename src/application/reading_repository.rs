// Repository trait for the hosted record backend
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::pool::{Pool, Resort};
use crate::domain::reading::{DailyRead, NewDailyRead, NewWeeklyRead, WeeklyRead};
use crate::domain::treatment::{NewTreatment, Treatment};

#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// List all resorts, ordered by name.
    async fn list_resorts(&self) -> anyhow::Result<Vec<Resort>>;

    /// List a resort's pools, ordered by name.
    async fn list_pools(&self, resort_id: &str) -> anyhow::Result<Vec<Pool>>;

    async fn fetch_pool(&self, pool_id: &str) -> anyhow::Result<Option<Pool>>;

    async fn insert_daily_read(&self, read: &NewDailyRead) -> anyhow::Result<()>;

    async fn insert_weekly_read(&self, read: &NewWeeklyRead) -> anyhow::Result<()>;

    /// Most recent weekly read for a pool, if any.
    async fn latest_weekly_read(&self, pool_id: &str) -> anyhow::Result<Option<WeeklyRead>>;

    /// Weekly reads for a pool since a date, oldest first.
    async fn weekly_reads_since(
        &self,
        pool_id: &str,
        since: NaiveDate,
    ) -> anyhow::Result<Vec<WeeklyRead>>;

    /// Logged treatments for a pool since a date, oldest first.
    async fn treatments_since(
        &self,
        pool_id: &str,
        since: NaiveDate,
    ) -> anyhow::Result<Vec<Treatment>>;

    async fn insert_treatment(&self, treatment: &NewTreatment) -> anyhow::Result<()>;

    /// Most recent daily reads across all pools, newest first, with
    /// pool, resort and attendant names joined in for reports.
    async fn recent_daily_reads(&self, limit: usize) -> anyhow::Result<Vec<DailyRead>>;

    /// Most recent weekly reads across all pools, newest first.
    async fn recent_weekly_reads(&self, limit: usize) -> anyhow::Result<Vec<WeeklyRead>>;
}
