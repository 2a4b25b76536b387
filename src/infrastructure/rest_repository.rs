// REST repository implementation for the hosted record backend
//
// The backend exposes each table through a PostgREST-style interface:
// GET /rest/v1/<table>?select=...&<column>=<op>.<value> returns a JSON
// array of rows, POST inserts one. Related rows are embedded by naming
// the foreign table in the select list.
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::application::reading_repository::ReadingRepository;
use crate::domain::pool::{Pool, Resort};
use crate::domain::reading::{DailyRead, NewDailyRead, NewWeeklyRead, WeeklyRead};
use crate::domain::treatment::{NewTreatment, Treatment};

const POOL_COLUMNS: &str = "id,name,pool_type,resort_id";
const WEEKLY_COLUMNS: &str = "read_date,tds,alkalinity,calcium_hardness,saturation_index";
const TREATMENT_COLUMNS: &str = "treatment_date,bicarb_cups_added,calcium_cups_added";
const DAILY_REPORT_COLUMNS: &str =
    "read_date,chlorine,ph,temperature,flow,influent,effluent,pools(name,resorts(name)),profiles(pool_attendant)";
const WEEKLY_REPORT_COLUMNS: &str =
    "read_date,tds,alkalinity,calcium_hardness,saturation_index,pools(name,resorts(name)),profiles(pool_attendant)";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend request failed with status {status}: {body}")]
    Failed {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Clone)]
pub struct RestRepository {
    host: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct DailyReadRow {
    read_date: Option<NaiveDate>,
    chlorine: Option<f64>,
    ph: Option<f64>,
    temperature: Option<f64>,
    flow: Option<f64>,
    influent: Option<f64>,
    effluent: Option<f64>,
    #[serde(default)]
    pools: Option<PoolEmbed>,
    #[serde(default)]
    profiles: Option<ProfileEmbed>,
}

#[derive(Debug, Deserialize)]
struct WeeklyReadRow {
    read_date: Option<NaiveDate>,
    tds: Option<f64>,
    alkalinity: Option<f64>,
    calcium_hardness: Option<f64>,
    saturation_index: Option<f64>,
    #[serde(default)]
    pools: Option<PoolEmbed>,
    #[serde(default)]
    profiles: Option<ProfileEmbed>,
}

#[derive(Debug, Deserialize)]
struct PoolEmbed {
    name: Option<String>,
    #[serde(default)]
    resorts: Option<ResortEmbed>,
}

#[derive(Debug, Deserialize)]
struct ResortEmbed {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileEmbed {
    pool_attendant: Option<String>,
}

impl DailyReadRow {
    fn into_domain(self) -> DailyRead {
        DailyRead {
            read_date: self.read_date,
            chlorine: self.chlorine,
            ph: self.ph,
            temperature: self.temperature,
            flow: self.flow,
            influent: self.influent,
            effluent: self.effluent,
            pool_name: self.pools.as_ref().and_then(|p| p.name.clone()),
            resort_name: self
                .pools
                .as_ref()
                .and_then(|p| p.resorts.as_ref())
                .and_then(|r| r.name.clone()),
            attendant: self.profiles.and_then(|p| p.pool_attendant),
        }
    }
}

impl WeeklyReadRow {
    fn into_domain(self) -> WeeklyRead {
        WeeklyRead {
            read_date: self.read_date,
            tds: self.tds,
            alkalinity: self.alkalinity,
            calcium_hardness: self.calcium_hardness,
            saturation_index: self.saturation_index,
            pool_name: self.pools.as_ref().and_then(|p| p.name.clone()),
            resort_name: self
                .pools
                .as_ref()
                .and_then(|p| p.resorts.as_ref())
                .and_then(|r| r.name.clone()),
            attendant: self.profiles.and_then(|p| p.pool_attendant),
        }
    }
}

impl RestRepository {
    pub fn new(host: String, api_key: String) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn build_table_url(&self, table: &str, params: &[(&str, String)]) -> String {
        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() {
            format!("{}/rest/v1/{}", self.host, table)
        } else {
            format!("{}/rest/v1/{}?{}", self.host, table, query)
        }
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = self.build_table_url(table, params);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to query {table}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Failed { status, body }.into());
        }

        response
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("Failed to parse {table} response"))
    }

    async fn insert_row<T: serde::Serialize>(&self, table: &str, row: &T) -> Result<()> {
        let url = self.build_table_url(table, &[]);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .with_context(|| format!("Failed to insert into {table}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Failed { status, body }.into());
        }

        Ok(())
    }
}

#[async_trait]
impl ReadingRepository for RestRepository {
    async fn list_resorts(&self) -> Result<Vec<Resort>> {
        self.fetch_rows(
            "resorts",
            &[
                ("select", "id,name".to_string()),
                ("order", "name.asc".to_string()),
            ],
        )
        .await
    }

    async fn list_pools(&self, resort_id: &str) -> Result<Vec<Pool>> {
        self.fetch_rows(
            "pools",
            &[
                ("select", POOL_COLUMNS.to_string()),
                ("resort_id", format!("eq.{resort_id}")),
                ("order", "name.asc".to_string()),
            ],
        )
        .await
    }

    async fn fetch_pool(&self, pool_id: &str) -> Result<Option<Pool>> {
        let mut pools: Vec<Pool> = self
            .fetch_rows(
                "pools",
                &[
                    ("select", POOL_COLUMNS.to_string()),
                    ("id", format!("eq.{pool_id}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(pools.pop())
    }

    async fn insert_daily_read(&self, read: &NewDailyRead) -> Result<()> {
        self.insert_row("daily_reads", read).await
    }

    async fn insert_weekly_read(&self, read: &NewWeeklyRead) -> Result<()> {
        self.insert_row("weekly_reads", read).await
    }

    async fn latest_weekly_read(&self, pool_id: &str) -> Result<Option<WeeklyRead>> {
        let mut rows: Vec<WeeklyReadRow> = self
            .fetch_rows(
                "weekly_reads",
                &[
                    ("select", WEEKLY_COLUMNS.to_string()),
                    ("pool_id", format!("eq.{pool_id}")),
                    ("order", "read_date.desc".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.pop().map(WeeklyReadRow::into_domain))
    }

    async fn weekly_reads_since(
        &self,
        pool_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<WeeklyRead>> {
        let rows: Vec<WeeklyReadRow> = self
            .fetch_rows(
                "weekly_reads",
                &[
                    ("select", WEEKLY_COLUMNS.to_string()),
                    ("pool_id", format!("eq.{pool_id}")),
                    ("read_date", format!("gte.{since}")),
                    ("order", "read_date.asc".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(WeeklyReadRow::into_domain).collect())
    }

    async fn treatments_since(&self, pool_id: &str, since: NaiveDate) -> Result<Vec<Treatment>> {
        self.fetch_rows(
            "treatments",
            &[
                ("select", TREATMENT_COLUMNS.to_string()),
                ("pool_id", format!("eq.{pool_id}")),
                ("treatment_date", format!("gte.{since}")),
                ("order", "treatment_date.asc".to_string()),
            ],
        )
        .await
    }

    async fn insert_treatment(&self, treatment: &NewTreatment) -> Result<()> {
        self.insert_row("treatments", treatment).await
    }

    async fn recent_daily_reads(&self, limit: usize) -> Result<Vec<DailyRead>> {
        let rows: Vec<DailyReadRow> = self
            .fetch_rows(
                "daily_reads",
                &[
                    ("select", DAILY_REPORT_COLUMNS.to_string()),
                    ("order", "read_date.desc".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(DailyReadRow::into_domain).collect())
    }

    async fn recent_weekly_reads(&self, limit: usize) -> Result<Vec<WeeklyRead>> {
        let rows: Vec<WeeklyReadRow> = self
            .fetch_rows(
                "weekly_reads",
                &[
                    ("select", WEEKLY_REPORT_COLUMNS.to_string()),
                    ("order", "read_date.desc".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(WeeklyReadRow::into_domain).collect())
    }
}
