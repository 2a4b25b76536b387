// Treatment service - Use case for dosing recommendations and the treatment log
use std::sync::Arc;

use crate::application::reading_repository::ReadingRepository;
use crate::domain::chemistry::WaterBalance;
use crate::domain::treatment::{DosingChart, NewTreatment, TreatmentPlan};

#[derive(Clone)]
pub struct TreatmentService {
    repository: Arc<dyn ReadingRepository>,
    dosing: DosingChart,
}

impl TreatmentService {
    pub fn new(repository: Arc<dyn ReadingRepository>, dosing: DosingChart) -> Self {
        Self { repository, dosing }
    }

    /// Recommend dosages for a pool from its last stored weekly read.
    ///
    /// A pool with no weekly reads yet gets a plan with empty readings
    /// and zero cups of both additives.
    pub async fn plan(&self, pool_id: &str) -> anyhow::Result<TreatmentPlan> {
        let latest = self.repository.latest_weekly_read(pool_id).await?;
        let reading = latest
            .as_ref()
            .map(|read| read.water_reading())
            .unwrap_or_default();
        let dosage = self.dosing.recommend(&reading);

        if dosage.is_no_action() {
            tracing::debug!("no treatment needed for pool {pool_id}");
        }

        let saturation_index = latest.as_ref().and_then(|read| read.saturation_index);
        Ok(TreatmentPlan {
            pool_id: pool_id.to_string(),
            read_date: latest.as_ref().and_then(|read| read.read_date),
            alkalinity: reading.alkalinity,
            calcium_hardness: reading.calcium_hardness,
            saturation_index,
            balance: saturation_index.map(WaterBalance::classify),
            dosage,
        })
    }

    pub async fn log(&self, treatment: NewTreatment) -> anyhow::Result<()> {
        self.repository.insert_treatment(&treatment).await
    }
}
