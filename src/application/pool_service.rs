// Pool catalog service - Use case for listing resorts and their pools
use crate::application::reading_repository::ReadingRepository;
use crate::domain::pool::{Pool, Resort};
use std::sync::Arc;

#[derive(Clone)]
pub struct PoolService {
    repository: Arc<dyn ReadingRepository>,
}

impl PoolService {
    pub fn new(repository: Arc<dyn ReadingRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_resorts(&self) -> anyhow::Result<Vec<Resort>> {
        self.repository.list_resorts().await
    }

    pub async fn list_pools(&self, resort_id: &str) -> anyhow::Result<Vec<Pool>> {
        self.repository.list_pools(resort_id).await
    }
}
