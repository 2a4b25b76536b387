// Application state for HTTP handlers
use crate::application::pool_service::PoolService;
use crate::application::reading_service::ReadingService;
use crate::application::streaming_service::BalanceStreamService;
use crate::application::treatment_service::TreatmentService;

#[derive(Clone)]
pub struct AppState {
    pub pool_service: PoolService,
    pub reading_service: ReadingService,
    pub treatment_service: TreatmentService,
    pub streaming_service: BalanceStreamService,
}
