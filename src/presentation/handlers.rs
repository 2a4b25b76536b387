// HTTP request handlers
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::chemistry::{self, WaterBalance};
use crate::domain::pool::{Pool, Resort};
use crate::domain::reading::{DailyRead, NewDailyRead, NewWeeklyRead, WaterReading, WeeklyRead};
use crate::domain::treatment::NewTreatment;
use crate::infrastructure::chunked_stream::stream_from_receiver;
use crate::infrastructure::http_response::json_response;
use crate::presentation::app_state::AppState;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub weeks: Option<i64>,
}

#[derive(Deserialize)]
pub struct SaturationQuery {
    pub ph: Option<f64>,
    pub temperature_f: Option<f64>,
    pub calcium_hardness: Option<f64>,
    pub alkalinity: Option<f64>,
    pub tds: Option<f64>,
}

#[derive(Serialize)]
pub struct SaturationResponse {
    pub saturation_index: Option<f64>,
    pub balance: Option<WaterBalance>,
}

#[derive(Deserialize)]
pub struct DailyReadPayload {
    pub read_date: Option<NaiveDate>,
    pub user_id: Option<String>,
    pub chlorine: Option<f64>,
    pub ph: Option<f64>,
    pub temperature: Option<f64>,
    pub flow: Option<f64>,
    pub influent: Option<f64>,
    pub effluent: Option<f64>,
}

#[derive(Deserialize)]
pub struct WeeklyReadPayload {
    pub read_date: Option<NaiveDate>,
    pub user_id: Option<String>,
    pub tds: Option<f64>,
    pub alkalinity: Option<f64>,
    pub calcium_hardness: Option<f64>,
    /// pH and temperature come off the same day's daily sheet; the
    /// saturation index cannot be derived without them.
    pub ph: Option<f64>,
    pub temperature_f: Option<f64>,
}

#[derive(Deserialize)]
pub struct TreatmentPayload {
    pub treatment_date: Option<NaiveDate>,
    pub user_id: Option<String>,
    pub bicarb_cups_added: Option<f64>,
    pub calcium_cups_added: Option<f64>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get("accept-encoding")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.contains("br"))
        .unwrap_or(false)
}

/// List all resorts
pub async fn list_resorts(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);

    let resorts = match state.pool_service.list_resorts().await {
        Ok(resorts) => resorts,
        Err(e) => {
            tracing::error!("Error fetching resorts: {e}");
            // Return empty list on error
            Vec::<Resort>::new()
        }
    };

    match json_response(&resorts, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// List a resort's pools
pub async fn list_pools(
    Path(resort_id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);

    let pools = match state.pool_service.list_pools(&resort_id).await {
        Ok(pools) => pools,
        Err(e) => {
            tracing::error!("Error fetching pools for resort {resort_id}: {e}");
            Vec::<Pool>::new()
        }
    };

    match json_response(&pools, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Evaluate the saturation index for an ad hoc set of readings
pub async fn saturation(Query(query): Query<SaturationQuery>) -> Json<SaturationResponse> {
    let reading = WaterReading {
        ph: query.ph,
        temperature_f: query.temperature_f,
        calcium_hardness: query.calcium_hardness,
        alkalinity: query.alkalinity,
        tds: query.tds,
    };

    let index = chemistry::saturation_index(&reading);
    Json(SaturationResponse {
        saturation_index: index.map(|i| i.value()),
        balance: index.map(|i| i.balance()),
    })
}

/// Record a daily read for a pool
pub async fn record_daily_read(
    Path(pool_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DailyReadPayload>,
) -> impl IntoResponse {
    let read = NewDailyRead {
        pool_id,
        user_id: payload.user_id,
        read_date: payload.read_date.unwrap_or_else(|| Utc::now().date_naive()),
        chlorine: payload.chlorine,
        ph: payload.ph,
        temperature: payload.temperature,
        flow: payload.flow,
        influent: payload.influent,
        effluent: payload.effluent,
    };

    match state.reading_service.record_daily(read).await {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => {
            tracing::error!("Error recording daily read: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Record a weekly chemistry read; responds with the derived index
pub async fn record_weekly_read(
    Path(pool_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WeeklyReadPayload>,
) -> impl IntoResponse {
    let read = NewWeeklyRead {
        pool_id,
        user_id: payload.user_id,
        read_date: payload.read_date.unwrap_or_else(|| Utc::now().date_naive()),
        tds: payload.tds,
        alkalinity: payload.alkalinity,
        calcium_hardness: payload.calcium_hardness,
        saturation_index: None,
    };

    match state
        .reading_service
        .record_weekly(read, payload.ph, payload.temperature_f)
        .await
    {
        Ok(index) => Json(SaturationResponse {
            saturation_index: index.map(|i| i.value()),
            balance: index.map(|i| i.balance()),
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Error recording weekly read: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Dosing recommendation from a pool's last stored weekly read
pub async fn treatment_plan(
    Path(pool_id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);

    match state.treatment_service.plan(&pool_id).await {
        Ok(plan) => match json_response(&plan, compress).await {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) => {
            tracing::error!("Error building treatment plan for pool {pool_id}: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Log an applied treatment
pub async fn log_treatment(
    Path(pool_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TreatmentPayload>,
) -> impl IntoResponse {
    let treatment = NewTreatment {
        pool_id,
        user_id: payload.user_id,
        treatment_date: payload
            .treatment_date
            .unwrap_or_else(|| Utc::now().date_naive()),
        bicarb_cups_added: payload.bicarb_cups_added,
        calcium_cups_added: payload.calcium_cups_added,
    };

    match state.treatment_service.log(treatment).await {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => {
            tracing::error!("Error logging treatment: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Recent daily reads across all pools
pub async fn daily_report(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);

    let reads = match state.reading_service.daily_report().await {
        Ok(reads) => reads,
        Err(e) => {
            tracing::error!("Error fetching daily report: {e}");
            Vec::<DailyRead>::new()
        }
    };

    match json_response(&reads, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Recent weekly reads across all pools
pub async fn weekly_report(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);

    let reads = match state.reading_service.weekly_report().await {
        Ok(reads) => reads,
        Err(e) => {
            tracing::error!("Error fetching weekly report: {e}");
            Vec::<WeeklyRead>::new()
        }
    };

    match json_response(&reads, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Stream the water balance dashboard for a pool (progressive loading)
pub async fn stream_balance(
    Path(pool_id): Path<String>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let weeks = query.weeks.unwrap_or(12);
    let compress = accepts_brotli(&headers);

    let rx = state.streaming_service.stream_balance(&pool_id, weeks).await;
    stream_from_receiver(rx, compress).await
}
