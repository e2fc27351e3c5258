use crate::{error::AppError, AppState};
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use analytics::PortfolioPerformance;
use chrono::NaiveDate;
use core_types::{Asset, AssetUpdate, NewAsset, PriceSnapshot};
use engine::{AssetList, Page, PriceRefreshReport};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
pub struct PriceUpdateRequest {
    pub asset_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PerformanceQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Maps a JSON body rejection onto our 400 response.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn parse_date(name: &str, raw: Option<&str>) -> Result<NaiveDate, AppError> {
    let raw = raw.ok_or_else(|| AppError::BadRequest(format!("{} is required (YYYY-MM-DD)", name)))?;
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        AppError::BadRequest(format!("Invalid {} '{}'. Use the YYYY-MM-DD format.", name, raw))
    })
}

/// # GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the portfolio tracker API" }))
}

/// # GET /assets
/// Lists holdings together with the portfolio summary.
pub async fn list_assets(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Page>,
) -> Result<Json<AssetList>, AppError> {
    Ok(Json(state.service.list_assets(page).await?))
}

/// # POST /assets
pub async fn create_asset(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewAsset>, JsonRejection>,
) -> Result<Json<Asset>, AppError> {
    let new_asset = json_body(payload)?;
    Ok(Json(state.service.create_asset(new_asset).await?))
}

/// # GET /assets/:asset_id
pub async fn get_asset(
    Path(asset_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Asset>, AppError> {
    Ok(Json(state.service.get_asset(asset_id).await?))
}

/// # PUT /assets/:asset_id
/// Partial update; an empty body leaves every field as it is.
pub async fn update_asset(
    Path(asset_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Asset>, AppError> {
    let update = if body.iter().all(u8::is_ascii_whitespace) {
        AssetUpdate::default()
    } else {
        serde_json::from_slice::<AssetUpdate>(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid asset update: {}", e)))?
    };
    Ok(Json(state.service.update_asset(asset_id, update).await?))
}

/// # DELETE /assets/:asset_id
pub async fn delete_asset(
    Path(asset_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Asset>, AppError> {
    Ok(Json(state.service.delete_asset(asset_id).await?))
}

/// # GET /assets/:asset_id/history
pub async fn get_price_history(
    Path(asset_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PriceSnapshot>>, AppError> {
    Ok(Json(state.service.price_history(asset_id).await?))
}

/// # POST /prices/update
/// Best-effort batch refresh; the per-asset outcome is in `results`.
pub async fn update_prices(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PriceUpdateRequest>, JsonRejection>,
) -> Result<Json<PriceRefreshReport>, AppError> {
    let request = json_body(payload)?;
    Ok(Json(state.service.refresh_prices(&request.asset_ids).await))
}

/// # GET /performance?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD
pub async fn get_performance(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PerformanceQuery>,
) -> Result<Json<PortfolioPerformance>, AppError> {
    let start = parse_date("start_date", query.start_date.as_deref())?;
    let end = parse_date("end_date", query.end_date.as_deref())?;
    Ok(Json(state.service.performance(start, end).await?))
}
