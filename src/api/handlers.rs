//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use tracing::warn;

use super::AppState;
use super::types::{ErrorResponse, SizeRequest, SizeResponse};
use crate::pipeline::{SizingReport, run_full_sizing, size_blocking};
use crate::sizing::CostWeights;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(detail: impl ToString) -> ApiError {
    let detail = detail.to_string();
    warn!(%detail, "rejecting request");
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { detail }))
}

/// Form fields collected from a `/api/simulate` upload.
#[derive(Default)]
struct SimulateForm {
    file: Option<(String, Vec<u8>)>,
    lat: Option<f64>,
    lon: Option<f64>,
    pv_cost: Option<f64>,
    battery_cost: Option<f64>,
}

fn parse_number(name: &str, raw: &str) -> Result<f64, ApiError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| bad_request(format!("form field `{name}` must be a number, got \"{raw}\"")))
}

async fn read_form(mut multipart: Multipart) -> Result<SimulateForm, ApiError> {
    let mut form = SimulateForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(bad_request)?;
                form.file = Some((filename, bytes.to_vec()));
            }
            "lat" | "lon" | "pv_cost" | "battery_cost" => {
                let raw = field.text().await.map_err(bad_request)?;
                let value = parse_number(&name, &raw)?;
                match name.as_str() {
                    "lat" => form.lat = Some(value),
                    "lon" => form.lon = Some(value),
                    "pv_cost" => form.pv_cost = Some(value),
                    _ => form.battery_cost = Some(value),
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Sizes an uploaded load file at a location.
///
/// `POST /api/simulate` (multipart: `file`, `lat`, `lon`, optional
/// `pv_cost`, `battery_cost`) → 200 + `SizingReport` JSON, or 400 +
/// `ErrorResponse` for any failure.
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<SizingReport>, ApiError> {
    let form = read_form(multipart).await?;

    let (filename, bytes) = form
        .file
        .ok_or_else(|| bad_request("missing form field `file`"))?;
    let lat = form.lat.ok_or_else(|| bad_request("missing form field `lat`"))?;
    let lon = form.lon.ok_or_else(|| bad_request("missing form field `lon`"))?;

    let defaults = state.config.cost_weights();
    let costs = CostWeights::new(
        form.pv_cost.unwrap_or(defaults.pv_cost),
        form.battery_cost.unwrap_or(defaults.battery_cost),
    );

    let report = run_full_sizing(
        &bytes,
        &filename,
        lat,
        lon,
        costs,
        state.config.search_params(),
        state.solar.as_ref(),
    )
    .await
    .map_err(bad_request)?;

    Ok(Json(report))
}

/// Sizes caller-supplied hourly series directly.
///
/// `POST /api/size` (JSON `SizeRequest`) → 200 + `SizeResponse` JSON, or
/// 400 + `ErrorResponse` for malformed input or a zero solar resource.
pub async fn size(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SizeRequest>, JsonRejection>,
) -> Result<Json<SizeResponse>, ApiError> {
    let Json(req) = body.map_err(|e| bad_request(e.body_text()))?;

    let defaults = state.config.cost_weights();
    let costs = CostWeights::new(
        req.pv_cost.unwrap_or(defaults.pv_cost),
        req.battery_cost.unwrap_or(defaults.battery_cost),
    );

    let (outcome, _, _) = size_blocking(
        req.load,
        req.solar_per_kw,
        costs,
        state.config.search_params(),
    )
    .await
    .map_err(bad_request)?;

    Ok(Json(SizeResponse::from(outcome)))
}
