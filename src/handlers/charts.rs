use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::ChartData;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters for the comparison chart
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ChartQuery {
    /// User scope; absent selects the global boiler series
    #[validate(range(min = 1))]
    pub user_id: Option<i32>,
    /// Later year of the comparison (default: current year)
    #[validate(range(min = 2000, max = 2100))]
    pub year_now: Option<i32>,
    /// Earlier year of the comparison (default: year_now - 1)
    #[validate(range(min = 2000, max = 2100))]
    pub year_prev: Option<i32>,
}

/// Two-year water/gas comparison chart
#[utoipa::path(
    get,
    path = "/api/v1/charts/consumption",
    tag = "charts",
    params(ChartQuery),
    responses(
        (status = 200, description = "Chart data retrieved successfully", body = ApiResponse<ChartData>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_consumption_chart(
    Valid(Query(query)): Valid<Query<ChartQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChartData>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_consumption_chart function");

    let (_, current_year) = compute::comparison_years(None);
    let year_now = query.year_now.unwrap_or(current_year);
    let year_prev = query.year_prev.unwrap_or(year_now - 1);

    let scope = query
        .user_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "global".to_string());
    let cache_key = format!("chart_{}_{}_{}", scope, year_prev, year_now);

    if let Some(CachedData::Chart(chart)) = state.cache.get(&cache_key).await {
        debug!("Returning cached chart for key: {}", cache_key);
        let response = ApiResponse {
            data: chart,
            message: "Chart data retrieved successfully".to_string(),
            success: true,
        };
        return Ok(Json(response));
    }

    let chart = match query.user_id {
        Some(user_id) => {
            if super::users::find_user(&state, user_id).await?.is_none() {
                return Err(super::users::user_not_found(user_id));
            }
            debug!(
                "Building chart for user {} comparing {} and {}",
                user_id, year_prev, year_now
            );
            compute::consumption::user_comparison(&state.db, user_id, year_prev, year_now).await
        }
        None => {
            debug!("Building global chart comparing {} and {}", year_prev, year_now);
            compute::consumption::global_comparison(&state.db, year_prev, year_now).await
        }
    };

    match chart {
        Ok(chart) => {
            state
                .cache
                .insert(cache_key.clone(), CachedData::Chart(chart.clone()))
                .await;
            info!("Chart built and cached under key: {}", cache_key);
            let response = ApiResponse {
                data: chart,
                message: "Chart data retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => {
            error!("Failed to build comparison chart: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to build comparison chart".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
