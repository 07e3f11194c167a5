use crate::handlers::consumption::ConsumptionRecordResponse;
use crate::handlers::users::{UserListResponse, UserResponse};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{ChartData, YearAverages, YearTotals};
use compute::period::{self, MonthCode};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters for the user dashboard period search
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct DashboardQuery {
    /// Searched year
    #[validate(range(min = 2000, max = 2100))]
    pub year: Option<i32>,
    /// Searched month display label (e.g. "Junio")
    pub month: Option<String>,
}

/// Query parameters for the administrator dashboard
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct AdminDashboardQuery {
    /// Focused user for the chart and consumption table
    pub selected_user: Option<i32>,
    /// Substring filter on username or e-mail
    pub q: Option<String>,
    /// Filter by role: "admin" or "user"
    pub role: Option<String>,
    /// Filter by activity: "activos" or "inactivos"
    pub status: Option<String>,
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 10)
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
}

/// Result of the dashboard period search
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchedPeriod {
    pub year: i32,
    pub month_label: String,
    /// Matching record, absent when no reading exists for the period
    pub record: Option<ConsumptionRecordResponse>,
}

/// User dashboard response model
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDashboardResponse {
    pub user: UserResponse,
    /// Records ordered by year and entry, most recent first
    pub records: Vec<ConsumptionRecordResponse>,
    /// Year the totals and averages refer to (most recent year with data)
    pub totals_year: Option<i32>,
    pub totals: Option<YearTotals>,
    pub averages: Option<YearAverages>,
    /// Years with data, most recent first
    pub years: Vec<i32>,
    /// Month display labels for the period search
    pub months: Vec<String>,
    pub searched: Option<SearchedPeriod>,
}

/// Administrator dashboard response model
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboardResponse {
    /// Two-year comparison chart, global or for the selected user
    pub chart: ChartData,
    pub selected_user: Option<UserResponse>,
    /// Selected user's records, empty when no user is selected
    pub records: Vec<ConsumptionRecordResponse>,
    pub totals_year: Option<i32>,
    pub totals: Option<YearTotals>,
    /// Filtered, paginated user listing with activity counts
    pub listing: UserListResponse,
}

fn database_error(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
            code: "DATABASE_ERROR".to_string(),
            success: false,
        }),
    )
}

/// Totals and averages for the most recent year with data
async fn year_summary(
    db: &DatabaseConnection,
    user_id: i32,
    totals_year: Option<i32>,
) -> Result<(Option<YearTotals>, Option<YearAverages>), compute::error::ComputeError> {
    match totals_year {
        Some(year) => {
            let totals = compute::consumption::year_totals(db, user_id, year).await?;
            let averages = compute::consumption::year_averages(db, user_id, year).await?;
            Ok((totals, averages))
        }
        None => Ok((None, None)),
    }
}

/// User dashboard: records, summary, and the optional period search
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/dashboard",
    tag = "dashboard",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        DashboardQuery,
    ),
    responses(
        (status = 200, description = "Dashboard retrieved successfully", body = ApiResponse<UserDashboardResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_user_dashboard(
    Path(user_id): Path<i32>,
    Valid(Query(query)): Valid<Query<DashboardQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserDashboardResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_user_dashboard function for user_id: {}", user_id);

    let user_model = match super::users::find_user(&state, user_id).await? {
        Some(user_model) => user_model,
        None => return Err(super::users::user_not_found(user_id)),
    };

    debug!("Building dashboard for user ID: {}", user_id);
    let rows = match compute::consumption::user_records_with_yoy(&state.db, user_id).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Failed to load consumption rows for user {}: {}", user_id, e);
            return Err(database_error("Failed to load consumption records"));
        }
    };

    // Rows come back ordered by year descending, so the first row carries
    // the most recent year with data
    let totals_year = rows.first().map(|(record, _)| record.year);
    let (totals, averages) = match year_summary(&state.db, user_id, totals_year).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Failed to summarize year for user {}: {}", user_id, e);
            return Err(database_error("Failed to summarize consumption"));
        }
    };

    let mut years: Vec<i32> = Vec::new();
    for (record, _) in &rows {
        if years.last().copied() != Some(record.year) {
            years.push(record.year);
        }
    }

    let searched = match (query.year, query.month.as_ref()) {
        (Some(year), Some(label)) => {
            debug!("Searching period {} {} for user {}", label, year, user_id);
            let matched = period::label_to_code(label).and_then(|code| {
                rows.iter().find(|(record, _)| {
                    record.year == year && MonthCode::normalize(&record.month) == code
                })
            });
            if matched.is_none() {
                warn!("No record found for searched period {} {} (user {})", label, year, user_id);
            }
            Some(SearchedPeriod {
                year,
                month_label: label.clone(),
                record: matched.map(|(record, yoy)| {
                    ConsumptionRecordResponse::with_yoy(record.clone(), yoy.clone())
                }),
            })
        }
        _ => None,
    };

    let records: Vec<ConsumptionRecordResponse> = rows
        .into_iter()
        .map(|(record, yoy)| ConsumptionRecordResponse::with_yoy(record, yoy))
        .collect();

    info!(
        "Dashboard for user {} built with {} records across {} years",
        user_id,
        records.len(),
        years.len()
    );
    let response = ApiResponse {
        data: UserDashboardResponse {
            user: UserResponse::from(user_model),
            records,
            totals_year,
            totals,
            averages,
            years,
            months: MonthCode::ALL.iter().map(|m| m.label().to_string()).collect(),
            searched,
        },
        message: "Dashboard retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Administrator dashboard: comparison chart, focused user and listing
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    tag = "dashboard",
    params(AdminDashboardQuery),
    responses(
        (status = 200, description = "Dashboard retrieved successfully", body = ApiResponse<AdminDashboardResponse>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 404, description = "Selected user not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_admin_dashboard(
    Valid(Query(query)): Valid<Query<AdminDashboardQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AdminDashboardResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_admin_dashboard function");

    let role = match query.role.as_deref() {
        Some(raw) => match super::users::parse_user_role(raw) {
            Ok(role) => Some(role),
            Err(e) => {
                warn!("Invalid role filter: {}", e);
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: e,
                        code: "INVALID_ROLE".to_string(),
                        success: false,
                    }),
                ));
            }
        },
        None => None,
    };
    let active = match query.status.as_deref() {
        Some(raw) => match super::users::parse_user_status(raw) {
            Ok(active) => Some(active),
            Err(e) => {
                warn!("Invalid status filter: {}", e);
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: e,
                        code: "INVALID_STATUS".to_string(),
                        success: false,
                    }),
                ));
            }
        },
        None => None,
    };

    let (year_prev, year_now) = compute::comparison_years(None);
    debug!("Comparing years {} and {}", year_prev, year_now);

    let (chart, selected_user, records, totals_year, totals) = match query.selected_user {
        Some(selected_id) => {
            let user_model = match super::users::find_user(&state, selected_id).await? {
                Some(user_model) => user_model,
                None => return Err(super::users::user_not_found(selected_id)),
            };

            let chart = match compute::consumption::user_comparison(
                &state.db,
                selected_id,
                year_prev,
                year_now,
            )
            .await
            {
                Ok(chart) => chart,
                Err(e) => {
                    error!("Failed to build chart for user {}: {}", selected_id, e);
                    return Err(database_error("Failed to build comparison chart"));
                }
            };

            let rows = match compute::consumption::user_records_with_yoy(&state.db, selected_id).await
            {
                Ok(rows) => rows,
                Err(e) => {
                    error!("Failed to load rows for user {}: {}", selected_id, e);
                    return Err(database_error("Failed to load consumption records"));
                }
            };
            let totals_year = rows.first().map(|(record, _)| record.year);
            let (totals, _) = match year_summary(&state.db, selected_id, totals_year).await {
                Ok(summary) => summary,
                Err(e) => {
                    error!("Failed to summarize year for user {}: {}", selected_id, e);
                    return Err(database_error("Failed to summarize consumption"));
                }
            };
            let records: Vec<ConsumptionRecordResponse> = rows
                .into_iter()
                .map(|(record, yoy)| ConsumptionRecordResponse::with_yoy(record, yoy))
                .collect();

            (chart, Some(UserResponse::from(user_model)), records, totals_year, totals)
        }
        None => {
            let chart = match compute::consumption::global_comparison(&state.db, year_prev, year_now)
                .await
            {
                Ok(chart) => chart,
                Err(e) => {
                    error!("Failed to build global chart: {}", e);
                    return Err(database_error("Failed to build comparison chart"));
                }
            };
            (chart, None, Vec::new(), None, None)
        }
    };

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    let listing = match super::users::fetch_user_listing(
        &state.db,
        query.q.as_deref(),
        role,
        active,
        page,
        limit,
    )
    .await
    {
        Ok(listing) => listing,
        Err(db_error) => {
            error!("Failed to list users for admin dashboard: {}", db_error);
            return Err(database_error("Failed to retrieve users"));
        }
    };

    info!(
        "Admin dashboard built ({} listed users, selected: {:?})",
        listing.users.len(),
        query.selected_user
    );
    let response = ApiResponse {
        data: AdminDashboardResponse {
            chart,
            selected_user,
            records,
            totals_year,
            totals,
            listing,
        },
        message: "Dashboard retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
