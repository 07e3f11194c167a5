use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use common::YoySummary;
use compute::period::{self, MonthCode};
use model::entities::consumption_record;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for a user consumption entry
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateConsumptionRequest {
    /// Reading year (2000..=2100)
    pub year: i32,
    /// Month code, e.g. "jun" (also accepts "jun-25" or "Junio")
    pub month: String,
    /// Optional day of the reading (1..=31), informational only
    pub day: Option<i16>,
    /// Water consumption in cubic meters
    pub water_m3: Option<Decimal>,
    /// Gas consumption in cubic meters
    pub gas_m3: Option<Decimal>,
    /// Billed cost
    pub cost: Option<Decimal>,
}

/// Request body for the administrator upsert
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpsertConsumptionRequest {
    /// Owning user ID
    pub user_id: i32,
    /// Reading year (2000..=2100)
    pub year: i32,
    /// Month code, e.g. "jun"
    pub month: String,
    /// Water consumption in cubic meters
    pub water_m3: Option<Decimal>,
    /// Gas consumption in cubic meters
    pub gas_m3: Option<Decimal>,
    /// Billed cost
    pub cost: Option<Decimal>,
}

/// Consumption record response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ConsumptionRecordResponse {
    pub id: i32,
    pub user_id: i32,
    pub year: i32,
    /// Stored month code (e.g. "jun-25")
    pub month: String,
    /// Display label for the month (e.g. "Junio")
    pub month_label: String,
    pub day: Option<i16>,
    pub water_m3: Option<Decimal>,
    pub gas_m3: Option<Decimal>,
    pub cost: Option<Decimal>,
    /// Year-over-year deltas against the same month one year earlier
    pub yoy: Option<YoySummary>,
}

impl From<consumption_record::Model> for ConsumptionRecordResponse {
    fn from(model: consumption_record::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            year: model.year,
            month_label: period::display_label(&model.month),
            month: model.month,
            day: model.day,
            water_m3: model.water_m3,
            gas_m3: model.gas_m3,
            cost: model.cost,
            yoy: None,
        }
    }
}

impl ConsumptionRecordResponse {
    pub(crate) fn with_yoy(model: consumption_record::Model, yoy: YoySummary) -> Self {
        let mut response = Self::from(model);
        response.yoy = Some(yoy);
        response
    }
}

fn validate_year(year: i32) -> Result<(), String> {
    if (2000..=2100).contains(&year) {
        Ok(())
    } else {
        Err(format!("Year {} outside supported range 2000..=2100", year))
    }
}

fn validate_day(day: i16) -> Result<(), String> {
    if (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(format!("Day {} outside range 1..=31", day))
    }
}

/// Record a consumption reading for a user
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/consumption",
    tag = "consumption",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = CreateConsumptionRequest,
    responses(
        (status = 201, description = "Consumption record created successfully", body = ApiResponse<ConsumptionRecordResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_consumption(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<CreateConsumptionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ConsumptionRecordResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering create_consumption function for user_id: {}", user_id);
    debug!(
        "Creating consumption record for user {} - {} {}",
        user_id, request.month, request.year
    );

    if super::users::find_user(&state, user_id).await?.is_none() {
        return Err(super::users::user_not_found(user_id));
    }

    if let Err(e) = validate_year(request.year) {
        warn!("Rejected consumption entry for user {}: {}", user_id, e);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e,
                code: "INVALID_YEAR".to_string(),
                success: false,
            }),
        ));
    }
    if let Some(day) = request.day {
        if let Err(e) = validate_day(day) {
            warn!("Rejected consumption entry for user {}: {}", user_id, e);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e,
                    code: "INVALID_DAY".to_string(),
                    success: false,
                }),
            ));
        }
    }

    let code = match MonthCode::parse(&request.month) {
        Ok(code) => code,
        Err(e) => {
            warn!("Rejected consumption entry for user {}: {}", user_id, e);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                    code: "INVALID_MONTH".to_string(),
                    success: false,
                }),
            ));
        }
    };

    // User entries carry the two-digit year suffix, like the original form
    let stored_month = format!("{}-{:02}", code.code(), request.year % 100);

    let new_record = consumption_record::ActiveModel {
        user_id: Set(user_id),
        year: Set(request.year),
        month: Set(stored_month),
        day: Set(request.day),
        water_m3: Set(request.water_m3),
        gas_m3: Set(request.gas_m3),
        cost: Set(request.cost),
        ..Default::default()
    };

    trace!("Attempting to insert consumption record into database");
    match new_record.insert(&state.db).await {
        Ok(record) => {
            info!(
                "Consumption record created with ID: {} for user {} ({} {})",
                record.id, user_id, record.month, record.year
            );
            let response = ApiResponse {
                data: ConsumptionRecordResponse::from(record),
                message: "Consumption record created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!(
                "Failed to create consumption record for user {}: {}",
                user_id, db_error
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create consumption record".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// List a user's consumption records with year-over-year deltas
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/consumption",
    tag = "consumption",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Consumption records retrieved successfully", body = ApiResponse<Vec<ConsumptionRecordResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_user_consumption(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ConsumptionRecordResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_user_consumption function for user_id: {}", user_id);

    if super::users::find_user(&state, user_id).await?.is_none() {
        return Err(super::users::user_not_found(user_id));
    }

    debug!("Fetching consumption records for user ID: {}", user_id);
    match compute::consumption::user_records_with_yoy(&state.db, user_id).await {
        Ok(records) => {
            info!(
                "Successfully retrieved {} consumption records for user {}",
                records.len(),
                user_id
            );
            let data: Vec<ConsumptionRecordResponse> = records
                .into_iter()
                .map(|(record, yoy)| ConsumptionRecordResponse::with_yoy(record, yoy))
                .collect();
            let response = ApiResponse {
                data,
                message: "Consumption records retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(e) => {
            error!(
                "Failed to retrieve consumption records for user {}: {}",
                user_id, e
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve consumption records".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Create or update a record for a (user, year, month) key
#[utoipa::path(
    put,
    path = "/api/v1/consumption",
    tag = "consumption",
    request_body = UpsertConsumptionRequest,
    responses(
        (status = 200, description = "Consumption record updated successfully", body = ApiResponse<ConsumptionRecordResponse>),
        (status = 201, description = "Consumption record created successfully", body = ApiResponse<ConsumptionRecordResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn upsert_consumption(
    State(state): State<AppState>,
    Json(request): Json<UpsertConsumptionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ConsumptionRecordResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering upsert_consumption function");
    debug!(
        "Upserting consumption for user {} - {} {}",
        request.user_id, request.month, request.year
    );

    if super::users::find_user(&state, request.user_id).await?.is_none() {
        return Err(super::users::user_not_found(request.user_id));
    }

    if let Err(e) = validate_year(request.year) {
        warn!("Rejected upsert for user {}: {}", request.user_id, e);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e,
                code: "INVALID_YEAR".to_string(),
                success: false,
            }),
        ));
    }

    let code = match MonthCode::parse(&request.month) {
        Ok(code) => code,
        Err(e) => {
            warn!("Rejected upsert for user {}: {}", request.user_id, e);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                    code: "INVALID_MONTH".to_string(),
                    success: false,
                }),
            ));
        }
    };

    // The upsert key matches the bare stored code; administrator rows never
    // carry the year suffix
    trace!("Looking up existing record for the ({}, {}, {}) key", request.user_id, request.year, code.code());
    let existing = match consumption_record::Entity::find()
        .filter(consumption_record::Column::UserId.eq(request.user_id))
        .filter(consumption_record::Column::Year.eq(request.year))
        .filter(consumption_record::Column::Month.eq(code.code()))
        .one(&state.db)
        .await
    {
        Ok(existing) => existing,
        Err(db_error) => {
            error!(
                "Failed to lookup consumption record for user {}: {}",
                request.user_id, db_error
            );
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to lookup consumption record".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let (saved, created) = match existing {
        Some(record) => {
            debug!("Updating existing record ID {} in place", record.id);
            let mut active: consumption_record::ActiveModel = record.into();
            active.water_m3 = Set(request.water_m3);
            active.gas_m3 = Set(request.gas_m3);
            active.cost = Set(request.cost);
            (active.update(&state.db).await, false)
        }
        None => {
            debug!("No record for the key, creating a new one");
            let active = consumption_record::ActiveModel {
                user_id: Set(request.user_id),
                year: Set(request.year),
                month: Set(code.code().to_string()),
                day: Set(None),
                water_m3: Set(request.water_m3),
                gas_m3: Set(request.gas_m3),
                cost: Set(request.cost),
                ..Default::default()
            };
            (active.insert(&state.db).await, true)
        }
    };

    match saved {
        Ok(record) => {
            info!(
                "Consumption record {} for user {} ({} {})",
                if created { "created" } else { "updated" },
                request.user_id,
                record.month,
                record.year
            );
            let response = ApiResponse {
                data: ConsumptionRecordResponse::from(record),
                message: if created {
                    "Consumption record created successfully".to_string()
                } else {
                    "Consumption record updated successfully".to_string()
                },
                success: true,
            };
            let status = if created { StatusCode::CREATED } else { StatusCode::OK };
            Ok((status, Json(response)))
        }
        Err(db_error) => {
            error!(
                "Failed to upsert consumption record for user {}: {}",
                request.user_id, db_error
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to upsert consumption record".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
