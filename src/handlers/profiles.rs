use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use compute::schedule;
use model::entities::{
    profile,
    profile::{ReportFormat, ReportFrequency},
    user,
};
use sea_orm::{ActiveEnum, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for upserting a profile
///
/// Omitted fields keep their current values. On first write the row is
/// created with the defaults of the missing fields.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ProfileUpdateRequest {
    /// Facility location (e.g. commune or neighbourhood)
    pub location: Option<String>,
    /// External facility identifier
    pub external_id: Option<String>,
    /// Name of the person in charge
    pub manager_name: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Street address
    pub address: Option<String>,
    /// Related link (e.g. facility page)
    pub link: Option<String>,
    /// Date of the last boiler maintenance
    pub last_maintenance: Option<NaiveDate>,
    /// Date of the next scheduled maintenance
    pub next_maintenance: Option<NaiveDate>,
    /// Months between maintenances (1..=60)
    pub maintenance_interval_months: Option<i16>,
    /// Report delivery frequency: "off", "m" or "q"
    pub report_frequency: Option<String>,
    /// Report format: "pdf" or "csv"
    pub report_format: Option<String>,
    /// Destination address for scheduled reports
    pub report_email: Option<String>,
}

/// Profile response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i32,
    pub user_id: i32,
    pub location: Option<String>,
    pub external_id: Option<String>,
    pub manager_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub link: Option<String>,
    pub last_maintenance: Option<NaiveDate>,
    pub next_maintenance: Option<NaiveDate>,
    pub maintenance_interval_months: i16,
    /// Signed days until the next maintenance, negative when overdue
    pub days_to_next_maintenance: Option<i64>,
    pub report_frequency: String,
    pub report_format: String,
    pub report_email: Option<String>,
}

impl From<profile::Model> for ProfileResponse {
    fn from(model: profile::Model) -> Self {
        let today = Utc::now().date_naive();
        Self {
            id: model.id,
            user_id: model.user_id,
            location: model.location,
            external_id: model.external_id,
            manager_name: model.manager_name,
            phone: model.phone,
            address: model.address,
            link: model.link,
            last_maintenance: model.last_maintenance,
            next_maintenance: model.next_maintenance,
            maintenance_interval_months: model.maintenance_interval_months,
            days_to_next_maintenance: schedule::days_until(model.next_maintenance, today),
            report_frequency: model.report_frequency.to_value(),
            report_format: model.report_format.to_value(),
            report_email: model.report_email,
        }
    }
}

// Helper function to parse a report frequency string to the enum
pub(crate) fn parse_report_frequency(raw: &str) -> Result<ReportFrequency, String> {
    match raw {
        "off" => Ok(ReportFrequency::Off),
        "m" => Ok(ReportFrequency::Monthly),
        "q" => Ok(ReportFrequency::Quarterly),
        _ => Err(format!("Invalid report frequency: {}", raw)),
    }
}

// Helper function to parse a report format string to the enum
pub(crate) fn parse_report_format(raw: &str) -> Result<ReportFormat, String> {
    match raw {
        "pdf" => Ok(ReportFormat::Pdf),
        "csv" => Ok(ReportFormat::Csv),
        _ => Err(format!("Invalid report format: {}", raw)),
    }
}

fn bad_request(error: String, code: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error,
            code: code.to_string(),
            success: false,
        }),
    )
}

/// Merge a profile write request over the current row state.
///
/// Applies the save rules the original system kept in its model hook:
/// a missing `next_maintenance` is projected from `last_maintenance` plus
/// the interval, and a missing `report_email` falls back to the owning
/// user's e-mail. `next_maintenance` must not precede `last_maintenance`.
pub(crate) fn build_profile_model(
    owner: &user::Model,
    existing: Option<profile::Model>,
    request: &ProfileUpdateRequest,
) -> Result<profile::ActiveModel, (StatusCode, Json<ErrorResponse>)> {
    let requested_frequency = match &request.report_frequency {
        Some(raw) => match parse_report_frequency(raw) {
            Ok(frequency) => Some(frequency),
            Err(e) => {
                warn!("Rejected profile write for user {}: {}", owner.id, e);
                return Err(bad_request(e, "INVALID_REPORT_FREQUENCY"));
            }
        },
        None => None,
    };
    let requested_format = match &request.report_format {
        Some(raw) => match parse_report_format(raw) {
            Ok(format) => Some(format),
            Err(e) => {
                warn!("Rejected profile write for user {}: {}", owner.id, e);
                return Err(bad_request(e, "INVALID_REPORT_FORMAT"));
            }
        },
        None => None,
    };
    if let Some(interval) = request.maintenance_interval_months {
        if !(1..=60).contains(&interval) {
            warn!(
                "Rejected profile write for user {}: interval {} months out of bounds",
                owner.id, interval
            );
            return Err(bad_request(
                format!("Maintenance interval must be between 1 and 60 months, got {}", interval),
                "INVALID_MAINTENANCE_INTERVAL",
            ));
        }
    }

    let current = existing.as_ref();

    let location = request.location.clone().or_else(|| current.and_then(|p| p.location.clone()));
    let external_id = request
        .external_id
        .clone()
        .or_else(|| current.and_then(|p| p.external_id.clone()));
    let manager_name = request
        .manager_name
        .clone()
        .or_else(|| current.and_then(|p| p.manager_name.clone()));
    let phone = request.phone.clone().or_else(|| current.and_then(|p| p.phone.clone()));
    let address = request.address.clone().or_else(|| current.and_then(|p| p.address.clone()));
    let link = request.link.clone().or_else(|| current.and_then(|p| p.link.clone()));

    let last_maintenance = request
        .last_maintenance
        .or_else(|| current.and_then(|p| p.last_maintenance));
    let mut next_maintenance = request
        .next_maintenance
        .or_else(|| current.and_then(|p| p.next_maintenance));
    let interval_months = request
        .maintenance_interval_months
        .unwrap_or_else(|| current.map(|p| p.maintenance_interval_months).unwrap_or(12));

    if next_maintenance.is_none() {
        next_maintenance = schedule::project_next(last_maintenance, interval_months as u32);
    }
    if let (Some(last), Some(next)) = (last_maintenance, next_maintenance) {
        if next < last {
            warn!(
                "Rejected profile write for user {}: next maintenance {} precedes last {}",
                owner.id, next, last
            );
            return Err(bad_request(
                format!("Next maintenance {} precedes last maintenance {}", next, last),
                "INVALID_MAINTENANCE_DATES",
            ));
        }
    }

    let report_frequency = requested_frequency
        .unwrap_or_else(|| current.map(|p| p.report_frequency.clone()).unwrap_or(ReportFrequency::Off));
    let report_format = requested_format
        .unwrap_or_else(|| current.map(|p| p.report_format.clone()).unwrap_or(ReportFormat::Pdf));
    let report_email = request
        .report_email
        .clone()
        .or_else(|| current.and_then(|p| p.report_email.clone()))
        .or_else(|| owner.email.clone());

    let mut active: profile::ActiveModel = match existing {
        Some(model) => model.into(),
        None => profile::ActiveModel {
            user_id: Set(owner.id),
            ..Default::default()
        },
    };

    active.location = Set(location);
    active.external_id = Set(external_id);
    active.manager_name = Set(manager_name);
    active.phone = Set(phone);
    active.address = Set(address);
    active.link = Set(link);
    active.last_maintenance = Set(last_maintenance);
    active.next_maintenance = Set(next_maintenance);
    active.maintenance_interval_months = Set(interval_months);
    active.report_frequency = Set(report_frequency);
    active.report_format = Set(report_format);
    active.report_email = Set(report_email);

    Ok(active)
}

/// Get a user's profile
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/profile",
    tag = "profiles",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<ProfileResponse>),
        (status = 404, description = "User or profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_profile(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProfileResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_profile function for user_id: {}", user_id);

    match super::users::find_user(&state, user_id).await? {
        Some(_) => {}
        None => return Err(super::users::user_not_found(user_id)),
    }

    debug!("Fetching profile for user ID: {}", user_id);
    match profile::Entity::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(&state.db)
        .await
    {
        Ok(Some(profile_model)) => {
            info!("Successfully retrieved profile for user ID: {}", user_id);
            let response = ApiResponse {
                data: ProfileResponse::from(profile_model),
                message: "Profile retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Profile for user ID {} not found", user_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Profile for user {} not found", user_id),
                    code: "PROFILE_NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(db_error) => {
            error!("Failed to retrieve profile for user ID {}: {}", user_id, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve profile".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Upsert a user's profile
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/profile",
    tag = "profiles",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_profile(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<ProfileUpdateRequest>,
) -> Result<Json<ApiResponse<ProfileResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_profile function for user_id: {}", user_id);

    let user_model = match super::users::find_user(&state, user_id).await? {
        Some(user_model) => user_model,
        None => return Err(super::users::user_not_found(user_id)),
    };

    debug!("Looking up existing profile for user ID: {}", user_id);
    let existing = match profile::Entity::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(&state.db)
        .await
    {
        Ok(existing) => existing,
        Err(db_error) => {
            error!("Failed to lookup profile for user ID {}: {}", user_id, db_error);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to lookup profile".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let existed = existing.is_some();
    let active = build_profile_model(&user_model, existing, &request)?;

    trace!("Attempting to write profile for user ID: {}", user_id);
    let saved = if existed {
        active.update(&state.db).await
    } else {
        active.insert(&state.db).await
    };

    match saved {
        Ok(profile_model) => {
            info!(
                "Profile for user ID {} {} successfully",
                user_id,
                if existed { "updated" } else { "created" }
            );
            let response = ApiResponse {
                data: ProfileResponse::from(profile_model),
                message: "Profile updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to write profile for user ID {}: {}", user_id, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to write profile".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
