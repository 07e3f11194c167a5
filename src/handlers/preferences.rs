use crate::handlers::profiles::{ProfileResponse, ProfileUpdateRequest, build_profile_model};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::profile;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace};
use utoipa::ToSchema;

/// Request body for report preference changes
///
/// Only the three report fields can change through this endpoint; facility
/// and maintenance data go through the profile upsert.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PreferencesRequest {
    /// Report delivery frequency: "off", "m" or "q"
    pub report_frequency: Option<String>,
    /// Report format: "pdf" or "csv"
    pub report_format: Option<String>,
    /// Destination address for scheduled reports
    pub report_email: Option<String>,
}

/// Update a user's report preferences
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/preferences",
    tag = "preferences",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = PreferencesRequest,
    responses(
        (status = 200, description = "Preferences updated successfully", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_preferences(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<PreferencesRequest>,
) -> Result<Json<ApiResponse<ProfileResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_preferences function for user_id: {}", user_id);

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

    // Funnel the allowed fields through the profile write path so the
    // same parsing and defaulting rules apply
    let profile_request = ProfileUpdateRequest {
        report_frequency: request.report_frequency,
        report_format: request.report_format,
        report_email: request.report_email,
        ..Default::default()
    };

    let existed = existing.is_some();
    let active = build_profile_model(&user_model, existing, &profile_request)?;

    trace!("Attempting to write preferences for user ID: {}", user_id);
    let saved = if existed {
        active.update(&state.db).await
    } else {
        active.insert(&state.db).await
    };

    match saved {
        Ok(profile_model) => {
            info!("Preferences for user ID {} updated successfully", user_id);
            let response = ApiResponse {
                data: ProfileResponse::from(profile_model),
                message: "Preferences updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to write preferences for user ID {}: {}", user_id, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to write preferences".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
