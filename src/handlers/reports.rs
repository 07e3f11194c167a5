use crate::helpers::report;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use axum_valid::Valid;
use model::entities::{
    profile,
    profile::ReportFormat,
    user,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters for the report download
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ReportQuery {
    /// Report year (default: current year)
    #[validate(range(min = 2000, max = 2100))]
    pub year: Option<i32>,
    /// "csv" or "pdf" (default: the profile's report format)
    pub format: Option<String>,
}

/// Request body for mailing a report
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct EmailReportRequest {
    /// Report year (default: current year)
    pub year: Option<i32>,
    /// "csv" or "pdf" (default: the profile's report format)
    pub format: Option<String>,
    /// Destination address (default: profile report e-mail, then user e-mail)
    pub to: Option<String>,
}

/// Confirmation of a mailed report
#[derive(Debug, Serialize, ToSchema)]
pub struct EmailReportResponse {
    pub to: String,
    pub filename: String,
}

async fn find_profile(
    state: &AppState,
    user_id: i32,
) -> Result<Option<profile::Model>, (StatusCode, Json<ErrorResponse>)> {
    match profile::Entity::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(&state.db)
        .await
    {
        Ok(found) => Ok(found),
        Err(db_error) => {
            error!("Failed to lookup profile for user ID {}: {}", user_id, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to lookup profile".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

fn resolve_format(
    requested: Option<&str>,
    profile_model: Option<&profile::Model>,
) -> Result<ReportFormat, (StatusCode, Json<ErrorResponse>)> {
    match requested {
        Some(raw) => match super::profiles::parse_report_format(raw) {
            Ok(format) => Ok(format),
            Err(e) => {
                warn!("Unsupported report format requested: {}", raw);
                Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: e,
                        code: "UNSUPPORTED_FORMAT".to_string(),
                        success: false,
                    }),
                ))
            }
        },
        None => Ok(profile_model
            .map(|p| p.report_format.clone())
            .unwrap_or(ReportFormat::Pdf)),
    }
}

/// Generate the report bytes for one user-year
async fn build_report(
    state: &AppState,
    owner: &user::Model,
    year: i32,
    format: ReportFormat,
) -> Result<(Vec<u8>, String), (StatusCode, Json<ErrorResponse>)> {
    debug!(
        "Building {:?} report for user {} year {}",
        format, owner.id, year
    );
    let rows = match compute::consumption::report_rows(&state.db, owner.id, year).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Failed to collect report rows for user {}: {}", owner.id, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to collect report rows".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let rendered = match format {
        ReportFormat::Csv => report::consumption_csv(&owner.username, year, &rows),
        ReportFormat::Pdf => report::consumption_pdf(&owner.username, year, &rows),
    };
    let bytes = match rendered {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to render report for user {}: {}", owner.id, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to render report".to_string(),
                    code: "REPORT_GENERATION_FAILED".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let filename = report::report_filename(&owner.username, year, format);
    Ok((bytes, filename))
}

/// Download a yearly consumption report
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/reports/consumption",
    tag = "reports",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ReportQuery,
    ),
    responses(
        (status = 200, description = "Report bytes as a file attachment"),
        (status = 400, description = "Unsupported format", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_consumption_report(
    Path(user_id): Path<i32>,
    Valid(Query(query)): Valid<Query<ReportQuery>>,
    State(state): State<AppState>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_consumption_report function for user_id: {}", user_id);

    let user_model = match super::users::find_user(&state, user_id).await? {
        Some(user_model) => user_model,
        None => return Err(super::users::user_not_found(user_id)),
    };
    let profile_model = find_profile(&state, user_id).await?;

    let format = resolve_format(query.format.as_deref(), profile_model.as_ref())?;
    let (_, current_year) = compute::comparison_years(None);
    let year = query.year.unwrap_or(current_year);

    let (bytes, filename) = build_report(&state, &user_model, year, format.clone()).await?;

    info!(
        "Serving report {} ({} bytes) for user {}",
        filename,
        bytes.len(),
        user_id
    );
    let headers = [
        (
            header::CONTENT_TYPE,
            report::report_content_type(format).to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// Mail a yearly consumption report as an attachment
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/reports/email",
    tag = "reports",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = EmailReportRequest,
    responses(
        (status = 200, description = "Report emailed successfully", body = ApiResponse<EmailReportResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn email_consumption_report(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<EmailReportRequest>,
) -> Result<Json<ApiResponse<EmailReportResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering email_consumption_report function for user_id: {}", user_id);

    let user_model = match super::users::find_user(&state, user_id).await? {
        Some(user_model) => user_model,
        None => return Err(super::users::user_not_found(user_id)),
    };
    let profile_model = find_profile(&state, user_id).await?;

    let format = resolve_format(request.format.as_deref(), profile_model.as_ref())?;
    let (_, current_year) = compute::comparison_years(None);
    let year = request.year.unwrap_or(current_year);
    if !(2000..=2100).contains(&year) {
        warn!("Rejected report mail for user {}: year {} out of range", user_id, year);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Year {} outside supported range 2000..=2100", year),
                code: "INVALID_YEAR".to_string(),
                success: false,
            }),
        ));
    }

    // Destination falls back from the request to the profile to the account
    let destination = request
        .to
        .clone()
        .or_else(|| profile_model.as_ref().and_then(|p| p.report_email.clone()))
        .or_else(|| user_model.email.clone());
    let destination = match destination {
        Some(destination) => destination,
        None => {
            warn!("No destination e-mail available for user {}", user_id);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("No destination e-mail available for user {}", user_id),
                    code: "NO_DESTINATION_EMAIL".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let (bytes, filename) = build_report(&state, &user_model, year, format.clone()).await?;

    let subject = format!("Reporte de Consumo {} - {}", year, user_model.username);
    let body = format!(
        "Adjunto encontrará el reporte de consumo de {} para el año {}.",
        user_model.username, year
    );
    if let Err(e) = state
        .mailer
        .send_report(
            &destination,
            &subject,
            &body,
            &filename,
            report::report_content_type(format),
            bytes,
        )
        .await
    {
        error!("Failed to mail report for user {}: {}", user_id, e);
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to send report email".to_string(),
                code: "EMAIL_SEND_FAILED".to_string(),
                success: false,
            }),
        ));
    }

    info!("Report {} mailed to {} for user {}", filename, destination, user_id);
    let response = ApiResponse {
        data: EmailReportResponse {
            to: destination,
            filename,
        },
        message: "Report emailed successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
