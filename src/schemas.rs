use common::{ChartData, ChartYears, SeriesPair, YearAverages, YearTotals, YoySummary};
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::email::EmailService;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for expensive operations
    pub cache: Cache<String, CachedData>,
    /// Outbound mail service for report delivery
    pub mailer: EmailService,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Chart(ChartData),
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::profiles::get_profile,
        crate::handlers::profiles::update_profile,
        crate::handlers::consumption::create_consumption,
        crate::handlers::consumption::get_user_consumption,
        crate::handlers::consumption::upsert_consumption,
        crate::handlers::dashboard::get_user_dashboard,
        crate::handlers::dashboard::get_admin_dashboard,
        crate::handlers::charts::get_consumption_chart,
        crate::handlers::reports::get_consumption_report,
        crate::handlers::reports::email_consumption_report,
        crate::handlers::preferences::update_preferences,
    ),
    components(
        schemas(
            ApiResponse<crate::handlers::users::UserResponse>,
            ApiResponse<crate::handlers::users::UserListResponse>,
            ApiResponse<crate::handlers::profiles::ProfileResponse>,
            ApiResponse<crate::handlers::consumption::ConsumptionRecordResponse>,
            ApiResponse<Vec<crate::handlers::consumption::ConsumptionRecordResponse>>,
            ApiResponse<crate::handlers::dashboard::UserDashboardResponse>,
            ApiResponse<crate::handlers::dashboard::AdminDashboardResponse>,
            ApiResponse<ChartData>,
            ApiResponse<crate::handlers::reports::EmailReportResponse>,
            ErrorResponse,
            HealthResponse,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::users::UserListResponse,
            crate::handlers::profiles::ProfileUpdateRequest,
            crate::handlers::profiles::ProfileResponse,
            crate::handlers::consumption::CreateConsumptionRequest,
            crate::handlers::consumption::UpsertConsumptionRequest,
            crate::handlers::consumption::ConsumptionRecordResponse,
            crate::handlers::dashboard::UserDashboardResponse,
            crate::handlers::dashboard::AdminDashboardResponse,
            crate::handlers::dashboard::SearchedPeriod,
            crate::handlers::reports::EmailReportRequest,
            crate::handlers::reports::EmailReportResponse,
            crate::handlers::preferences::PreferencesRequest,
            ChartData,
            ChartYears,
            SeriesPair,
            YoySummary,
            YearTotals,
            YearAverages,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User management endpoints"),
        (name = "profiles", description = "Installation profile endpoints"),
        (name = "consumption", description = "Consumption record endpoints"),
        (name = "dashboard", description = "Dashboard aggregation endpoints"),
        (name = "charts", description = "Comparison chart endpoints"),
        (name = "reports", description = "Report generation and delivery endpoints"),
        (name = "preferences", description = "Report preference endpoints"),
    ),
    info(
        title = "Consumo API",
        description = "Utility Consumption Tracker API - Per-user water and gas consumption records, dashboards and reports",
        version = "0.1.0",
        contact(
            name = "Consumo Team",
            email = "contact@consumo.cl"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
