use crate::handlers::{
    charts::get_consumption_chart,
    consumption::{create_consumption, get_user_consumption, upsert_consumption},
    dashboard::{get_admin_dashboard, get_user_dashboard},
    health::health_check,
    preferences::update_preferences,
    profiles::{get_profile, update_profile},
    reports::{email_consumption_report, get_consumption_report},
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
#[cfg(not(test))]
use axum_prometheus::PrometheusMetricLayer;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // User CRUD routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Profile routes
        .route("/api/v1/users/:user_id/profile", get(get_profile))
        .route("/api/v1/users/:user_id/profile", put(update_profile))
        // Consumption record routes
        .route("/api/v1/users/:user_id/consumption", post(create_consumption))
        .route("/api/v1/users/:user_id/consumption", get(get_user_consumption))
        .route("/api/v1/consumption", put(upsert_consumption))
        // Dashboard routes
        .route("/api/v1/users/:user_id/dashboard", get(get_user_dashboard))
        .route("/api/v1/admin/dashboard", get(get_admin_dashboard))
        // Chart routes
        .route("/api/v1/charts/consumption", get(get_consumption_chart))
        // Report routes
        .route(
            "/api/v1/users/:user_id/reports/consumption",
            get(get_consumption_report),
        )
        .route(
            "/api/v1/users/:user_id/reports/email",
            post(email_consumption_report),
        )
        // Preference routes
        .route("/api/v1/users/:user_id/preferences", put(update_preferences))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Prometheus scrape endpoint, not mounted in the test router
    #[cfg(not(test))]
    let router = {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer)
    };

    router
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
