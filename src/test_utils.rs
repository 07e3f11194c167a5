#[cfg(test)]
pub mod test_utils {
    use crate::email::EmailService;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use moka::future::Cache;
    use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Cascade deletes rely on foreign key enforcement
        db.execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .expect("Failed to enable foreign keys");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Directory the test mail transport writes messages into
    pub fn test_mail_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("consumo-test-mails");
        std::fs::create_dir_all(&dir).expect("Failed to create test mail directory");
        dir
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;

        // Seeded accounts the tests reference: an administrator with an
        // e-mail and a tenant without one
        let admin = model::entities::user::ActiveModel {
            username: Set("berta".to_string()),
            email: Set(Some("berta@consumo.cl".to_string())),
            role: Set(model::entities::user::UserRole::Admin),
            is_active: Set(true),
            ..Default::default()
        };
        let tenant = model::entities::user::ActiveModel {
            username: Set("sala_cuna_las_flores".to_string()),
            role: Set(model::entities::user::UserRole::User),
            is_active: Set(true),
            ..Default::default()
        };

        admin.insert(&db).await.expect("Failed to create admin user");
        tenant.insert(&db).await.expect("Failed to create tenant user");

        let cache = Cache::new(100);
        let mailer = EmailService::with_file_transport(test_mail_dir());

        AppState { db, cache, mailer }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// This function sets up a tracing subscriber that outputs logs to STDERR,
    /// which is useful for debugging tests. The log level is determined by the
    /// RUST_LOG environment variable, defaulting to WARN if not set.
    ///
    /// # Returns
    ///
    /// A guard that will clean up the subscriber when dropped.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        // Get log level from environment variable or default to WARN
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        // Initialize tracing for tests
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        create_router(state)
    }
}
