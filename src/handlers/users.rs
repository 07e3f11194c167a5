use crate::handlers::profiles::{ProfileUpdateRequest, build_profile_model};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::entities::{
    user,
    user::UserRole,
};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for creating a new user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Username (must be unique)
    pub username: String,
    /// Contact e-mail
    pub email: Option<String>,
    /// Role: "admin" or "user" (default "user")
    pub role: Option<String>,
    /// Whether the account starts active (default true)
    pub is_active: Option<bool>,
    /// Optional inline profile written together with the user
    pub profile: Option<ProfileUpdateRequest>,
}

/// Request body for updating a user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    /// Username (must be unique)
    pub username: Option<String>,
    /// Contact e-mail
    pub email: Option<String>,
    /// Role: "admin" or "user"
    pub role: Option<String>,
    /// Active flag
    pub is_active: Option<bool>,
}

/// User response model
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    /// Role code: "admin" or "user"
    pub role: String,
    /// Human-readable role name
    pub role_label: String,
    pub is_active: bool,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            role: model.role.to_value(),
            role_label: model.role.label().to_string(),
            is_active: model.is_active,
        }
    }
}

/// Query parameters for listing users
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct UserListQuery {
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

/// Paginated user listing with activity counts
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    /// Users matching the filters
    pub total: u64,
    /// Matching users that are active
    pub active: u64,
    /// Matching users that are inactive
    pub inactive: u64,
    pub page: u64,
    pub pages: u64,
}

// Helper function to parse a role string to the UserRole enum
pub(crate) fn parse_user_role(raw: &str) -> Result<UserRole, String> {
    match raw {
        "admin" => Ok(UserRole::Admin),
        "user" => Ok(UserRole::User),
        _ => Err(format!("Invalid role: {}", raw)),
    }
}

// Helper function to parse an activity filter to the is_active flag
pub(crate) fn parse_user_status(raw: &str) -> Result<bool, String> {
    match raw {
        "activos" => Ok(true),
        "inactivos" => Ok(false),
        _ => Err(format!("Invalid status filter: {}", raw)),
    }
}

/// Shared user lookup with the database error already mapped
pub(crate) async fn find_user(
    state: &AppState,
    user_id: i32,
) -> Result<Option<user::Model>, (StatusCode, Json<ErrorResponse>)> {
    match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(found) => Ok(found),
        Err(db_error) => {
            error!("Failed to lookup user with ID {}: {}", user_id, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to lookup user".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Standard 404 payload for a missing user
pub(crate) fn user_not_found(user_id: i32) -> (StatusCode, Json<ErrorResponse>) {
    warn!("User with ID {} not found", user_id);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("User with ID {} not found", user_id),
            code: "USER_NOT_FOUND".to_string(),
            success: false,
        }),
    )
}

/// Filtered, paginated user listing with the activity counts the admin
/// dashboard shows next to the table.
pub(crate) async fn fetch_user_listing(
    db: &DatabaseConnection,
    q: Option<&str>,
    role: Option<UserRole>,
    active: Option<bool>,
    page: u64,
    limit: u64,
) -> Result<UserListResponse, DbErr> {
    let mut condition = Condition::all();
    if let Some(q) = q {
        condition = condition.add(
            Condition::any()
                .add(user::Column::Username.contains(q))
                .add(user::Column::Email.contains(q)),
        );
    }
    if let Some(role) = role {
        condition = condition.add(user::Column::Role.eq(role));
    }
    if let Some(active) = active {
        condition = condition.add(user::Column::IsActive.eq(active));
    }

    // Counts follow the q/role/status filters, like the original listing
    let total = user::Entity::find()
        .filter(condition.clone())
        .count(db)
        .await?;
    let active_count = user::Entity::find()
        .filter(condition.clone())
        .filter(user::Column::IsActive.eq(true))
        .count(db)
        .await?;

    let users = user::Entity::find()
        .filter(condition)
        .order_by_asc(user::Column::Id)
        .paginate(db, limit)
        .fetch_page(page - 1)
        .await?;

    let pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

    Ok(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        total,
        active: active_count,
        inactive: total - active_count,
        page,
        pages,
    })
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_user function");
    debug!("Creating user with username: {}", request.username);

    let role = match request.role.as_deref() {
        Some(raw) => match parse_user_role(raw) {
            Ok(role) => role,
            Err(e) => {
                warn!("Invalid role for new user '{}': {}", request.username, e);
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
        None => UserRole::User,
    };

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        email: Set(request.email.clone()),
        role: Set(role),
        is_active: Set(request.is_active.unwrap_or(true)),
        ..Default::default()
    };

    trace!("Attempting to insert new user into database");
    let user_model = match new_user.insert(&state.db).await {
        Ok(user_model) => user_model,
        Err(db_error) => {
            error!("Failed to create user '{}': {}", request.username, db_error);

            // Handle specific database errors
            return Err(match db_error {
                DbErr::Exec(ref exec_err) => {
                    // Check for unique constraint violations
                    let error_msg = exec_err.to_string().to_lowercase();
                    if error_msg.contains("unique") || error_msg.contains("constraint") {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: format!("Username '{}' already exists", request.username),
                                code: "USERNAME_ALREADY_EXISTS".to_string(),
                                success: false,
                            }),
                        )
                    } else {
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(ErrorResponse {
                                error: "Failed to create user due to database constraint".to_string(),
                                code: "DATABASE_CONSTRAINT_ERROR".to_string(),
                                success: false,
                            }),
                        )
                    }
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error while creating user".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                ),
            });
        }
    };

    // Every user carries a profile row, created together with the account
    let profile_request = request.profile.unwrap_or_default();
    let profile_active = build_profile_model(&user_model, None, &profile_request)?;

    trace!("Attempting to insert profile for new user ID: {}", user_model.id);
    if let Err(db_error) = profile_active.insert(&state.db).await {
        error!(
            "Failed to create profile for new user ID {}: {}",
            user_model.id, db_error
        );
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to create user profile".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            }),
        ));
    }

    info!(
        "User created successfully with ID: {}, username: {}",
        user_model.id, user_model.username
    );
    let response = ApiResponse {
        data: UserResponse::from(user_model),
        message: "User created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List users with filters and pagination
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<UserListResponse>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_users(
    Valid(Query(query)): Valid<Query<UserListQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserListResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_users function");

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    debug!("Fetching users - page: {}, limit: {}", page, limit);

    let role = match query.role.as_deref() {
        Some(raw) => match parse_user_role(raw) {
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
        Some(raw) => match parse_user_status(raw) {
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

    match fetch_user_listing(&state.db, query.q.as_deref(), role, active, page, limit).await {
        Ok(listing) => {
            info!(
                "Successfully retrieved {} of {} users",
                listing.users.len(),
                listing.total
            );
            let response = ApiResponse {
                data: listing,
                message: "Users retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve users from database: {}", db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve users".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_user function for user_id: {}", user_id);
    debug!("Fetching user with ID: {}", user_id);

    match find_user(&state, user_id).await? {
        Some(user_model) => {
            info!(
                "Successfully retrieved user with ID: {}, username: {}",
                user_model.id, user_model.username
            );
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "User retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        None => Err(user_not_found(user_id)),
    }
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_user function for user_id: {}", user_id);
    debug!("Updating user with ID: {}", user_id);

    // First, find the existing user
    trace!("Looking up existing user with ID: {}", user_id);
    let existing_user = match find_user(&state, user_id).await? {
        Some(user_model) => {
            debug!("Found existing user: {}", user_model.username);
            user_model
        }
        None => return Err(user_not_found(user_id)),
    };

    // Create active model for update
    let mut user_active: user::ActiveModel = existing_user.into();
    let mut updated_fields = Vec::new();

    // Update only provided fields
    if let Some(username) = request.username {
        debug!("Updating username to: {}", username);
        user_active.username = Set(username.clone());
        updated_fields.push(format!("username: {}", username));
    }
    if let Some(email) = request.email {
        user_active.email = Set(Some(email.clone()));
        updated_fields.push(format!("email: {}", email));
    }
    if let Some(raw_role) = request.role {
        match parse_user_role(&raw_role) {
            Ok(role) => {
                user_active.role = Set(role);
                updated_fields.push(format!("role: {}", raw_role));
            }
            Err(e) => {
                warn!("Invalid role for user ID {}: {}", user_id, e);
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: e,
                        code: "INVALID_ROLE".to_string(),
                        success: false,
                    }),
                ));
            }
        }
    }
    if let Some(is_active) = request.is_active {
        user_active.is_active = Set(is_active);
        updated_fields.push(format!("is_active: {}", is_active));
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for user ID: {}", user_id);
    } else {
        debug!("Updating fields: {}", updated_fields.join(", "));
    }

    trace!("Attempting to update user in database");
    match user_active.update(&state.db).await {
        Ok(updated_user) => {
            info!(
                "User with ID {} updated successfully. Updated fields: {}",
                user_id,
                if updated_fields.is_empty() {
                    "none".to_string()
                } else {
                    updated_fields.join(", ")
                }
            );
            let response = ApiResponse {
                data: UserResponse::from(updated_user),
                message: "User updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update user with ID {}: {}", user_id, db_error);
            Err(match db_error {
                DbErr::Exec(ref exec_err) => {
                    let error_msg = exec_err.to_string().to_lowercase();
                    if error_msg.contains("unique") || error_msg.contains("constraint") {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: "Username already exists".to_string(),
                                code: "USERNAME_ALREADY_EXISTS".to_string(),
                                success: false,
                            }),
                        )
                    } else {
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(ErrorResponse {
                                error: "Failed to update user due to database constraint".to_string(),
                                code: "DATABASE_CONSTRAINT_ERROR".to_string(),
                                success: false,
                            }),
                        )
                    }
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error while updating user".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                ),
            })
        }
    }
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering delete_user function for user_id: {}", user_id);
    debug!("Attempting to delete user with ID: {}", user_id);

    match user::Entity::delete_by_id(user_id).exec(&state.db).await {
        Ok(delete_result) => {
            debug!(
                "Delete operation completed. Rows affected: {}",
                delete_result.rows_affected
            );
            if delete_result.rows_affected > 0 {
                info!("User with ID {} deleted successfully", user_id);
                let response = ApiResponse {
                    data: format!("User {} deleted", user_id),
                    message: "User deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                Err(user_not_found(user_id))
            }
        }
        Err(db_error) => {
            error!("Failed to delete user with ID {}: {}", user_id, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete user".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
