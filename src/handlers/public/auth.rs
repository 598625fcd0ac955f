use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || !parts[1].contains('.') {
        return Err(ApiError::validation_error("Invalid email format", None));
    }
    Ok(())
}

/// POST /auth/register - Create a back-office user account
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<Value> {
    validate_email(&payload.email)?;
    if payload.password.len() < 8 {
        return Err(ApiError::validation_error(
            "Password must be at least 8 characters",
            None,
        ));
    }
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation_error("Name is required", None));
    }

    let pool = DatabaseManager::main_pool().await.map_err(ApiError::from)?;

    let existing: Option<(uuid::Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(&payload.email)
            .fetch_optional(&pool)
            .await?;
    if existing.is_some() {
        return Err(ApiError::conflict("This email is already registered"));
    }

    let cost = config::config().security.bcrypt_cost;
    let password_hash = bcrypt::hash(&payload.password, cost)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, name, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(uuid::Uuid::new_v4())
    .bind(payload.email.trim())
    .bind(payload.name.trim())
    .bind(&password_hash)
    .fetch_one(&pool)
    .await?;

    tracing::info!("registered user {}", user.email);
    Ok(ApiResponse::created(json!({ "user": user })))
}

/// POST /auth/login - Authenticate and receive a JWT
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<Value> {
    let pool = DatabaseManager::main_pool().await.map_err(ApiError::from)?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let verified = bcrypt::verify(&payload.password, &user.password_hash)?;
    if !verified {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let claims = Claims::new(user.id, user.email.clone(), user.name.clone(), user.role.clone());
    let token = generate_jwt(claims).map_err(|e| {
        tracing::error!("JWT generation failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    let expires_in = config::config().security.jwt_expiry_hours * 3600;
    Ok(ApiResponse::success(json!({
        "token": token,
        "user": user,
        "expires_in": expires_in,
    })))
}
