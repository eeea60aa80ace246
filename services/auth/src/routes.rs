//! Authentication service routes

use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    middleware,
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
};
use tracing::info;

use crate::{
    AppState,
    cookies::{cleared_cookies, token_cookies},
    error::AuthError,
    middleware::{AuthPayload, require_access_token, require_refresh_token},
    models::{LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse},
    response::ApiResponse,
    validation::{validate_login, validate_registration, validate_update},
};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    let refresh_routes = Router::new()
        .route("/api/auth/refresh_token", post(refresh_token))
        .route("/api/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_refresh_token,
        ));

    let protected_routes = Router::new()
        .route("/api/users/me", get(current_user).patch(update_current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access_token,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/login", post(login))
        .route("/api/users", post(register))
        .merge(refresh_routes)
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AuthError> {
    payload
        .map(|Json(body)| body)
        .map_err(|_| AuthError::BadRequest("invalid json".to_string()))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let request = json_body(payload)?;
    validate_login(&request)?;
    info!("Login attempt for {}", request.email);

    let pair = state.auth_service.login(&request).await?;
    let cookies = token_cookies(
        &pair,
        state.auth_service.jwt_service(),
        state.secure_cookies,
    );

    Ok((AppendHeaders(cookies), ApiResponse::ok()))
}

/// Refresh token endpoint, behind the refresh-token gate
pub async fn refresh_token(
    State(state): State<AppState>,
    Extension(payload): Extension<AuthPayload>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Token refresh request for user {}", payload.claims.sub);

    let pair = state
        .auth_service
        .refresh_token(&payload.token, payload.claims.sub)
        .await?;
    let cookies = token_cookies(
        &pair,
        state.auth_service.jwt_service(),
        state.secure_cookies,
    );

    Ok((AppendHeaders(cookies), ApiResponse::ok()))
}

/// Logout endpoint, behind the refresh-token gate
pub async fn logout(
    State(state): State<AppState>,
    Extension(payload): Extension<AuthPayload>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Logout request for user {}", payload.claims.sub);

    state
        .auth_service
        .logout(&payload.token, payload.claims.sub)
        .await?;

    Ok((
        AppendHeaders(cleared_cookies(state.secure_cookies)),
        ApiResponse::ok(),
    ))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let request = json_body(payload)?;
    validate_registration(&request)?;

    let user = state.auth_service.register(&request).await?;
    Ok(ApiResponse::created(UserResponse::from(user)))
}

/// Profile of the caller, behind the access-token gate
pub async fn current_user(
    State(state): State<AppState>,
    Extension(payload): Extension<AuthPayload>,
) -> Result<impl IntoResponse, AuthError> {
    let user = state.auth_service.current_user(payload.claims.sub).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// Update the caller's profile, behind the access-token gate
///
/// A new username makes every token issued under the old one stale.
pub async fn update_current_user(
    State(state): State<AppState>,
    Extension(payload): Extension<AuthPayload>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let request = json_body(body)?;
    validate_update(&request)?;
    info!("Profile update request for user {}", payload.claims.sub);

    let user = state
        .auth_service
        .update_user(payload.claims.sub, &request)
        .await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}
