//! Staff login endpoint.

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    models::user::{LoginRequest, LoginResponse},
    services::user_service,
    state::AppState,
    validation::ValidJson,
};

/// Sign in a back-office user.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Request Body
///
/// ```json
/// { "email": "admin@buena.local", "password": "ChangeMe123!" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "accessToken": "<jwt>" }`
/// - **Error (400)**: malformed body
/// - **Error (401)**: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let access_token = user_service::login(
        &state.pool,
        &state.tokens,
        &request.email,
        &request.password,
    )
    .await?;

    Ok(Json(LoginResponse { access_token }))
}
