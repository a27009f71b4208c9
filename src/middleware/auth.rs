//! Bearer token authentication and role guards.
//!
//! `auth_middleware` runs first on every protected route:
//! 1. Extract the token from the `Authorization: Bearer <token>` header
//! 2. Verify signature and expiry
//! 3. Inject an `AuthContext` into the request
//! 4. Reject with HTTP 401 otherwise
//!
//! The role guards run after it and answer 403 when the caller's role is not
//! in the route's allow-list.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, models::user::Role, state::AppState};

/// Authentication context attached to authenticated requests.
///
/// Handlers extract it with `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User id for staff tokens, customer id for customer tokens
    pub subject_id: i32,

    pub email: String,

    pub role: Role,
}

/// Access token authentication middleware function.
///
/// # Returns
///
/// - `Ok(Response)` if the token is valid (calls next handler)
/// - `Err(AppError::Unauthorized("Missing token"))` without a bearer token
/// - `Err(AppError::Unauthorized("Invalid token"))` for bad or expired tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized("Missing token"))?;

    let claims = state.tokens.verify(token)?;

    request.extensions_mut().insert(AuthContext {
        subject_id: claims.sub,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Allow only `admin` tokens.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    ensure_role(&request, &[Role::Admin])?;
    Ok(next.run(request).await)
}

/// Allow only `customer` tokens.
pub async fn require_customer(request: Request, next: Next) -> Result<Response, AppError> {
    ensure_role(&request, &[Role::Customer])?;
    Ok(next.run(request).await)
}

fn ensure_role(request: &Request, allowed: &[Role]) -> Result<(), AppError> {
    match request.extensions().get::<AuthContext>() {
        Some(auth) if allowed.contains(&auth.role) => Ok(()),
        Some(auth) => {
            tracing::info!("{} ({}) denied: role not allowed", auth.email, auth.role);
            Err(AppError::Forbidden)
        }
        None => Err(AppError::Forbidden),
    }
}
