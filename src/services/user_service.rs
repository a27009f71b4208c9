//! Back-office user service: admin seeding and staff login.

use crate::{
    config::DEFAULT_ADMIN_PASSWORD,
    db::DbPool,
    error::AppError,
    models::user::{Role, User},
    services::auth_service::{self, TokenKeys},
};

/// Look up a user by email (case-insensitive).
pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, role, enabled FROM users WHERE email = $1",
    )
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Insert a new user with an already-hashed password.
pub async fn create(
    pool: &DbPool,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, role, enabled)
        VALUES ($1, $2, $3, true)
        RETURNING id, email, password_hash, role, enabled
        "#,
    )
    .bind(email.trim().to_lowercase())
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn count(pool: &DbPool) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Create the first admin account when the `users` table is empty.
pub async fn seed_admin(
    pool: &DbPool,
    email: &str,
    password: &str,
    bcrypt_cost: u32,
) -> Result<(), AppError> {
    if count(pool).await? > 0 {
        return Ok(());
    }

    let password_hash = auth_service::hash_password(password, bcrypt_cost).await?;
    let user = create(pool, email, &password_hash, Role::Admin).await?;

    tracing::info!("Seeded admin user {}", user.email);
    if password == DEFAULT_ADMIN_PASSWORD {
        tracing::warn!("Admin user is using the default password; set INIT_ADMIN_PASSWORD");
    }

    Ok(())
}

/// Check staff credentials and issue an access token.
///
/// # Errors
///
/// - `Unauthorized("Invalid credentials")`: unknown email, disabled account, wrong password
pub async fn login(
    pool: &DbPool,
    tokens: &TokenKeys,
    email: &str,
    password: &str,
) -> Result<String, AppError> {
    let candidate = find_by_email(pool, email)
        .await?
        .filter(|user| user.enabled);
    let verified = match &candidate {
        Some(user) => {
            auth_service::verify_password(password, &user.password_hash)
                .await?
        }
        None => false,
    };
    let user = candidate.filter(|_| verified).ok_or_else(|| {
        tracing::info!("Failed staff login for {}", email);
        AppError::Unauthorized("Invalid credentials")
    })?;

    tracing::info!("Staff login for {}", user.email);
    tokens.issue(user.id, &user.email, user.role)
}
