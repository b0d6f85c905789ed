use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

use crate::shared::config::AuthConfig;

const JWT_SECRET_KEY: &str = "jwt_secret";

static AUTH_CONFIG: OnceCell<AuthConfig> = OnceCell::new();
static JWT_SECRET: OnceCell<String> = OnceCell::new();

/// Install token lifetimes from configuration (first call wins)
pub fn configure(config: AuthConfig) {
    let _ = AUTH_CONFIG.set(config);
}

fn auth_config() -> AuthConfig {
    AUTH_CONFIG.get().cloned().unwrap_or_default()
}

/// Build claims for a user; lifetime in hours
pub fn build_claims(user_id: &str, email: &str, role: &str, lifetime_hours: i64) -> TokenClaims {
    let now = Utc::now();
    TokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp: (now + chrono::Duration::hours(lifetime_hours)).timestamp() as usize,
        iat: now.timestamp() as usize,
    }
}

pub fn encode_token(claims: &TokenClaims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

pub fn decode_token(token: &str, secret: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;
    Ok(token_data.claims)
}

/// Generate JWT access token with the configured lifetime
pub async fn generate_access_token(
    conn: &DatabaseConnection,
    user_id: &str,
    email: &str,
    role: &str,
) -> Result<String> {
    let claims = build_claims(user_id, email, role, auth_config().access_token_hours);
    let secret = get_jwt_secret(conn).await?;
    encode_token(&claims, &secret)
}

/// Validate JWT token and extract claims
pub async fn validate_token(conn: &DatabaseConnection, token: &str) -> Result<TokenClaims> {
    let secret = get_jwt_secret(conn).await?;
    decode_token(token, &secret)
}

/// Generate refresh token (UUID-based)
pub fn generate_refresh_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Calculate refresh token expiration timestamp
pub fn calculate_refresh_token_expiration() -> String {
    let exp = Utc::now() + chrono::Duration::days(auth_config().refresh_token_days);
    exp.to_rfc3339()
}

/// Load the signing secret from `sys_settings`, creating it on first use
pub async fn get_jwt_secret(conn: &DatabaseConnection) -> Result<String> {
    if let Some(secret) = JWT_SECRET.get() {
        return Ok(secret.clone());
    }

    // INSERT OR IGNORE keeps the first secret if two requests race here
    if load_jwt_secret(conn).await?.is_none() {
        store_jwt_secret(conn, &generate_jwt_secret()).await?;
    }
    let secret = load_jwt_secret(conn)
        .await?
        .ok_or_else(|| anyhow::anyhow!("JWT secret missing after insert"))?;

    Ok(JWT_SECRET.get_or_init(|| secret).clone())
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let random_bytes: [u8; 32] = rand::thread_rng().gen();
    general_purpose::STANDARD.encode(random_bytes)
}

async fn load_jwt_secret(conn: &DatabaseConnection) -> Result<Option<String>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [JWT_SECRET_KEY.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "value")?)),
        None => Ok(None),
    }
}

async fn store_jwt_secret(conn: &DatabaseConnection, secret: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT OR IGNORE INTO sys_settings (key, value, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            JWT_SECRET_KEY.into(),
            secret.to_string().into(),
            "Auto-generated JWT secret for authentication".into(),
            now.clone().into(),
            now.into(),
        ],
    ))
    .await
    .context("Failed to store JWT secret")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip_keeps_role() {
        let claims = build_claims("u1", "mgr@co", "MANAGER", 1);
        let token = encode_token(&claims, "secret").unwrap();
        let decoded = decode_token(&token, "secret").unwrap();
        assert_eq!(decoded.sub, "u1");
        assert_eq!(decoded.role, "MANAGER");
        let actor = decoded.as_actor().unwrap();
        assert_eq!(actor.email, "mgr@co");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = encode_token(&build_claims("u1", "a@co", "ADMIN", 1), "one").unwrap();
        assert!(decode_token(&token, "two").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = encode_token(&build_claims("u1", "a@co", "ADMIN", -2), "secret").unwrap();
        assert!(decode_token(&token, "secret").is_err());
    }

    #[test]
    fn test_generated_secret_is_256_bits() {
        use base64::{engine::general_purpose, Engine as _};
        let decoded = general_purpose::STANDARD
            .decode(generate_jwt_secret())
            .unwrap();
        assert_eq!(decoded.len(), 32);
    }
}
