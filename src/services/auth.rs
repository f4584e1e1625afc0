//! Authentication service for login users and JWT handling
//!
//! Provides:
//! - Password hashing with bcrypt
//! - Access/refresh token issuance (`tokenAuth`)
//! - Access token verification (`verifyToken`)
//! - Refresh token rotation (`refreshToken`)
//! - Signing secret bootstrap

use base64::Engine;
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::db::sqlite_helpers::{datetime_to_str, str_to_datetime};
use crate::db::{CreateUser, Database, UserRecord};

/// Key used to store the JWT signing secret in auth_secrets. Never exposed via GraphQL.
const AUTH_SECRETS_JWT_KEY: &str = "jwt_secret";

const ACCESS_TOKEN_TYPE: &str = "access";
const REFRESH_TOKEN_TYPE: &str = "refresh";

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please enter valid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Username already taken")]
    UsernameTaken,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials
            | AuthError::InvalidToken(_)
            | AuthError::InvalidRefreshToken => "UNAUTHORIZED",
            AuthError::UsernameTaken => "VALIDATION_FAILED",
            AuthError::Internal(_) => "INTERNAL",
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims structure for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User ID (subject)
    pub sub: String,
    pub username: String,
    pub token_type: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
    /// When the login that started this token chain happened
    pub orig_iat: i64,
}

/// Claims structure for refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    /// User ID (subject)
    pub sub: String,
    pub token_type: String,
    /// Unique token ID, keeps two tokens issued in the same second distinct
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
    pub orig_iat: i64,
}

// ============================================================================
// Auth Types
// ============================================================================

/// Verified contents of an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub user_id: String,
    pub username: String,
    pub exp: i64,
    pub orig_iat: i64,
}

impl From<AccessTokenClaims> for TokenPayload {
    fn from(claims: AccessTokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            exp: claims.exp,
            orig_iat: claims.orig_iat,
        }
    }
}

/// Token pair returned after successful authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    /// Short-lived access token
    pub access_token: String,
    /// Long-lived refresh token
    pub refresh_token: String,
    /// Access token expiration in seconds
    pub expires_in: i64,
    /// Token type (always "Bearer")
    pub token_type: String,
    pub payload: TokenPayload,
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub access_token_lifetime: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_lifetime: i64,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// Token lifetimes and cost from the app config, with an already-resolved secret
    pub fn from_config(config: &Config, jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            access_token_lifetime: config.access_token_lifetime,
            refresh_token_lifetime: config.refresh_token_lifetime,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

/// Return the configured secret, or the one kept in auth_secrets (generated on first use)
pub async fn resolve_jwt_secret(db: &Database, configured: Option<&str>) -> anyhow::Result<String> {
    if let Some(secret) = configured {
        return Ok(secret.to_string());
    }

    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM auth_secrets WHERE key = ?")
        .bind(AUTH_SECRETS_JWT_KEY)
        .fetch_optional(db.pool())
        .await?;

    if let Some((value,)) = row
        && !value.trim().is_empty()
    {
        return Ok(value);
    }

    let secret = generate_jwt_secret();
    sqlx::query("INSERT OR REPLACE INTO auth_secrets (key, value) VALUES (?, ?)")
        .bind(AUTH_SECRETS_JWT_KEY)
        .bind(&secret)
        .execute(db.pool())
        .await?;
    tracing::info!("JWT secret generated and stored in database");
    Ok(secret)
}

fn generate_jwt_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

// ============================================================================
// Auth Service
// ============================================================================

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Create a login user
    pub async fn create_user(&self, username: &str, password: &str) -> AuthResult<UserRecord> {
        let users = self.db.users();

        if users.get_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = self.hash_password(password)?;
        let user = users
            .create(CreateUser {
                username: username.to_string(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Create the user unless the username already exists
    pub async fn ensure_user(&self, username: &str, password: &str) -> AuthResult<bool> {
        match self.create_user(username, password).await {
            Ok(_) => Ok(true),
            Err(AuthError::UsernameTaken) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ========================================================================
    // Token Operations
    // ========================================================================

    /// Verify credentials and issue an access/refresh token pair
    pub async fn obtain_token(&self, username: &str, password: &str) -> AuthResult<AuthTokens> {
        let users = self.db.users();

        let user = users
            .get_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active || !self.verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.generate_tokens(&user, Utc::now().timestamp()).await?;
        users.update_last_login(&user.id).await?;

        Ok(tokens)
    }

    /// Check signature, expiry and token type of an access token
    pub fn verify_token(&self, token: &str) -> AuthResult<TokenPayload> {
        let claims = self.decode_access_token(token)?;
        Ok(claims.into())
    }

    /// Exchange a refresh token for a new pair. The old refresh token is invalidated.
    pub async fn refresh_token(&self, refresh_token: &str) -> AuthResult<AuthTokens> {
        let claims = self.decode_refresh_token(refresh_token)?;
        let users = self.db.users();

        let stored = users
            .consume_refresh_token(&hash_token(refresh_token))
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let expires_at = str_to_datetime(&stored.expires_at)?;
        if expires_at <= Utc::now() || stored.user_id != claims.sub {
            return Err(AuthError::InvalidRefreshToken);
        }

        let user = users
            .get_by_id(&claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::InvalidRefreshToken)?;

        let tokens = self.generate_tokens(&user, claims.orig_iat).await?;

        tracing::debug!(user_id = %user.id, "Refresh token rotated");
        Ok(tokens)
    }

    /// Remove refresh tokens that can no longer be used
    pub async fn cleanup_expired_tokens(&self) -> AuthResult<u64> {
        Ok(self.db.users().cleanup_expired_refresh_tokens().await?)
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    fn hash_password(&self, password: &str) -> AuthResult<String> {
        hash(password, self.config.bcrypt_cost)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AuthResult<bool> {
        verify(password, hash)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("Failed to verify password: {}", e)))
    }

    /// Sign an access/refresh pair and store the refresh token hash
    async fn generate_tokens(&self, user: &UserRecord, orig_iat: i64) -> AuthResult<AuthTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.config.access_token_lifetime);
        let refresh_exp = now + Duration::seconds(self.config.refresh_token_lifetime);
        let key = EncodingKey::from_secret(self.config.jwt_secret.as_bytes());

        let access_claims = AccessTokenClaims {
            sub: user.id.clone(),
            username: user.username.clone(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
            orig_iat,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &access_claims, &key)
            .map_err(|e| anyhow::anyhow!("Failed to create access token: {}", e))?;

        let refresh_claims = RefreshTokenClaims {
            sub: user.id.clone(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: refresh_exp.timestamp(),
            iat: now.timestamp(),
            orig_iat,
        };

        let refresh_token = encode(&Header::new(Algorithm::HS256), &refresh_claims, &key)
            .map_err(|e| anyhow::anyhow!("Failed to create refresh token: {}", e))?;

        self.db
            .users()
            .create_refresh_token(
                &user.id,
                &hash_token(&refresh_token),
                &datetime_to_str(refresh_exp),
            )
            .await?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            expires_in: self.config.access_token_lifetime,
            token_type: "Bearer".to_string(),
            payload: access_claims.into(),
        })
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation
    }

    fn decode_access_token(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let token_data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Self::validation(),
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(AuthError::InvalidToken("wrong token type".to_string()));
        }

        Ok(token_data.claims)
    }

    fn decode_refresh_token(&self, token: &str) -> AuthResult<RefreshTokenClaims> {
        let token_data = decode::<RefreshTokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Self::validation(),
        )
        .map_err(|_| AuthError::InvalidRefreshToken)?;

        if token_data.claims.token_type != REFRESH_TOKEN_TYPE {
            return Err(AuthError::InvalidRefreshToken);
        }

        Ok(token_data.claims)
    }
}

/// Hash a token for storage (SHA-256, hex)
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
