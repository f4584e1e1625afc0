//! GraphQL authentication and authorization
//!
//! The HTTP handler verifies the bearer token and attaches an [`AuthUser`] to
//! the request data. Resolvers read it through [`AuthExt`].
//!
//! ## Guards
//!
//! Catalog writes use `WriteGuard`, which only demands a user when the
//! schema was built with `AuthPolicy { require_auth: true }`:
//!
//! ```ignore
//! #[graphql(guard = "WriteGuard")]
//! async fn create_book(&self, ctx: &Context<'_>, ...) -> Result<CreateBookResult> { ... }
//! ```

use async_graphql::{Context, ErrorExtensions, Result};
use serde::{Deserialize, Serialize};

use crate::services::TokenPayload;

/// User context extracted from a verified access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
}

impl From<TokenPayload> for AuthUser {
    fn from(payload: TokenPayload) -> Self {
        Self {
            user_id: payload.user_id,
            username: payload.username,
        }
    }
}

/// Whether catalog mutations need an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthPolicy {
    pub require_auth: bool,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self { require_auth: true }
    }
}

/// Extension trait to get authenticated user from GraphQL context
pub trait AuthExt {
    /// Get the authenticated user, or return an error if not authenticated
    fn auth_user(&self) -> Result<&AuthUser>;
}

impl<'a> AuthExt for Context<'a> {
    fn auth_user(&self) -> Result<&AuthUser> {
        self.data_opt::<AuthUser>().ok_or_else(|| {
            async_graphql::Error::new("Authentication required")
                .extend_with(|_, e| e.set("code", "UNAUTHORIZED"))
        })
    }
}

/// Guard for catalog writes. Passes when the policy does not require auth,
/// otherwise requires an authenticated user.
pub struct WriteGuard;

impl async_graphql::Guard for WriteGuard {
    fn check(&self, ctx: &Context<'_>) -> impl std::future::Future<Output = Result<()>> + Send {
        let policy = ctx.data_opt::<AuthPolicy>().copied().unwrap_or_default();
        let result = if policy.require_auth {
            ctx.auth_user().map(|user| {
                tracing::debug!(user_id = %user.user_id, "Write authorized");
            })
        } else {
            Ok(())
        };
        async move { result }
    }
}
