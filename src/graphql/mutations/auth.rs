//! GraphQL authentication mutations
//!
//! None of these require an authenticated user. Failures are raised as
//! errors with `extensions.code = "UNAUTHORIZED"`.

use super::prelude::*;

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Exchange username and password for an access/refresh token pair
    async fn token_auth(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<TokenAuthResult> {
        let auth = ctx.data_unchecked::<AuthService>();

        match auth.obtain_token(&username, &password).await {
            Ok(tokens) => {
                tracing::info!(username = %username, "User logged in");
                Ok(tokens.into())
            }
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Login failed");
                Err(e.extend())
            }
        }
    }

    /// Check signature, expiry and type of an access token
    async fn verify_token(&self, ctx: &Context<'_>, token: String) -> Result<VerifyTokenResult> {
        let auth = ctx.data_unchecked::<AuthService>();

        let payload = auth.verify_token(&token).map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            e.extend()
        })?;

        Ok(VerifyTokenResult {
            valid: true,
            payload: payload.into(),
        })
    }

    /// Exchange a refresh token for a new pair. The old refresh token is invalidated.
    async fn refresh_token(
        &self,
        ctx: &Context<'_>,
        refresh_token: String,
    ) -> Result<RefreshTokenResult> {
        let auth = ctx.data_unchecked::<AuthService>();

        match auth.refresh_token(&refresh_token).await {
            Ok(tokens) => Ok(tokens.into()),
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed");
                Err(e.extend())
            }
        }
    }
}
