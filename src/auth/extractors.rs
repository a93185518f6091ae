use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::error::AuthError;
use crate::auth::jwt::{Claims, JwtKeys};

/// Extracts and verifies the bearer token, exposing its claims to the one
/// handler processing this request.
///
/// The gate never touches the store and never issues tokens; it only
/// verifies and forwards identity.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::Unauthorized)?;

        // Expect "Bearer <token>"
        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or(AuthError::Unauthorized)?;

        let claims = keys.verify(token).map_err(|err| {
            warn!("invalid or expired token");
            err
        })?;

        Ok(AuthUser(claims))
    }
}
