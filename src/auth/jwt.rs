use std::time::Duration;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::config::JwtConfig;

/// Claims signed into every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // user ID
    pub email: String, // denormalized at issuance; may go stale
    pub iat: usize,    // issued at (unix seconds)
    pub exp: usize,    // expires at (unix seconds)
}

/// HMAC signing and verification keys, derived once from config.
///
/// Fields stay private so the secret cannot leak through logs or
/// serialization; the keys live for the process lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::from_secs(config.ttl_days as u64 * 24 * 60 * 60),
        }
    }

    fn sign_with_ttl(
        &self,
        user_id: Uuid,
        email: &str,
        ttl: TimeDuration,
    ) -> Result<String, AuthError> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: (now + ttl).unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(e.into()))?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// Mint a token for a user. The TTL is fixed at construction.
    pub fn sign(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        self.sign_with_ttl(
            user_id,
            email,
            TimeDuration::seconds(self.ttl.as_secs() as i64),
        )
    }

    /// Verify a presented token and return its claims.
    ///
    /// Signature mismatch, a malformed payload and expiry all collapse into
    /// the same `InvalidToken` kind, so the caller cannot tell them apart.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|_| AuthError::InvalidToken)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            ttl_days: 7,
        })
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys("dev-secret");
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "a@x.com").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys("dev-secret");
        let token = keys
            .sign_with_ttl(Uuid::new_v4(), "a@x.com", TimeDuration::seconds(-120))
            .expect("sign");
        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let keys = make_keys("dev-secret");
        let token = keys.sign(Uuid::new_v4(), "a@x.com").expect("sign");

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        let mut payload = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).expect("still ascii");
        let tampered = parts.join(".");

        assert!(matches!(keys.verify(&tampered), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn verify_rejects_token_signed_with_other_secret() {
        let token = make_keys("secret-one")
            .sign(Uuid::new_v4(), "a@x.com")
            .expect("sign");
        assert!(matches!(
            make_keys("secret-two").verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }
}
