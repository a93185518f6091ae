use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::dto::PublicUser;
use crate::auth::error::AuthError;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::store::UserStore;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

lazy_static! {
    // Verified against when an email does not resolve, so unknown-email and
    // wrong-password logins take comparable time.
    static ref DECOY_DIGEST: String = hash_password("decoy-not-a-real-account")
        .unwrap_or_else(|_| "$argon2id$v=19$m=19456,t=2,p=1$ZGVjb3lzYWx0$ZGVjb3k".to_string());
}

/// Orchestrates signup and login against the store, hasher and token keys.
///
/// Store and keys are injected at construction; nothing here reads ambient
/// process state.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    /// Create an account and return its id. The plaintext password only
    /// lives for the duration of this call.
    #[instrument(skip(self, password, name))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<Uuid, AuthError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("Email and password required".into()));
        }
        if !is_valid_email(&email) {
            warn!(email = %email, "signup invalid email");
            return Err(AuthError::Validation("Invalid email".into()));
        }
        if password.len() < 8 {
            warn!("signup password too short");
            return Err(AuthError::Validation("Password too short".into()));
        }

        // Advisory pre-check; the store's uniqueness constraint decides a
        // concurrent race for the same address.
        if self.store.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "signup email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let digest = hash_password(password).map_err(AuthError::Internal)?;
        let user = self.store.create_user(&email, name, &digest).await?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user.id)
    }

    /// Verify credentials and mint a bearer token.
    ///
    /// Unknown email and wrong password both come back as
    /// `InvalidCredentials`; nothing in the result says which field was
    /// wrong.
    #[instrument(skip(self, password))]
    pub async fn log_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, PublicUser), AuthError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("Email and password required".into()));
        }

        let Some(user) = self.store.find_by_email(&email).await? else {
            // Burn a verification anyway; an early return here would make
            // unknown emails measurably faster than wrong passwords.
            let _ = verify_password(password, &DECOY_DIGEST);
            warn!(email = %email, "login unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let ok = verify_password(password, &user.password_hash).map_err(AuthError::Internal)?;
        if !ok {
            warn!(user_id = %user.id, "login password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.keys.sign(user.id, &user.email)?;
        info!(user_id = %user.id, "user logged in");
        Ok((token, PublicUser::from(user)))
    }

    /// Resolve the public projection for an authenticated subject.
    pub async fn load_profile(&self, id: Uuid) -> Result<PublicUser, AuthError> {
        let user = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        Ok(PublicUser::from(user))
    }
}
