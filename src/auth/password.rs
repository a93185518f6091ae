use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Hash a plaintext password into a self-describing PHC digest.
///
/// Every call draws a fresh random salt, so hashing the same input twice
/// yields two different digests. Salt and cost parameters travel inside the
/// digest; nothing else has to be stored.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(digest)
}

/// Check a plaintext candidate against a stored digest.
///
/// A mismatch is `Ok(false)`, not an error; only a digest that fails to
/// parse errors out. The comparison inside the argon2 crate is
/// constant-time.
pub fn verify_password(plain: &str, digest: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(digest).map_err(|e| {
        error!(error = %e, "argon2 parse digest error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let digest = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &digest).expect("verify should succeed"));
    }

    #[test]
    fn same_password_hashes_to_distinct_digests() {
        let digest_a = hash_password("secret123").expect("hash");
        let digest_b = hash_password("secret123").expect("hash");
        assert_ne!(digest_a, digest_b);
        assert!(verify_password("secret123", &digest_a).expect("verify"));
        assert!(verify_password("secret123", &digest_b).expect("verify"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let digest = hash_password("correct-horse-battery-staple").expect("hash");
        assert!(!verify_password("wrong-password", &digest).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_digest() {
        let err = verify_password("anything", "not-a-valid-digest").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
