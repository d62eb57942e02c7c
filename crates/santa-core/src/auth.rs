//! Admin authentication.
//!
//! A verified passphrase yields an [`AdminSession`], the capability the draw
//! requires. Over HTTP the session travels as an HS256 bearer token.

use argon2::password_hash::Error as HashError;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use tracing::warn;

use santa_types::api::Claims;

const ADMIN_SUBJECT: &str = "admin";
const TOKEN_TTL_HOURS: i64 = 12;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid password")]
    InvalidPassphrase,

    #[error("Not authenticated. Please log in first.")]
    InvalidToken,

    #[error("Configured admin passphrase hash is malformed")]
    MalformedHash,

    #[error("Failed to issue token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Proof that the admin passphrase was checked. Only this module mints one.
#[derive(Debug, Clone)]
pub struct AdminSession {
    issued_at: DateTime<Utc>,
}

impl AdminSession {
    fn new(issued_at: DateTime<Utc>) -> Self {
        Self { issued_at }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

pub struct AdminAuth {
    passphrase: String,
    jwt_secret: String,
}

impl AdminAuth {
    /// `passphrase` is either plaintext or an Argon2 PHC string.
    pub fn new(passphrase: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
            jwt_secret: jwt_secret.into(),
        }
    }

    pub fn authenticate(&self, attempt: &str) -> Result<AdminSession, AuthError> {
        let ok = if self.passphrase.starts_with("$argon2") {
            verify_phc(&self.passphrase, attempt)?
        } else {
            attempt == self.passphrase
        };

        if !ok {
            warn!("Rejected admin login attempt");
            return Err(AuthError::InvalidPassphrase);
        }
        Ok(AdminSession::new(Utc::now()))
    }

    pub fn issue_token(&self, session: &AdminSession) -> Result<String, AuthError> {
        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: session.issued_at.timestamp() as usize,
            exp: (session.issued_at + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?)
    }

    pub fn verify_token(&self, token: &str) -> Result<AdminSession, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AuthError::InvalidToken)?;

        if data.claims.sub != ADMIN_SUBJECT {
            return Err(AuthError::InvalidToken);
        }

        let issued_at = Utc
            .timestamp_opt(data.claims.iat as i64, 0)
            .single()
            .ok_or(AuthError::InvalidToken)?;
        Ok(AdminSession::new(issued_at))
    }
}

/// Check `attempt` against an Argon2 PHC string. A hash that parses but
/// cannot be verified against (no salt, no output, bad params) is a
/// configuration error, not a wrong passphrase.
fn verify_phc(phc: &str, attempt: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(phc).map_err(|_| AuthError::MalformedHash)?;
    if parsed.salt.is_none() || parsed.hash.is_none() {
        return Err(AuthError::MalformedHash);
    }

    match Argon2::default().verify_password(attempt.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => {
            warn!("Admin passphrase hash rejected by argon2: {}", e);
            Err(AuthError::MalformedHash)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::PasswordHasher;
    use argon2::password_hash::SaltString;

    #[test]
    fn plain_passphrase() {
        let auth = AdminAuth::new("hunter2", "secret");
        assert!(auth.authenticate("hunter2").is_ok());
        assert!(matches!(auth.authenticate("hunter3"), Err(AuthError::InvalidPassphrase)));
        assert!(matches!(auth.authenticate(""), Err(AuthError::InvalidPassphrase)));
    }

    #[test]
    fn argon2_passphrase() {
        let salt = SaltString::from_b64("c2FudGEtdGVzdC1zYWx0").unwrap();
        let hash = Argon2::default()
            .hash_password(b"sleigh-bells", &salt)
            .unwrap()
            .to_string();

        let auth = AdminAuth::new(hash, "secret");
        assert!(auth.authenticate("sleigh-bells").is_ok());
        assert!(matches!(auth.authenticate("jingle"), Err(AuthError::InvalidPassphrase)));
    }

    #[test]
    fn malformed_hash_is_reported() {
        for phc in [
            "$argon2id$garbage",
            "$argon2",
            "$argon2id$v=19$m=19456,t=2,p=1$bad",
            "$argon2id$v=19$m=19456,t=2,p=1$c2FudGEtdGVzdC1zYWx0",
        ] {
            let auth = AdminAuth::new(phc, "secret");
            assert!(
                matches!(auth.authenticate("x"), Err(AuthError::MalformedHash)),
                "{phc} should be reported as malformed"
            );
        }
    }

    #[test]
    fn token_roundtrip() {
        let auth = AdminAuth::new("pw", "secret");
        let session = auth.authenticate("pw").unwrap();
        let token = auth.issue_token(&session).unwrap();

        let restored = auth.verify_token(&token).unwrap();
        assert_eq!(restored.issued_at().timestamp(), session.issued_at().timestamp());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let issuer = AdminAuth::new("pw", "secret-a");
        let verifier = AdminAuth::new("pw", "secret-b");
        let token = issuer.issue_token(&issuer.authenticate("pw").unwrap()).unwrap();

        assert!(matches!(verifier.verify_token(&token), Err(AuthError::InvalidToken)));
        assert!(matches!(verifier.verify_token("not-a-jwt"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = AdminAuth::new("pw", "secret");
        let stale = AdminSession::new(Utc::now() - Duration::hours(TOKEN_TTL_HOURS + 1));
        let token = auth.issue_token(&stale).unwrap();

        assert!(matches!(auth.verify_token(&token), Err(AuthError::InvalidToken)));
    }
}
