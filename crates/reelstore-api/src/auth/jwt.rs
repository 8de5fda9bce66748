use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use reelstore_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iss: String,
    pub sub: Uuid, // user_id
    pub exp: i64,  // expiration timestamp
    pub iat: i64,  // issued at timestamp
}

/// HS256 token verification against the shared secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
        }
    }

    /// Validate signature, expiry and issuer; return the user id.
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            let reason = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token has expired",
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => "Invalid token issuer",
                jsonwebtoken::errors::ErrorKind::InvalidSignature => "Invalid token signature",
                _ => "Invalid token",
            };
            AppError::Unauthenticated(format!("{}: {}", reason, e))
        })?;

        Ok(token_data.claims.sub)
    }

    /// Mint a token for `user_id` valid for `ttl`.
    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = JwtClaims {
            iss: self.issuer.clone(),
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }
}

/// Mint an access token with the default lifetime. Used by tooling and tests.
pub fn issue_access_token(
    secret: &str,
    issuer: &str,
    user_id: Uuid,
) -> Result<String, AppError> {
    JwtService::new(secret, issuer).issue(
        user_id,
        Duration::seconds(crate::constants::ACCESS_TOKEN_TTL_SECS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "an-hs256-secret-of-at-least-32-bytes!";

    #[test]
    fn test_issued_token_verifies() {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(SECRET, "reelstore-access", user_id).unwrap();
        let service = JwtService::new(SECRET, "reelstore-access");
        assert_eq!(service.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new(SECRET, "reelstore-access");
        let token = service.issue(Uuid::new_v4(), Duration::seconds(-300)).unwrap();
        assert!(matches!(
            service.verify(&token),
            Err(AppError::Unauthenticated(_))
        ));
    }

    #[test]
    fn test_wrong_secret_or_issuer_rejected() {
        let token = issue_access_token(SECRET, "reelstore-access", Uuid::new_v4()).unwrap();

        let other_secret = JwtService::new("another-secret-that-is-32-bytes-long", "reelstore-access");
        assert!(other_secret.verify(&token).is_err());

        let other_issuer = JwtService::new(SECRET, "someone-else");
        assert!(other_issuer.verify(&token).is_err());

        let service = JwtService::new(SECRET, "reelstore-access");
        assert!(service.verify("not.a.jwt").is_err());
    }
}
