use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::TokenClaims;
use super::errors::AuthError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    vendor_id: Option<Uuid>,
    iat: i64,
    exp: i64,
}

/// Issues and validates signed, time-limited bearer tokens binding a request
/// to a vendor identity. Built once at startup from [`configs::JwtConfig`];
/// there is no revocation, so a token stays valid until its natural expiry.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenService {
    pub fn from_config(cfg: &configs::JwtConfig) -> Result<Self, AuthError> {
        let algorithm = Algorithm::from_str(&cfg.algorithm)
            .map_err(|e| AuthError::TokenError(format!("unsupported algorithm: {e}")))?;
        Ok(Self {
            secret: cfg.secret.clone(),
            algorithm,
            ttl: Duration::minutes(cfg.ttl_minutes),
        })
    }

    /// Sign a token carrying `{vendor_id, email, exp = now + ttl}`.
    pub fn issue(&self, vendor_id: Uuid, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            vendor_id: Some(vendor_id),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(
            &Header::new(self.algorithm),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Verify signature, then expiry, then the vendor claim.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        // Token expiry is a logical deadline; no leeway window.
        validation.leeway = 0;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::MalformedToken,
        })?;
        let vendor_id = data.claims.vendor_id.ok_or(AuthError::MissingClaim)?;
        Ok(TokenClaims { vendor_id, email: data.claims.sub })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(ttl_minutes: i64) -> TokenService {
        TokenService::from_config(&configs::JwtConfig {
            secret: "test-secret".into(),
            algorithm: "HS256".into(),
            ttl_minutes,
        })
        .unwrap()
    }

    #[test]
    fn issue_and_validate_roundtrip() {
        let tokens = svc(60);
        let vendor_id = Uuid::new_v4();
        let token = tokens.issue(vendor_id, "john@example.com").unwrap();
        let claims = tokens.validate(&token).unwrap();
        assert_eq!(claims.vendor_id, vendor_id);
        assert_eq!(claims.email, "john@example.com");
    }

    #[test]
    fn expired_token_rejected() {
        // A token whose TTL already elapsed, e.g. used at minute 61 of 60
        let tokens = svc(-1);
        let token = tokens.issue(Uuid::new_v4(), "late@example.com").unwrap();
        let err = svc(60).validate(&token).unwrap_err();
        assert!(matches!(err, AuthError::ExpiredToken));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let tokens = svc(60);
        let err = tokens.validate("not-a-jwt").unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
    }

    #[test]
    fn wrong_secret_is_malformed() {
        let tokens = svc(60);
        let token = tokens.issue(Uuid::new_v4(), "a@b.com").unwrap();
        let other = TokenService::from_config(&configs::JwtConfig {
            secret: "different".into(),
            algorithm: "HS256".into(),
            ttl_minutes: 60,
        })
        .unwrap();
        assert!(matches!(other.validate(&token).unwrap_err(), AuthError::MalformedToken));
    }

    #[test]
    fn token_without_vendor_claim_rejected() {
        #[derive(Serialize)]
        struct Bare {
            sub: String,
            iat: i64,
            exp: i64,
        }
        let now = Utc::now().timestamp();
        let bare = Bare { sub: "a@b.com".into(), iat: now, exp: now + 600 };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &bare,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        let err = svc(60).validate(&token).unwrap_err();
        assert!(matches!(err, AuthError::MissingClaim));
    }

    #[test]
    fn no_revocation_before_expiry() {
        // Accepted limitation: there is no revocation list, so a token that
        // leaked stays valid until its exp passes.
        let tokens = svc(60);
        let token = tokens.issue(Uuid::new_v4(), "leak@example.com").unwrap();
        assert!(tokens.validate(&token).is_ok());
        assert!(tokens.validate(&token).is_ok());
    }
}
