// ABOUTME: Signed access tokens in JWT compact form (HS256) via jsonwebtoken
// ABOUTME: Issues tokens carrying user id, email and role; verifies signature and expiry

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::roles::Role;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signing secret must not be empty")]
    EmptySecret,

    #[error("Malformed token")]
    Malformed,

    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Failed to encode token: {0}")]
    Encoding(String),
}

/// Identity carried by a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            validation,
            ttl,
        })
    }

    pub fn issue(&self, user_id: &str, email: &str, role: Role) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .unwrap_or(expires_at),
        })
    }

    /// Check structure, algorithm, signature and expiry
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token = token.trim();
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidAlgorithm => TokenError::UnsupportedAlgorithm(
                    decode_header(token)
                        .map(|header| format!("{:?}", header.alg))
                        .unwrap_or_default(),
                ),
                _ => TokenError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", Duration::hours(24)).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let service = service();
        let issued = service.issue("user-1", "a@example.com", Role::Vendor).unwrap();

        assert_eq!(issued.token.split('.').count(), 3);
        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.role, Role::Vendor);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(issued.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issued = service().issue("user-1", "a@example.com", Role::Admin).unwrap();
        let other = TokenService::new("other-secret", Duration::hours(24)).unwrap();
        assert_eq!(other.verify(&issued.token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let service = service();
        let issued = service.issue("user-1", "a@example.com", Role::User).unwrap();
        let signature = issued.token.rsplit('.').next().unwrap();

        // Same user promoted to admin, signed with some other key
        let forged = TokenService::new("attacker-secret", Duration::hours(24))
            .unwrap()
            .issue("user-1", "a@example.com", Role::Admin)
            .unwrap();
        let (signing_input, _) = forged.token.rsplit_once('.').unwrap();
        let spliced = format!("{}.{}", signing_input, signature);

        assert_eq!(service.verify(&spliced), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_expired_token() {
        let service = TokenService::new("test-secret", Duration::seconds(-5)).unwrap();
        let issued = service.issue("user-1", "a@example.com", Role::User).unwrap();
        assert_eq!(service.verify(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn test_malformed_and_unsupported() {
        let service = service();
        assert_eq!(service.verify("abc"), Err(TokenError::Malformed));
        assert_eq!(service.verify("!!.??.**"), Err(TokenError::Malformed));

        let claims = Claims {
            sub: "user-1".to_string(),
            email: "a@example.com".to_string(),
            role: Role::Admin,
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        };
        let hs512 = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert_eq!(
            service.verify(&hs512),
            Err(TokenError::UnsupportedAlgorithm("HS512".to_string()))
        );
    }

    #[test]
    fn test_empty_secret() {
        assert!(matches!(
            TokenService::new("", Duration::hours(1)),
            Err(TokenError::EmptySecret)
        ));
    }
}
