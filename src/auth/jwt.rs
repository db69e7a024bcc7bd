use std::time::Duration;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;
use crate::config::JwtConfig;

/// Lifetime of every access token.
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is not valid")]
    InvalidToken,
    #[error("token has expired")]
    TokenExpired,
    #[error("signing method invalid")]
    InvalidSignatureMethod,
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies bearer tokens for admin principals.
pub trait TokenService: Send + Sync {
    /// Returns the encoded token and its absolute expiry as a unix timestamp.
    fn generate_token(&self, user_id: i64) -> Result<(String, i64), TokenError>;
    fn verify_access_token(&self, token: &str) -> Result<i64, TokenError>;
}

/// HMAC signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl: ACCESS_TOKEN_TTL,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_nbf = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "nbf"]);
        validation
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            TokenError::InvalidSignatureMethod
        }
        _ => TokenError::InvalidToken,
    }
}

impl TokenService for JwtKeys {
    fn generate_token(&self, user_id: i64) -> Result<(String, i64), TokenError> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            user_id,
            iss: self.issuer.clone(),
            nbf: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)?;
        debug!(user_id, exp = claims.exp, "jwt signed");
        Ok((token, claims.exp))
    }

    fn verify_access_token(&self, token: &str) -> Result<i64, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Self::validation()).map_err(classify)?;
        debug!(user_id = data.claims.user_id, "jwt verified");
        Ok(data.claims.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64ct::{Base64UrlUnpadded, Encoding};
    use serde_json::json;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            issuer: "test-issuer".into(),
        })
    }

    fn sign_raw(secret: &str, alg: Algorithm, claims: serde_json::Value) -> String {
        encode(
            &Header::new(alg),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("sign raw claims")
    }

    fn now() -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }

    #[test]
    fn generate_then_verify_returns_same_user() {
        let keys = make_keys("dev-secret");
        for user_id in [1_i64, 42, i64::from(u32::MAX)] {
            let (token, _) = keys.generate_token(user_id).expect("sign token");
            let verified = keys.verify_access_token(&token).expect("verify token");
            assert_eq!(verified, user_id);
        }
    }

    #[test]
    fn token_expires_after_twenty_four_hours() {
        let keys = make_keys("dev-secret");
        let before = now();
        let (_, exp) = keys.generate_token(7).expect("sign token");
        let ttl = ACCESS_TOKEN_TTL.as_secs() as i64;
        assert!(exp >= before + ttl);
        assert!(exp <= now() + ttl);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = make_keys("dev-secret");
        let token = sign_raw(
            "dev-secret",
            Algorithm::HS256,
            json!({ "user_id": 1, "iss": "test-issuer", "nbf": now() - 7200, "exp": now() - 3600 }),
        );
        let err = keys.verify_access_token(&token).unwrap_err();
        assert!(matches!(err, TokenError::TokenExpired));
    }

    #[test]
    fn token_expired_seconds_ago_is_rejected() {
        let keys = make_keys("dev-secret");
        let token = sign_raw(
            "dev-secret",
            Algorithm::HS256,
            json!({ "user_id": 5, "iss": "test-issuer", "nbf": now() - 3600, "exp": now() - 5 }),
        );
        let err = keys.verify_access_token(&token).unwrap_err();
        assert!(matches!(err, TokenError::TokenExpired));
    }

    #[test]
    fn token_valid_in_a_few_seconds_is_rejected() {
        let keys = make_keys("dev-secret");
        let token = sign_raw(
            "dev-secret",
            Algorithm::HS256,
            json!({ "user_id": 5, "iss": "test-issuer", "nbf": now() + 5, "exp": now() + 3600 }),
        );
        let err = keys.verify_access_token(&token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidToken));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let keys = make_keys("dev-secret");
        let (token, _) = make_keys("other-secret").generate_token(1).expect("sign token");
        let err = keys.verify_access_token(&token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidToken));
    }

    #[test]
    fn token_not_yet_valid_is_rejected() {
        let keys = make_keys("dev-secret");
        let token = sign_raw(
            "dev-secret",
            Algorithm::HS256,
            json!({ "user_id": 1, "iss": "test-issuer", "nbf": now() + 3600, "exp": now() + 7200 }),
        );
        let err = keys.verify_access_token(&token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidToken));
    }

    #[test]
    fn non_hmac_algorithm_is_rejected() {
        let keys = make_keys("dev-secret");
        // header claims RS256, the signature part is irrelevant
        let header = r#"{"typ":"JWT","alg":"RS256"}"#;
        let payload = format!(
            r#"{{"user_id":1,"iss":"test-issuer","nbf":{},"exp":{}}}"#,
            now(),
            now() + 60
        );
        let token = format!(
            "{}.{}.c2lnbmF0dXJl",
            Base64UrlUnpadded::encode_string(header.as_bytes()),
            Base64UrlUnpadded::encode_string(payload.as_bytes())
        );
        let err = keys.verify_access_token(&token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidSignatureMethod));
    }

    #[test]
    fn missing_user_id_claim_is_rejected() {
        let keys = make_keys("dev-secret");
        let token = sign_raw(
            "dev-secret",
            Algorithm::HS256,
            json!({ "iss": "test-issuer", "nbf": now(), "exp": now() + 60 }),
        );
        let err = keys.verify_access_token(&token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidToken));
    }

    #[test]
    fn garbage_is_rejected() {
        let keys = make_keys("dev-secret");
        let err = keys.verify_access_token("not-a-jwt").unwrap_err();
        assert!(matches!(err, TokenError::InvalidToken));
    }
}
