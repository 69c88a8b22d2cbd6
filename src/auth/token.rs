//! JWT 令牌签发与校验

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::config::AuthConfig;

/// JWT Claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (用户名)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
}

impl Claims {
    pub fn new(subject: &str, issuer: &str, expires_in_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            iss: issuer.to_string(),
            exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// 令牌校验能力
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// 基于共享密钥 (HS256) 的令牌校验器
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtVerifier {
    pub fn new(secret: &str, issuer: impl Into<String>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.issuer.clone())
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if token_data.claims.sub.is_empty() {
            return Err(AuthError::InvalidToken("subject missing".to_string()));
        }

        Ok(token_data.claims)
    }
}

/// 本地令牌签发器
///
/// 与 [`JwtVerifier`] 共用密钥，用于测试和本地开发，替代真实的认证网关。
#[derive(Clone)]
pub struct LocalTokenIssuer {
    encoding_key: EncodingKey,
    issuer: String,
    expires_in: i64,
}

impl LocalTokenIssuer {
    pub fn new(secret: &str, issuer: impl Into<String>, expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            expires_in,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.issuer.clone(),
            config.token_expires_in_seconds,
        )
    }

    /// 为指定主体签发令牌
    pub fn issue_for(&self, subject: &str) -> Result<String, AuthError> {
        let claims = Claims::new(subject, &self.issuer, self.expires_in);
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AuthError::Issue(e.to_string()))
    }
}

/// 从请求头中取出 Bearer 令牌
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("authorization header is not ascii".to_string()))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidToken("malformed authorization header".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidToken(format!(
            "unsupported scheme: {}",
            scheme
        )));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "unit-test-secret";
    const ISSUER: &str = "auth-gateway";

    #[test]
    fn test_issue_and_verify() {
        let issuer = LocalTokenIssuer::new(SECRET, ISSUER, 60);
        let verifier = JwtVerifier::new(SECRET, ISSUER);

        let token = issuer.issue_for("alice").unwrap();
        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_reject_wrong_secret() {
        let issuer = LocalTokenIssuer::new("other-secret", ISSUER, 60);
        let verifier = JwtVerifier::new(SECRET, ISSUER);

        let token = issuer.issue_for("alice").unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_reject_wrong_issuer() {
        let issuer = LocalTokenIssuer::new(SECRET, "someone-else", 60);
        let verifier = JwtVerifier::new(SECRET, ISSUER);

        let token = issuer.issue_for("alice").unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_reject_expired() {
        let issuer = LocalTokenIssuer::new(SECRET, ISSUER, 60);
        let verifier = JwtVerifier::new(SECRET, ISSUER);

        let token = issuer.sign(&Claims::new("alice", ISSUER, -120)).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_reject_garbage() {
        let verifier = JwtVerifier::new(SECRET, ISSUER);
        assert!(verifier.verify("not-a-jwt").is_err());
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingToken)));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc");

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));
        assert!(bearer_token(&headers).is_err());
    }
}
