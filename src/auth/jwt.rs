use super::session::{Role, Session, SessionResolver, SessionUser};
use crate::error::AppError;
use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const TOKEN_EXPIRY_HOURS: i64 = 24;

/// JWT 载荷
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// 用户ID
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

/// 签发会话令牌
pub fn create_token(
    user_id: &str,
    role: Role,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = SessionClaims {
        sub: user_id.to_string(),
        role,
        exp: (now + chrono::Duration::hours(TOKEN_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// 基于 Bearer JWT 的会话解析器
pub struct JwtSessionResolver {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionResolver {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    fn decode(&self, headers: &HeaderMap) -> Option<SessionClaims> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())?
            .strip_prefix("Bearer ")?;

        match jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("JWT validation failed: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl SessionResolver for JwtSessionResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Session>, AppError> {
        Ok(self.decode(headers).map(|claims| Session {
            user: Some(SessionUser {
                id: claims.sub,
                role: claims.role,
            }),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn resolves_valid_token() {
        let token = create_token("u-1", Role::Manager, "secret").unwrap();
        let resolver = JwtSessionResolver::new("secret");

        let session = resolver.resolve(&bearer(&token)).await.unwrap().unwrap();
        let user = session.user.unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.role, Role::Manager);
    }

    #[tokio::test]
    async fn rejects_wrong_secret() {
        let token = create_token("u-1", Role::User, "secret").unwrap();
        let resolver = JwtSessionResolver::new("other");

        assert!(resolver.resolve(&bearer(&token)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_or_malformed_header_has_no_session() {
        let resolver = JwtSessionResolver::new("secret");
        assert!(resolver.resolve(&HeaderMap::new()).await.unwrap().is_none());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert!(resolver.resolve(&headers).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let now = chrono::Utc::now();
        let claims = SessionClaims {
            sub: "u-1".to_string(),
            role: Role::Admin,
            exp: (now - chrono::Duration::hours(2)).timestamp() as usize,
            iat: (now - chrono::Duration::hours(26)).timestamp() as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let resolver = JwtSessionResolver::new("secret");
        assert!(resolver.resolve(&bearer(&token)).await.unwrap().is_none());
    }
}
