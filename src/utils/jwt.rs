use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::{Error as JwtError, ErrorKind},
};
use serde::{Deserialize, Serialize};

const ISSUER: &str = "tutorhub";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 用户 ID
    pub role: UserRole,
    pub kind: TokenKind,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static [u8] {
        AppConfig::get().jwt.secret.as_bytes()
    }

    pub fn sign(
        user_id: i64,
        role: &UserRole,
        kind: TokenKind,
        ttl: chrono::TimeDelta,
    ) -> Result<String, JwtError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.clone(),
            kind,
            iss: ISSUER.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret()),
        )
    }

    pub fn generate_access_token(user_id: i64, role: &UserRole) -> Result<String, JwtError> {
        let minutes = AppConfig::get().jwt.access_token_expiry;
        Self::sign(
            user_id,
            role,
            TokenKind::Access,
            chrono::TimeDelta::minutes(minutes),
        )
    }

    /// `refresh_ttl` 为空时使用配置的默认天数（“记住我”会传入更长的有效期）
    pub fn generate_token_pair(
        user_id: i64,
        role: &UserRole,
        refresh_ttl: Option<chrono::TimeDelta>,
    ) -> Result<TokenPair, JwtError> {
        let refresh_ttl = refresh_ttl.unwrap_or_else(|| {
            chrono::TimeDelta::days(AppConfig::get().jwt.refresh_token_expiry)
        });
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::sign(user_id, role, TokenKind::Refresh, refresh_ttl)?,
        })
    }

    fn verify(token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);

        let claims = decode::<Claims>(token, &DecodingKey::from_secret(Self::secret()), &validation)?
            .claims;
        if claims.kind != expected {
            return Err(ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_carries_role() {
        let token = JwtUtils::generate_access_token(42, &UserRole::Tutor).unwrap();
        let claims = JwtUtils::verify_access_token(&token).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, UserRole::Tutor);
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let pair = JwtUtils::generate_token_pair(7, &UserRole::Student, None).unwrap();
        assert!(JwtUtils::verify_access_token(&pair.refresh_token).is_err());
        assert!(JwtUtils::verify_refresh_token(&pair.access_token).is_err());
        assert_eq!(
            JwtUtils::verify_refresh_token(&pair.refresh_token)
                .unwrap()
                .user_id(),
            Some(7)
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = JwtUtils::sign(
            1,
            &UserRole::Admin,
            TokenKind::Access,
            chrono::TimeDelta::minutes(-10),
        )
        .unwrap();
        assert!(JwtUtils::verify_access_token(&token).is_err());
    }
}
