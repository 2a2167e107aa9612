use crate::config::AppConfig;
use crate::models::TokenErrorCode;
use crate::models::auth::entities::User;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String,        // 用户名
    pub iss: String,        // 签发方
    pub iat: usize,         // 签发时间
    pub exp: usize,         // 过期时间
    pub jti: String,        // 令牌唯一 ID
    pub roles: Vec<String>, // 权限名，如 ROLE_STUDENT
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Claims {
    /// 令牌所属用户的 href
    pub fn auth_user_href(&self) -> String {
        format!("/auth/user/{}", self.user_id)
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> Result<String, TokenErrorCode> {
        let secret = &AppConfig::get().jwt.secret;
        if secret.is_empty() {
            return Err(TokenErrorCode::SecretUnavailable);
        }
        Ok(secret.clone())
    }

    // 为用户签发令牌
    pub fn generate_token(user: &User) -> Result<String, TokenErrorCode> {
        let config = AppConfig::get();
        let now = chrono::Utc::now();
        let expiration = now + chrono::Duration::hours(config.jwt.expiration_hours);

        let claims = Claims {
            sub: user.username.clone(),
            iss: config.jwt.issuer.clone(),
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
            jti: uuid::Uuid::new_v4().to_string(),
            roles: vec![user.role.authority().to_string()],
            user_id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        };

        Self::encode_claims(&claims)
    }

    pub fn encode_claims(claims: &Claims) -> Result<String, TokenErrorCode> {
        let secret = Self::get_secret()?;
        let encoding_key = EncodingKey::from_secret(secret.as_ref());

        encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
            .map_err(|_| TokenErrorCode::InvalidToken)
    }

    // 验证签名、过期时间与签发方
    pub fn verify_token(token: &str) -> Result<Claims, TokenErrorCode> {
        let secret = Self::get_secret()?;
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[AppConfig::get().jwt.issuer.as_str()]);

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenErrorCode::TokenExpired,
                _ => TokenErrorCode::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::UserRole;

    fn user(role: UserRole) -> User {
        User {
            id: "3f2504e0-4f89-41d3-9a0c-0305e82c3301".into(),
            username: "jdoe".into(),
            email: "jdoe@lbu.ac.uk".into(),
            password_hash: String::new(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            enabled: true,
            account_non_expired: true,
            account_non_locked: true,
            credentials_non_expired: true,
            role,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_generate_and_verify() {
        let token = JwtUtils::generate_token(&user(UserRole::Student)).expect("token");
        let claims = JwtUtils::verify_token(&token).expect("valid");

        assert_eq!(claims.sub, "jdoe");
        assert_eq!(claims.roles, vec!["ROLE_STUDENT".to_string()]);
        assert_eq!(
            claims.auth_user_href(),
            "/auth/user/3f2504e0-4f89-41d3-9a0c-0305e82c3301"
        );
    }

    #[test]
    fn test_expired_token() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "jdoe".into(),
            iss: AppConfig::get().jwt.issuer.clone(),
            iat: now - 7200,
            exp: now - 3600,
            jti: "jti".into(),
            roles: vec![],
            user_id: "id".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
        };
        let token = JwtUtils::encode_claims(&claims).expect("token");

        assert_eq!(
            JwtUtils::verify_token(&token),
            Err(TokenErrorCode::TokenExpired)
        );
    }

    #[test]
    fn test_wrong_issuer_and_garbage() {
        let mut claims = JwtUtils::verify_token(
            &JwtUtils::generate_token(&user(UserRole::User)).expect("token"),
        )
        .expect("valid");
        claims.iss = "someone-else".into();
        let token = JwtUtils::encode_claims(&claims).expect("token");

        assert_eq!(
            JwtUtils::verify_token(&token),
            Err(TokenErrorCode::InvalidToken)
        );
        assert_eq!(
            JwtUtils::verify_token("not-a-jwt"),
            Err(TokenErrorCode::InvalidToken)
        );
    }
}
