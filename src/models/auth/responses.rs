use serde::{Deserialize, Serialize};

use super::entities::User;

// 用户响应，password 字段始终为 null
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub user_id: String,
    pub user_name: String,
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            user_name: user.username,
            password: None,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}

// 令牌响应，也用作 /auth/validate 请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtTokenDto {
    pub jwt_token: String,
    #[serde(default)]
    pub user_id: Option<String>,
}
