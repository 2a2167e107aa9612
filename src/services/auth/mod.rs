pub mod activation;
pub mod login;
pub mod register;
pub mod token;
pub mod user;

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::ApiResult;
use crate::models::auth::requests::{CreateUserRequest, LoginRequest, UpdateUserRequest};
use crate::models::auth::responses::JwtTokenDto;
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 用户注册
    pub async fn register(
        &self,
        request: &HttpRequest,
        create_request: CreateUserRequest,
    ) -> ApiResult<HttpResponse> {
        register::handle_register(self, request, create_request).await
    }

    // 登录
    pub async fn login(
        &self,
        request: &HttpRequest,
        login_request: LoginRequest,
    ) -> ApiResult<HttpResponse> {
        login::handle_login(self, request, login_request).await
    }

    // 获取用户信息（仅本人）
    pub async fn get_user(&self, request: &HttpRequest, user_id: String) -> ApiResult<HttpResponse> {
        user::get_user(self, request, user_id).await
    }

    // 更新本人资料
    pub async fn update_user(
        &self,
        request: &HttpRequest,
        update_request: UpdateUserRequest,
    ) -> ApiResult<HttpResponse> {
        user::update_user(self, request, update_request).await
    }

    // 删除本人账户
    pub async fn delete_user(
        &self,
        request: &HttpRequest,
        user_id: String,
    ) -> ApiResult<HttpResponse> {
        user::delete_user(self, request, user_id).await
    }

    // 升级为学生并签发新令牌
    pub async fn upgrade_user(
        &self,
        request: &HttpRequest,
        user_id: String,
    ) -> ApiResult<HttpResponse> {
        user::upgrade_user(self, request, user_id).await
    }

    // 重发激活邮件
    pub async fn resend_activation(
        &self,
        request: &HttpRequest,
        user_id: String,
    ) -> ApiResult<HttpResponse> {
        activation::resend_activation(self, request, user_id).await
    }

    // 激活账户
    pub async fn activate(&self, request: &HttpRequest, token: String) -> ApiResult<HttpResponse> {
        activation::activate_account(self, request, token).await
    }

    // 校验令牌
    pub async fn validate_token(&self, token_dto: JwtTokenDto) -> ApiResult<HttpResponse> {
        token::validate_token(token_dto).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::auth::entities::{NewUser, User};
    use crate::storage::Storage;
    use crate::utils::password::hash_password;

    /// 创建并激活一个用户
    pub async fn active_user(storage: &dyn Storage, username: &str, password: &str) -> User {
        let user = storage
            .create_user(NewUser {
                username: username.into(),
                email: format!("{username}@lbu.ac.uk"),
                password_hash: hash_password(password).expect("hash"),
                first_name: "Test".into(),
                last_name: "User".into(),
            })
            .await
            .expect("create user");
        let activation = storage
            .replace_activation(&user.id, &uuid::Uuid::new_v4().to_string())
            .await
            .expect("activation");
        storage.activate_user(&activation).await.expect("activate");
        storage
            .get_user_by_id(&user.id)
            .await
            .expect("query")
            .expect("exists")
    }
}
