use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use crate::models::ApiResult;
use crate::models::auth::entities::{NewUser, User};
use crate::models::auth::errors::AuthErrorCode;
use crate::models::auth::requests::CreateUserRequest;
use crate::models::auth::responses::UserDto;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::validate_email;

use super::AuthService;

fn required(value: Option<String>) -> Result<String, AuthErrorCode> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AuthErrorCode::InvalidCredentials)
}

pub async fn handle_register(
    service: &AuthService,
    request: &HttpRequest,
    create_request: CreateUserRequest,
) -> ApiResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 1. 必填字段
    let username = required(create_request.user_name)?;
    let password = create_request
        .password
        .filter(|p| !p.is_empty())
        .ok_or(AuthErrorCode::InvalidCredentials)?;
    let first_name = required(create_request.first_name)?;
    let last_name = required(create_request.last_name)?;
    let email = required(create_request.email)?;
    validate_email(&email).map_err(|_| AuthErrorCode::InvalidCredentials)?;

    // 2. 创建用户（全部状态为 false，角色 USER）
    let password_hash = hash_password(&password)?;
    let user = storage
        .create_user(NewUser {
            username,
            email,
            password_hash,
            first_name,
            last_name,
        })
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                AuthErrorCode::UserAlreadyExists.into()
            } else {
                crate::models::ApiError::from(e)
            }
        })?;
    info!("created a new user [{}]", user.username);

    // 3. 发送激活邮件
    send_activation_link(service, storage.as_ref(), &user).await?;

    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

/// 生成新的激活令牌并“发送”激活链接
pub(super) async fn send_activation_link(
    service: &AuthService,
    storage: &dyn Storage,
    user: &User,
) -> ApiResult<()> {
    let token = uuid::Uuid::new_v4().to_string();
    storage.replace_activation(&user.id, &token).await?;

    let link = format!("{}{}", service.get_config().activation.link_prefix, token);
    info!(
        "activation link for user [{}] <{}>: {}",
        user.username, user.email, link
    );
    Ok(())
}
