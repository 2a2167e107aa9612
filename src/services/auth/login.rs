use actix_web::{HttpRequest, HttpResponse};
use tracing::{error, info};

use crate::models::ApiResult;
use crate::models::auth::entities::User;
use crate::models::auth::errors::AuthErrorCode;
use crate::models::auth::requests::LoginRequest;
use crate::models::auth::responses::JwtTokenDto;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

/// 账户状态检查，顺序决定返回的错误码
pub(super) fn check_account_status(user: &User) -> Result<(), AuthErrorCode> {
    if !user.enabled {
        return Err(AuthErrorCode::AccountNotActivated);
    }
    if !user.credentials_non_expired || !user.account_non_expired {
        return Err(AuthErrorCode::CredentialsExpired);
    }
    if !user.account_non_locked {
        return Err(AuthErrorCode::AccountLocked);
    }
    Ok(())
}

pub(super) fn issue_token(user: &User) -> ApiResult<JwtTokenDto> {
    let jwt_token = JwtUtils::generate_token(user)?;
    Ok(JwtTokenDto {
        jwt_token,
        user_id: Some(user.id.clone()),
    })
}

pub async fn handle_login(
    service: &AuthService,
    request: &HttpRequest,
    login_request: LoginRequest,
) -> ApiResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let user = storage
        .get_user_by_username(&login_request.user_name)
        .await?
        .ok_or_else(|| {
            error!("login with unknown username [{}]", login_request.user_name);
            AuthErrorCode::UsernameNotFound
        })?;

    check_account_status(&user).inspect_err(|code| error!("{}", code.message()))?;

    if !verify_password(&login_request.password, &user.password_hash) {
        error!("invalid password for user [{}]", user.username);
        return Err(AuthErrorCode::BadCredentials.into());
    }

    storage.record_user_login(&user.id).await?;
    info!("user successfully authenticated [{}]", user.username);

    Ok(HttpResponse::Ok().json(issue_token(&user)?))
}
