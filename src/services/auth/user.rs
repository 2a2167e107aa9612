use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use crate::middlewares::RequireJWT;
use crate::models::auth::entities::{UserRole, UserUpdate};
use crate::models::auth::errors::AuthErrorCode;
use crate::models::auth::requests::UpdateUserRequest;
use crate::models::auth::responses::UserDto;
use crate::models::{ApiError, ApiResult, MessageDto, TokenErrorCode};
use crate::utils::password::hash_password;
use crate::utils::validate::validate_email;

use super::AuthService;
use super::login::{check_account_status, issue_token};

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn get_user(
    service: &AuthService,
    request: &HttpRequest,
    user_id: String,
) -> ApiResult<HttpResponse> {
    RequireJWT::validate_auth_user_href(request, &format!("/auth/user/{user_id}"))?;
    let storage = service.get_storage(request)?;

    let user = storage
        .get_user_by_id(&user_id)
        .await?
        .ok_or(AuthErrorCode::UserIdNotFound)?;

    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

pub async fn update_user(
    service: &AuthService,
    request: &HttpRequest,
    update_request: UpdateUserRequest,
) -> ApiResult<HttpResponse> {
    let claims = RequireJWT::extract_claims(request).ok_or(TokenErrorCode::InvalidBearer)?;
    if let Some(user_id) = &update_request.user_id
        && user_id != &claims.user_id
    {
        return Err(TokenErrorCode::InvalidUserAccess.into());
    }

    let email = non_empty(update_request.email);
    if let Some(email) = &email {
        validate_email(email).map_err(|_| AuthErrorCode::InvalidCredentials)?;
    }
    let password_hash = match update_request.password.filter(|p| !p.is_empty()) {
        Some(password) => Some(hash_password(&password)?),
        None => None,
    };

    let storage = service.get_storage(request)?;
    let user = storage
        .update_user(
            &claims.user_id,
            UserUpdate {
                email,
                password_hash,
                first_name: non_empty(update_request.first_name),
                last_name: non_empty(update_request.last_name),
            },
        )
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                AuthErrorCode::UserAlreadyExists.into()
            } else {
                ApiError::from(e)
            }
        })?
        .ok_or(AuthErrorCode::UserIdNotFound)?;
    info!("updated user [{}]", user.username);

    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

pub async fn delete_user(
    service: &AuthService,
    request: &HttpRequest,
    user_id: String,
) -> ApiResult<HttpResponse> {
    RequireJWT::validate_auth_user_href(request, &format!("/auth/user/{user_id}"))?;
    let storage = service.get_storage(request)?;

    if !storage.delete_user(&user_id).await? {
        return Err(AuthErrorCode::UserIdNotFound.into());
    }
    info!("deleted user [{}]", user_id);

    Ok(HttpResponse::Ok().json(MessageDto::ok("Successfully deleted the user")))
}

pub async fn upgrade_user(
    service: &AuthService,
    request: &HttpRequest,
    user_id: String,
) -> ApiResult<HttpResponse> {
    RequireJWT::validate_auth_user_href(request, &format!("/auth/user/{user_id}"))?;
    let storage = service.get_storage(request)?;

    let user = storage
        .get_user_by_id(&user_id)
        .await?
        .ok_or(AuthErrorCode::UserIdNotFound)?;
    check_account_status(&user)?;

    info!("updating the user into STUDENT [{}]", user_id);
    let user = storage
        .set_user_role(&user_id, UserRole::Student)
        .await?
        .ok_or(AuthErrorCode::UserIdNotFound)?;

    Ok(HttpResponse::Ok().json(issue_token(&user)?))
}
