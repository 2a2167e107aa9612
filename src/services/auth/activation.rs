use actix_web::{HttpRequest, HttpResponse};
use tracing::{error, info};

use crate::models::auth::entities::ActivationDetails;
use crate::models::auth::errors::{AuthErrorCode, AuthSuccessCode};
use crate::models::{ApiResult, MessageDto};

use super::AuthService;
use super::register::send_activation_link;

fn within_window(activation: &ActivationDetails, hours: i64) -> bool {
    chrono::Utc::now() - activation.created_at < chrono::Duration::hours(hours)
}

pub async fn resend_activation(
    service: &AuthService,
    request: &HttpRequest,
    user_id: String,
) -> ApiResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let resend_hours = service.get_config().activation.resend_hours;

    let activation = storage
        .get_activation_by_user(&user_id)
        .await?
        .ok_or(AuthErrorCode::AccountAlreadyActivated)?;

    if within_window(&activation, resend_hours) {
        error!("activation link for [{}] is still usable", user_id);
        return Err(AuthErrorCode::ActivationStillUsable.into());
    }

    let user = storage
        .get_user_by_id(&user_id)
        .await?
        .ok_or(AuthErrorCode::UserIdNotFound)?;

    send_activation_link(service, storage.as_ref(), &user).await?;
    info!("successfully resent account activation [{}]", user_id);

    Ok(HttpResponse::Ok().json(MessageDto::from(AuthSuccessCode::ActivationResent)))
}

pub async fn activate_account(
    service: &AuthService,
    request: &HttpRequest,
    token: String,
) -> ApiResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let resend_hours = service.get_config().activation.resend_hours;

    let activation = storage
        .get_activation_by_token(&token)
        .await?
        .ok_or(AuthErrorCode::ActivationTokenInvalid)?;

    if !within_window(&activation, resend_hours) {
        return Err(AuthErrorCode::ActivationTokenExpired.into());
    }

    let user = storage
        .get_user_by_id(&activation.user_id)
        .await?
        .ok_or(AuthErrorCode::UserIdNotFound)?;
    if user.enabled {
        return Err(AuthErrorCode::AccountAlreadyActivated.into());
    }

    storage.activate_user(&activation).await?;
    info!("account successfully activated [{}]", user.username);

    Ok(HttpResponse::Ok().json(MessageDto::from(AuthSuccessCode::AccountActivated)))
}
