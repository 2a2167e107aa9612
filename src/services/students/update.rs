use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use crate::middlewares::RequireJWT;
use crate::models::students::entities::StudentProfile;
use crate::models::students::errors::StudentErrorCode;
use crate::models::students::requests::UpdateStudentRequest;
use crate::models::students::responses::StudentDto;
use crate::models::{ApiResult, CommonErrorCode};
use crate::utils::validate::parse_auth_user_href;

use super::StudentService;

fn required(value: Option<String>) -> Result<String, StudentErrorCode> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(StudentErrorCode::InvalidDetails)
}

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    update: UpdateStudentRequest,
) -> ApiResult<HttpResponse> {
    let auth_user_href = update.auth_user_href.ok_or(CommonErrorCode::InvalidHref)?;
    parse_auth_user_href(&auth_user_href)?;

    let profile = StudentProfile {
        address: required(update.address)?,
        emergency_contact: required(update.emergency_contact)?,
        date_of_birth: update
            .date_of_birth
            .ok_or(StudentErrorCode::InvalidDetails)?,
        phone_contact: required(update.phone_contact)?,
    };

    RequireJWT::validate_auth_user_href(request, &auth_user_href)?;

    let storage = service.get_storage(request)?;
    let student = storage
        .update_student_profile(&auth_user_href, profile)
        .await?
        .ok_or(StudentErrorCode::StudentNotFound)?;
    info!("updated student profile [{}]", student.id);

    Ok(HttpResponse::Ok().json(StudentDto::from(student)))
}
