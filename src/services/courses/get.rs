use actix_web::{HttpRequest, HttpResponse};

use crate::models::ApiResult;
use crate::models::courses::errors::CourseErrorCode;
use crate::models::courses::responses::CourseDto;
use crate::utils::validate::validate_uuid;

use super::CourseService;

pub async fn get_course(
    service: &CourseService,
    request: &HttpRequest,
    id: String,
) -> ApiResult<HttpResponse> {
    validate_uuid(&id)?;
    let storage = service.get_storage(request)?;

    let course = storage
        .get_course_by_id(&id)
        .await?
        .ok_or(CourseErrorCode::CourseNotFound)?;

    Ok(HttpResponse::Ok().json(CourseDto::from(course)))
}
