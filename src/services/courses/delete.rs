use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use crate::models::courses::errors::CourseErrorCode;
use crate::models::{ApiResult, MessageDto};
use crate::utils::validate::validate_uuid;

use super::CourseService;

pub async fn delete_course(
    service: &CourseService,
    request: &HttpRequest,
    id: String,
) -> ApiResult<HttpResponse> {
    validate_uuid(&id)?;
    let storage = service.get_storage(request)?;

    if !storage.delete_course(&id).await? {
        return Err(CourseErrorCode::CourseNotFound.into());
    }
    info!("deleted course [{}]", id);

    Ok(HttpResponse::Ok().json(MessageDto::ok("Successfully deleted the course")))
}
