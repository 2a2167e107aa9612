use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use crate::models::courses::errors::CourseErrorCode;
use crate::models::courses::requests::CourseRequest;
use crate::models::courses::responses::CourseDto;
use crate::models::{ApiResult, CommonErrorCode};
use crate::utils::validate::parse_course_href;

use super::{CourseService, map_title_conflict};

pub async fn update_course(
    service: &CourseService,
    request: &HttpRequest,
    mut course: CourseRequest,
) -> ApiResult<HttpResponse> {
    let href = course.id_href.take().ok_or(CommonErrorCode::InvalidHref)?;
    let id = parse_course_href(&href)?.to_string();
    let fields = course.into_fields()?;

    let storage = service.get_storage(request)?;
    let updated = storage
        .update_course(&id, fields)
        .await
        .map_err(map_title_conflict)?
        .ok_or(CourseErrorCode::CourseNotFound)?;
    info!("updated course [{}]", updated.id);

    Ok(HttpResponse::Ok().json(CourseDto::from(updated)))
}
