use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use crate::models::ApiResult;
use crate::models::courses::requests::CourseRequest;
use crate::models::courses::responses::CourseDto;

use super::{CourseService, map_title_conflict};

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    course: CourseRequest,
) -> ApiResult<HttpResponse> {
    let fields = course.into_fields()?;
    let storage = service.get_storage(request)?;

    let created = storage
        .create_course(fields)
        .await
        .map_err(map_title_conflict)?;
    info!("created course [{}] {}", created.id, created.title);

    Ok(HttpResponse::Ok().json(CourseDto::from(created)))
}
