use actix_web::{HttpRequest, HttpResponse};

use crate::models::ApiResult;
use crate::models::courses::responses::{CourseDto, CourseDtos};
use crate::utils::validate::validate_uuid;

use super::CourseService;

pub async fn list_courses(service: &CourseService, request: &HttpRequest) -> ApiResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let courses = storage.list_courses().await?;

    Ok(HttpResponse::Ok().json(CourseDtos {
        courses: courses.into_iter().map(CourseDto::from).collect(),
    }))
}

pub async fn get_courses_by_ids(
    service: &CourseService,
    request: &HttpRequest,
    ids: Vec<String>,
) -> ApiResult<HttpResponse> {
    for id in &ids {
        validate_uuid(id)?;
    }

    let storage = service.get_storage(request)?;
    let courses = storage.list_courses_by_ids(&ids).await?;

    Ok(HttpResponse::Ok().json(CourseDtos {
        courses: courses.into_iter().map(CourseDto::from).collect(),
    }))
}
