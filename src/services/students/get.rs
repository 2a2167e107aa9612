use actix_web::{HttpRequest, HttpResponse};

use crate::middlewares::RequireJWT;
use crate::models::students::errors::StudentErrorCode;
use crate::models::students::requests::StudentQuery;
use crate::models::students::responses::StudentDto;
use crate::models::{ApiResult, TokenErrorCode};

use super::StudentService;

pub async fn get_student(
    service: &StudentService,
    request: &HttpRequest,
    query: StudentQuery,
) -> ApiResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let student = match (query.auth_user_href, query.student_id) {
        (Some(href), _) => {
            RequireJWT::validate_auth_user_href(request, &href)?;
            storage.get_student_by_auth_href(&href).await?
        }
        (None, Some(student_id)) => storage.get_student_by_id(&student_id).await?,
        (None, None) => None,
    }
    .ok_or(StudentErrorCode::StudentNotFound)?;

    // 按 studentId 查询时同样只允许本人
    if student.auth_user_href != RequireJWT::auth_user_href(request)? {
        return Err(TokenErrorCode::InvalidUserAccess.into());
    }

    Ok(HttpResponse::Ok().json(StudentDto::from(student)))
}
