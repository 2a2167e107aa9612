use actix_web::{HttpRequest, HttpResponse, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::ApiResult;
use crate::models::auth::entities::UserRole;
use crate::models::courses::requests::CourseRequest;
use crate::services::CourseService;

static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

pub async fn list_courses(req: HttpRequest) -> ApiResult<HttpResponse> {
    COURSE_SERVICE.list_courses(&req).await
}

pub async fn get_courses_by_ids(
    req: HttpRequest,
    ids: web::Json<Vec<String>>,
) -> ApiResult<HttpResponse> {
    COURSE_SERVICE
        .get_courses_by_ids(&req, ids.into_inner())
        .await
}

pub async fn get_course(req: HttpRequest, id: web::Path<String>) -> ApiResult<HttpResponse> {
    COURSE_SERVICE.get_course(&req, id.into_inner()).await
}

pub async fn create_course(
    req: HttpRequest,
    course: web::Json<CourseRequest>,
) -> ApiResult<HttpResponse> {
    COURSE_SERVICE.create_course(&req, course.into_inner()).await
}

pub async fn update_course(
    req: HttpRequest,
    course: web::Json<CourseRequest>,
) -> ApiResult<HttpResponse> {
    COURSE_SERVICE.update_course(&req, course.into_inner()).await
}

pub async fn delete_course(req: HttpRequest, id: web::Path<String>) -> ApiResult<HttpResponse> {
    COURSE_SERVICE.delete_course(&req, id.into_inner()).await
}

pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/courses")
            .wrap(RequireRole::new_any(UserRole::all_roles()))
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_courses))
                    .route(web::post().to(create_course))
                    .route(web::put().to(update_course)),
            )
            .route("/list", web::post().to(get_courses_by_ids))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_course))
                    .route(web::delete().to(delete_course)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageDto;
    use crate::models::courses::responses::{CourseDto, CourseDtos};
    use crate::routes::test_support::{bearer, json_config, storage};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::json;

    const CALLER: &str = "0b7c59a2-3c1e-4d55-9a0e-5d8f2f0c7a11";

    #[actix_web::test]
    async fn test_course_crud_flow() {
        let storage = storage().await;
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_course_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/courses")
            .insert_header(bearer(CALLER, UserRole::User))
            .set_json(json!({
                "title": "Operating Systems",
                "description": "Processes and memory",
                "fees": 1200.5,
                "durationInDays": 60
            }))
            .to_request();
        let created: CourseDto = test::call_and_read_body_json(&app, req).await;
        assert!(created.id_href.starts_with("/courses/"));

        // 标题重复
        let req = test::TestRequest::post()
            .uri("/courses")
            .insert_header(bearer(CALLER, UserRole::User))
            .set_json(json!({
                "title": "Operating Systems",
                "description": "Again",
                "fees": 10.0,
                "durationInDays": 5
            }))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 10002);

        let req = test::TestRequest::put()
            .uri("/courses")
            .insert_header(bearer(CALLER, UserRole::User))
            .set_json(json!({
                "idHref": created.id_href,
                "title": "Operating Systems II",
                "description": "Filesystems",
                "fees": 900.0,
                "durationInDays": 45,
                "instructor": "Dr. Grey"
            }))
            .to_request();
        let updated: CourseDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.instructor.as_deref(), Some("Dr. Grey"));
        assert_eq!(updated.id_href, created.id_href);

        let id = created.id_href.trim_start_matches("/courses/").to_string();
        let req = test::TestRequest::post()
            .uri("/courses/list")
            .insert_header(bearer(CALLER, UserRole::User))
            .set_json(json!([id, "5b0a3f5e-1d7c-4c1a-8f5e-1a2b3c4d5e6f"]))
            .to_request();
        let found: CourseDtos = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.courses.len(), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/courses/{id}"))
            .insert_header(bearer(CALLER, UserRole::User))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, MessageDto::ok("Successfully deleted the course"));

        let req = test::TestRequest::get()
            .uri(&format!("/courses/{id}"))
            .insert_header(bearer(CALLER, UserRole::User))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 10000);
    }

    #[actix_web::test]
    async fn test_course_validation_errors() {
        let storage = storage().await;
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_course_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/courses").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let req = test::TestRequest::get()
            .uri("/courses/not-a-uuid")
            .insert_header(bearer(CALLER, UserRole::User))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 9001);

        let req = test::TestRequest::put()
            .uri("/courses")
            .insert_header(bearer(CALLER, UserRole::User))
            .set_json(json!({"idHref": "/course/abc", "title": "X"}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 9002);

        let req = test::TestRequest::post()
            .uri("/courses")
            .insert_header(bearer(CALLER, UserRole::User))
            .set_json(json!({"title": "Incomplete"}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 10001);

        let req = test::TestRequest::post()
            .uri("/courses")
            .insert_header(bearer(CALLER, UserRole::User))
            .set_json(json!({
                "title": "Eternity",
                "description": "Outlasts the calendar",
                "fees": 10.0,
                "durationInDays": 2000000000
            }))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 10001);

        let req = test::TestRequest::post()
            .uri("/courses")
            .insert_header(bearer(CALLER, UserRole::User))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 9003);
    }
}
