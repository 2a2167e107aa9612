use actix_web::{HttpRequest, HttpResponse, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::ApiResult;
use crate::models::auth::entities::UserRole;
use crate::models::students::requests::{EnrolmentRequest, StudentQuery, UpdateStudentRequest};
use crate::services::StudentService;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn create_enrolment(
    req: HttpRequest,
    enrolment: web::Json<EnrolmentRequest>,
) -> ApiResult<HttpResponse> {
    STUDENT_SERVICE
        .create_enrolment(&req, enrolment.into_inner())
        .await
}

pub async fn update_student(
    req: HttpRequest,
    update: web::Json<UpdateStudentRequest>,
) -> ApiResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(&req, update.into_inner())
        .await
}

pub async fn get_student(
    req: HttpRequest,
    query: web::Query<StudentQuery>,
) -> ApiResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&req, query.into_inner()).await
}

pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/student")
            .service(
                web::resource("/enrolment")
                    .wrap(RequireRole::new_any(UserRole::all_roles()))
                    .wrap(RequireJWT)
                    .route(web::post().to(create_enrolment)),
            )
            .service(
                web::resource("")
                    .wrap(RequireRole::new_any(UserRole::student_roles()))
                    .wrap(RequireJWT)
                    .route(web::post().to(update_student))
                    .route(web::get().to(get_student)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageDto;
    use crate::models::finance::entities::InvoiceType;
    use crate::models::students::responses::StudentDto;
    use crate::routes::test_support::{MockServices, bearer, json_config, query_config, storage};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::json;
    use std::sync::Arc;

    const USER_ID: &str = "3f1b6a4e-2c8d-4e9a-b7f0-6d5c4b3a2910";
    const COURSE_A: &str = "/courses/9e8d7c6b-5a49-4382-a1b0-c9d8e7f6a5b4";
    const COURSE_B: &str = "/courses/1a2b3c4d-5e6f-4a7b-8c9d-0e1f2a3b4c5d";

    fn href() -> String {
        format!("/auth/user/{USER_ID}")
    }

    macro_rules! student_app {
        ($storage:expr, $mocks:expr) => {
            test::init_service(
                App::new()
                    .app_data(json_config())
                    .app_data(query_config())
                    .app_data(web::Data::new($storage.clone()))
                    .app_data(web::Data::new($mocks.clone().into_clients()))
                    .configure(configure_student_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_first_enrolment_creates_student_and_bills() {
        let storage = storage().await;
        let mocks = Arc::new(MockServices::default());
        let app = student_app!(storage, mocks);

        let req = test::TestRequest::post()
            .uri("/student/enrolment")
            .insert_header(bearer(USER_ID, UserRole::User))
            .set_json(json!({"authUserHref": href(), "courseHref": COURSE_A}))
            .to_request();
        let dto: StudentDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(dto.course_hrefs, vec![COURSE_A.to_string()]);
        let upgraded = dto.jwt_token_dto.expect("new student gets a token");
        assert_eq!(upgraded.user_id.as_deref(), Some(USER_ID));
        assert_eq!(*mocks.library_students.lock().expect("lock"), 1);

        // 第二门课程只开账单
        let req = test::TestRequest::post()
            .uri("/student/enrolment")
            .insert_header(("Authorization", format!("Bearer {}", upgraded.jwt_token)))
            .set_json(json!({"authUserHref": href(), "courseHref": COURSE_B}))
            .to_request();
        let dto: StudentDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(dto.course_hrefs.len(), 2);
        assert!(dto.jwt_token_dto.is_none());

        let accounts = mocks.accounts.lock().expect("lock");
        assert_eq!(accounts.len(), 2);
        let invoice = &accounts[0].invoice_list[0];
        assert_eq!(invoice.invoice_type, InvoiceType::TuitionFees);
        assert_eq!(invoice.amount, 750.0);
        drop(accounts);

        let req = test::TestRequest::post()
            .uri("/student/enrolment")
            .insert_header(("Authorization", format!("Bearer {}", upgraded.jwt_token)))
            .set_json(json!({"authUserHref": href(), "courseHref": COURSE_B}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 10002);
    }

    #[actix_web::test]
    async fn test_failed_billing_rolls_back_new_student() {
        let storage = storage().await;
        let mocks = Arc::new(MockServices {
            fail_finance: true,
            ..Default::default()
        });
        let app = student_app!(storage, mocks);

        let req = test::TestRequest::post()
            .uri("/student/enrolment")
            .insert_header(bearer(USER_ID, UserRole::User))
            .set_json(json!({"authUserHref": href(), "courseHref": COURSE_A}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 7003);

        assert!(
            storage
                .get_student_by_auth_href(&href())
                .await
                .expect("query")
                .is_none()
        );
    }

    #[actix_web::test]
    async fn test_failed_billing_keeps_existing_enrollments() {
        let storage = storage().await;
        storage
            .create_student_with_enrollment(&href(), COURSE_A)
            .await
            .expect("seed student");
        let mocks = Arc::new(MockServices {
            fail_finance: true,
            ..Default::default()
        });
        let app = student_app!(storage, mocks);

        let req = test::TestRequest::post()
            .uri("/student/enrolment")
            .insert_header(bearer(USER_ID, UserRole::Student))
            .set_json(json!({"authUserHref": href(), "courseHref": COURSE_B}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 7003);

        let student = storage
            .get_student_by_auth_href(&href())
            .await
            .expect("query")
            .expect("student kept");
        assert_eq!(student.course_hrefs, vec![COURSE_A.to_string()]);
    }

    #[actix_web::test]
    async fn test_course_href_case_is_ignored() {
        let storage = storage().await;
        storage
            .create_student_with_enrollment(&href(), COURSE_A)
            .await
            .expect("seed student");
        let mocks = Arc::new(MockServices::default());
        let app = student_app!(storage, mocks);

        let shouted = |course: &str| {
            format!("/courses/{}", course["/courses/".len()..].to_ascii_uppercase())
        };
        let req = test::TestRequest::post()
            .uri("/student/enrolment")
            .insert_header(bearer(USER_ID, UserRole::Student))
            .set_json(json!({"authUserHref": href(), "courseHref": shouted(COURSE_A)}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 10002);
        assert!(mocks.accounts.lock().expect("lock").is_empty());

        let req = test::TestRequest::post()
            .uri("/student/enrolment")
            .insert_header(bearer(USER_ID, UserRole::Student))
            .set_json(json!({"authUserHref": href(), "courseHref": shouted(COURSE_B)}))
            .to_request();
        let dto: StudentDto = test::call_and_read_body_json(&app, req).await;
        assert!(dto.course_hrefs.contains(&COURSE_B.to_string()));
    }

    #[actix_web::test]
    async fn test_enrolment_rejects_foreign_href() {
        let storage = storage().await;
        let mocks = Arc::new(MockServices::default());
        let app = student_app!(storage, mocks);

        let req = test::TestRequest::post()
            .uri("/student/enrolment")
            .insert_header(bearer("7c6b5a49-3827-4161-9f0e-d1c2b3a49586", UserRole::User))
            .set_json(json!({"authUserHref": href(), "courseHref": COURSE_A}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/student/enrolment")
            .insert_header(bearer(USER_ID, UserRole::User))
            .set_json(json!({"authUserHref": href(), "courseHref": "/course/x"}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 9002);
    }

    #[actix_web::test]
    async fn test_update_and_get_student() {
        let storage = storage().await;
        storage
            .create_student_with_enrollment(&href(), COURSE_A)
            .await
            .expect("seed student");
        let mocks = Arc::new(MockServices::default());
        let app = student_app!(storage, mocks);

        // 普通用户不能访问学生资料
        let req = test::TestRequest::get()
            .uri(&format!("/student?authUserHref={}", href()))
            .insert_header(bearer(USER_ID, UserRole::User))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::post()
            .uri("/student")
            .insert_header(bearer(USER_ID, UserRole::Student))
            .set_json(json!({
                "authUserHref": href(),
                "address": "1 Headingley Lane",
                "emergencyContact": "Parent",
                "dateOfBirth": "2001-04-12",
                "phoneContact": "0113 000 0000"
            }))
            .to_request();
        let dto: StudentDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(dto.address.as_deref(), Some("1 Headingley Lane"));

        let req = test::TestRequest::get()
            .uri(&format!("/student?studentId={}", dto.id))
            .insert_header(bearer(USER_ID, UserRole::Student))
            .to_request();
        let found: StudentDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.id, dto.id);

        let req = test::TestRequest::get()
            .uri(&format!("/student?studentId={}", dto.id))
            .insert_header(bearer("7c6b5a49-3827-4161-9f0e-d1c2b3a49586", UserRole::Student))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 6005);

        let req = test::TestRequest::post()
            .uri("/student")
            .insert_header(bearer(USER_ID, UserRole::Student))
            .set_json(json!({"authUserHref": href(), "address": "somewhere"}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 10001);
    }
}
