use actix_web::{HttpRequest, HttpResponse, guard, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT, RequireRole};
use crate::models::ApiResult;
use crate::models::auth::entities::UserRole;
use crate::models::auth::requests::{CreateUserRequest, LoginRequest, UpdateUserRequest};
use crate::models::auth::responses::JwtTokenDto;
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn create_user(
    req: HttpRequest,
    user_data: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    AUTH_SERVICE.register(&req, user_data.into_inner()).await
}

pub async fn get_user(req: HttpRequest, user_id: web::Path<String>) -> ApiResult<HttpResponse> {
    AUTH_SERVICE.get_user(&req, user_id.into_inner()).await
}

pub async fn update_user(
    req: HttpRequest,
    user_data: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    AUTH_SERVICE.update_user(&req, user_data.into_inner()).await
}

pub async fn delete_user(req: HttpRequest, user_id: web::Path<String>) -> ApiResult<HttpResponse> {
    AUTH_SERVICE.delete_user(&req, user_id.into_inner()).await
}

pub async fn upgrade_user(req: HttpRequest, user_id: web::Path<String>) -> ApiResult<HttpResponse> {
    AUTH_SERVICE.upgrade_user(&req, user_id.into_inner()).await
}

pub async fn login(
    req: HttpRequest,
    login_data: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    AUTH_SERVICE.login(&req, login_data.into_inner()).await
}

pub async fn resend_activation(
    req: HttpRequest,
    user_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    AUTH_SERVICE
        .resend_activation(&req, user_id.into_inner())
        .await
}

pub async fn activate(req: HttpRequest, token: web::Path<String>) -> ApiResult<HttpResponse> {
    AUTH_SERVICE.activate(&req, token.into_inner()).await
}

pub async fn validate_token(token: web::Json<JwtTokenDto>) -> ApiResult<HttpResponse> {
    AUTH_SERVICE.validate_token(token.into_inner()).await
}

// 配置路由
// 同一路径按方法拆成多个 resource，未匹配 guard 的 resource 会被跳过
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/user")
                    .guard(guard::Put())
                    .wrap(RequireRole::new_any(UserRole::student_roles()))
                    .wrap(RequireJWT)
                    .route(web::put().to(update_user)),
            )
            .service(
                web::resource("/user")
                    .wrap(RateLimit::register())
                    .route(web::post().to(create_user)),
            )
            .service(
                web::resource("/user/{user_id}")
                    .guard(guard::Delete())
                    .wrap(RequireRole::new_any(UserRole::student_roles()))
                    .wrap(RequireJWT)
                    .route(web::delete().to(delete_user)),
            )
            .service(
                web::resource("/user/{user_id}")
                    .wrap(RequireRole::new_any(UserRole::all_roles()))
                    .wrap(RequireJWT)
                    .route(web::get().to(get_user))
                    .route(web::post().to(upgrade_user)),
            )
            .service(
                web::resource("/login")
                    .wrap(RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::resource("/token/{user_id}")
                    .wrap(RateLimit::activation())
                    .route(web::get().to(resend_activation)),
            )
            .route("/activation/{token}", web::get().to(activate))
            .route("/validate", web::post().to(validate_token)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageDto;
    use crate::models::auth::responses::UserDto;
    use crate::routes::test_support::{bearer, json_config, storage};
    use crate::services::auth::test_support::active_user;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::json;

    macro_rules! auth_app {
        ($storage:expr) => {
            test::init_service(
                App::new()
                    .app_data(json_config())
                    .app_data(web::Data::new($storage.clone()))
                    .configure(configure_auth_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_register_then_login_requires_activation() {
        let storage = storage().await;
        let app = auth_app!(storage);

        let req = test::TestRequest::post()
            .uri("/auth/user")
            .peer_addr("10.0.0.1:1000".parse().expect("addr"))
            .set_json(json!({
                "userName": "newstudent",
                "password": "Sup3rSecret",
                "firstName": "New",
                "lastName": "Student",
                "email": "new@lbu.ac.uk"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let created: UserDto = test::read_body_json(resp).await;
        assert_eq!(created.user_name, "newstudent");
        assert!(created.password.is_none());

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr("10.0.0.1:1000".parse().expect("addr"))
            .set_json(json!({"userName": "newstudent", "password": "Sup3rSecret"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: MessageDto = test::read_body_json(resp).await;
        assert_eq!(body.code, 4000);

        // 激活后可以登录
        let activation = storage
            .get_activation_by_user(&created.user_id)
            .await
            .expect("query")
            .expect("activation");
        let req = test::TestRequest::get()
            .uri(&format!("/auth/activation/{}", activation.token))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 2000);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr("10.0.0.1:1000".parse().expect("addr"))
            .set_json(json!({"userName": "newstudent", "password": "Sup3rSecret"}))
            .to_request();
        let token: JwtTokenDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(token.user_id.as_deref(), Some(created.user_id.as_str()));

        let req = test::TestRequest::post()
            .uri("/auth/validate")
            .set_json(json!({"jwtToken": token.jwt_token}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 2002);
    }

    #[actix_web::test]
    async fn test_duplicate_registration_and_bad_password() {
        let storage = storage().await;
        active_user(storage.as_ref(), "existing", "Corr3ctHorse").await;
        let app = auth_app!(storage);

        let req = test::TestRequest::post()
            .uri("/auth/user")
            .peer_addr("10.0.0.2:1000".parse().expect("addr"))
            .set_json(json!({
                "userName": "existing",
                "password": "whatever1",
                "firstName": "A",
                "lastName": "B",
                "email": "other@lbu.ac.uk"
            }))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 4006);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr("10.0.0.2:1000".parse().expect("addr"))
            .set_json(json!({"userName": "existing", "password": "wrong"}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 4003);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr("10.0.0.2:1000".parse().expect("addr"))
            .set_json(json!({"userName": "nobody", "password": "wrong"}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 4004);
    }

    #[actix_web::test]
    async fn test_get_user_requires_ownership() {
        let storage = storage().await;
        let user = active_user(storage.as_ref(), "owner", "Corr3ctHorse").await;
        let app = auth_app!(storage);

        let req = test::TestRequest::get()
            .uri(&format!("/auth/user/{}", user.id))
            .insert_header(bearer(&user.id, UserRole::User))
            .to_request();
        let dto: UserDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(dto.user_name, "owner");

        let req = test::TestRequest::get()
            .uri(&format!("/auth/user/{}", user.id))
            .insert_header(bearer("11111111-2222-4333-8444-555555555555", UserRole::User))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: MessageDto = test::read_body_json(resp).await;
        assert_eq!(body.code, 6005);
    }

    #[actix_web::test]
    async fn test_upgrade_issues_student_token() {
        let storage = storage().await;
        let user = active_user(storage.as_ref(), "upgrader", "Corr3ctHorse").await;
        let app = auth_app!(storage);

        let req = test::TestRequest::post()
            .uri(&format!("/auth/user/{}", user.id))
            .insert_header(bearer(&user.id, UserRole::User))
            .to_request();
        let token: JwtTokenDto = test::call_and_read_body_json(&app, req).await;
        let claims = crate::utils::jwt::JwtUtils::verify_token(&token.jwt_token).expect("valid");
        assert_eq!(claims.roles, vec!["ROLE_STUDENT".to_string()]);

        // 普通用户不能删除账户
        let req = test::TestRequest::delete()
            .uri(&format!("/auth/user/{}", user.id))
            .insert_header(bearer(&user.id, UserRole::User))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::delete()
            .uri(&format!("/auth/user/{}", user.id))
            .insert_header(("Authorization", format!("Bearer {}", token.jwt_token)))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 200);
    }

    #[actix_web::test]
    async fn test_upgrade_inactive_user_keeps_role() {
        let storage = storage().await;
        let user = storage
            .create_user(crate::models::auth::entities::NewUser {
                username: "dormant".into(),
                email: "dormant@lbu.ac.uk".into(),
                password_hash: crate::utils::password::hash_password("Corr3ctHorse")
                    .expect("hash"),
                first_name: "Dor".into(),
                last_name: "Mant".into(),
            })
            .await
            .expect("create user");
        let app = auth_app!(storage);

        let req = test::TestRequest::post()
            .uri(&format!("/auth/user/{}", user.id))
            .insert_header(bearer(&user.id, UserRole::User))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 4000);

        let stored = storage
            .get_user_by_id(&user.id)
            .await
            .expect("query")
            .expect("exists");
        assert_eq!(stored.role, UserRole::User);
    }

    #[actix_web::test]
    async fn test_activation_resend_rules() {
        let storage = storage().await;
        let app = auth_app!(storage);

        let req = test::TestRequest::post()
            .uri("/auth/user")
            .peer_addr("10.0.0.3:1000".parse().expect("addr"))
            .set_json(json!({
                "userName": "resender",
                "password": "Sup3rSecret",
                "firstName": "Re",
                "lastName": "Send",
                "email": "resend@lbu.ac.uk"
            }))
            .to_request();
        let created: UserDto = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/auth/token/{}", created.user_id))
            .peer_addr("10.0.0.3:1000".parse().expect("addr"))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 5001);

        let req = test::TestRequest::get()
            .uri("/auth/activation/not-a-token")
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 5003);
    }

    #[actix_web::test]
    async fn test_update_own_profile() {
        let storage = storage().await;
        let user = active_user(storage.as_ref(), "profile", "Corr3ctHorse").await;
        let app = auth_app!(storage);

        let req = test::TestRequest::put()
            .uri("/auth/user")
            .insert_header(bearer(&user.id, UserRole::Student))
            .set_json(json!({"userId": user.id, "firstName": "Renamed", "email": "renamed@lbu.ac.uk"}))
            .to_request();
        let dto: UserDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(dto.first_name, "Renamed");
        assert_eq!(dto.email, "renamed@lbu.ac.uk");
        assert_eq!(dto.last_name, "User");

        let req = test::TestRequest::put()
            .uri("/auth/user")
            .insert_header(bearer(&user.id, UserRole::Student))
            .set_json(json!({"userId": "11111111-2222-4333-8444-555555555555", "firstName": "X"}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 6005);

        let req = test::TestRequest::put()
            .uri("/auth/user")
            .insert_header(bearer(&user.id, UserRole::Student))
            .set_json(json!({"email": "not-an-email"}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 7000);
    }
}
