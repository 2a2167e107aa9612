/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>` 请求头中的令牌（签名、过期时间、签发方），
 * 并把解码后的 `Claims` 与原始令牌放入请求扩展，供处理程序与 `RequireRole` 使用。
 *
 * ```rust,ignore
 * web::scope("/courses")
 *     .wrap(RequireRole::new_any(UserRole::all_roles()))
 *     .wrap(RequireJWT)
 * ```
 *
 * 解码结果按令牌缓存到 `ObjectCache`，有效期与令牌剩余寿命一致。
 *
 * 错误：缺少请求头返回 401 / 6003，格式不符返回 400 / 6003，
 * 过期返回 6001，其余校验失败返回 6002。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::models::{ApiError, TokenErrorCode};
use crate::utils::jwt::{Claims, JwtUtils};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::AUTHORIZATION,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

static BEARER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Bearer\s+(.*)").expect("Invalid bearer regex"));

#[derive(Clone)]
pub struct RequireJWT;

/// 请求携带的原始令牌，转发给下游服务时使用
#[derive(Debug, Clone, PartialEq)]
pub struct AuthToken(pub String);

impl AuthToken {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

/// 按 `Bearer\s+(.*)` 提取令牌
pub fn parse_bearer(header: &str) -> Option<&str> {
    BEARER_RE
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|token| !token.is_empty())
}

fn cache_key(token: &str) -> String {
    format!("jwt:{token}")
}

// 辅助函数：提取并验证 JWT
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<(Claims, String), ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| {
            ApiError::from(TokenErrorCode::MissingToken).with_status(StatusCode::UNAUTHORIZED)
        })?
        .to_str()
        .map_err(|_| ApiError::from(TokenErrorCode::MissingToken))?;

    let token = parse_bearer(header)
        .ok_or_else(|| ApiError::from(TokenErrorCode::MissingToken))?
        .to_string();

    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());

    if let Some(cache) = &cache
        && let CacheResult::Found(json) = cache.get_raw(&cache_key(&token)).await
    {
        match serde_json::from_str::<Claims>(&json) {
            Ok(claims) => {
                debug!("JWT claims cache hit for user {}", claims.user_id);
                return Ok((claims, token));
            }
            Err(_) => {
                cache.remove(&cache_key(&token)).await;
                info!("Failed to deserialize cached claims, verifying again");
            }
        }
    }

    let claims = JwtUtils::verify_token(&token).map_err(|code| {
        info!("JWT token validation failed: {}", code.message());
        ApiError::from(code)
    })?;

    if let Some(cache) = &cache {
        let remaining = claims.exp as i64 - chrono::Utc::now().timestamp();
        if remaining > 0
            && let Ok(json) = serde_json::to_string(&claims)
        {
            cache
                .insert_raw(cache_key(&token), json, remaining as u64)
                .await;
        }
    }

    Ok((claims, token))
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::NO_CONTENT,
                        crate::models::MessageDto::ok(""),
                    )
                    .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok((claims, token)) => {
                    debug!("JWT authentication successful for user: {}", claims.sub);
                    req.extensions_mut().insert(claims);
                    req.extensions_mut().insert(AuthToken(token));
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(err.status, err.to_message()).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取认证信息
impl RequireJWT {
    /// 从请求扩展中提取 Claims，需在 RequireJWT 之后使用
    pub fn extract_claims(req: &HttpRequest) -> Option<Claims> {
        req.extensions().get::<Claims>().cloned()
    }

    /// 从请求扩展中提取原始令牌
    pub fn extract_token(req: &HttpRequest) -> Option<AuthToken> {
        req.extensions().get::<AuthToken>().cloned()
    }

    /// 调用方的 `/auth/user/{userId}`
    pub fn auth_user_href(req: &HttpRequest) -> Result<String, ApiError> {
        Self::extract_claims(req)
            .map(|claims| claims.auth_user_href())
            .ok_or_else(|| TokenErrorCode::InvalidBearer.into())
    }

    /// 校验 href 是否属于调用方
    pub fn validate_auth_user_href(req: &HttpRequest, href: &str) -> Result<(), ApiError> {
        if Self::auth_user_href(req)? == href {
            Ok(())
        } else {
            Err(TokenErrorCode::InvalidUserAccess.into())
        }
    }

    /// 调用方令牌，缺失时视为令牌无效
    pub fn require_token(req: &HttpRequest) -> Result<AuthToken, ApiError> {
        Self::extract_token(req).ok_or_else(|| TokenErrorCode::InvalidBearer.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageDto;
    use crate::models::auth::entities::{User, UserRole};
    use actix_web::{App, HttpResponse, test, web};

    fn token_for(id: &str) -> String {
        let user = User {
            id: id.into(),
            username: "reader".into(),
            email: "reader@lbu.ac.uk".into(),
            password_hash: String::new(),
            first_name: "Read".into(),
            last_name: "Er".into(),
            enabled: true,
            account_non_expired: true,
            account_non_locked: true,
            credentials_non_expired: true,
            role: UserRole::Student,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        JwtUtils::generate_token(&user).expect("token")
    }

    async fn whoami(req: HttpRequest) -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse::Ok().body(RequireJWT::auth_user_href(&req)?))
    }

    #[::core::prelude::v1::test]
    fn test_bearer_parsing() {
        assert_eq!(parse_bearer("Bearer abc.def"), Some("abc.def"));
        assert_eq!(parse_bearer("Bearer    abc"), Some("abc"));
        assert_eq!(parse_bearer("Token abc"), None);
        assert_eq!(parse_bearer("Bearer "), None);
    }

    #[actix_web::test]
    async fn test_missing_header_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::scope("/p")
                    .wrap(RequireJWT)
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/p").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: MessageDto = test::read_body_json(resp).await;
        assert_eq!(body.code, 6003);

        let req = test::TestRequest::get()
            .uri("/p")
            .insert_header((AUTHORIZATION, "Basic Zm9vOmJhcg=="))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_valid_token_exposes_claims() {
        let app = test::init_service(
            App::new().service(
                web::scope("/p")
                    .wrap(RequireJWT)
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let id = "0b1c2d3e-4f50-4617-8293-a4b5c6d7e8f9";
        let req = test::TestRequest::get()
            .uri("/p")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token_for(id))))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, format!("/auth/user/{id}").as_bytes());

        let req = test::TestRequest::get()
            .uri("/p")
            .insert_header((AUTHORIZATION, "Bearer garbage"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: MessageDto = test::read_body_json(resp).await;
        assert_eq!(body.code, 6002);
    }
}
