/*!
 * 基于角色的访问控制中间件
 *
 * 必须在 RequireJWT 之后执行（actix 中后 `wrap` 的先执行，所以写在它前面）。
 * 角色取自令牌的 `roles` 声明，例如 `ROLE_STUDENT`。
 *
 * ```rust,ignore
 * web::scope("/finance")
 *     .wrap(RequireRole::new_any(UserRole::student_roles()))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{MessageDto, TokenErrorCode, auth::entities::UserRole};
use crate::utils::jwt::Claims;

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    required_roles: Vec<UserRole>,
}

impl RequireRole {
    /// 创建需要特定角色的中间件
    pub fn new(role: &UserRole) -> Self {
        Self {
            required_roles: vec![role.clone()],
        }
    }

    /// 创建需要任一角色的中间件
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    fn permits(required: &[UserRole], claims: &Claims) -> bool {
        claims
            .roles
            .iter()
            .filter_map(|authority| UserRole::from_authority(authority))
            .any(|role| required.contains(&role))
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<UserRole>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let required_roles = self.required_roles.clone();

        Box::pin(async move {
            let claims = req.extensions().get::<Claims>().cloned();

            match claims {
                Some(claims) if RequireRole::permits(&required_roles, &claims) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some(claims) => {
                    info!(
                        "Access denied for user {} (roles: {:?}). Required roles: {:?}",
                        claims.sub, claims.roles, required_roles
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            MessageDto::new(403, "Access denied."),
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!(
                        "Role check failed: No claims found in request. Make sure RequireJWT middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            TokenErrorCode::MissingToken.into(),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(roles: &[&str]) -> Claims {
        Claims {
            sub: "user".into(),
            iss: "lbu-auth".into(),
            iat: 0,
            exp: 0,
            jti: "jti".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            user_id: "id".into(),
            first_name: "F".into(),
            last_name: "L".into(),
        }
    }

    #[test]
    fn test_role_matching() {
        let students = RequireRole::new_any(UserRole::student_roles());
        assert!(RequireRole::permits(
            &students.required_roles,
            &claims(&["ROLE_STUDENT"])
        ));
        assert!(RequireRole::permits(
            &students.required_roles,
            &claims(&["ROLE_ADMIN"])
        ));
        assert!(!RequireRole::permits(
            &students.required_roles,
            &claims(&["ROLE_GENERAL_USER"])
        ));
        assert!(!RequireRole::permits(
            &RequireRole::new(&UserRole::Admin).required_roles,
            &claims(&["ROLE_UNKNOWN"])
        ));
    }
}
