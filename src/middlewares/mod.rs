pub mod rate_limit;
pub mod require_jwt;
pub mod require_role;

use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

use crate::models::MessageDto;

pub use rate_limit::RateLimit;
pub use require_jwt::{AuthToken, RequireJWT};
pub use require_role::RequireRole;

// 辅助函数：创建错误响应
pub(crate) fn create_error_response(status: StatusCode, message: MessageDto) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status).finish(),
        _ => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(message),
    }
}
