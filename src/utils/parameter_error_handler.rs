use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{Error, HttpRequest};
use tracing::debug;

use crate::models::{ApiError, CommonErrorCode};

/// JSON 请求体解析失败统一返回 9003
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    debug!("JSON 解析失败 {}: {}", req.path(), err);
    ApiError::from(CommonErrorCode::InvalidData).into()
}

/// 查询参数解析失败统一返回 9003
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    debug!("查询参数解析失败 {}: {}", req.path(), err);
    ApiError::from(CommonErrorCode::InvalidData).into()
}
