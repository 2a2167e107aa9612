use actix_web::HttpResponse;

use crate::models::auth::errors::AuthSuccessCode;
use crate::models::auth::responses::JwtTokenDto;
use crate::models::{ApiResult, MessageDto};
use crate::utils::jwt::JwtUtils;

// 校验签名、过期时间与签发方
pub async fn validate_token(token_dto: JwtTokenDto) -> ApiResult<HttpResponse> {
    JwtUtils::verify_token(&token_dto.jwt_token)?;
    Ok(HttpResponse::Ok().json(MessageDto::from(AuthSuccessCode::TokenValid)))
}
