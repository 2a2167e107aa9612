//! API 错误码
//!
//! 每个服务模块用 `define_error_codes!` 声明自己的错误码表，
//! 错误码转换为 `ApiError` 后由 actix 渲染为 `MessageDto`。

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;
use tracing::error;

use super::MessageDto;
use crate::errors::LbuError;

/// 定义错误码表的宏
///
/// 生成 enum、`code()`、`message()`，以及到 `MessageDto` / `ApiError` 的转换
#[macro_export]
macro_rules! define_error_codes {
    ($(#[$meta:meta])* $name:ident {
        $($variant:ident = ($code:literal, $msg:literal)),* $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub fn code(&self) -> i32 {
                match self {
                    $($name::$variant => $code,)*
                }
            }

            pub fn message(&self) -> &'static str {
                match self {
                    $($name::$variant => $msg,)*
                }
            }
        }

        impl From<$name> for $crate::models::common::MessageDto {
            fn from(value: $name) -> Self {
                $crate::models::common::MessageDto::new(value.code(), value.message())
            }
        }

        impl From<$name> for $crate::models::common::ApiError {
            fn from(value: $name) -> Self {
                $crate::models::common::ApiError::new(value.code(), value.message())
            }
        }
    };
}

define_error_codes! {
    /// 令牌相关错误，所有服务共用
    TokenErrorCode {
        SecretUnavailable = (6000, "Token secret is not available."),
        TokenExpired = (6001, "Given token is expired."),
        InvalidToken = (6002, "Invalid token provided."),
        MissingToken = (6003, "Authorization header does not have a token."),
        UserUnavailable = (6004, "Given User not available."),
        InvalidUserAccess = (6005, "Invalid user access."),
        InvalidBearer = (6006, "Invalid token."),
    }
}

define_error_codes! {
    /// 通用错误
    CommonErrorCode {
        InternalError = (9000, "An error occurred."),
        InvalidUuid = (9001, "Invalid UUID provided."),
        InvalidHref = (9002, "Invalid href provided."),
        InvalidData = (9003, "Invalid Data provided."),
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// API 层错误
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub message: String,
}

impl ApiError {
    /// 按错误码推断 HTTP 状态
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        let status = match code {
            6005 => StatusCode::FORBIDDEN,
            9000 => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn to_message(&self) -> MessageDto {
        MessageDto::new(self.code, self.message.clone())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(self.to_message())
    }
}

impl From<LbuError> for ApiError {
    fn from(err: LbuError) -> Self {
        #[cfg(debug_assertions)]
        error!("{}", err.format_colored());
        #[cfg(not(debug_assertions))]
        error!("{}", err.format_simple());
        CommonErrorCode::InternalError.into()
    }
}

impl ResponseError for LbuError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        ApiError::from(self.clone()).error_response()
    }
}
