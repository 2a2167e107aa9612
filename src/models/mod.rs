pub mod auth;
pub mod common;
pub mod courses;
pub mod finance;
pub mod library;
pub mod students;

pub use common::{ApiError, ApiResult, CommonErrorCode, MessageDto, TokenErrorCode};

