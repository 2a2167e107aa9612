pub mod error_code;
pub mod response;

pub use error_code::{ApiError, ApiResult, CommonErrorCode, TokenErrorCode};
pub use response::MessageDto;
