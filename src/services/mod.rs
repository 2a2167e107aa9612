pub mod auth;
pub mod courses;
pub mod finance;
pub mod library;
pub mod students;

pub use auth::AuthService;
pub use courses::CourseService;
pub use finance::FinanceService;
pub use library::LibraryService;
pub use students::StudentService;

use actix_web::HttpRequest;
use std::sync::Arc;
use tracing::error;

use crate::clients::ServiceClients;
use crate::models::{ApiResult, CommonErrorCode};
use crate::storage::Storage;

// 优先使用注入的存储，否则从 app_data 获取
pub(crate) fn resolve_storage(
    storage: &Option<Arc<dyn Storage>>,
    request: &HttpRequest,
) -> ApiResult<Arc<dyn Storage>> {
    if let Some(storage) = storage {
        return Ok(storage.clone());
    }
    request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            CommonErrorCode::InternalError.into()
        })
}

pub(crate) fn resolve_clients(request: &HttpRequest) -> ApiResult<ServiceClients> {
    request
        .app_data::<actix_web::web::Data<ServiceClients>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Service clients not found in app data");
            CommonErrorCode::InternalError.into()
        })
}
