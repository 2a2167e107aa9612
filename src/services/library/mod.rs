pub mod books;
pub mod fines;
pub mod students;

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;
use tracing::warn;

use crate::middlewares::RequireJWT;
use crate::models::ApiResult;
use crate::models::library::requests::BookRequest;
use crate::storage::Storage;

pub struct LibraryService {
    storage: Option<Arc<dyn Storage>>,
}

impl LibraryService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    /// 后台检查调用方的逾期借阅，不影响当前请求
    pub(crate) fn trigger_fine_check(&self, request: &HttpRequest, storage: Arc<dyn Storage>) {
        let (Ok(auth_user_href), Some(token)) = (
            RequireJWT::auth_user_href(request),
            RequireJWT::extract_token(request),
        ) else {
            return;
        };
        match super::resolve_clients(request) {
            Ok(clients) => {
                fines::spawn_fine_check(storage, clients.finance, auth_user_href, token);
            }
            Err(_) => warn!("fine check skipped: finance client unavailable"),
        }
    }

    pub async fn create_book(
        &self,
        request: &HttpRequest,
        book: BookRequest,
    ) -> ApiResult<HttpResponse> {
        books::create_book(self, request, book).await
    }

    pub async fn update_book(
        &self,
        request: &HttpRequest,
        book: BookRequest,
    ) -> ApiResult<HttpResponse> {
        books::update_book(self, request, book).await
    }

    pub async fn get_book(&self, request: &HttpRequest, isbn: String) -> ApiResult<HttpResponse> {
        books::get_book(self, request, isbn).await
    }

    pub async fn list_books(&self, request: &HttpRequest) -> ApiResult<HttpResponse> {
        books::list_books(self, request).await
    }

    pub async fn create_student(&self, request: &HttpRequest) -> ApiResult<HttpResponse> {
        students::create_student(self, request).await
    }

    pub async fn get_student(&self, request: &HttpRequest) -> ApiResult<HttpResponse> {
        students::get_student(self, request).await
    }

    pub async fn borrow_book(&self, request: &HttpRequest, isbn: String) -> ApiResult<HttpResponse> {
        students::borrow_book(self, request, isbn).await
    }

    pub async fn return_book(&self, request: &HttpRequest, isbn: String) -> ApiResult<HttpResponse> {
        students::return_book(self, request, isbn).await
    }
}
