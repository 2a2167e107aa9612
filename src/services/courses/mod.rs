pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::errors::LbuError;
use crate::models::courses::errors::CourseErrorCode;
use crate::models::courses::requests::CourseRequest;
use crate::models::{ApiError, ApiResult};
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    // 获取全部课程
    pub async fn list_courses(&self, request: &HttpRequest) -> ApiResult<HttpResponse> {
        list::list_courses(self, request).await
    }

    // 按 ID 批量获取课程
    pub async fn get_courses_by_ids(
        &self,
        request: &HttpRequest,
        ids: Vec<String>,
    ) -> ApiResult<HttpResponse> {
        list::get_courses_by_ids(self, request, ids).await
    }

    pub async fn get_course(&self, request: &HttpRequest, id: String) -> ApiResult<HttpResponse> {
        get::get_course(self, request, id).await
    }

    pub async fn create_course(
        &self,
        request: &HttpRequest,
        course: CourseRequest,
    ) -> ApiResult<HttpResponse> {
        create::create_course(self, request, course).await
    }

    pub async fn update_course(
        &self,
        request: &HttpRequest,
        course: CourseRequest,
    ) -> ApiResult<HttpResponse> {
        update::update_course(self, request, course).await
    }

    pub async fn delete_course(
        &self,
        request: &HttpRequest,
        id: String,
    ) -> ApiResult<HttpResponse> {
        delete::delete_course(self, request, id).await
    }
}

// 标题唯一约束冲突映射为 10002
pub(crate) fn map_title_conflict(err: LbuError) -> ApiError {
    if err.is_unique_violation() {
        CourseErrorCode::CourseAlreadyExists.into()
    } else {
        err.into()
    }
}
