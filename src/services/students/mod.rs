pub mod enrol;
pub mod get;
pub mod update;

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::clients::ServiceClients;
use crate::models::ApiResult;
use crate::models::students::requests::{EnrolmentRequest, StudentQuery, UpdateStudentRequest};
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub(crate) fn get_clients(&self, request: &HttpRequest) -> ApiResult<ServiceClients> {
        super::resolve_clients(request)
    }

    // 选课（首次选课时创建学生）
    pub async fn create_enrolment(
        &self,
        request: &HttpRequest,
        enrolment: EnrolmentRequest,
    ) -> ApiResult<HttpResponse> {
        enrol::create_enrolment(self, request, enrolment).await
    }

    // 更新学生资料
    pub async fn update_student(
        &self,
        request: &HttpRequest,
        update: UpdateStudentRequest,
    ) -> ApiResult<HttpResponse> {
        update::update_student(self, request, update).await
    }

    // 查询学生
    pub async fn get_student(
        &self,
        request: &HttpRequest,
        query: StudentQuery,
    ) -> ApiResult<HttpResponse> {
        get::get_student(self, request, query).await
    }
}
