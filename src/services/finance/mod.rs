pub mod account;
pub mod invoice;

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::models::ApiResult;
use crate::models::finance::requests::AccountRequest;
use crate::storage::Storage;

pub struct FinanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl FinanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ApiResult<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    // 获取调用方账户
    pub async fn get_account(&self, request: &HttpRequest) -> ApiResult<HttpResponse> {
        account::get_account(self, request).await
    }

    // 创建账户或追加账单
    pub async fn create_or_update_account(
        &self,
        request: &HttpRequest,
        account: AccountRequest,
    ) -> ApiResult<HttpResponse> {
        account::create_or_update_account(self, request, account).await
    }

    // 调用方的全部账单
    pub async fn list_invoices(&self, request: &HttpRequest) -> ApiResult<HttpResponse> {
        invoice::list_invoices(self, request).await
    }

    pub async fn cancel_invoice(
        &self,
        request: &HttpRequest,
        reference: String,
    ) -> ApiResult<HttpResponse> {
        invoice::cancel_invoice(self, request, reference).await
    }

    pub async fn pay_invoice(
        &self,
        request: &HttpRequest,
        reference: String,
    ) -> ApiResult<HttpResponse> {
        invoice::pay_invoice(self, request, reference).await
    }
}
