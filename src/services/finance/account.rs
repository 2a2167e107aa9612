use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use crate::middlewares::RequireJWT;
use crate::models::finance::entities::NewInvoice;
use crate::models::finance::errors::FinanceErrorCode;
use crate::models::finance::requests::AccountRequest;
use crate::models::finance::responses::AccountDto;
use crate::models::{ApiResult, CommonErrorCode};

use super::FinanceService;

pub async fn get_account(service: &FinanceService, request: &HttpRequest) -> ApiResult<HttpResponse> {
    let auth_user_href = RequireJWT::auth_user_href(request)?;
    let storage = service.get_storage(request)?;

    let account = storage
        .get_account_by_auth_href(&auth_user_href)
        .await?
        .ok_or(FinanceErrorCode::AccountNotFound)?;

    Ok(HttpResponse::Ok().json(AccountDto::from(account)))
}

pub async fn create_or_update_account(
    service: &FinanceService,
    request: &HttpRequest,
    account: AccountRequest,
) -> ApiResult<HttpResponse> {
    let auth_user_href = account
        .auth_user_href
        .filter(|href| !href.trim().is_empty())
        .ok_or(FinanceErrorCode::InvalidAccount)?;
    RequireJWT::validate_auth_user_href(request, &auth_user_href)?;

    if !account.invoice_list.iter().all(|invoice| invoice.is_valid()) {
        return Err(CommonErrorCode::InvalidData.into());
    }
    let invoices: Vec<NewInvoice> = account.invoice_list.into_iter().map(Into::into).collect();

    let storage = service.get_storage(request)?;
    let count = invoices.len();
    let account = storage
        .upsert_account_with_invoices(&auth_user_href, invoices)
        .await?;
    info!(
        "account [{}] saved with {} new invoice(s)",
        account.id, count
    );

    Ok(HttpResponse::Ok().json(AccountDto::from(account)))
}
