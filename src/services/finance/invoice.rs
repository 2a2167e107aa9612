use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use crate::middlewares::RequireJWT;
use crate::models::finance::entities::InvoiceStatus;
use crate::models::finance::errors::{FinanceErrorCode, FinanceSuccessCode};
use crate::models::finance::responses::{InvoiceDto, InvoiceDtos};
use crate::models::{ApiResult, CommonErrorCode, MessageDto, TokenErrorCode};

use super::FinanceService;

pub async fn list_invoices(service: &FinanceService, request: &HttpRequest) -> ApiResult<HttpResponse> {
    let auth_user_href = RequireJWT::auth_user_href(request)?;
    let storage = service.get_storage(request)?;

    let invoices = storage
        .get_account_by_auth_href(&auth_user_href)
        .await?
        .map(|account| account.invoices)
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(InvoiceDtos {
        invoices: invoices.into_iter().map(InvoiceDto::from).collect(),
    }))
}

pub async fn cancel_invoice(
    service: &FinanceService,
    request: &HttpRequest,
    reference: String,
) -> ApiResult<HttpResponse> {
    transition(service, request, &reference, InvoiceStatus::Cancelled).await?;
    Ok(HttpResponse::Ok().json(MessageDto::from(FinanceSuccessCode::InvoiceCancelled)))
}

pub async fn pay_invoice(
    service: &FinanceService,
    request: &HttpRequest,
    reference: String,
) -> ApiResult<HttpResponse> {
    transition(service, request, &reference, InvoiceStatus::Paid).await?;
    Ok(HttpResponse::Ok().json(MessageDto::from(FinanceSuccessCode::InvoicePaid)))
}

/// 校验归属与状态后更新账单状态
async fn transition(
    service: &FinanceService,
    request: &HttpRequest,
    reference: &str,
    to: InvoiceStatus,
) -> ApiResult<()> {
    let storage = service.get_storage(request)?;

    let invoice = storage
        .get_invoice_by_reference(reference)
        .await?
        .ok_or(FinanceErrorCode::InvoiceNotFound)?;

    let owner = storage
        .get_account_by_id(&invoice.account_id)
        .await?
        .ok_or(FinanceErrorCode::InvoiceNotFound)?;
    if owner.auth_user_href != RequireJWT::auth_user_href(request)? {
        return Err(TokenErrorCode::InvalidUserAccess.into());
    }

    if !invoice.status.can_transition_to(to) {
        return Err(CommonErrorCode::InvalidData.into());
    }

    // 并发修改时以数据库中的当前状态为准
    if !storage
        .transition_invoice_status(reference, invoice.status, to)
        .await?
    {
        return Err(CommonErrorCode::InvalidData.into());
    }
    info!("invoice [{}] {} -> {}", reference, invoice.status, to);
    Ok(())
}
