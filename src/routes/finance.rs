use actix_web::{HttpRequest, HttpResponse, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::ApiResult;
use crate::models::auth::entities::UserRole;
use crate::models::finance::requests::AccountRequest;
use crate::services::FinanceService;

static FINANCE_SERVICE: Lazy<FinanceService> = Lazy::new(FinanceService::new_lazy);

pub async fn get_account(req: HttpRequest) -> ApiResult<HttpResponse> {
    FINANCE_SERVICE.get_account(&req).await
}

pub async fn create_or_update_account(
    req: HttpRequest,
    account: web::Json<AccountRequest>,
) -> ApiResult<HttpResponse> {
    FINANCE_SERVICE
        .create_or_update_account(&req, account.into_inner())
        .await
}

pub async fn list_invoices(req: HttpRequest) -> ApiResult<HttpResponse> {
    FINANCE_SERVICE.list_invoices(&req).await
}

pub async fn cancel_invoice(
    req: HttpRequest,
    reference: web::Path<String>,
) -> ApiResult<HttpResponse> {
    FINANCE_SERVICE
        .cancel_invoice(&req, reference.into_inner())
        .await
}

pub async fn pay_invoice(req: HttpRequest, reference: web::Path<String>) -> ApiResult<HttpResponse> {
    FINANCE_SERVICE.pay_invoice(&req, reference.into_inner()).await
}

pub fn configure_finance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/finance")
            .wrap(RequireRole::new_any(UserRole::student_roles()))
            .wrap(RequireJWT)
            .service(
                web::resource("/account")
                    .route(web::get().to(get_account))
                    .route(web::post().to(create_or_update_account)),
            )
            .route("/invoice", web::get().to(list_invoices))
            .route(
                "/invoice/{reference}/cancel",
                web::delete().to(cancel_invoice),
            )
            .route("/invoice/{reference}/pay", web::put().to(pay_invoice)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageDto;
    use crate::models::finance::entities::{InvoiceStatus, InvoiceType};
    use crate::models::finance::responses::{AccountDto, InvoiceDtos};
    use crate::routes::test_support::{bearer, json_config, storage};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::json;

    const OWNER: &str = "d4c3b2a1-9f8e-4d7c-a6b5-c4d3e2f1a0b9";
    const OTHER: &str = "a0b1c2d3-e4f5-4a6b-9c8d-7e6f5a4b3c2d";

    fn owner_href() -> String {
        format!("/auth/user/{OWNER}")
    }

    #[actix_web::test]
    async fn test_account_and_invoice_lifecycle() {
        let storage = storage().await;
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_finance_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/finance/account")
            .insert_header(bearer(OWNER, UserRole::Student))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 10000);

        let req = test::TestRequest::post()
            .uri("/finance/account")
            .insert_header(bearer(OWNER, UserRole::Student))
            .set_json(json!({
                "authUserHref": owner_href(),
                "invoiceList": [
                    {"amount": 500.0, "dueDate": "2030-01-31", "type": "TUITION_FEES"},
                    {"amount": 10.0, "dueDate": "2030-02-14", "type": "LIBRARY_FINE"}
                ]
            }))
            .to_request();
        let account: AccountDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(account.invoice_list.len(), 2);
        assert!(
            account
                .invoice_list
                .iter()
                .all(|i| i.status == InvoiceStatus::Outstanding)
        );
        let reference_of = |kind: InvoiceType| {
            account
                .invoice_list
                .iter()
                .find(|i| i.invoice_type == kind)
                .map(|i| i.reference.clone())
                .expect("invoice of kind")
        };
        let tuition = reference_of(InvoiceType::TuitionFees);
        let fine = reference_of(InvoiceType::LibraryFine);
        assert_ne!(tuition, fine);

        let req = test::TestRequest::put()
            .uri(&format!("/finance/invoice/{tuition}/pay"))
            .insert_header(bearer(OWNER, UserRole::Student))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 2001);

        // 已支付的账单不能再取消
        let req = test::TestRequest::delete()
            .uri(&format!("/finance/invoice/{tuition}/cancel"))
            .insert_header(bearer(OWNER, UserRole::Student))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 9003);

        let req = test::TestRequest::delete()
            .uri(&format!("/finance/invoice/{fine}/cancel"))
            .insert_header(bearer(OTHER, UserRole::Student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::delete()
            .uri(&format!("/finance/invoice/{fine}/cancel"))
            .insert_header(bearer(OWNER, UserRole::Student))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 2000);

        let req = test::TestRequest::get()
            .uri("/finance/invoice")
            .insert_header(bearer(OWNER, UserRole::Student))
            .to_request();
        let list: InvoiceDtos = test::call_and_read_body_json(&app, req).await;
        let status_of = |reference: &str| {
            list.invoices
                .iter()
                .find(|i| i.reference == reference)
                .map(|i| i.status)
        };
        assert_eq!(status_of(&tuition), Some(InvoiceStatus::Paid));
        assert_eq!(status_of(&fine), Some(InvoiceStatus::Cancelled));

        let req = test::TestRequest::put()
            .uri("/finance/invoice/NOPE0000/pay")
            .insert_header(bearer(OWNER, UserRole::Student))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 10003);
    }

    #[actix_web::test]
    async fn test_account_request_checks() {
        let storage = storage().await;
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_finance_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/finance/account")
            .insert_header(bearer(OWNER, UserRole::Student))
            .set_json(json!({"invoiceList": []}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 10002);

        let req = test::TestRequest::post()
            .uri("/finance/account")
            .insert_header(bearer(OTHER, UserRole::Student))
            .set_json(json!({"authUserHref": owner_href(), "invoiceList": []}))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 6005);

        let req = test::TestRequest::post()
            .uri("/finance/account")
            .insert_header(bearer(OWNER, UserRole::Student))
            .set_json(json!({
                "authUserHref": owner_href(),
                "invoiceList": [{"amount": -1.0, "dueDate": "2030-01-31", "type": "TUITION_FEES"}]
            }))
            .to_request();
        let body: MessageDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.code, 9003);

        // 普通用户无权访问财务服务
        let req = test::TestRequest::get()
            .uri("/finance/invoice")
            .insert_header(bearer(OWNER, UserRole::User))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );
    }
}
