use serde::{Deserialize, Serialize};

use super::entities::{InvoiceType, NewInvoice};

// 新账单请求项，也由学生服务和图书馆服务发送
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub amount: f64,
    pub due_date: chrono::NaiveDate,
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
}

impl InvoiceRequest {
    pub fn is_valid(&self) -> bool {
        self.amount.is_finite() && self.amount >= 0.0
    }
}

impl From<InvoiceRequest> for NewInvoice {
    fn from(req: InvoiceRequest) -> Self {
        Self {
            amount: req.amount,
            due_date: req.due_date,
            invoice_type: req.invoice_type,
        }
    }
}

// 创建账户或追加账单
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub auth_user_href: Option<String>,
    #[serde(default)]
    pub invoice_list: Vec<InvoiceRequest>,
}
