use serde::{Deserialize, Serialize};

use super::entities::{Account, Invoice, InvoiceStatus, InvoiceType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub id: String,
    pub reference: String,
    pub amount: f64,
    pub due_date: chrono::NaiveDate,
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    pub status: InvoiceStatus,
}

impl From<Invoice> for InvoiceDto {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            reference: invoice.reference,
            amount: invoice.amount,
            due_date: invoice.due_date,
            invoice_type: invoice.invoice_type,
            status: invoice.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDtos {
    pub invoices: Vec<InvoiceDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: String,
    pub auth_user_href: String,
    pub invoice_list: Vec<InvoiceDto>,
}

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            auth_user_href: account.auth_user_href,
            invoice_list: account.invoices.into_iter().map(Into::into).collect(),
        }
    }
}
