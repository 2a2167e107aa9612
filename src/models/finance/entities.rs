use serde::{Deserialize, Serialize};

// 账单类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceType {
    TuitionFees,
    LibraryFine,
}

// 账单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Outstanding,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    /// 只有未结清的账单可以支付或取消
    pub fn can_transition_to(&self, next: InvoiceStatus) -> bool {
        matches!(
            (self, next),
            (InvoiceStatus::Outstanding, InvoiceStatus::Paid)
                | (InvoiceStatus::Outstanding, InvoiceStatus::Cancelled)
        )
    }
}

macro_rules! impl_str_enum {
    ($ty:ident { $($variant:ident => $s:literal),* $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $s,)*
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok($ty::$variant),)*
                    _ => Err(format!("Invalid {}: {s}", stringify!($ty))),
                }
            }
        }
    };
}

impl_str_enum!(InvoiceType {
    TuitionFees => "TUITION_FEES",
    LibraryFine => "LIBRARY_FINE",
});

impl_str_enum!(InvoiceStatus {
    Outstanding => "OUTSTANDING",
    Paid => "PAID",
    Cancelled => "CANCELLED",
});

// 账单实体
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub reference: String,
    pub amount: f64,
    pub due_date: chrono::NaiveDate,
    pub invoice_type: InvoiceType,
    pub status: InvoiceStatus,
    pub account_id: String,
}

// 新账单
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub amount: f64,
    pub due_date: chrono::NaiveDate,
    pub invoice_type: InvoiceType,
}

// 财务账户实体，账单归账户独占
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub auth_user_href: String,
    pub invoices: Vec<Invoice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_transitions() {
        assert!(InvoiceStatus::Outstanding.can_transition_to(InvoiceStatus::Paid));
        assert!(InvoiceStatus::Outstanding.can_transition_to(InvoiceStatus::Cancelled));
        assert!(!InvoiceStatus::Paid.can_transition_to(InvoiceStatus::Cancelled));
        assert!(!InvoiceStatus::Cancelled.can_transition_to(InvoiceStatus::Paid));
        assert!(!InvoiceStatus::Paid.can_transition_to(InvoiceStatus::Paid));
    }

    #[test]
    fn test_status_string_form() {
        assert_eq!(InvoiceType::LibraryFine.to_string(), "LIBRARY_FINE");
        assert_eq!(
            "OUTSTANDING".parse::<InvoiceStatus>(),
            Ok(InvoiceStatus::Outstanding)
        );
        assert!("PENDING".parse::<InvoiceStatus>().is_err());
    }
}
