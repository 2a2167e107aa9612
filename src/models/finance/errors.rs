use crate::define_error_codes;

define_error_codes! {
    /// 财务服务错误
    FinanceErrorCode {
        AccountNotFound = (10000, "Given account id is not available."),
        InvalidAccount = (10002, "Given account is not valid."),
        InvoiceNotFound = (10003, "Given invoice is not available."),
    }
}

define_error_codes! {
    FinanceSuccessCode {
        InvoiceCancelled = (2000, "Given invoice successfully cancelled."),
        InvoicePaid = (2001, "Given invoice successfully payed."),
    }
}
