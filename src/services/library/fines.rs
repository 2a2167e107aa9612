//! 逾期罚款检查
//!
//! 借出超过 `fines.book_return_seconds` 仍未归还的记录，每条向财务服务
//! 开一张 LIBRARY_FINE 账单。开账单前先抢占 `fined` 标记，并发的检查
//! 只有一个能抢到，开账单失败时释放标记，同一记录只罚一次。

use std::sync::Arc;
use tracing::{error, info};

use crate::clients::FinanceClient;
use crate::config::{AppConfig, FinesConfig};
use crate::errors::{LbuError, Result};
use crate::middlewares::AuthToken;
use crate::models::finance::entities::InvoiceType;
use crate::models::finance::requests::{AccountRequest, InvoiceRequest};
use crate::storage::Storage;

/// 在后台任务中执行检查，错误只记录日志
pub fn spawn_fine_check(
    storage: Arc<dyn Storage>,
    finance: Arc<dyn FinanceClient>,
    auth_user_href: String,
    token: AuthToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let fines = &AppConfig::get().fines;
        if let Err(e) = run_fine_check(
            storage.as_ref(),
            finance.as_ref(),
            &auth_user_href,
            &token,
            fines,
        )
        .await
        {
            error!("fine check failed for {}: {}", auth_user_href, e);
        }
    })
}

/// 返回本次开出的罚款数量
pub async fn run_fine_check(
    storage: &dyn Storage,
    finance: &dyn FinanceClient,
    auth_user_href: &str,
    token: &AuthToken,
    fines: &FinesConfig,
) -> Result<usize> {
    let Some(student) = storage.get_library_student_by_href(auth_user_href).await? else {
        return Ok(0);
    };

    let now = chrono::Utc::now();
    let cutoff = now.timestamp() - fines.book_return_seconds;
    let overdue = storage
        .list_overdue_transactions(&student.id, cutoff)
        .await?;

    let due_date = chrono::Duration::try_days(fines.fee_pay_duration_days)
        .and_then(|duration| now.date_naive().checked_add_signed(duration))
        .ok_or_else(|| {
            LbuError::date_parse(format!(
                "罚款到期日超出范围: {} 天",
                fines.fee_pay_duration_days
            ))
        })?;

    let mut fined = 0;
    for transaction in overdue {
        if !storage.claim_transaction_fine(&transaction.id).await? {
            continue;
        }

        let request = AccountRequest {
            auth_user_href: Some(auth_user_href.to_string()),
            invoice_list: vec![InvoiceRequest {
                amount: fines.book_return_fee,
                due_date,
                invoice_type: InvoiceType::LibraryFine,
            }],
        };

        match finance.create_account(&request, token).await {
            Ok(_) => {
                info!("fined transaction [{}] of {}", transaction.id, auth_user_href);
                fined += 1;
            }
            Err(e) => {
                error!(
                    "failed to post fine for transaction [{}]: {}",
                    transaction.id, e
                );
                storage.release_transaction_fine(&transaction.id).await?;
            }
        }
    }

    Ok(fined)
}
