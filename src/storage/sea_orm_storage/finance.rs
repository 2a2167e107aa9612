//! 财务账户与账单存储操作

use super::{SeaOrmStorage, db_error, new_id};
use crate::entity::finance_accounts::{ActiveModel, Column, Entity as FinanceAccounts, Model};
use crate::entity::invoices::{
    ActiveModel as InvoiceActiveModel, Column as InvoiceColumn, Entity as Invoices,
};
use crate::errors::Result;
use crate::models::finance::entities::{Account, Invoice, InvoiceStatus, NewInvoice};
use crate::utils::random_code::generate_random_code;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

const REFERENCE_LENGTH: usize = 8;
const REFERENCE_ATTEMPTS: usize = 5;

impl SeaOrmStorage {
    async fn load_account<C: ConnectionTrait>(conn: &C, model: Model) -> Result<Account> {
        let invoices = Invoices::find()
            .filter(InvoiceColumn::AccountId.eq(model.id.clone()))
            .order_by_asc(InvoiceColumn::CreatedAt)
            .order_by_asc(InvoiceColumn::Reference)
            .all(conn)
            .await
            .map_err(db_error("查询账单失败"))?
            .into_iter()
            .map(|m| m.into_invoice())
            .collect::<Result<Vec<Invoice>>>()?;

        Ok(model.into_account(invoices))
    }

    /// 生成未被占用的账单号
    async fn unused_reference<C: ConnectionTrait>(conn: &C) -> Result<String> {
        let mut reference = generate_random_code(REFERENCE_LENGTH);
        for _ in 1..REFERENCE_ATTEMPTS {
            let taken = Invoices::find()
                .filter(InvoiceColumn::Reference.eq(reference.clone()))
                .count(conn)
                .await
                .map_err(db_error("查询账单号失败"))?;
            if taken == 0 {
                break;
            }
            reference = generate_random_code(REFERENCE_LENGTH);
        }
        Ok(reference)
    }

    /// 通过 authUserHref 获取账户
    pub async fn get_account_by_auth_href_impl(
        &self,
        auth_user_href: &str,
    ) -> Result<Option<Account>> {
        let result = FinanceAccounts::find()
            .filter(Column::AuthUserHref.eq(auth_user_href))
            .one(&self.db)
            .await
            .map_err(db_error("查询账户失败"))?;

        match result {
            Some(model) => Ok(Some(Self::load_account(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    /// 通过 ID 获取账户
    pub async fn get_account_by_id_impl(&self, id: &str) -> Result<Option<Account>> {
        let result = FinanceAccounts::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_error("查询账户失败"))?;

        match result {
            Some(model) => Ok(Some(Self::load_account(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    /// 创建账户或向已有账户追加账单
    pub async fn upsert_account_with_invoices_impl(
        &self,
        auth_user_href: &str,
        invoices: Vec<NewInvoice>,
    ) -> Result<Account> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let existing = FinanceAccounts::find()
            .filter(Column::AuthUserHref.eq(auth_user_href))
            .one(&txn)
            .await
            .map_err(db_error("查询账户失败"))?;

        let account = match existing {
            Some(account) => {
                let mut model: ActiveModel = account.into();
                model.updated_at = Set(now);
                model.update(&txn).await.map_err(db_error("更新账户失败"))?
            }
            None => ActiveModel {
                id: Set(new_id()),
                auth_user_href: Set(auth_user_href.to_string()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(db_error("创建账户失败"))?,
        };

        for invoice in invoices {
            let reference = Self::unused_reference(&txn).await?;
            InvoiceActiveModel {
                id: Set(new_id()),
                reference: Set(reference),
                amount: Set(invoice.amount),
                due_date: Set(invoice.due_date.format("%Y-%m-%d").to_string()),
                invoice_type: Set(invoice.invoice_type.to_string()),
                status: Set(InvoiceStatus::Outstanding.to_string()),
                account_id: Set(account.id.clone()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(db_error("创建账单失败"))?;
        }

        let account = Self::load_account(&txn, account).await?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(account)
    }

    /// 通过账单号获取账单
    pub async fn get_invoice_by_reference_impl(&self, reference: &str) -> Result<Option<Invoice>> {
        let result = Invoices::find()
            .filter(InvoiceColumn::Reference.eq(reference))
            .one(&self.db)
            .await
            .map_err(db_error("查询账单失败"))?;

        result.map(|m| m.into_invoice()).transpose()
    }

    /// 条件更新账单状态
    pub async fn transition_invoice_status_impl(
        &self,
        reference: &str,
        from: InvoiceStatus,
        to: InvoiceStatus,
    ) -> Result<bool> {
        let result = Invoices::update_many()
            .col_expr(InvoiceColumn::Status, Expr::value(to.to_string()))
            .col_expr(
                InvoiceColumn::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(InvoiceColumn::Reference.eq(reference))
            .filter(InvoiceColumn::Status.eq(from.to_string()))
            .exec(&self.db)
            .await
            .map_err(db_error("更新账单状态失败"))?;

        Ok(result.rows_affected == 1)
    }
}
