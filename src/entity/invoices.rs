//! 账单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub reference: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub due_date: String, // YYYY-MM-DD
    pub invoice_type: String,
    pub status: String,
    pub account_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::finance_accounts::Entity",
        from = "Column::AccountId",
        to = "super::finance_accounts::Column::Id"
    )]
    Account,
}

impl Related<super::finance_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_invoice(self) -> crate::errors::Result<crate::models::finance::entities::Invoice> {
        use crate::errors::LbuError;
        use crate::models::finance::entities::Invoice;

        Ok(Invoice {
            due_date: chrono::NaiveDate::parse_from_str(&self.due_date, "%Y-%m-%d")?,
            invoice_type: self
                .invoice_type
                .parse()
                .map_err(LbuError::database_operation)?,
            status: self.status.parse().map_err(LbuError::database_operation)?,
            id: self.id,
            reference: self.reference,
            amount: self.amount,
            account_id: self.account_id,
        })
    }
}
