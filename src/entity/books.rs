//! 图书实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year_of_published: i32,
    pub copies: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::library_transactions::Entity")]
    Transactions,
}

impl Related<super::library_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_book(self) -> crate::models::library::entities::Book {
        use crate::models::library::entities::Book;
        use chrono::{DateTime, Utc};

        Book {
            id: self.id,
            isbn: self.isbn,
            title: self.title,
            author: self.author,
            year_of_published: self.year_of_published,
            copies: self.copies,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
