//! 借阅记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "library_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub student_id: String,
    pub book_id: String,
    pub date_borrowed: i64,
    pub date_returned: Option<i64>,
    pub fined: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::library_students::Entity",
        from = "Column::StudentId",
        to = "super::library_students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::books::Entity",
        from = "Column::BookId",
        to = "super::books::Column::Id"
    )]
    Book,
}

impl Related<super::library_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_transaction(self) -> crate::models::library::entities::Transaction {
        use crate::models::library::entities::Transaction;
        use chrono::{DateTime, Utc};

        Transaction {
            id: self.id,
            student_id: self.student_id,
            book_id: self.book_id,
            date_borrowed: DateTime::<Utc>::from_timestamp(self.date_borrowed, 0)
                .unwrap_or_default(),
            date_returned: self
                .date_returned
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            fined: self.fined,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
