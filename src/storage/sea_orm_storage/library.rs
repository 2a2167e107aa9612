//! 图书、图书馆学生与借阅记录存储操作

use super::{SeaOrmStorage, db_error, new_id};
use crate::entity::books::{ActiveModel, Column, Entity as Books};
use crate::entity::library_students::{
    ActiveModel as StudentActiveModel, Column as StudentColumn, Entity as LibraryStudents,
};
use crate::entity::library_transactions::{
    ActiveModel as TransactionActiveModel, Column as TransactionColumn,
    Entity as LibraryTransactions,
};
use crate::errors::Result;
use crate::models::library::entities::{
    Book, BookFields, BorrowOutcome, LibraryStudent, ReturnOutcome, Transaction,
};
use crate::utils::random_code::generate_random_code;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

const ISBN_LENGTH: usize = 8;

impl SeaOrmStorage {
    async fn count_open_borrows_on<C: ConnectionTrait>(conn: &C, book_id: &str) -> Result<u64> {
        LibraryTransactions::find()
            .filter(TransactionColumn::BookId.eq(book_id))
            .filter(TransactionColumn::DateReturned.is_null())
            .count(conn)
            .await
            .map_err(db_error("统计借阅记录失败"))
    }

    /// 登记图书，isbn 自动生成
    pub async fn create_book_impl(&self, fields: BookFields) -> Result<Book> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(new_id()),
            isbn: Set(generate_random_code(ISBN_LENGTH)),
            title: Set(fields.title),
            author: Set(fields.author),
            year_of_published: Set(fields.year_of_published),
            copies: Set(fields.copies),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(db_error("创建图书失败"))?;
        Ok(result.into_book())
    }

    /// 通过 isbn 获取图书
    pub async fn get_book_by_isbn_impl(&self, isbn: &str) -> Result<Option<Book>> {
        let result = Books::find()
            .filter(Column::Isbn.eq(isbn))
            .one(&self.db)
            .await
            .map_err(db_error("查询图书失败"))?;

        Ok(result.map(|m| m.into_book()))
    }

    /// 列出全部图书
    pub async fn list_books_impl(&self) -> Result<Vec<Book>> {
        let result = Books::find()
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await
            .map_err(db_error("查询图书列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_book()).collect())
    }

    /// 更新图书
    pub async fn update_book_impl(&self, isbn: &str, fields: BookFields) -> Result<Option<Book>> {
        let existing = Books::find()
            .filter(Column::Isbn.eq(isbn))
            .one(&self.db)
            .await
            .map_err(db_error("查询图书失败"))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.title = Set(fields.title);
        model.author = Set(fields.author);
        model.year_of_published = Set(fields.year_of_published);
        model.copies = Set(fields.copies);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model.update(&self.db).await.map_err(db_error("更新图书失败"))?;
        Ok(Some(updated.into_book()))
    }

    /// 统计未归还数量
    pub async fn count_open_borrows_impl(&self, book_id: &str) -> Result<u64> {
        Self::count_open_borrows_on(&self.db, book_id).await
    }

    /// 创建图书馆学生，已存在时直接返回
    pub async fn create_library_student_impl(
        &self,
        auth_user_href: &str,
    ) -> Result<LibraryStudent> {
        if let Some(existing) = self.get_library_student_by_href_impl(auth_user_href).await? {
            return Ok(existing);
        }

        let now = chrono::Utc::now().timestamp();
        let inserted = StudentActiveModel {
            id: Set(new_id()),
            auth_user_href: Set(auth_user_href.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_error("创建图书馆学生失败"));

        match inserted {
            Ok(model) => Ok(model.into_library_student()),
            Err(e) if e.is_unique_violation() => self
                .get_library_student_by_href_impl(auth_user_href)
                .await?
                .ok_or(e),
            Err(e) => Err(e),
        }
    }

    /// 通过 authUserHref 获取图书馆学生
    pub async fn get_library_student_by_href_impl(
        &self,
        auth_user_href: &str,
    ) -> Result<Option<LibraryStudent>> {
        let result = LibraryStudents::find()
            .filter(StudentColumn::AuthUserHref.eq(auth_user_href))
            .one(&self.db)
            .await
            .map_err(db_error("查询图书馆学生失败"))?;

        Ok(result.map(|m| m.into_library_student()))
    }

    /// 学生的借阅记录
    pub async fn list_student_transactions_impl(
        &self,
        student_id: &str,
    ) -> Result<Vec<(Transaction, Book)>> {
        let rows = LibraryTransactions::find()
            .filter(TransactionColumn::StudentId.eq(student_id))
            .order_by_asc(TransactionColumn::DateBorrowed)
            .find_also_related(Books)
            .all(&self.db)
            .await
            .map_err(db_error("查询借阅记录失败"))?;

        Ok(rows
            .into_iter()
            .filter_map(|(transaction, book)| {
                book.map(|b| (transaction.into_transaction(), b.into_book()))
            })
            .collect())
    }

    /// 借书：检查重复借阅与库存后写入记录
    pub async fn borrow_book_impl(&self, student_id: &str, book: &Book) -> Result<BorrowOutcome> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let already_open = LibraryTransactions::find()
            .filter(TransactionColumn::StudentId.eq(student_id))
            .filter(TransactionColumn::BookId.eq(book.id.clone()))
            .filter(TransactionColumn::DateReturned.is_null())
            .count(&txn)
            .await
            .map_err(db_error("查询借阅记录失败"))?;
        if already_open > 0 {
            return Ok(BorrowOutcome::AlreadyBorrowedByStudent);
        }

        // 在事务内重新读取并锁定图书行，串行化同一本书的并发借阅；
        // SQLite 不支持 FOR UPDATE，依赖其单写者锁
        let mut book_query = Books::find_by_id(book.id.clone());
        if txn.get_database_backend() != DbBackend::Sqlite {
            book_query = book_query.lock_exclusive();
        }
        let Some(locked) = book_query
            .one(&txn)
            .await
            .map_err(db_error("查询图书失败"))?
        else {
            return Ok(BorrowOutcome::NoCopiesLeft);
        };

        let open_borrows = Self::count_open_borrows_on(&txn, &book.id).await?;
        if open_borrows >= locked.copies.max(0) as u64 {
            return Ok(BorrowOutcome::NoCopiesLeft);
        }

        let now = chrono::Utc::now().timestamp();
        let created = TransactionActiveModel {
            id: Set(new_id()),
            student_id: Set(student_id.to_string()),
            book_id: Set(book.id.clone()),
            date_borrowed: Set(now),
            date_returned: Set(None),
            fined: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_error("创建借阅记录失败"))?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(BorrowOutcome::Borrowed(created.into_transaction()))
    }

    /// 还书
    pub async fn return_book_impl(&self, student_id: &str, book: &Book) -> Result<ReturnOutcome> {
        let transactions = LibraryTransactions::find()
            .filter(TransactionColumn::StudentId.eq(student_id))
            .filter(TransactionColumn::BookId.eq(book.id.clone()))
            .all(&self.db)
            .await
            .map_err(db_error("查询借阅记录失败"))?;

        if transactions.is_empty() {
            return Ok(ReturnOutcome::NotBorrowed);
        }

        let Some(open) = transactions.into_iter().find(|t| t.date_returned.is_none()) else {
            return Ok(ReturnOutcome::AlreadyReturned);
        };

        let now = chrono::Utc::now().timestamp();
        let mut model: TransactionActiveModel = open.into();
        model.date_returned = Set(Some(now));
        model.updated_at = Set(now);

        let updated = model
            .update(&self.db)
            .await
            .map_err(db_error("更新借阅记录失败"))?;
        Ok(ReturnOutcome::Returned(updated.into_transaction()))
    }

    /// 逾期未还且未罚款的记录
    pub async fn list_overdue_transactions_impl(
        &self,
        student_id: &str,
        cutoff: i64,
    ) -> Result<Vec<Transaction>> {
        let result = LibraryTransactions::find()
            .filter(TransactionColumn::StudentId.eq(student_id))
            .filter(TransactionColumn::DateReturned.is_null())
            .filter(TransactionColumn::Fined.eq(false))
            .filter(TransactionColumn::DateBorrowed.lt(cutoff))
            .all(&self.db)
            .await
            .map_err(db_error("查询逾期记录失败"))?;

        Ok(result.into_iter().map(|m| m.into_transaction()).collect())
    }

    /// 抢占罚款：仅当记录尚未罚款时置位，返回是否抢占成功
    pub async fn claim_transaction_fine_impl(&self, id: &str) -> Result<bool> {
        let result = LibraryTransactions::update_many()
            .col_expr(TransactionColumn::Fined, Expr::value(true))
            .col_expr(
                TransactionColumn::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(TransactionColumn::Id.eq(id))
            .filter(TransactionColumn::Fined.eq(false))
            .exec(&self.db)
            .await
            .map_err(db_error("更新借阅记录失败"))?;

        Ok(result.rows_affected == 1)
    }

    /// 开账单失败时撤销抢占
    pub async fn release_transaction_fine_impl(&self, id: &str) -> Result<()> {
        LibraryTransactions::update_many()
            .col_expr(TransactionColumn::Fined, Expr::value(false))
            .filter(TransactionColumn::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_error("更新借阅记录失败"))?;
        Ok(())
    }
}
