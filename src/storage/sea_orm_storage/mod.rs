//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod courses;
mod finance;
mod library;
mod students;
mod users;

use crate::config::AppConfig;
use crate::errors::{LbuError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

/// 转换数据库错误，保留唯一约束冲突以便服务层映射业务错误码
pub(crate) fn db_error(context: &'static str) -> impl Fn(DbErr) -> LbuError {
    move |e| match LbuError::from(e) {
        LbuError::UniqueViolation(msg) => LbuError::unique_violation(format!("{context}: {msg}")),
        other => LbuError::database_operation(format!("{context}: {}", other.message())),
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::migrated(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);
        Ok(storage)
    }

    /// 内存 SQLite（单连接，保证所有查询看到同一个库）
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_sqlite("sqlite::memory:", 1, 5).await?;
        Self::migrated(db).await
    }

    async fn migrated(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| LbuError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LbuError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        if !url.contains(":memory:") {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .pragma("wal_autocheckpoint", "1000");
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(None)
            .connect_with(opt)
            .await
            .map_err(|e| LbuError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| LbuError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LbuError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    auth::entities::{ActivationDetails, NewUser, User, UserRole, UserUpdate},
    courses::entities::{Course, CourseFields},
    finance::entities::{Account, Invoice, InvoiceStatus, NewInvoice},
    library::entities::{
        Book, BookFields, BorrowOutcome, LibraryStudent, ReturnOutcome, Transaction,
    },
    students::entities::{Student, StudentProfile},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 认证模块
    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn update_user(&self, id: &str, update: UserUpdate) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn set_user_role(&self, id: &str, role: UserRole) -> Result<Option<User>> {
        self.set_user_role_impl(id, role).await
    }

    async fn record_user_login(&self, user_id: &str) -> Result<()> {
        self.record_user_login_impl(user_id).await
    }

    async fn replace_activation(&self, user_id: &str, token: &str) -> Result<ActivationDetails> {
        self.replace_activation_impl(user_id, token).await
    }

    async fn get_activation_by_token(&self, token: &str) -> Result<Option<ActivationDetails>> {
        self.get_activation_by_token_impl(token).await
    }

    async fn get_activation_by_user(&self, user_id: &str) -> Result<Option<ActivationDetails>> {
        self.get_activation_by_user_impl(user_id).await
    }

    async fn activate_user(&self, activation: &ActivationDetails) -> Result<()> {
        self.activate_user_impl(activation).await
    }

    // 课程模块
    async fn create_course(&self, fields: CourseFields) -> Result<Course> {
        self.create_course_impl(fields).await
    }

    async fn get_course_by_id(&self, id: &str) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.list_courses_impl().await
    }

    async fn list_courses_by_ids(&self, ids: &[String]) -> Result<Vec<Course>> {
        self.list_courses_by_ids_impl(ids).await
    }

    async fn update_course(&self, id: &str, fields: CourseFields) -> Result<Option<Course>> {
        self.update_course_impl(id, fields).await
    }

    async fn delete_course(&self, id: &str) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    // 学生模块
    async fn create_student_with_enrollment(
        &self,
        auth_user_href: &str,
        course_href: &str,
    ) -> Result<Student> {
        self.create_student_with_enrollment_impl(auth_user_href, course_href)
            .await
    }

    async fn get_student_by_id(&self, id: &str) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_auth_href(&self, auth_user_href: &str) -> Result<Option<Student>> {
        self.get_student_by_auth_href_impl(auth_user_href).await
    }

    async fn add_enrollment(&self, student_id: &str, course_href: &str) -> Result<bool> {
        self.add_enrollment_impl(student_id, course_href).await
    }

    async fn remove_enrollment(&self, student_id: &str, course_href: &str) -> Result<()> {
        self.remove_enrollment_impl(student_id, course_href).await
    }

    async fn delete_student(&self, id: &str) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn update_student_profile(
        &self,
        auth_user_href: &str,
        profile: StudentProfile,
    ) -> Result<Option<Student>> {
        self.update_student_profile_impl(auth_user_href, profile)
            .await
    }

    // 财务模块
    async fn get_account_by_auth_href(&self, auth_user_href: &str) -> Result<Option<Account>> {
        self.get_account_by_auth_href_impl(auth_user_href).await
    }

    async fn get_account_by_id(&self, id: &str) -> Result<Option<Account>> {
        self.get_account_by_id_impl(id).await
    }

    async fn upsert_account_with_invoices(
        &self,
        auth_user_href: &str,
        invoices: Vec<NewInvoice>,
    ) -> Result<Account> {
        self.upsert_account_with_invoices_impl(auth_user_href, invoices)
            .await
    }

    async fn get_invoice_by_reference(&self, reference: &str) -> Result<Option<Invoice>> {
        self.get_invoice_by_reference_impl(reference).await
    }

    async fn transition_invoice_status(
        &self,
        reference: &str,
        from: InvoiceStatus,
        to: InvoiceStatus,
    ) -> Result<bool> {
        self.transition_invoice_status_impl(reference, from, to)
            .await
    }

    // 图书馆模块
    async fn create_book(&self, fields: BookFields) -> Result<Book> {
        self.create_book_impl(fields).await
    }

    async fn get_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        self.get_book_by_isbn_impl(isbn).await
    }

    async fn list_books(&self) -> Result<Vec<Book>> {
        self.list_books_impl().await
    }

    async fn update_book(&self, isbn: &str, fields: BookFields) -> Result<Option<Book>> {
        self.update_book_impl(isbn, fields).await
    }

    async fn count_open_borrows(&self, book_id: &str) -> Result<u64> {
        self.count_open_borrows_impl(book_id).await
    }

    async fn create_library_student(&self, auth_user_href: &str) -> Result<LibraryStudent> {
        self.create_library_student_impl(auth_user_href).await
    }

    async fn get_library_student_by_href(
        &self,
        auth_user_href: &str,
    ) -> Result<Option<LibraryStudent>> {
        self.get_library_student_by_href_impl(auth_user_href).await
    }

    async fn list_student_transactions(
        &self,
        student_id: &str,
    ) -> Result<Vec<(Transaction, Book)>> {
        self.list_student_transactions_impl(student_id).await
    }

    async fn borrow_book(&self, student_id: &str, book: &Book) -> Result<BorrowOutcome> {
        self.borrow_book_impl(student_id, book).await
    }

    async fn return_book(&self, student_id: &str, book: &Book) -> Result<ReturnOutcome> {
        self.return_book_impl(student_id, book).await
    }

    async fn list_overdue_transactions(
        &self,
        student_id: &str,
        cutoff: i64,
    ) -> Result<Vec<Transaction>> {
        self.list_overdue_transactions_impl(student_id, cutoff)
            .await
    }

    async fn claim_transaction_fine(&self, id: &str) -> Result<bool> {
        self.claim_transaction_fine_impl(id).await
    }

    async fn release_transaction_fine(&self, id: &str) -> Result<()> {
        self.release_transaction_fine_impl(id).await
    }
}
