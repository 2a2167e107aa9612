use std::sync::Arc;

use crate::models::{
    auth::entities::{ActivationDetails, NewUser, User, UserRole, UserUpdate},
    courses::entities::{Course, CourseFields},
    finance::entities::{Account, Invoice, InvoiceStatus, NewInvoice},
    library::entities::{
        Book, BookFields, BorrowOutcome, LibraryStudent, ReturnOutcome, Transaction,
    },
    students::entities::{Student, StudentProfile},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 认证用户
    // 创建用户，用户名或邮箱重复时返回 UniqueViolation
    async fn create_user(&self, user: NewUser) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 更新用户资料
    async fn update_user(&self, id: &str, update: UserUpdate) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: &str) -> Result<bool>;
    // 修改用户角色
    async fn set_user_role(&self, id: &str, role: UserRole) -> Result<Option<User>>;
    // 记录最近登录时间
    async fn record_user_login(&self, user_id: &str) -> Result<()>;

    /// 账户激活
    // 为用户创建或替换激活令牌
    async fn replace_activation(&self, user_id: &str, token: &str) -> Result<ActivationDetails>;
    // 通过令牌获取激活信息
    async fn get_activation_by_token(&self, token: &str) -> Result<Option<ActivationDetails>>;
    // 通过用户ID获取激活信息
    async fn get_activation_by_user(&self, user_id: &str) -> Result<Option<ActivationDetails>>;
    // 启用用户全部状态并删除激活令牌（同一事务）
    async fn activate_user(&self, activation: &ActivationDetails) -> Result<()>;

    /// 课程
    async fn create_course(&self, fields: CourseFields) -> Result<Course>;
    async fn get_course_by_id(&self, id: &str) -> Result<Option<Course>>;
    async fn list_courses(&self) -> Result<Vec<Course>>;
    // 批量获取，忽略不存在的ID
    async fn list_courses_by_ids(&self, ids: &[String]) -> Result<Vec<Course>>;
    async fn update_course(&self, id: &str, fields: CourseFields) -> Result<Option<Course>>;
    async fn delete_course(&self, id: &str) -> Result<bool>;

    /// 学生
    // 创建学生并登记首门课程（同一事务）
    async fn create_student_with_enrollment(
        &self,
        auth_user_href: &str,
        course_href: &str,
    ) -> Result<Student>;
    async fn get_student_by_id(&self, id: &str) -> Result<Option<Student>>;
    async fn get_student_by_auth_href(&self, auth_user_href: &str) -> Result<Option<Student>>;
    // 登记课程，已登记时返回 false
    async fn add_enrollment(&self, student_id: &str, course_href: &str) -> Result<bool>;
    // 撤销登记（下游服务调用失败时回滚用）
    async fn remove_enrollment(&self, student_id: &str, course_href: &str) -> Result<()>;
    // 删除学生（新学生注册流程失败时回滚用）
    async fn delete_student(&self, id: &str) -> Result<bool>;
    async fn update_student_profile(
        &self,
        auth_user_href: &str,
        profile: StudentProfile,
    ) -> Result<Option<Student>>;

    /// 财务
    async fn get_account_by_auth_href(&self, auth_user_href: &str) -> Result<Option<Account>>;
    async fn get_account_by_id(&self, id: &str) -> Result<Option<Account>>;
    // 账户不存在时创建，并追加账单（同一事务）
    async fn upsert_account_with_invoices(
        &self,
        auth_user_href: &str,
        invoices: Vec<NewInvoice>,
    ) -> Result<Account>;
    async fn get_invoice_by_reference(&self, reference: &str) -> Result<Option<Invoice>>;
    // 条件更新账单状态，当前状态不等于 from 时返回 false
    async fn transition_invoice_status(
        &self,
        reference: &str,
        from: InvoiceStatus,
        to: InvoiceStatus,
    ) -> Result<bool>;

    /// 图书馆
    async fn create_book(&self, fields: BookFields) -> Result<Book>;
    async fn get_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>>;
    async fn list_books(&self) -> Result<Vec<Book>>;
    async fn update_book(&self, isbn: &str, fields: BookFields) -> Result<Option<Book>>;
    async fn count_open_borrows(&self, book_id: &str) -> Result<u64>;
    // 已存在时直接返回
    async fn create_library_student(&self, auth_user_href: &str) -> Result<LibraryStudent>;
    async fn get_library_student_by_href(
        &self,
        auth_user_href: &str,
    ) -> Result<Option<LibraryStudent>>;
    // 学生的全部借阅记录及对应图书
    async fn list_student_transactions(
        &self,
        student_id: &str,
    ) -> Result<Vec<(Transaction, Book)>>;
    async fn borrow_book(&self, student_id: &str, book: &Book) -> Result<BorrowOutcome>;
    async fn return_book(&self, student_id: &str, book: &Book) -> Result<ReturnOutcome>;
    // 借出时间早于 cutoff 且未罚款、未归还的记录
    async fn list_overdue_transactions(
        &self,
        student_id: &str,
        cutoff: i64,
    ) -> Result<Vec<Transaction>>;
    // 未罚款时置位 fined，返回是否由本次调用置位
    async fn claim_transaction_fine(&self, id: &str) -> Result<bool>;
    async fn release_transaction_fine(&self, id: &str) -> Result<()>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
