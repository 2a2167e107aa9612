//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod account_activations;
pub mod auth_users;
pub mod books;
pub mod courses;
pub mod enrollments;
pub mod finance_accounts;
pub mod invoices;
pub mod library_students;
pub mod library_transactions;
pub mod students;
pub mod user_metadata;
