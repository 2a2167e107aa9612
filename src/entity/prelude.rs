//! 预导入模块，方便使用

pub use super::account_activations::{
    ActiveModel as AccountActivationActiveModel, Entity as AccountActivations,
    Model as AccountActivationModel,
};
pub use super::auth_users::{
    ActiveModel as AuthUserActiveModel, Entity as AuthUsers, Model as AuthUserModel,
};
pub use super::books::{ActiveModel as BookActiveModel, Entity as Books, Model as BookModel};
pub use super::courses::{
    ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::finance_accounts::{
    ActiveModel as FinanceAccountActiveModel, Entity as FinanceAccounts,
    Model as FinanceAccountModel,
};
pub use super::invoices::{
    ActiveModel as InvoiceActiveModel, Entity as Invoices, Model as InvoiceModel,
};
pub use super::library_students::{
    ActiveModel as LibraryStudentActiveModel, Entity as LibraryStudents,
    Model as LibraryStudentModel,
};
pub use super::library_transactions::{
    ActiveModel as LibraryTransactionActiveModel, Entity as LibraryTransactions,
    Model as LibraryTransactionModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::user_metadata::{
    ActiveModel as UserMetadataActiveModel, Entity as UserMetadatas, Model as UserMetadataModel,
};
