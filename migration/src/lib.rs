pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_auth_tables;
mod m20240301_000002_create_course_tables;
mod m20240301_000003_create_student_tables;
mod m20240301_000004_create_finance_tables;
mod m20240301_000005_create_library_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_auth_tables::Migration),
            Box::new(m20240301_000002_create_course_tables::Migration),
            Box::new(m20240301_000003_create_student_tables::Migration),
            Box::new(m20240301_000004_create_finance_tables::Migration),
            Box::new(m20240301_000005_create_library_tables::Migration),
        ]
    }
}
