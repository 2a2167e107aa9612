use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建图书表
        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Books::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Books::Isbn)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Books::Title).string().not_null())
                    .col(ColumnDef::new(Books::Author).string().not_null())
                    .col(ColumnDef::new(Books::YearOfPublished).integer().not_null())
                    .col(ColumnDef::new(Books::Copies).integer().not_null())
                    .col(ColumnDef::new(Books::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Books::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 同一标题、作者、出版年份的图书只能登记一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_books_title_author_year")
                    .table(Books::Table)
                    .col(Books::Title)
                    .col(Books::Author)
                    .col(Books::YearOfPublished)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建图书馆学生表
        manager
            .create_table(
                Table::create()
                    .table(LibraryStudents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LibraryStudents::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LibraryStudents::AuthUserHref)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(LibraryStudents::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LibraryStudents::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建借阅记录表
        manager
            .create_table(
                Table::create()
                    .table(LibraryTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LibraryTransactions::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LibraryTransactions::StudentId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LibraryTransactions::BookId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LibraryTransactions::DateBorrowed)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LibraryTransactions::DateReturned)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LibraryTransactions::Fined)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LibraryTransactions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LibraryTransactions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LibraryTransactions::Table, LibraryTransactions::StudentId)
                            .to(LibraryStudents::Table, LibraryStudents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LibraryTransactions::Table, LibraryTransactions::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_library_transactions_student_book")
                    .table(LibraryTransactions::Table)
                    .col(LibraryTransactions::StudentId)
                    .col(LibraryTransactions::BookId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(LibraryTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LibraryStudents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Books {
    #[sea_orm(iden = "books")]
    Table,
    Id,
    Isbn,
    Title,
    Author,
    YearOfPublished,
    Copies,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LibraryStudents {
    #[sea_orm(iden = "library_students")]
    Table,
    Id,
    AuthUserHref,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LibraryTransactions {
    #[sea_orm(iden = "library_transactions")]
    Table,
    Id,
    StudentId,
    BookId,
    DateBorrowed,
    DateReturned,
    Fined,
    CreatedAt,
    UpdatedAt,
}
