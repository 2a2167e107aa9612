use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建认证用户表
        manager
            .create_table(
                Table::create()
                    .table(AuthUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthUsers::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthUsers::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AuthUsers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AuthUsers::PasswordHash).string().not_null())
                    .col(ColumnDef::new(AuthUsers::FirstName).string().not_null())
                    .col(ColumnDef::new(AuthUsers::LastName).string().not_null())
                    .col(ColumnDef::new(AuthUsers::Enabled).boolean().not_null())
                    .col(
                        ColumnDef::new(AuthUsers::AccountNonExpired)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuthUsers::AccountNonLocked)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuthUsers::CredentialsNonExpired)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuthUsers::RoleType).string().not_null())
                    .col(ColumnDef::new(AuthUsers::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(AuthUsers::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建账户激活令牌表
        manager
            .create_table(
                Table::create()
                    .table(AccountActivations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountActivations::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AccountActivations::Token)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AccountActivations::UserId)
                            .string_len(36)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AccountActivations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AccountActivations::Table, AccountActivations::UserId)
                            .to(AuthUsers::Table, AuthUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建用户元数据表
        manager
            .create_table(
                Table::create()
                    .table(UserMetadata::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserMetadata::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserMetadata::UserId)
                            .string_len(36)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UserMetadata::LastLoginAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserMetadata::Table, UserMetadata::UserId)
                            .to(AuthUsers::Table, AuthUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(UserMetadata::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountActivations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthUsers::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum AuthUsers {
    #[sea_orm(iden = "auth_users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    Enabled,
    AccountNonExpired,
    AccountNonLocked,
    CredentialsNonExpired,
    RoleType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AccountActivations {
    #[sea_orm(iden = "account_activations")]
    Table,
    Id,
    Token,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserMetadata {
    #[sea_orm(iden = "user_metadata")]
    Table,
    Id,
    UserId,
    LastLoginAt,
}
