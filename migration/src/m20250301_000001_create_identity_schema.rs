use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reference data: roles and dashboard tabs
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Roles::Name).string().not_null().primary_key())
                    .col(ColumnDef::new(Roles::Description).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tabs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tabs::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Tabs::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Tabs::DisplayName).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::FirstName).string().not_null().default(""))
                    .col(ColumnDef::new(Users::LastName).string().not_null().default(""))
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordDigest).string().not_null())
                    .col(ColumnDef::new(Users::RoleName).string().not_null())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::IsApproved).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_role_name")
                            .from(Users::Table, Users::RoleName)
                            .to(Roles::Table, Roles::Name)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_role_name")
                    .table(Users::Table)
                    .col(Users::RoleName)
                    .to_owned(),
            )
            .await?;

        // Role -> permission matrix, one row per (role, permission)
        manager
            .create_table(
                Table::create()
                    .table(RolePermissions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RolePermissions::RoleName).string().not_null())
                    .col(ColumnDef::new(RolePermissions::Permission).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(RolePermissions::RoleName)
                            .col(RolePermissions::Permission),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_permissions_role_name")
                            .from(RolePermissions::Table, RolePermissions::RoleName)
                            .to(Roles::Table, Roles::Name)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserTabAccess::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserTabAccess::UserId).integer().not_null())
                    .col(ColumnDef::new(UserTabAccess::TabId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserTabAccess::UserId)
                            .col(UserTabAccess::TabId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_tab_access_user_id")
                            .from(UserTabAccess::Table, UserTabAccess::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_tab_access_tab_id")
                            .from(UserTabAccess::Table, UserTabAccess::TabId)
                            .to(Tabs::Table, Tabs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserTabAccess::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RolePermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tabs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Roles {
    Table,
    Name,
    Description,
}

#[derive(DeriveIden)]
pub(crate) enum Tabs {
    Table,
    Id,
    Name,
    DisplayName,
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    FirstName,
    LastName,
    Username,
    Email,
    PasswordDigest,
    RoleName,
    IsActive,
    IsApproved,
    CreatedAt,
    LastLogin,
}

#[derive(DeriveIden)]
enum RolePermissions {
    Table,
    RoleName,
    Permission,
}

#[derive(DeriveIden)]
enum UserTabAccess {
    Table,
    UserId,
    TabId,
}
