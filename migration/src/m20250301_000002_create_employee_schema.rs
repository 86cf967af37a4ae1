use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_identity_schema::{Tabs, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Employees::Name).string().not_null())
                    .col(ColumnDef::new(Employees::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Employees::Department).string().not_null())
                    .col(ColumnDef::new(Employees::Position).string().not_null())
                    .col(ColumnDef::new(Employees::Salary).double().not_null())
                    .col(ColumnDef::new(Employees::JoiningDate).big_integer().not_null())
                    .col(ColumnDef::new(Employees::IsShared).boolean().not_null().default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserEmployeeAccess::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserEmployeeAccess::UserId).integer().not_null())
                    .col(ColumnDef::new(UserEmployeeAccess::EmployeeId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserEmployeeAccess::UserId)
                            .col(UserEmployeeAccess::EmployeeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_employee_access_user_id")
                            .from(UserEmployeeAccess::Table, UserEmployeeAccess::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_employee_access_employee_id")
                            .from(UserEmployeeAccess::Table, UserEmployeeAccess::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Metric records rendered by the dashboard tabs
        manager
            .create_table(
                Table::create()
                    .table(TabMetrics::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TabMetrics::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(TabMetrics::TabId).integer().not_null())
                    .col(ColumnDef::new(TabMetrics::RecordedAt).big_integer().not_null())
                    .col(ColumnDef::new(TabMetrics::MetricName).string().not_null())
                    .col(ColumnDef::new(TabMetrics::Value).double().not_null())
                    .col(ColumnDef::new(TabMetrics::Notes).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tab_metrics_tab_id")
                            .from(TabMetrics::Table, TabMetrics::TabId)
                            .to(Tabs::Table, Tabs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tab_metrics_tab_recorded_at")
                    .table(TabMetrics::Table)
                    .col(TabMetrics::TabId)
                    .col(TabMetrics::RecordedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TabMetrics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserEmployeeAccess::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    Name,
    Email,
    Department,
    Position,
    Salary,
    JoiningDate,
    IsShared,
}

#[derive(DeriveIden)]
enum UserEmployeeAccess {
    Table,
    UserId,
    EmployeeId,
}

#[derive(DeriveIden)]
enum TabMetrics {
    Table,
    Id,
    TabId,
    RecordedAt,
    MetricName,
    Value,
    Notes,
}
