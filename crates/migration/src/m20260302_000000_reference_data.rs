//! Reference tables: `currencies`, `payment_methods` and `account_types`.

use sea_orm_migration::prelude::*;

use super::m20260301_000000_init::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Currencies {
    Table,
    Id,
    Code,
    Name,
    Symbol,
    IsDefault,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PaymentMethods {
    Table,
    Id,
    UserId,
    Name,
    #[iden = "type"]
    Kind,
    Icon,
    Description,
    IsDefault,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AccountTypes {
    Table,
    Id,
    Name,
    Description,
    Icon,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Currencies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Currencies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Currencies::Code)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Currencies::Name).string().not_null())
                    .col(ColumnDef::new(Currencies::Symbol).string_len(10))
                    .col(
                        ColumnDef::new(Currencies::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Currencies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Currencies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentMethods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentMethods::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentMethods::UserId).integer())
                    .col(ColumnDef::new(PaymentMethods::Name).string().not_null())
                    .col(
                        ColumnDef::new(PaymentMethods::Kind)
                            .string()
                            .not_null()
                            .check(Expr::col(PaymentMethods::Kind).is_in([
                                "cash", "card", "bank", "digital", "other",
                            ])),
                    )
                    .col(ColumnDef::new(PaymentMethods::Icon).string())
                    .col(ColumnDef::new(PaymentMethods::Description).text())
                    .col(
                        ColumnDef::new(PaymentMethods::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PaymentMethods::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentMethods::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payment_methods-user_id")
                            .from(PaymentMethods::Table, PaymentMethods::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payment_methods-user_id")
                    .table(PaymentMethods::Table)
                    .col(PaymentMethods::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccountTypes::Name).string().not_null())
                    .col(ColumnDef::new(AccountTypes::Description).text())
                    .col(ColumnDef::new(AccountTypes::Icon).string())
                    .col(
                        ColumnDef::new(AccountTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountTypes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentMethods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Currencies::Table).to_owned())
            .await?;
        Ok(())
    }
}
