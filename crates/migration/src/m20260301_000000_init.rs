//! Initial schema migration - creates the ledger tables.
//!
//! - `users`: identities synced from the external auth provider
//! - `categories`: income/expense labels, per user or global (`user_id` null)
//! - `transactions`: dated amounts in minor units, optionally categorized

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
pub(crate) enum Users {
    Table,
    Id,
    FirebaseUid,
    Email,
    DisplayName,
    PhotoUrl,
    EmailVerified,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    UserId,
    Name,
    #[iden = "type"]
    Kind,
    Icon,
    Color,
    Description,
    IsDefault,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    CategoryId,
    AmountMinor,
    #[iden = "type"]
    Kind,
    Description,
    TransactionDate,
    CreatedAt,
    UpdatedAt,
}

const KINDS: [&str; 2] = ["income", "expense"];

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::FirebaseUid)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string())
                    .col(ColumnDef::new(Users::PhotoUrl).text())
                    .col(
                        ColumnDef::new(Users::EmailVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::UserId).integer())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(
                        ColumnDef::new(Categories::Kind)
                            .string()
                            .not_null()
                            .check(Expr::col(Categories::Kind).is_in(KINDS)),
                    )
                    .col(ColumnDef::new(Categories::Icon).string())
                    .col(ColumnDef::new(Categories::Color).string())
                    .col(ColumnDef::new(Categories::Description).text())
                    .col(
                        ColumnDef::new(Categories::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Categories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-user_id")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-user_id")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-type")
                    .table(Categories::Table)
                    .col(Categories::Kind)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).integer().not_null())
                    .col(ColumnDef::new(Transactions::CategoryId).integer())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Transactions::AmountMinor).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Transactions::Kind)
                            .string()
                            .not_null()
                            .check(Expr::col(Transactions::Kind).is_in(KINDS)),
                    )
                    .col(ColumnDef::new(Transactions::Description).text())
                    .col(ColumnDef::new(Transactions::TransactionDate).date().not_null())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-user_id")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-category_id")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-transaction_date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::TransactionDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-category_id")
                    .table(Transactions::Table)
                    .col(Transactions::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
