//! Create `person` table.
//!
//! `id` is a store-assigned BIGSERIAL; `email` carries a unique constraint so
//! concurrent inserts of the same address cannot both commit.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Person::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Person::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Person::FirstName, 100).not_null())
                    .col(string_len(Person::LastName, 100).not_null())
                    .col(double(Person::Age).not_null())
                    .col(string_len(Person::Email, 255).unique_key().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Person::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Person { Table, Id, FirstName, LastName, Age, Email }
