//! One salted password hash per user; removed together with the user.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut owner = ForeignKey::create()
            .name("fk_credentials_owner")
            .from(Credentials::Table, Credentials::UserId)
            .to(Owner::Table, Owner::Id)
            .on_delete(ForeignKeyAction::Cascade)
            .to_owned();

        manager
            .create_table(
                Table::create()
                    .table(Credentials::Table)
                    .if_not_exists()
                    .col(uuid(Credentials::UserId).primary_key())
                    .col(text(Credentials::PasswordHash))
                    .col(string_len(Credentials::PasswordAlgorithm, 32).default("argon2"))
                    .col(timestamp_with_time_zone(Credentials::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(&mut owner)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Credentials::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Credentials {
    #[sea_orm(iden = "user_credentials")]
    Table,
    UserId,
    PasswordHash,
    PasswordAlgorithm,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Owner {
    #[sea_orm(iden = "user")]
    Table,
    Id,
}
