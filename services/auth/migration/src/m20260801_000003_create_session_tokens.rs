use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SessionTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SessionTokens::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SessionTokens::IdentityId).uuid().not_null())
                    .col(ColumnDef::new(SessionTokens::Token).text().not_null())
                    .col(
                        ColumnDef::new(SessionTokens::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionTokens::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SessionTokens::Table, SessionTokens::IdentityId)
                            .to(Identities::Table, Identities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Every protected request resolves a bearer value to a row.
        manager
            .create_index(
                Index::create()
                    .table(SessionTokens::Table)
                    .col(SessionTokens::Token)
                    .name("idx_session_tokens_token")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(SessionTokens::Table)
                    .col(SessionTokens::IdentityId)
                    .name("idx_session_tokens_identity_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SessionTokens::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SessionTokens {
    Table,
    Id,
    IdentityId,
    Token,
    ExpiresAt,
    CreatedAt,
}

#[derive(Iden)]
enum Identities {
    Table,
    Id,
}
