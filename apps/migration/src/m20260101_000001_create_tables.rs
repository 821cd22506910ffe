use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tenants::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tenants::Name).string().not_null())
                    .col(timestamp(Tenants::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string_len(16).not_null())
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_tenant")
                            .from(Users::Table, Users::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Brands::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Brands::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Brands::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Brands::Name).string().not_null())
                    .col(ColumnDef::new(Brands::Voice).text().null())
                    .col(ColumnDef::new(Brands::ApproverContact).string().null())
                    .col(timestamp(Brands::CreatedAt))
                    .col(timestamp(Brands::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_brands_tenant")
                            .from(Brands::Table, Brands::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Posts::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Posts::BrandId).uuid().not_null())
                    .col(ColumnDef::new(Posts::Title).string().not_null())
                    .col(ColumnDef::new(Posts::Content).json_binary().not_null())
                    .col(ColumnDef::new(Posts::Status).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Posts::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp(Posts::CreatedAt))
                    .col(timestamp(Posts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_brand")
                            .from(Posts::Table, Posts::BrandId)
                            .to(Brands::Table, Brands::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Schedules::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Schedules::PostId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Schedules::TenantId).uuid().not_null())
                    .col(
                        ColumnDef::new(Schedules::RunAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Schedules::Timezone)
                            .string()
                            .not_null()
                            .default("UTC"),
                    )
                    .col(ColumnDef::new(Schedules::Status).string_len(16).not_null())
                    .col(timestamp(Schedules::CreatedAt))
                    .col(timestamp(Schedules::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedules_post")
                            .from(Schedules::Table, Schedules::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // No foreign key: rows may live on the secondary analytics database.
        manager
            .create_table(
                Table::create()
                    .table(PostAnalytics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostAnalytics::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostAnalytics::PostId).uuid().not_null())
                    .col(ColumnDef::new(PostAnalytics::TenantId).uuid().not_null())
                    .col(ColumnDef::new(PostAnalytics::Platform).string_len(16).not_null())
                    .col(counter(PostAnalytics::Impressions))
                    .col(counter(PostAnalytics::Engagement))
                    .col(counter(PostAnalytics::Clicks))
                    .col(counter(PostAnalytics::Shares))
                    .col(counter(PostAnalytics::Comments))
                    .col(counter(PostAnalytics::Likes))
                    .col(timestamp(PostAnalytics::RecordedAt))
                    .col(
                        ColumnDef::new(PostAnalytics::Metadata)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ApprovalLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApprovalLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApprovalLogs::PostId).uuid().not_null())
                    .col(ColumnDef::new(ApprovalLogs::TenantId).uuid().not_null())
                    .col(ColumnDef::new(ApprovalLogs::Action).string_len(32).not_null())
                    .col(ColumnDef::new(ApprovalLogs::ActorId).uuid().null())
                    .col(ColumnDef::new(ApprovalLogs::Feedback).text().null())
                    .col(
                        ColumnDef::new(ApprovalLogs::Metadata)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(timestamp(ApprovalLogs::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_approval_logs_post")
                            .from(ApprovalLogs::Table, ApprovalLogs::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        let indexes = [
            Index::create()
                .name("idx_brands_tenant")
                .table(Brands::Table)
                .col(Brands::TenantId)
                .to_owned(),
            Index::create()
                .name("idx_posts_tenant_status")
                .table(Posts::Table)
                .col(Posts::TenantId)
                .col(Posts::Status)
                .to_owned(),
            Index::create()
                .name("idx_posts_brand_status")
                .table(Posts::Table)
                .col(Posts::BrandId)
                .col(Posts::Status)
                .to_owned(),
            Index::create()
                .name("idx_schedules_status_run_at")
                .table(Schedules::Table)
                .col(Schedules::Status)
                .col(Schedules::RunAt)
                .to_owned(),
            Index::create()
                .name("idx_post_analytics_post")
                .table(PostAnalytics::Table)
                .col(PostAnalytics::PostId)
                .col(PostAnalytics::RecordedAt)
                .to_owned(),
            Index::create()
                .name("idx_approval_logs_post")
                .table(ApprovalLogs::Table)
                .col(ApprovalLogs::PostId)
                .col(ApprovalLogs::CreatedAt)
                .to_owned(),
        ];
        for mut index in indexes {
            manager.create_index(index.if_not_exists().to_owned()).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApprovalLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostAnalytics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Brands::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await
    }
}

fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn counter<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .big_integer()
        .not_null()
        .default(0)
        .to_owned()
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    TenantId,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Brands {
    Table,
    Id,
    TenantId,
    Name,
    Voice,
    ApproverContact,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    TenantId,
    BrandId,
    Title,
    Content,
    Status,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Schedules {
    Table,
    Id,
    PostId,
    TenantId,
    RunAt,
    Timezone,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PostAnalytics {
    Table,
    Id,
    PostId,
    TenantId,
    Platform,
    Impressions,
    Engagement,
    Clicks,
    Shares,
    Comments,
    Likes,
    RecordedAt,
    Metadata,
}

#[derive(DeriveIden)]
enum ApprovalLogs {
    Table,
    Id,
    PostId,
    TenantId,
    Action,
    ActorId,
    Feedback,
    Metadata,
    CreatedAt,
}
