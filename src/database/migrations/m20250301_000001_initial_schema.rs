use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_users_table(manager).await?;
        self.create_tags_table(manager).await?;
        self.create_libraries_table(manager).await?;
        self.create_bots_table(manager).await?;
        self.create_uptime_table(manager).await?;

        self.create_indexes(manager).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Uptime::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Libraries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

impl Migration {
    fn create_timestamp_column(&self, manager: &SchemaManager, column: impl IntoIden) -> ColumnDef {
        let mut col = ColumnDef::new(column);
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => col.timestamp_with_time_zone().not_null(),
            _ => col.string().not_null(),
        };
        col
    }

    async fn create_users_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Discriminator).string().not_null())
                    .col(ColumnDef::new(Users::Avatar).string())
                    .col(ColumnDef::new(Users::ShortDescription).text())
                    .to_owned(),
            )
            .await
    }

    async fn create_tags_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tags::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Tags::Name).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn create_libraries_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Libraries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Libraries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Libraries::Name).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn create_bots_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bots::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bots::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Bots::Username).string().not_null())
                    .col(ColumnDef::new(Bots::Discriminator).string().not_null())
                    .col(ColumnDef::new(Bots::Avatar).string())
                    .col(
                        ColumnDef::new(Bots::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Bots::AvatarChildFriendly)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Bots::Certified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Bots::ShortDescription).text().not_null())
                    .col(ColumnDef::new(Bots::FullDescription).text().not_null())
                    .col(ColumnDef::new(Bots::Library).string())
                    .col(ColumnDef::new(Bots::Links).json().not_null())
                    .col(ColumnDef::new(Bots::Prefix).string().not_null())
                    .col(ColumnDef::new(Bots::Tags).json().not_null())
                    .col(ColumnDef::new(Bots::Shards).json())
                    .col(ColumnDef::new(Bots::ServerCount).big_integer())
                    .col(ColumnDef::new(Bots::Owners).json().not_null())
                    .col(ColumnDef::new(Bots::Upvotes).json().not_null())
                    .col(ColumnDef::new(Bots::Vanity).string())
                    .col(self.create_timestamp_column(manager, Bots::CreatedAt))
                    .col(self.create_timestamp_column(manager, Bots::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn create_uptime_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Uptime::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Uptime::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Uptime::Online)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Uptime::Total)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_indexes(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_bots_vanity")
                    .table(Bots::Table)
                    .col(Bots::Vanity)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_bots_approved")
                    .table(Bots::Table)
                    .col(Bots::Approved)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Discriminator,
    Avatar,
    ShortDescription,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Libraries {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Bots {
    Table,
    Id,
    Username,
    Discriminator,
    Avatar,
    Approved,
    AvatarChildFriendly,
    Certified,
    ShortDescription,
    FullDescription,
    Library,
    Links,
    Prefix,
    Tags,
    Shards,
    ServerCount,
    Owners,
    Upvotes,
    Vanity,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Uptime {
    Table,
    Id,
    Online,
    Total,
}
