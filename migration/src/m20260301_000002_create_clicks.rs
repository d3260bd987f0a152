//! 点击日志表迁移
//!
//! 创建 clicks 表用于存储每次跳转的详细信息，包括：
//! - 时间戳
//! - 来源 (referer)
//! - 用户代理 (user_agent) 及解析结果
//! - IP 地址
//! - 地理位置信息 (country, city)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Click::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Click::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Click::Alias).string().not_null())
                    .col(
                        ColumnDef::new(Click::Ip)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Click::UserAgent)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Click::Referer)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Click::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Click::Browser)
                            .string()
                            .not_null()
                            .default("unknown"),
                    )
                    .col(
                        ColumnDef::new(Click::Os)
                            .string()
                            .not_null()
                            .default("unknown"),
                    )
                    .col(
                        ColumnDef::new(Click::DeviceType)
                            .string()
                            .not_null()
                            .default("desktop"),
                    )
                    .col(
                        ColumnDef::new(Click::IsMobile)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Click::Country).string().null())
                    .col(ColumnDef::new(Click::City).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_clicks_alias")
                    .table(Click::Table)
                    .col(Click::Alias)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_clicks_timestamp")
                    .table(Click::Table)
                    .col(Click::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_clicks_ip")
                    .table(Click::Table)
                    .col(Click::Ip)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_clicks_ip").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_clicks_timestamp").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_clicks_alias").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Click::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Click {
    #[sea_orm(iden = "clicks")]
    Table,
    Id,
    Alias,
    Ip,
    UserAgent,
    Referer,
    Timestamp,
    Browser,
    Os,
    DeviceType,
    IsMobile,
    Country,
    City,
}
