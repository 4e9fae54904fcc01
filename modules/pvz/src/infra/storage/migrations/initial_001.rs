use sea_orm_migration::prelude::*;

use crate::contract::model::City;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Cities {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Points {
    Table,
    Id,
    CityId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Receptions {
    Table,
    Id,
    PointId,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Seq,
    Id,
    ReceptionId,
    ProductType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
}

/// At most one reception in progress per point.
const ACTIVE_RECEPTION_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS ux_receptions_active_point \
     ON receptions (point_id) WHERE status = 'in_progress'";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cities::Name).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert()
            .into_table(Cities::Table)
            .columns([Cities::Name])
            .to_owned();
        for city in City::ALL {
            seed.values_panic([city.as_str().into()]);
        }
        manager.exec_stmt(seed).await?;

        manager
            .create_table(
                Table::create()
                    .table(Points::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Points::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Points::CityId).integer().not_null())
                    .col(ColumnDef::new(Points::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_points_city")
                            .from(Points::Table, Points::CityId)
                            .to(Cities::Table, Cities::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_points_created_at")
                    .table(Points::Table)
                    .col(Points::CreatedAt)
                    .col(Points::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Receptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Receptions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Receptions::PointId).uuid().not_null())
                    .col(ColumnDef::new(Receptions::Status).string().not_null())
                    .col(ColumnDef::new(Receptions::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_receptions_point")
                            .from(Receptions::Table, Receptions::PointId)
                            .to(Points::Table, Points::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_receptions_point_created_at")
                    .table(Receptions::Table)
                    .col(Receptions::PointId)
                    .col(Receptions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(ACTIVE_RECEPTION_INDEX)
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Id).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Products::ReceptionId).uuid().not_null())
                    .col(ColumnDef::new(Products::ProductType).string().not_null())
                    .col(ColumnDef::new(Products::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_reception")
                            .from(Products::Table, Products::ReceptionId)
                            .to(Receptions::Table, Receptions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_products_reception_order")
                    .table(Products::Table)
                    .col(Products::ReceptionId)
                    .col(Products::CreatedAt)
                    .col(Products::Seq)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Receptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Points::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await
    }
}
