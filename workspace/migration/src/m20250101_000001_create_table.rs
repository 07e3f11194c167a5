use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .col(string_null(Users::Email))
                    .col(string(Users::Role).string_len(20).default("user"))
                    .col(boolean(Users::IsActive).default(true))
                    .to_owned(),
            )
            .await?;

        // Create profiles table
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(pk_auto(Profiles::Id))
                    .col(integer(Profiles::UserId).unique_key())
                    .col(string_null(Profiles::Location))
                    .col(string_null(Profiles::ExternalId))
                    .col(string_null(Profiles::ManagerName))
                    .col(string_null(Profiles::Phone))
                    .col(string_null(Profiles::Address))
                    .col(string_null(Profiles::Link))
                    .col(date_null(Profiles::LastMaintenance))
                    .col(date_null(Profiles::NextMaintenance))
                    .col(small_integer(Profiles::MaintenanceIntervalMonths).default(12))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_user")
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create consumption_records table
        manager
            .create_table(
                Table::create()
                    .table(ConsumptionRecords::Table)
                    .if_not_exists()
                    .col(pk_auto(ConsumptionRecords::Id))
                    .col(integer(ConsumptionRecords::UserId))
                    .col(integer(ConsumptionRecords::Year))
                    .col(string(ConsumptionRecords::Month).string_len(10))
                    .col(small_integer_null(ConsumptionRecords::Day))
                    .col(decimal_null(ConsumptionRecords::WaterM3).decimal_len(12, 2))
                    .col(decimal_null(ConsumptionRecords::GasM3).decimal_len(12, 2))
                    .col(decimal_null(ConsumptionRecords::Cost).decimal_len(14, 2))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_consumption_record_user")
                            .from(ConsumptionRecords::Table, ConsumptionRecords::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create boiler_readings table
        manager
            .create_table(
                Table::create()
                    .table(BoilerReadings::Table)
                    .if_not_exists()
                    .col(pk_auto(BoilerReadings::Id))
                    .col(date(BoilerReadings::Date))
                    .col(string(BoilerReadings::Boiler))
                    .col(decimal(BoilerReadings::WaterM3).decimal_len(12, 2))
                    .col(decimal(BoilerReadings::GasM3).decimal_len(12, 2))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(BoilerReadings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ConsumptionRecords::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    Role,
    IsActive,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    UserId,
    Location,
    ExternalId,
    ManagerName,
    Phone,
    Address,
    Link,
    LastMaintenance,
    NextMaintenance,
    MaintenanceIntervalMonths,
}

#[derive(DeriveIden)]
enum ConsumptionRecords {
    Table,
    Id,
    UserId,
    Year,
    Month,
    Day,
    WaterM3,
    GasM3,
    Cost,
}

#[derive(DeriveIden)]
enum BoilerReadings {
    Table,
    Id,
    Date,
    Boiler,
    WaterM3,
    GasM3,
}
