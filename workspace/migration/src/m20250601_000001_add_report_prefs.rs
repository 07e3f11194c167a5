use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::profile;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite accepts only one ADD COLUMN per ALTER TABLE, so the three
        // report preference columns go in one by one.
        manager
            .alter_table(
                Table::alter()
                    .table(Profile::table())
                    .add_column(
                        ColumnDef::new(Profile::column(profile::Column::ReportFrequency))
                            .string_len(3)
                            .not_null()
                            .default("off"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Profile::table())
                    .add_column(
                        ColumnDef::new(Profile::column(profile::Column::ReportFormat))
                            .string_len(3)
                            .not_null()
                            .default("pdf"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Profile::table())
                    .add_column(
                        ColumnDef::new(Profile::column(profile::Column::ReportEmail))
                            .string()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Profile::table())
                    .drop_column(Profile::column(profile::Column::ReportEmail))
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Profile::table())
                    .drop_column(Profile::column(profile::Column::ReportFormat))
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Profile::table())
                    .drop_column(Profile::column(profile::Column::ReportFrequency))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
