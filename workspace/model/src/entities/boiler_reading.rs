use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// A dated reading from one of the shared plant boilers. These rows are not
/// attached to any user; they feed the global comparison chart.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "boiler_readings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: NaiveDate,
    /// Identifier of the boiler the reading came from.
    pub boiler: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub water_m3: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub gas_m3: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
