use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// One user's utility reading for one (year, month) period.
///
/// Rows are created by the entry forms, updated in place by the
/// administrator upsert, and never deleted automatically.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "consumption_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub year: i32,
    /// Stored month code: a three-letter lowercase Spanish abbreviation
    /// ("ene".."dic"), optionally suffixed "-YY" by the entry form (e.g.
    /// "jun-25"). Only the abbreviation positions the row in the calendar.
    pub month: String,
    /// Informational day of month; never aggregated.
    pub day: Option<i16>,
    /// Water consumption in cubic meters. Absent means "no reading", which
    /// is not the same as a recorded zero.
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub water_m3: Option<Decimal>,
    /// Gas consumption in cubic meters.
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub gas_m3: Option<Decimal>,
    /// Billed cost in CLP.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub cost: Option<Decimal>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
