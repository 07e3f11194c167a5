use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

/// How often scheduled reports go out for a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
pub enum ReportFrequency {
    #[sea_orm(string_value = "off")]
    Off,
    #[sea_orm(string_value = "m")]
    Monthly,
    #[sea_orm(string_value = "q")]
    Quarterly,
}

/// Delivery format for generated consumption reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(3))")]
pub enum ReportFormat {
    #[sea_orm(string_value = "pdf")]
    Pdf,
    #[sea_orm(string_value = "csv")]
    Csv,
}

impl ReportFormat {
    /// File extension used when naming generated report attachments.
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Csv => "csv",
        }
    }
}

/// Facility data attached to a user: location and contact details, the
/// maintenance schedule, and report delivery preferences.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning user; one profile per user.
    #[sea_orm(unique)]
    pub user_id: i32,
    pub location: Option<String>,
    /// External asset identifier of the facility.
    pub external_id: Option<String>,
    pub manager_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// URL of the facility's documentation page.
    pub link: Option<String>,
    pub last_maintenance: Option<NaiveDate>,
    /// Projected from `last_maintenance` plus the interval when not given
    /// explicitly.
    pub next_maintenance: Option<NaiveDate>,
    #[sea_orm(default_value = "12")]
    pub maintenance_interval_months: i16,
    pub report_frequency: ReportFrequency,
    pub report_format: ReportFormat,
    /// Destination for e-mailed reports; defaults to the user's own e-mail
    /// when left empty.
    pub report_email: Option<String>,
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
