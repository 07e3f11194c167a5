use sea_orm::entity::prelude::*;

/// Account role. The service itself does not authenticate; the role drives
/// which dashboard a user gets and is surfaced to whatever sits in front of
/// the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "user")]
    User,
}

impl UserRole {
    /// Spanish display label used by the user listings.
    pub fn label(self) -> &'static str {
        match self {
            UserRole::Admin => "Administrador",
            UserRole::User => "Usuario",
        }
    }
}

/// A facility owner or administrator of the consumption tracker.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub email: Option<String>,
    pub role: UserRole,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
}

impl Model {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each user carries at most one facility profile.
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
    /// A user accumulates one consumption record per period.
    #[sea_orm(has_many = "super::consumption_record::Entity")]
    ConsumptionRecord,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::consumption_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConsumptionRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
