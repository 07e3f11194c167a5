use sea_orm::Iden;
use sea_orm::entity::prelude::*;

/// Lets later migrations name tables and columns through the live entity
/// definitions instead of redeclaring iden enums that can drift from the
/// model crate.
pub trait EntityIden: EntityTrait {
    fn table() -> TableIden {
        TableIden(Self::default().table_name().to_string())
    }

    fn column<C: ColumnTrait + Iden>(column: C) -> ColumnIden {
        let mut name = String::new();
        column.unquoted(&mut name);
        ColumnIden(name)
    }
}

impl<E: EntityTrait> EntityIden for E {}

#[derive(Debug, Clone)]
pub struct TableIden(String);

impl Iden for TableIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        let _ = s.write_str(&self.0);
    }
}

#[derive(Debug, Clone)]
pub struct ColumnIden(String);

impl Iden for ColumnIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        let _ = s.write_str(&self.0);
    }
}
