//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the utility-consumption tracker here: the
//! user roster with facility profiles, the per-period consumption records,
//! and the shared boiler readings that feed the global chart.

pub mod boiler_reading;
pub mod consumption_record;
pub mod profile;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::boiler_reading::Entity as BoilerReading;
    pub use super::consumption_record::Entity as ConsumptionRecord;
    pub use super::profile::Entity as Profile;
    pub use super::user::Entity as User;
}
