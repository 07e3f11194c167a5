pub mod charts;
pub mod consumption;
pub mod dashboard;
pub mod health;
pub mod preferences;
pub mod profiles;
pub mod reports;
pub mod users;
