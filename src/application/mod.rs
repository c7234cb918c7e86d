pub mod assets;
pub mod dashboard;
pub mod kitchen;
pub mod notifications;
pub mod scan;
pub mod trips;
