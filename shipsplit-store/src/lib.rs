pub mod app_config;
pub mod shipstation;

pub use shipstation::{ShipStationClient, ShipStationError};
