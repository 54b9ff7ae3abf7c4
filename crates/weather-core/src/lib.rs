pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod timezone;
pub mod wmo;

pub use client::WeatherService;
pub use clock::Clock;
pub use config::Config;
pub use error::{Result, WeatherError};
