mod owm_client;
mod weather_cache;

pub use owm_client::OwmClient;
pub use weather_cache::{Refresh, WeatherCache};
