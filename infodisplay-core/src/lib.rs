pub mod layout;
pub mod managers;
pub mod screens;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use managers::{DisplayManager, MainLoop, RefreshPolicy, ScreenCursor};
pub use screens::{
    CurrentConditionsScreen, DailyForecastScreen, DrawReport, HourlyForecastScreen, Screen,
};
pub use services::{OwmClient, WeatherCache};
