pub mod config;
pub mod display;
pub mod error;
pub mod weather;

pub use config::*;
pub use display::*;
pub use error::*;
pub use weather::*;
