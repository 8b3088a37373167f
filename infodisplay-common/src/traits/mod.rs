pub mod canvas;
pub mod clock;
pub mod sensor;
pub mod shutdown;
pub mod weather_source;

pub use canvas::*;
pub use clock::*;
pub use sensor::*;
pub use shutdown::*;
pub use weather_source::*;
