mod canvas;
mod gpio;
mod ili9341;
mod sensor;
mod shutdown;
mod touch;

pub use canvas::PanelCanvas;
pub use gpio::init_gpio;
pub use ili9341::Ili9341;
pub use sensor::Bme280Sensor;
pub use shutdown::SignalShutdown;
pub use touch::spawn_touch_watcher;
