use crate::types::{IndoorReading, SensorReadError};

/// 室内温湿度传感器
pub trait IndoorSensor {
    fn read(&mut self) -> Result<IndoorReading, SensorReadError>;
}

impl<T: IndoorSensor + ?Sized> IndoorSensor for Box<T> {
    fn read(&mut self) -> Result<IndoorReading, SensorReadError> {
        (**self).read()
    }
}
