use bme280::i2c::BME280;
use infodisplay_common::*;
use linux_embedded_hal::{Delay, I2cdev};

const SECONDARY_ADDRESS: u8 = 0x77;

/// BME280 温湿度传感器（I2C）
pub struct Bme280Sensor {
    device: BME280<I2cdev>,
    delay: Delay,
    initialized: bool,
}

impl Bme280Sensor {
    pub fn open(bus: &str, address: u8) -> Result<Self, HardwareError> {
        let i2c = I2cdev::new(bus).map_err(|e| HardwareError::Communication {
            device: "bme280",
            reason: format!("{bus}: {e}"),
        })?;
        let device = if address == SECONDARY_ADDRESS {
            BME280::new_secondary(i2c)
        } else {
            BME280::new_primary(i2c)
        };

        let mut sensor = Self {
            device,
            delay: Delay,
            initialized: false,
        };
        sensor.init();
        Ok(sensor)
    }

    /// 初始化失败时在下次读取重试
    fn init(&mut self) {
        match self.device.init(&mut self.delay) {
            Ok(()) => {
                info!("BME280 initialized");
                self.initialized = true;
            }
            Err(e) => warn!("BME280 init failed: {:?}", e),
        }
    }
}

impl IndoorSensor for Bme280Sensor {
    fn read(&mut self) -> Result<IndoorReading, SensorReadError> {
        if !self.initialized {
            self.init();
            if !self.initialized {
                return Err(SensorReadError::NotInitialized);
            }
        }

        let measurements = self
            .device
            .measure(&mut self.delay)
            .map_err(|e| SensorReadError::Bus(format!("{e:?}")))?;
        Ok(IndoorReading {
            temperature: measurements.temperature,
            humidity: measurements.humidity,
        })
    }
}
