use std::path::Path;

use serde::Deserialize;

use crate::types::{ConfigError, Location};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/infodisplay/infodisplay.toml";
pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/onecall";

/// 完整应用配置，所有字段都有默认值
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub weather: WeatherConfig,
    pub display: DisplayConfig,
    pub pins: PinConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    pub api_key: String,
    pub endpoint: String,
    pub units: String,
    pub latitude: f64,
    pub longitude: f64,
    pub lang: Option<String>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            units: "metric".to_string(),
            latitude: 54.9981,
            longitude: -7.3093,
            lang: None,
        }
    }
}

impl WeatherConfig {
    pub fn location(&self) -> Location {
        Location {
            lat: self.latitude,
            lon: self.longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenKind {
    Current,
    Hourly,
    Daily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HourlyLayout {
    /// 六行，每行一个小时
    #[default]
    Rows,
    /// 3x3 网格，九个小时
    Grid,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub debounce_ms: u64,
    pub hourly_layout: HourlyLayout,
    pub icons_dir: String,
    pub screens: Vec<ScreenKind>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            hourly_layout: HourlyLayout::Rows,
            icons_dir: "/usr/share/infodisplay/icons".to_string(),
            screens: vec![ScreenKind::Current, ScreenKind::Hourly, ScreenKind::Daily],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PinConfig {
    pub spi_device: String,
    pub spi_hz: u32,
    pub dc: u64,
    pub rst: u64,
    pub backlight: u64,
    pub touch_irq: u64,
    pub i2c_bus: String,
    pub sensor_address: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            spi_device: "/dev/spidev0.0".to_string(),
            spi_hz: 32_000_000,
            dc: 24,
            rst: 25,
            backlight: 15,
            touch_irq: 16,
            i2c_bus: "/dev/i2c-1".to_string(),
            sensor_address: 0x76,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 读取配置文件；文件不存在时回退到默认配置
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Io(format!("{}: {e}", path.display()))),
        }
    }

    /// Replaces the API key when the environment provides a non-empty one.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.weather.api_key = key;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-90.0..=90.0).contains(&self.weather.latitude) {
            return Err(ConfigError::Invalid {
                field: "weather.latitude",
                reason: format!("{} is outside -90..=90", self.weather.latitude),
            });
        }
        if !(-180.0..=180.0).contains(&self.weather.longitude) {
            return Err(ConfigError::Invalid {
                field: "weather.longitude",
                reason: format!("{} is outside -180..=180", self.weather.longitude),
            });
        }
        if self.weather.units != "metric" {
            return Err(ConfigError::Invalid {
                field: "weather.units",
                reason: "only metric units are rendered".to_string(),
            });
        }
        if self.display.screens.is_empty() {
            return Err(ConfigError::Invalid {
                field: "display.screens",
                reason: "at least one screen is required".to_string(),
            });
        }
        Ok(())
    }
}
