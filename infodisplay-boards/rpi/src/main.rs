use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::Parser;
use infodisplay_common::*;
use infodisplay_core::{
    CurrentConditionsScreen, DailyForecastScreen, DisplayManager, HourlyForecastScreen, MainLoop,
    OwmClient, Screen,
};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{Delay, SpidevDevice};

pub mod drivers;

use crate::drivers::{
    Bme280Sensor, Ili9341, PanelCanvas, SignalShutdown, init_gpio, spawn_touch_watcher,
};

#[derive(Debug, Parser)]
#[command(version, about = "Weather and clock screens on an ILI9341 panel")]
struct Cli {
    /// 配置文件路径
    #[arg(long, env = "INFODISPLAY_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

/// 传感器打不开时的占位实现，读数区域显示为缺失
struct AbsentSensor;

impl IndoorSensor for AbsentSensor {
    fn read(&mut self) -> Result<IndoorReading, SensorReadError> {
        Err(SensorReadError::NotInitialized)
    }
}

fn init_logger(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn open_spi(pins: &PinConfig) -> anyhow::Result<SpidevDevice> {
    let mut spi = SpidevDevice::open(&pins.spi_device)
        .map_err(|e| anyhow!("open {}: {e:?}", pins.spi_device))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(pins.spi_hz)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options)
        .map_err(|e| anyhow!("configure {}: {e:?}", pins.spi_device))?;
    Ok(spi)
}

fn open_sensor(pins: &PinConfig) -> Box<dyn IndoorSensor> {
    match Bme280Sensor::open(&pins.i2c_bus, pins.sensor_address) {
        Ok(sensor) => Box::new(sensor),
        Err(e) => {
            warn!("Indoor sensor unavailable: {}", e);
            Box::new(AbsentSensor)
        }
    }
}

fn build_screens(
    config: &AppConfig,
    client: &OwmClient,
    mut sensor: Option<Box<dyn IndoorSensor>>,
) -> Vec<Box<dyn Screen>> {
    let location = config.weather.location();
    config
        .display
        .screens
        .iter()
        .map(|kind| -> Box<dyn Screen> {
            match kind {
                ScreenKind::Current => {
                    let sensor = sensor
                        .take()
                        .unwrap_or_else(|| Box::new(AbsentSensor) as Box<dyn IndoorSensor>);
                    Box::new(CurrentConditionsScreen::new(
                        client.clone(),
                        sensor,
                        location,
                    ))
                }
                ScreenKind::Hourly => Box::new(HourlyForecastScreen::new(
                    client.clone(),
                    location,
                    config.display.hourly_layout,
                )),
                ScreenKind::Daily => Box::new(DailyForecastScreen::new(client.clone(), location)),
            }
        })
        .collect()
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?
        .with_api_key_override(std::env::var("OWM_API_KEY").ok());

    init_logger(&config.log.level);
    if !cli.config.exists() {
        warn!("Config {} not found, using defaults", cli.config.display());
    }
    info!("infodisplay starting with screens {:?}", config.display.screens);

    let pins = &config.pins;
    let dc = init_gpio(pins.dc, Direction::Out).context("DC pin")?;
    let rst = init_gpio(pins.rst, Direction::Out).context("RST pin")?;
    let backlight = init_gpio(pins.backlight, Direction::Out).context("backlight pin")?;
    let spi = open_spi(pins)?;

    let mut panel = Ili9341::new(spi, dc, rst, backlight);
    panel.init(&mut Delay).context("panel init")?;
    let canvas = PanelCanvas::new(panel, &config.display.icons_dir);

    let client = OwmClient::new(&config.weather).context("weather client")?;
    let sensor = config
        .display
        .screens
        .contains(&ScreenKind::Current)
        .then(|| open_sensor(pins));
    let screens = build_screens(&config, &client, sensor);

    let display = DisplayManager::new(
        screens,
        Duration::from_millis(config.display.debounce_ms),
    )?;

    let shutdown = SignalShutdown::install().context("installing signal handlers")?;
    let _touch = match spawn_touch_watcher(pins.touch_irq, display.cursor(), shutdown) {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Touch input disabled: {}", e);
            None
        }
    };

    MainLoop::new(SystemClock, canvas, shutdown, display).run();
    info!("infodisplay stopped");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        // 日志可能尚未初始化
        eprintln!("infodisplay: {e:#}");
        error!("Startup failed: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_matches_defaults() {
        let config = AppConfig::from_toml_str(include_str!("../infodisplay.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn cli_reads_config_path() {
        let cli = Cli::try_parse_from(["infodisplay", "--config", "/tmp/x.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/tmp/x.toml"));
    }
}
