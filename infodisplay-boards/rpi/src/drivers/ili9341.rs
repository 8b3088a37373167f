//! ILI9341 TFT 控制器驱动（4 线 SPI，RGB565）

use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use infodisplay_common::{HardwareError, PANEL_HEIGHT, PANEL_WIDTH};

const DEVICE: &str = "ili9341";

/// spidev 单次传输上限
const MAX_TRANSFER: usize = 4096;

// 命令表
const SWRESET: u8 = 0x01;
const SLPIN: u8 = 0x10;
const SLPOUT: u8 = 0x11;
const DISPOFF: u8 = 0x28;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const PASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

/// 竖屏，BGR 顺序
const MADCTL_PORTRAIT_BGR: u8 = 0x48;
/// 16 位像素
const COLMOD_RGB565: u8 = 0x55;

fn bus_error(reason: impl core::fmt::Debug) -> HardwareError {
    HardwareError::Communication {
        device: DEVICE,
        reason: format!("{reason:?}"),
    }
}

pub struct Ili9341<SPI, DC, RST, BL> {
    spi: SPI,
    dc: DC,
    rst: RST,
    backlight: BL,
    initialized: bool,
}

impl<SPI, DC, RST, BL> Ili9341<SPI, DC, RST, BL>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, backlight: BL) -> Self {
        Self {
            spi,
            dc,
            rst,
            backlight,
            initialized: false,
        }
    }

    /// 硬件复位后发送初始化序列
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), HardwareError> {
        self.reset(delay)?;

        self.command(SWRESET, &[])?;
        delay.delay_ms(150);
        self.command(SLPOUT, &[])?;
        delay.delay_ms(120);
        self.command(COLMOD, &[COLMOD_RGB565])?;
        self.command(MADCTL, &[MADCTL_PORTRAIT_BGR])?;
        self.command(DISPON, &[])?;
        delay.delay_ms(20);

        self.initialized = true;
        self.set_backlight(true)
    }

    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), HardwareError> {
        self.rst.set_high().map_err(bus_error)?;
        delay.delay_ms(5);
        self.rst.set_low().map_err(bus_error)?;
        delay.delay_ms(20);
        self.rst.set_high().map_err(bus_error)?;
        delay.delay_ms(150);
        Ok(())
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<(), HardwareError> {
        if on {
            self.backlight.set_high().map_err(bus_error)
        } else {
            self.backlight.set_low().map_err(bus_error)
        }
    }

    /// 关闭显示后进入睡眠
    pub fn sleep(&mut self) -> Result<(), HardwareError> {
        self.command(DISPOFF, &[])?;
        self.command(SLPIN, &[])?;
        self.initialized = false;
        Ok(())
    }

    /// 向 `area` 写入大端 RGB565 像素
    pub fn write_area(&mut self, area: &Rectangle, pixels: &[u8]) -> Result<(), HardwareError> {
        if !self.initialized {
            return Err(HardwareError::NotInitialized { device: DEVICE });
        }
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        self.set_window(area.top_left, bottom_right)?;
        self.dc.set_high().map_err(bus_error)?;
        for chunk in pixels.chunks(MAX_TRANSFER) {
            self.spi.write(chunk).map_err(bus_error)?;
        }
        Ok(())
    }

    /// 用单一 RGB565 值填满整个面板
    pub fn fill(&mut self, raw: u16) -> Result<(), HardwareError> {
        if !self.initialized {
            return Err(HardwareError::NotInitialized { device: DEVICE });
        }
        let row: Vec<u8> = raw.to_be_bytes().repeat(PANEL_WIDTH as usize);
        self.set_window(
            Point::zero(),
            Point::new(PANEL_WIDTH as i32 - 1, PANEL_HEIGHT as i32 - 1),
        )?;
        self.dc.set_high().map_err(bus_error)?;
        for _ in 0..PANEL_HEIGHT {
            self.spi.write(&row).map_err(bus_error)?;
        }
        Ok(())
    }

    fn set_window(&mut self, start: Point, end: Point) -> Result<(), HardwareError> {
        let [x0h, x0l] = (start.x as u16).to_be_bytes();
        let [x1h, x1l] = (end.x as u16).to_be_bytes();
        let [y0h, y0l] = (start.y as u16).to_be_bytes();
        let [y1h, y1l] = (end.y as u16).to_be_bytes();
        self.command(CASET, &[x0h, x0l, x1h, x1l])?;
        self.command(PASET, &[y0h, y0l, y1h, y1l])?;
        self.command(RAMWR, &[])
    }

    fn command(&mut self, cmd: u8, data: &[u8]) -> Result<(), HardwareError> {
        self.dc.set_low().map_err(bus_error)?;
        self.spi.write(&[cmd]).map_err(bus_error)?;
        if !data.is_empty() {
            self.dc.set_high().map_err(bus_error)?;
            self.spi.write(data).map_err(bus_error)?;
        }
        Ok(())
    }
}
