//! 面板画布：把块渲染成 RGB565 缓冲区后按窗口写入 ILI9341

use std::collections::HashMap;
use std::convert::Infallible;
use std::path::PathBuf;

use embedded_graphics::image::Image;
use embedded_graphics::mono_font::iso_8859_1::{FONT_7X13, FONT_9X15, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment as TextAlignment, Baseline, Text, TextStyleBuilder};
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use infodisplay_common::*;
use tinybmp::Bmp;

use super::ili9341::Ili9341;

/// 单个块的离屏缓冲区，越界像素被裁剪
struct BlockBuffer {
    size: Size,
    pixels: Vec<Rgb565>,
}

impl BlockBuffer {
    fn new(size: Size, background: Rgb565) -> Self {
        Self {
            size,
            pixels: vec![background; (size.width * size.height) as usize],
        }
    }

    fn to_be_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color.into_storage().to_be_bytes())
            .collect()
    }
}

impl OriginDimensions for BlockBuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for BlockBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = (self.size.width as i32, self.size.height as i32);
        for Pixel(point, color) in pixels {
            if (0..width).contains(&point.x) && (0..height).contains(&point.y) {
                self.pixels[(point.y * width + point.x) as usize] = color;
            }
        }
        Ok(())
    }
}

fn font(size: FontSize) -> &'static MonoFont<'static> {
    match size {
        FontSize::Small => &FONT_7X13,
        FontSize::Medium => &FONT_9X15,
        FontSize::Large => &FONT_10X20,
    }
}

fn text_alignment(alignment: Alignment) -> TextAlignment {
    match alignment {
        Alignment::Left => TextAlignment::Left,
        Alignment::Center => TextAlignment::Center,
        Alignment::Right => TextAlignment::Right,
    }
}

/// 图标文件缓存：`{dir}/{large|small}/{id}.bmp`
struct IconStore {
    dir: PathBuf,
    files: HashMap<PathBuf, Vec<u8>>,
}

impl IconStore {
    fn bytes(&mut self, id: &str, set: IconSet) -> Result<&[u8], RenderError> {
        let path = self.dir.join(set.dir_name()).join(format!("{id}.bmp"));
        if !self.files.contains_key(&path) {
            let bytes = std::fs::read(&path)
                .map_err(|e| RenderError::MissingIcon(format!("{}: {e}", path.display())))?;
            self.files.insert(path.clone(), bytes);
        }
        self.files
            .get(&path)
            .map(Vec::as_slice)
            .ok_or_else(|| RenderError::MissingIcon(id.to_string()))
    }
}

pub struct PanelCanvas<SPI, DC, RST, BL> {
    panel: Ili9341<SPI, DC, RST, BL>,
    icons: IconStore,
}

impl<SPI, DC, RST, BL> PanelCanvas<SPI, DC, RST, BL>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    pub fn new(panel: Ili9341<SPI, DC, RST, BL>, icons_dir: impl Into<PathBuf>) -> Self {
        Self {
            panel,
            icons: IconStore {
                dir: icons_dir.into(),
                files: HashMap::new(),
            },
        }
    }

    fn render_text(block: &TextBlock, size: Size) -> BlockBuffer {
        let mut buffer = BlockBuffer::new(size, block.background);
        for span in &block.spans {
            let character_style = MonoTextStyle::new(font(span.font), span.color);
            let text_style = TextStyleBuilder::new()
                .alignment(text_alignment(span.alignment))
                .baseline(Baseline::Top)
                .build();
            let _ = Text::with_text_style(&span.text, span.position, character_style, text_style)
                .draw(&mut buffer);
        }
        buffer
    }

    fn render_icon(
        &mut self,
        id: &str,
        set: IconSet,
        size: Size,
    ) -> Result<BlockBuffer, RenderError> {
        let bytes = self.icons.bytes(id, set)?;
        let bmp = Bmp::<Rgb565>::from_slice(bytes)
            .map_err(|e| RenderError::MissingIcon(format!("{id}: {e:?}")))?;
        let mut buffer = BlockBuffer::new(size, palette::BACKGROUND);
        let _ = Image::new(&bmp, Point::zero()).draw(&mut buffer);
        Ok(buffer)
    }
}

impl<SPI, DC, RST, BL> Canvas for PanelCanvas<SPI, DC, RST, BL>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    fn clear(&mut self, color: Rgb565) -> Result<(), RenderError> {
        self.panel
            .fill(color.into_storage())
            .map_err(|e| RenderError::Bus(e.to_string()))
    }

    fn paint_block(&mut self, block: &Block) -> Result<(), RenderError> {
        let size = block.region.size;
        let buffer = match &block.content {
            BlockContent::Text(text) => Self::render_text(text, size),
            BlockContent::Icon { id, set } => self.render_icon(id, *set, size)?,
        };
        self.panel
            .write_area(&block.region, &buffer.to_be_bytes())
            .map_err(|e| RenderError::Bus(e.to_string()))
    }
}

impl<SPI, DC, RST, BL> PanelControl for PanelCanvas<SPI, DC, RST, BL>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    fn set_backlight(&mut self, on: bool) -> Result<(), HardwareError> {
        self.panel.set_backlight(on)
    }

    fn sleep(&mut self) -> Result<(), HardwareError> {
        self.panel.sleep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_clips_out_of_range_pixels() {
        let mut buffer = BlockBuffer::new(Size::new(2, 2), Rgb565::BLACK);
        buffer
            .draw_iter([
                Pixel(Point::new(1, 1), Rgb565::WHITE),
                Pixel(Point::new(2, 0), Rgb565::WHITE),
                Pixel(Point::new(-1, 0), Rgb565::WHITE),
            ])
            .unwrap();
        assert_eq!(buffer.pixels[3], Rgb565::WHITE);
        assert_eq!(buffer.pixels.iter().filter(|c| **c == Rgb565::WHITE).count(), 1);
    }

    #[test]
    fn pixels_are_sent_big_endian() {
        let buffer = BlockBuffer::new(Size::new(1, 1), Rgb565::RED);
        assert_eq!(buffer.to_be_bytes(), vec![0xF8, 0x00]);
    }

    #[test]
    fn text_with_degree_sign_renders() {
        let block = TextBlock {
            background: Rgb565::BLACK,
            spans: vec![TextSpan::new("12.5°C", FontSize::Large, Point::zero())],
        };
        type LinuxCanvas = PanelCanvas<
            linux_embedded_hal::SpidevDevice,
            linux_embedded_hal::SysfsPin,
            linux_embedded_hal::SysfsPin,
            linux_embedded_hal::SysfsPin,
        >;
        let buffer = LinuxCanvas::render_text(&block, Size::new(80, 20));
        assert!(buffer.pixels.iter().any(|c| *c == Rgb565::WHITE));
    }
}
