mod current;
mod daily;
mod hourly;

pub use current::CurrentConditionsScreen;
pub use daily::DailyForecastScreen;
pub use hourly::HourlyForecastScreen;

use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;
use infodisplay_common::*;
use jiff::{Timestamp, Zoned};

use crate::layout::ForecastSlot;
use crate::managers::ScreenState;

/// 一次 `draw` 调用的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawReport {
    pub decision: RefreshDecision,
    pub painted: usize,
    pub failed: usize,
    pub weather_refreshed: bool,
}

impl DrawReport {
    pub fn new(decision: RefreshDecision) -> Self {
        Self {
            decision,
            painted: 0,
            failed: 0,
            weather_refreshed: false,
        }
    }
}

pub trait Screen {
    fn name(&self) -> &'static str;

    /// 按刷新策略在 `now` 绘制
    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        now: &Zoned,
        forced: bool,
    ) -> SystemResult<DrawReport>;
}

/// 绘制一组块，单个块失败只记录日志，不影响其他块
pub(crate) fn paint_blocks<I>(
    screen: &str,
    canvas: &mut dyn Canvas,
    blocks: I,
    report: &mut DrawReport,
) where
    I: IntoIterator<Item = Result<Block, RenderError>>,
{
    for block in blocks {
        match block.and_then(|block| canvas.paint_block(&block)) {
            Ok(()) => report.painted += 1,
            Err(e) => {
                warn!("{}: block skipped: {}", screen, e);
                report.failed += 1;
            }
        }
    }
}

/// 全量刷新前清屏
pub(crate) fn clear_for_full(
    canvas: &mut dyn Canvas,
    state: &mut ScreenState,
) -> SystemResult<()> {
    if let Err(e) = canvas.clear(palette::BACKGROUND) {
        state.invalidate();
        return Err(e.into());
    }
    Ok(())
}

/// 预报时间按挂钟时区显示
pub(crate) fn local(at: Timestamp, now: &Zoned) -> Zoned {
    at.to_zoned(now.time_zone().clone())
}

pub(crate) fn fmt_temp(celsius: f32) -> String {
    format!("{celsius:.1}°C")
}

pub(crate) fn fmt_humidity(percent: f32) -> String {
    format!("{percent:.1}%")
}

pub(crate) fn icon_block(
    region: Rectangle,
    id: &str,
    set: IconSet,
) -> Result<Block, RenderError> {
    if id.is_empty() {
        return Err(RenderError::MissingIcon("<none>".into()));
    }
    Ok(Block::icon(region, id, set))
}

pub(crate) fn missing(what: &str, index: usize) -> RenderError {
    RenderError::MissingData(format!("{what} #{index}"))
}

/// 在宽 `width` 像素的块中水平居中的单行文本
pub(crate) fn centered_line(
    text: impl Into<String>,
    font: FontSize,
    width: u32,
    y: i32,
) -> TextSpan {
    TextSpan::new(text, font, Point::new(width as i32 / 2, y)).centered()
}

/// 单个预报小时的时间、图标、温度与湿度
pub(crate) fn slot_blocks(
    slot: &ForecastSlot,
    hour: Option<&HourPoint>,
    index: usize,
    now: &Zoned,
) -> Vec<Result<Block, RenderError>> {
    let Some(hour) = hour else {
        return vec![Err(missing("hour", index))];
    };
    let width = slot.time.size.width;
    vec![
        Ok(Block::text(
            slot.time,
            vec![centered_line(
                local(hour.at, now).strftime("%H:%M").to_string(),
                FontSize::Small,
                width,
                1,
            )],
        )),
        icon_block(slot.icon, &hour.icon_id, IconSet::Small),
        Ok(Block::text(
            slot.temp,
            vec![centered_line(fmt_temp(hour.temp), FontSize::Small, width, 1)],
        )),
        Ok(Block::text(
            slot.humidity,
            vec![centered_line(fmt_humidity(hour.humidity), FontSize::Small, width, 1)],
        )),
    ]
}
