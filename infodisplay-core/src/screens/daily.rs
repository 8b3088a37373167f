use embedded_graphics::prelude::Point;
use enumset::enum_set;
use infodisplay_common::*;
use jiff::Zoned;

use super::{
    DrawReport, Screen, centered_line, clear_for_full, fmt_humidity, icon_block, local, missing,
    paint_blocks,
};
use crate::layout::{self, DAILY_DAYS, DailyRow};
use crate::managers::{RefreshPolicy, ScreenState};
use crate::services::WeatherCache;

pub const DAILY_EXCLUDE: ExcludeSet = enum_set!(ForecastPart::Minutely | ForecastPart::Hourly);

/// 未来六天预报屏
pub struct DailyForecastScreen<W: RemoteWeatherSource> {
    cache: WeatherCache<W>,
    policy: RefreshPolicy,
    state: ScreenState,
}

impl<W: RemoteWeatherSource> DailyForecastScreen<W> {
    pub fn new(source: W, location: Location) -> Self {
        Self {
            cache: WeatherCache::new(source, location, DAILY_EXCLUDE),
            policy: RefreshPolicy::default(),
            state: ScreenState::default(),
        }
    }
}

impl<W: RemoteWeatherSource> Screen for DailyForecastScreen<W> {
    fn name(&self) -> &'static str {
        "daily"
    }

    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        now: &Zoned,
        forced: bool,
    ) -> SystemResult<DrawReport> {
        let decision = self.policy.decide(now, &self.state, forced);
        self.state.touch(now.timestamp(), decision.paints());
        let mut report = DrawReport::new(decision);
        if decision == RefreshDecision::Skip {
            return Ok(report);
        }

        let refresh = self.cache.refresh_if_stale(now.timestamp());
        report.weather_refreshed = refresh.refreshed;
        let mut blocks = Vec::new();
        if let Some(snapshot) = refresh.snapshot {
            for (row, index) in layout::daily_rows().iter().zip(DAILY_DAYS) {
                match snapshot.daily.get(index) {
                    Some(day) => blocks.extend(day_blocks(row, day, now)),
                    None => blocks.push(Err(missing("day", index))),
                }
            }
        }

        if decision == RefreshDecision::Full {
            clear_for_full(canvas, &mut self.state)?;
        }
        paint_blocks(self.name(), canvas, blocks, &mut report);
        Ok(report)
    }
}

fn day_blocks(row: &DailyRow, day: &DayPoint, now: &Zoned) -> [Result<Block, RenderError>; 3] {
    let date = local(day.at, now);
    let label_width = row.label.size.width;
    [
        Ok(Block::text(
            row.label,
            vec![
                centered_line(date.strftime("%a").to_string(), FontSize::Medium, label_width, 6),
                centered_line(
                    date.strftime("%d/%m").to_string(),
                    FontSize::Medium,
                    label_width,
                    28,
                ),
            ],
        )),
        icon_block(row.icon, &day.icon_id, IconSet::Small),
        Ok(Block::text(
            row.detail,
            vec![
                TextSpan::new(day.condition.to_string(), FontSize::Small, Point::new(4, 2))
                    .with_color(palette::ACCENT),
                TextSpan::new(
                    format!("{:.1}/{:.1}°C", day.temp_max, day.temp_min),
                    FontSize::Small,
                    Point::new(4, 18),
                ),
                TextSpan::new(fmt_humidity(day.humidity), FontSize::Small, Point::new(4, 34)),
            ],
        )),
    ]
}
