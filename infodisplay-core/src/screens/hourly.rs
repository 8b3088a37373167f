use embedded_graphics::prelude::Point;
use enumset::enum_set;
use infodisplay_common::*;
use jiff::Zoned;

use super::{
    DrawReport, Screen, clear_for_full, fmt_humidity, fmt_temp, icon_block, local, missing,
    paint_blocks, slot_blocks,
};
use crate::layout::{self, HOURLY_GRID_HOURS, HOURLY_ROW_HOURS};
use crate::managers::{RefreshPolicy, ScreenState};
use crate::services::WeatherCache;

pub const HOURLY_EXCLUDE: ExcludeSet = enum_set!(ForecastPart::Minutely | ForecastPart::Daily);

/// 逐小时预报屏，偶数分钟刷新
pub struct HourlyForecastScreen<W: RemoteWeatherSource> {
    cache: WeatherCache<W>,
    policy: RefreshPolicy,
    state: ScreenState,
    variant: HourlyLayout,
}

impl<W: RemoteWeatherSource> HourlyForecastScreen<W> {
    pub fn new(source: W, location: Location, variant: HourlyLayout) -> Self {
        Self {
            cache: WeatherCache::new(source, location, HOURLY_EXCLUDE),
            policy: RefreshPolicy::default(),
            state: ScreenState::default(),
            variant,
        }
    }
}

impl<W: RemoteWeatherSource> Screen for HourlyForecastScreen<W> {
    fn name(&self) -> &'static str {
        "hourly"
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
        let blocks = match (refresh.snapshot, self.variant) {
            (Some(snapshot), HourlyLayout::Rows) => row_blocks(snapshot, now),
            (Some(snapshot), HourlyLayout::Grid) => grid_blocks(snapshot, now),
            (None, _) => Vec::new(),
        };

        if decision == RefreshDecision::Full {
            clear_for_full(canvas, &mut self.state)?;
        }
        paint_blocks(self.name(), canvas, blocks, &mut report);
        Ok(report)
    }
}

fn row_blocks(snapshot: &WeatherSnapshot, now: &Zoned) -> Vec<Result<Block, RenderError>> {
    let mut blocks = Vec::new();
    for (row, index) in layout::hourly_rows().iter().zip(HOURLY_ROW_HOURS) {
        let Some(hour) = snapshot.hourly.get(index) else {
            blocks.push(Err(missing("hour", index)));
            continue;
        };

        let right = row.text.size.width as i32 - 4;
        blocks.push(icon_block(row.icon, &hour.icon_id, IconSet::Small));
        blocks.push(Ok(Block::text(
            row.text,
            vec![
                TextSpan::new(
                    local(hour.at, now).strftime("%H:%M").to_string(),
                    FontSize::Medium,
                    Point::new(4, 6),
                ),
                TextSpan::new(fmt_temp(hour.temp), FontSize::Medium, Point::new(right, 6))
                    .aligned(Alignment::Right),
                TextSpan::new(hour.condition.to_string(), FontSize::Small, Point::new(4, 28))
                    .with_color(palette::ACCENT),
                TextSpan::new(fmt_humidity(hour.humidity), FontSize::Small, Point::new(right, 28))
                    .aligned(Alignment::Right),
            ],
        )));
    }
    blocks
}

fn grid_blocks(snapshot: &WeatherSnapshot, now: &Zoned) -> Vec<Result<Block, RenderError>> {
    layout::hourly_grid()
        .iter()
        .zip(HOURLY_GRID_HOURS)
        .flat_map(|(slot, index)| slot_blocks(slot, snapshot.hourly.get(index), index, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingCanvas, ScriptedSource, snapshot_at, snapshot_with, zoned};

    // 2023-11-14T22:14:00Z
    const ALIGNED: i64 = 1_700_000_040;

    fn screen(
        source: ScriptedSource,
        variant: HourlyLayout,
    ) -> HourlyForecastScreen<ScriptedSource> {
        HourlyForecastScreen::new(source, Location { lat: 0.0, lon: 0.0 }, variant)
    }

    #[test]
    fn rows_show_hours_four_to_nine() {
        let mut screen = screen(ScriptedSource::always(snapshot_at(ALIGNED)), HourlyLayout::Rows);
        let mut canvas = RecordingCanvas::new();

        let report = screen.draw(&mut canvas, &zoned(ALIGNED + 13), false).unwrap();

        assert_eq!(report.decision, RefreshDecision::Full);
        assert_eq!(report.painted, 12);
        let texts = canvas.painted_texts();
        // snapshot hours start at 22:00, so index 4 is 02:00 the next day
        assert!(texts[0].starts_with("02:00"));
        assert!(texts[5].starts_with("07:00"));
    }

    #[test]
    fn grid_shows_nine_slots() {
        let mut screen = screen(ScriptedSource::always(snapshot_at(ALIGNED)), HourlyLayout::Grid);
        let mut canvas = RecordingCanvas::new();

        let report = screen.draw(&mut canvas, &zoned(ALIGNED), false).unwrap();

        assert_eq!(report.painted, 36);
        assert_eq!(canvas.icons().len(), 9);
    }

    #[test]
    fn short_forecast_marks_missing_rows() {
        let mut screen = screen(
            ScriptedSource::always(snapshot_with(ALIGNED, 6, 7)),
            HourlyLayout::Rows,
        );
        let mut canvas = RecordingCanvas::new();

        let report = screen.draw(&mut canvas, &zoned(ALIGNED), false).unwrap();

        // hours 4 and 5 exist, 6..=9 do not
        assert_eq!(report.painted, 4);
        assert_eq!(report.failed, 4);
    }

    #[test]
    fn active_screen_skips_between_even_minutes() {
        let source = ScriptedSource::always(snapshot_at(ALIGNED));
        let calls = source.calls();
        let mut screen = screen(source, HourlyLayout::Rows);
        let mut canvas = RecordingCanvas::new();

        for secs in 1..=119 {
            screen.draw(&mut canvas, &zoned(ALIGNED + secs), false).unwrap();
        }
        assert_eq!(canvas.clears(), 1);
        assert_eq!(calls.get(), 1);

        canvas.reset();
        let report = screen.draw(&mut canvas, &zoned(ALIGNED + 120), false).unwrap();
        assert_eq!(report.decision, RefreshDecision::Incremental);
        assert_eq!(canvas.clears(), 0);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn resuming_after_a_gap_redraws_fully() {
        let mut screen = screen(ScriptedSource::always(snapshot_at(ALIGNED)), HourlyLayout::Rows);
        let mut canvas = RecordingCanvas::new();
        screen.draw(&mut canvas, &zoned(ALIGNED + 1), false).unwrap();

        let report = screen.draw(&mut canvas, &zoned(ALIGNED + 30), false).unwrap();
        assert_eq!(report.decision, RefreshDecision::Full);
        assert_eq!(canvas.clears(), 2);
    }
}
