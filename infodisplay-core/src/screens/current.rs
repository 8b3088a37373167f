use embedded_graphics::prelude::Point;
use enumset::enum_set;
use infodisplay_common::*;
use jiff::Zoned;

use super::{
    DrawReport, Screen, centered_line, clear_for_full, fmt_humidity, fmt_temp, icon_block,
    paint_blocks, slot_blocks,
};
use crate::layout::{self, CurrentLayout, PREVIEW_HOURS};
use crate::managers::{Cadence, RefreshPolicy, ScreenState};
use crate::services::WeatherCache;

pub const CURRENT_EXCLUDE: ExcludeSet = enum_set!(ForecastPart::Minutely | ForecastPart::Daily);

/// 当前天气屏：日期、带秒时钟、实况、未来三小时与室内温湿度
pub struct CurrentConditionsScreen<W: RemoteWeatherSource, S: IndoorSensor> {
    cache: WeatherCache<W>,
    sensor: S,
    policy: RefreshPolicy,
    state: ScreenState,
    layout: CurrentLayout,
}

impl<W: RemoteWeatherSource, S: IndoorSensor> CurrentConditionsScreen<W, S> {
    pub fn new(source: W, sensor: S, location: Location) -> Self {
        Self {
            cache: WeatherCache::new(source, location, CURRENT_EXCLUDE),
            sensor,
            policy: RefreshPolicy::new(Cadence::EverySecond),
            state: ScreenState::default(),
            layout: layout::current(),
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }
}

impl<W: RemoteWeatherSource, S: IndoorSensor> Screen for CurrentConditionsScreen<W, S> {
    fn name(&self) -> &'static str {
        "current"
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

        let full = match decision {
            RefreshDecision::Skip => return Ok(report),
            RefreshDecision::Full => {
                clear_for_full(canvas, &mut self.state)?;
                true
            }
            RefreshDecision::Incremental => false,
        };

        let top_of_hour = now.minute() == 0 && now.second() == 0;
        let weather_due = full || RefreshPolicy::is_aligned(now);

        let mut blocks = Vec::new();
        if full || top_of_hour {
            blocks.push(Ok(date_block(&self.layout, now)));
        }
        blocks.push(Ok(clock_block(&self.layout, now)));

        if weather_due {
            let refresh = self.cache.refresh_if_stale(now.timestamp());
            report.weather_refreshed = refresh.refreshed;
            match refresh.snapshot {
                Some(snapshot) => blocks.extend(weather_blocks(&self.layout, snapshot, now)),
                None => debug!("current: no weather data yet"),
            }

            if full {
                let label = centered_line(
                    "Indoor",
                    FontSize::Small,
                    self.layout.indoor_label.size.width,
                    1,
                )
                .with_color(palette::MUTED);
                blocks.push(Ok(Block::text(self.layout.indoor_label, vec![label])));
            }
            blocks.extend(indoor_blocks(&self.layout, self.sensor.read()));
        }

        paint_blocks(self.name(), canvas, blocks, &mut report);
        Ok(report)
    }
}

fn date_block(layout: &CurrentLayout, now: &Zoned) -> Block {
    Block::text(
        layout.date,
        vec![centered_line(
            now.strftime("%a %d %b %Y").to_string(),
            FontSize::Medium,
            layout.date.size.width,
            2,
        )],
    )
}

fn clock_block(layout: &CurrentLayout, now: &Zoned) -> Block {
    Block::text(
        layout.clock,
        vec![centered_line(
            now.strftime("%H:%M:%S").to_string(),
            FontSize::Large,
            layout.clock.size.width,
            5,
        )],
    )
}

fn weather_blocks(
    layout: &CurrentLayout,
    snapshot: &WeatherSnapshot,
    now: &Zoned,
) -> Vec<Result<Block, RenderError>> {
    let current = &snapshot.current;
    let left = |text: String, font: FontSize| vec![TextSpan::new(text, font, Point::new(4, 2))];

    let mut blocks = vec![
        icon_block(layout.icon, &current.icon_id, IconSet::Large),
        Ok(Block::text(
            layout.description,
            left(current.condition.to_string(), FontSize::Medium),
        )),
        Ok(Block::text(
            layout.temperature,
            left(fmt_temp(current.temp), FontSize::Large),
        )),
        Ok(Block::text(
            layout.feels_like,
            left(format!("Feels {}", fmt_temp(current.feels_like)), FontSize::Small),
        )),
        Ok(Block::text(
            layout.humidity,
            left(format!("Humidity {}", fmt_humidity(current.humidity)), FontSize::Small),
        )),
        Ok(Block::text(
            layout.wind,
            left(format!("Wind {:.2} m/s", current.wind_speed), FontSize::Small),
        )),
    ];

    for (slot, hour) in layout.preview.iter().zip(PREVIEW_HOURS) {
        blocks.extend(slot_blocks(slot, snapshot.hourly.get(hour), hour, now));
    }
    blocks
}

fn indoor_blocks(
    layout: &CurrentLayout,
    reading: Result<IndoorReading, SensorReadError>,
) -> Vec<Result<Block, RenderError>> {
    match reading {
        Ok(reading) => vec![
            Ok(Block::text(
                layout.indoor_temp,
                vec![centered_line(
                    fmt_temp(reading.temperature),
                    FontSize::Large,
                    layout.indoor_temp.size.width,
                    10,
                )],
            )),
            Ok(Block::text(
                layout.indoor_humidity,
                vec![centered_line(
                    fmt_humidity(reading.humidity),
                    FontSize::Large,
                    layout.indoor_humidity.size.width,
                    10,
                )],
            )),
        ],
        Err(e) => vec![Err(RenderError::MissingData(format!("indoor reading: {e}")))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedSensor, RecordingCanvas, ScriptedSource, snapshot_at, zoned};

    // 2023-11-14T22:14:00Z
    const ALIGNED: i64 = 1_700_000_040;

    fn screen(
        source: ScriptedSource,
        sensor: FixedSensor,
    ) -> CurrentConditionsScreen<ScriptedSource, FixedSensor> {
        CurrentConditionsScreen::new(source, sensor, Location { lat: 0.0, lon: 0.0 })
    }

    #[test]
    fn first_draw_is_full_even_at_odd_second() {
        let mut screen = screen(
            ScriptedSource::always(snapshot_at(ALIGNED + 7)),
            FixedSensor::reading(21.5, 40.0),
        );
        let mut canvas = RecordingCanvas::new();

        let report = screen.draw(&mut canvas, &zoned(ALIGNED + 7), false).unwrap();

        assert_eq!(report.decision, RefreshDecision::Full);
        assert_eq!(canvas.clears(), 1);
        assert_eq!(report.failed, 0);
        let texts = canvas.painted_texts();
        assert!(texts.contains(&"Tue 14 Nov 2023".to_string()));
        assert!(texts.contains(&"22:14:07".to_string()));
        assert!(texts.contains(&"21.5°C".to_string()));
        assert!(texts.contains(&"Wind 4.63 m/s".to_string()));
        assert!(screen.state().has_ever_drawn);
    }

    #[test]
    fn following_ticks_only_repaint_the_clock() {
        let source = ScriptedSource::always(snapshot_at(ALIGNED));
        let calls = source.calls();
        let mut screen = screen(source, FixedSensor::reading(21.5, 40.0));
        let mut canvas = RecordingCanvas::new();
        screen.draw(&mut canvas, &zoned(ALIGNED + 1), false).unwrap();
        canvas.reset();

        let report = screen.draw(&mut canvas, &zoned(ALIGNED + 2), false).unwrap();

        assert_eq!(report.decision, RefreshDecision::Incremental);
        assert_eq!(canvas.clears(), 0);
        assert_eq!(canvas.painted_texts(), vec!["22:14:02".to_string()]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn even_minute_repaints_weather_and_indoor() {
        let mut screen = screen(
            ScriptedSource::always(snapshot_at(ALIGNED)),
            FixedSensor::reading(19.0, 55.0),
        );
        let mut canvas = RecordingCanvas::new();
        screen.draw(&mut canvas, &zoned(ALIGNED + 119), false).unwrap();
        canvas.reset();

        let report = screen.draw(&mut canvas, &zoned(ALIGNED + 120), false).unwrap();

        assert_eq!(report.decision, RefreshDecision::Incremental);
        assert_eq!(canvas.clears(), 0);
        assert!(report.weather_refreshed);
        let texts = canvas.painted_texts();
        assert!(texts.contains(&"55.0%".to_string()));
        assert!(texts.contains(&"22:16:00".to_string()));
    }

    #[test]
    fn missing_weather_still_draws_local_fields() {
        let mut screen = screen(
            ScriptedSource::sequence(vec![Err(FetchError::Status(503))]),
            FixedSensor::reading(20.0, 50.0),
        );
        let mut canvas = RecordingCanvas::new();

        let report = screen.draw(&mut canvas, &zoned(ALIGNED), false).unwrap();

        assert_eq!(report.failed, 0);
        let texts = canvas.painted_texts();
        assert!(texts.contains(&"22:14:00".to_string()));
        assert!(texts.contains(&"20.0°C".to_string()));
        assert!(!texts.iter().any(|t| t.starts_with("Wind")));
        assert_eq!(canvas.icons(), Vec::<String>::new());
    }

    #[test]
    fn sensor_failure_only_loses_indoor_blocks() {
        let mut screen = screen(
            ScriptedSource::always(snapshot_at(ALIGNED)),
            FixedSensor::failing(),
        );
        let mut canvas = RecordingCanvas::new();

        let report = screen.draw(&mut canvas, &zoned(ALIGNED), false).unwrap();

        assert_eq!(report.failed, 1);
        assert!(canvas.painted_texts().contains(&"Rain".to_string()));
    }

    #[test]
    fn clear_failure_retries_full_next_tick() {
        let mut screen = screen(
            ScriptedSource::always(snapshot_at(ALIGNED)),
            FixedSensor::reading(20.0, 50.0),
        );
        let mut canvas = RecordingCanvas::new().failing_clear();

        assert!(screen.draw(&mut canvas, &zoned(ALIGNED + 1), false).is_err());
        assert!(!screen.state().has_ever_drawn);

        let mut canvas = RecordingCanvas::new();
        let report = screen.draw(&mut canvas, &zoned(ALIGNED + 2), false).unwrap();
        assert_eq!(report.decision, RefreshDecision::Full);
    }
}
