use std::time::{Duration, Instant};

use infodisplay_common::{HourlyLayout, Location};
use infodisplay_core::managers::Tick;
use infodisplay_core::testing::{
    CountdownShutdown, FixedSensor, ManualClock, RecordingCanvas, ScriptedSource, snapshot_at,
};
use infodisplay_core::{
    CurrentConditionsScreen, DailyForecastScreen, DisplayManager, HourlyForecastScreen, MainLoop,
    Screen,
};

// 2023-11-14T22:14:00Z
const ALIGNED: i64 = 1_700_000_040;
const HERE: Location = Location { lat: 54.9981, lon: -7.3093 };

fn screens() -> Vec<Box<dyn Screen>> {
    vec![
        Box::new(CurrentConditionsScreen::new(
            ScriptedSource::always(snapshot_at(ALIGNED)),
            FixedSensor::reading(21.0, 45.0),
            HERE,
        )),
        Box::new(HourlyForecastScreen::new(
            ScriptedSource::always(snapshot_at(ALIGNED)),
            HERE,
            HourlyLayout::Rows,
        )),
        Box::new(DailyForecastScreen::new(
            ScriptedSource::always(snapshot_at(ALIGNED)),
            HERE,
        )),
    ]
}

fn main_loop(
    clock: &ManualClock,
    shutdown: CountdownShutdown,
) -> MainLoop<ManualClock, RecordingCanvas, CountdownShutdown> {
    main_loop_on(clock, shutdown, RecordingCanvas::new())
}

fn main_loop_on(
    clock: &ManualClock,
    shutdown: CountdownShutdown,
    canvas: RecordingCanvas,
) -> MainLoop<ManualClock, RecordingCanvas, CountdownShutdown> {
    let display = DisplayManager::new(screens(), Duration::from_millis(300)).unwrap();
    assert_eq!(display.len(), 3);
    MainLoop::new(clock.clone(), canvas, shutdown, display)
}

#[test]
fn draws_once_per_wall_clock_second() {
    let clock = ManualClock::at(ALIGNED + 1);
    let mut main_loop = main_loop(&clock, CountdownShutdown::after(0));

    assert_eq!(main_loop.poll_once(), Tick::Drew);
    assert_eq!(main_loop.poll_once(), Tick::Idle);
    assert_eq!(main_loop.canvas().clears(), 1);

    clock.advance(1);
    main_loop.canvas_mut().reset();
    assert_eq!(main_loop.poll_once(), Tick::Drew);
    assert_eq!(main_loop.canvas().painted_texts(), vec!["22:14:02".to_string()]);
}

#[test]
fn switching_screens_redraws_the_new_one_fully() {
    let clock = ManualClock::at(ALIGNED + 1);
    let mut main_loop = main_loop(&clock, CountdownShutdown::after(0));
    main_loop.poll_once();

    let cursor = main_loop.display().cursor();
    assert!(cursor.advance());
    assert!(!cursor.advance(), "second press inside debounce window");
    assert_eq!(cursor.index(), 1);

    clock.advance(1);
    main_loop.canvas_mut().reset();
    main_loop.poll_once();
    // hourly screen: clear plus six icon rows and six text rows
    assert_eq!(main_loop.canvas().clears(), 1);
    assert_eq!(main_loop.canvas().icons().len(), 6);

    // an inactive hourly screen stays untouched between even minutes
    clock.advance(1);
    main_loop.canvas_mut().reset();
    main_loop.poll_once();
    assert!(main_loop.canvas().ops().is_empty());
}

#[test]
fn returning_to_a_screen_after_a_gap_is_full() {
    let clock = ManualClock::at(ALIGNED + 1);
    let mut main_loop = main_loop(&clock, CountdownShutdown::after(0));
    let cursor = main_loop.display().cursor();
    let start = Instant::now();

    main_loop.poll_once();
    for step in 1..=3u64 {
        assert!(cursor.advance_at(start + Duration::from_secs(step)));
        clock.advance(5);
        main_loop.canvas_mut().reset();
        main_loop.poll_once();
        assert_eq!(main_loop.canvas().clears(), 1, "step {step}");
    }
    assert_eq!(cursor.index(), 0);
}

#[test]
fn draws_are_full_on_first_visit_regardless_of_second() {
    for offset in [1, 17, 59, 61] {
        let clock = ManualClock::at(ALIGNED + offset);
        let mut main_loop = main_loop(&clock, CountdownShutdown::after(0));
        main_loop.poll_once();
        assert_eq!(main_loop.canvas().clears(), 1, "offset {offset}");
    }
}

#[test]
fn shutdown_powers_the_panel_down() {
    let clock = ManualClock::at(ALIGNED);
    let mut main_loop = main_loop(&clock, CountdownShutdown::after(1));

    main_loop.run();

    let canvas = main_loop.canvas();
    assert_eq!(canvas.backlight(), Some(false));
    assert!(canvas.is_asleep());
    assert_eq!(canvas.clears(), 1);
}

#[test]
fn immediate_shutdown_draws_nothing() {
    let clock = ManualClock::at(ALIGNED);
    let mut main_loop = main_loop(&clock, CountdownShutdown::after(0));

    main_loop.run();

    assert!(main_loop.canvas().ops().is_empty());
    assert!(main_loop.canvas().is_asleep());
}

#[test]
fn draw_errors_do_not_stop_the_loop() {
    let clock = ManualClock::at(ALIGNED + 1);
    let mut main_loop = main_loop_on(
        &clock,
        CountdownShutdown::after(0),
        RecordingCanvas::new().failing_clear(),
    );

    assert_eq!(main_loop.poll_once(), Tick::Drew);
    clock.advance(1);
    assert_eq!(main_loop.poll_once(), Tick::Drew);
    assert!(main_loop.canvas().ops().is_empty());
}

#[test]
fn run_reaches_teardown_after_failed_draws() {
    let clock = ManualClock::at(ALIGNED + 1);
    let mut main_loop = main_loop_on(
        &clock,
        CountdownShutdown::after(1),
        RecordingCanvas::new().failing_clear(),
    );

    main_loop.run();

    assert!(main_loop.canvas().ops().is_empty());
    assert_eq!(main_loop.canvas().backlight(), Some(false));
    assert!(main_loop.canvas().is_asleep());
}

#[test]
fn teardown_sleeps_the_panel_when_backlight_fails() {
    let clock = ManualClock::at(ALIGNED);
    let mut main_loop = main_loop_on(
        &clock,
        CountdownShutdown::after(0),
        RecordingCanvas::new().failing_backlight(),
    );

    main_loop.teardown();

    assert_eq!(main_loop.canvas().backlight(), None);
    assert!(main_loop.canvas().is_asleep());
}
