//! 测试用假实现
//! 记录画布、脚本化天气源、手动时钟、固定传感器与计数关机信号

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_graphics::pixelcolor::Rgb565;
use infodisplay_common::*;
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};

pub fn timestamp(secs: i64) -> Timestamp {
    Timestamp::from_second(secs).unwrap_or(Timestamp::UNIX_EPOCH)
}

/// 纪元后 `secs` 秒的 UTC 挂钟时间
pub fn zoned(secs: i64) -> Zoned {
    timestamp(secs).to_zoned(TimeZone::UTC)
}

/// 含 48 个小时与 8 天预报的快照
pub fn snapshot_at(observed: i64) -> WeatherSnapshot {
    snapshot_with(observed, 48, 8)
}

pub fn snapshot_with(observed: i64, hours: usize, days: usize) -> WeatherSnapshot {
    let first_hour = observed - observed.rem_euclid(3600);
    let first_noon = observed - observed.rem_euclid(86_400) + 43_200;

    WeatherSnapshot {
        observed_at: timestamp(observed),
        current: CurrentWeather {
            temp: 11.3,
            feels_like: 10.1,
            humidity: 81.0,
            wind_speed: 4.63,
            condition_code: 500,
            condition: bounded("Rain"),
            icon_id: bounded("10d"),
        },
        hourly: (0..hours)
            .map(|i| HourPoint {
                at: timestamp(first_hour + i as i64 * 3600),
                temp: 10.0 + i as f32 * 0.5,
                humidity: 80.0,
                condition_code: 803,
                condition: bounded("Clouds"),
                icon_id: bounded("04d"),
            })
            .collect(),
        daily: (0..days)
            .map(|i| DayPoint {
                at: timestamp(first_noon + i as i64 * 86_400),
                temp_min: 2.5,
                temp_max: 9.5,
                humidity: 66.0,
                condition_code: 800,
                condition: bounded("Clear"),
                icon_id: bounded("01d"),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    Clear(Rgb565),
    Paint(Block),
}

/// 记录所有绘制操作的画布
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<CanvasOp>,
    failing_icons: Vec<String>,
    fail_clear: bool,
    fail_backlight: bool,
    backlight: Option<bool>,
    asleep: bool,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_icon(mut self, id: &str) -> Self {
        self.failing_icons.push(id.to_string());
        self
    }

    pub fn failing_clear(mut self) -> Self {
        self.fail_clear = true;
        self
    }

    pub fn failing_backlight(mut self) -> Self {
        self.fail_backlight = true;
        self
    }

    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    pub fn reset(&mut self) {
        self.ops.clear();
    }

    pub fn clears(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, CanvasOp::Clear(_)))
            .count()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.ops.iter().filter_map(|op| match op {
            CanvasOp::Paint(block) => Some(block),
            CanvasOp::Clear(_) => None,
        })
    }

    /// Text of every painted text block, in paint order.
    pub fn painted_texts(&self) -> Vec<String> {
        self.blocks().filter_map(Block::text_content).collect()
    }

    pub fn icons(&self) -> Vec<String> {
        self.blocks()
            .filter_map(|block| match &block.content {
                BlockContent::Icon { id, .. } => Some(id.clone()),
                BlockContent::Text(_) => None,
            })
            .collect()
    }

    pub fn backlight(&self) -> Option<bool> {
        self.backlight
    }

    pub fn is_asleep(&self) -> bool {
        self.asleep
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Rgb565) -> Result<(), RenderError> {
        if self.fail_clear {
            return Err(RenderError::Bus("clear rejected".into()));
        }
        self.ops.push(CanvasOp::Clear(color));
        Ok(())
    }

    fn paint_block(&mut self, block: &Block) -> Result<(), RenderError> {
        if let BlockContent::Icon { id, .. } = &block.content {
            if self.failing_icons.contains(id) {
                return Err(RenderError::MissingIcon(id.clone()));
            }
        }
        self.ops.push(CanvasOp::Paint(block.clone()));
        Ok(())
    }
}

impl PanelControl for RecordingCanvas {
    fn set_backlight(&mut self, on: bool) -> Result<(), HardwareError> {
        if self.fail_backlight {
            return Err(HardwareError::NotInitialized { device: "backlight" });
        }
        self.backlight = Some(on);
        Ok(())
    }

    fn sleep(&mut self) -> Result<(), HardwareError> {
        self.asleep = true;
        Ok(())
    }
}

/// 按脚本返回结果的天气源，并记录调用次数
#[derive(Debug)]
pub struct ScriptedSource {
    script: VecDeque<Result<WeatherSnapshot, FetchError>>,
    repeat: Option<WeatherSnapshot>,
    calls: Rc<Cell<usize>>,
    seen: Rc<RefCell<Vec<ExcludeSet>>>,
}

impl ScriptedSource {
    /// 每次获取都返回 `snapshot`
    pub fn always(snapshot: WeatherSnapshot) -> Self {
        Self {
            script: VecDeque::new(),
            repeat: Some(snapshot),
            calls: Rc::default(),
            seen: Rc::default(),
        }
    }

    /// Plays `results` in order, then fails with a transport error.
    pub fn sequence(results: Vec<Result<WeatherSnapshot, FetchError>>) -> Self {
        Self {
            script: results.into(),
            repeat: None,
            calls: Rc::default(),
            seen: Rc::default(),
        }
    }

    pub fn calls(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }

    pub fn seen_excludes(&self) -> Rc<RefCell<Vec<ExcludeSet>>> {
        Rc::clone(&self.seen)
    }
}

impl RemoteWeatherSource for ScriptedSource {
    fn fetch(
        &mut self,
        _location: Location,
        exclude: ExcludeSet,
    ) -> Result<WeatherSnapshot, FetchError> {
        self.calls.set(self.calls.get() + 1);
        self.seen.borrow_mut().push(exclude);
        if let Some(next) = self.script.pop_front() {
            return next;
        }
        match &self.repeat {
            Some(snapshot) => Ok(snapshot.clone()),
            None => Err(FetchError::Transport("script exhausted".into())),
        }
    }
}

/// 可手动推进的时钟，克隆体共享同一时间
#[derive(Debug, Clone)]
pub struct ManualClock {
    secs: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn at(secs: i64) -> Self {
        Self {
            secs: Rc::new(Cell::new(secs)),
        }
    }

    pub fn set(&self, secs: i64) {
        self.secs.set(secs);
    }

    pub fn advance(&self, secs: i64) {
        self.secs.set(self.secs.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Zoned {
        zoned(self.secs.get())
    }
}

#[derive(Debug, Clone)]
pub struct FixedSensor {
    result: Result<IndoorReading, SensorReadError>,
}

impl FixedSensor {
    pub fn reading(temperature: f32, humidity: f32) -> Self {
        Self {
            result: Ok(IndoorReading {
                temperature,
                humidity,
            }),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: Err(SensorReadError::Bus("no ack".into())),
        }
    }
}

impl IndoorSensor for FixedSensor {
    fn read(&mut self) -> Result<IndoorReading, SensorReadError> {
        self.result.clone()
    }
}

/// 被查询指定次数后请求关机
#[derive(Debug)]
pub struct CountdownShutdown {
    remaining: Cell<usize>,
}

impl CountdownShutdown {
    pub fn after(checks: usize) -> Self {
        Self {
            remaining: Cell::new(checks),
        }
    }
}

impl ShutdownSignal for CountdownShutdown {
    fn is_requested(&self) -> bool {
        match self.remaining.get() {
            0 => true,
            n => {
                self.remaining.set(n - 1);
                false
            }
        }
    }
}
