use infodisplay_common::RefreshDecision;
use jiff::{Timestamp, Zoned};

/// 超过该间隔未被绘制，说明期间有其他屏幕处于活动状态
pub const RESUME_GAP_SECS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// 偶数分钟的第 0 秒增量刷新
    EvenMinute,
    /// 每秒增量刷新（带秒的时钟）
    EverySecond,
}

/// 每个屏幕的绘制记录，供 [`RefreshPolicy::decide`] 使用
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenState {
    pub last_drawn_at: Option<Timestamp>,
    pub has_ever_drawn: bool,
}

impl ScreenState {
    /// 记录一次绘制调用，无论是否真正绘制
    pub fn touch(&mut self, now: Timestamp, painted: bool) {
        self.last_drawn_at = Some(now);
        if painted {
            self.has_ever_drawn = true;
        }
    }

    /// 下一次决策强制全量刷新
    pub fn invalidate(&mut self) {
        self.has_ever_drawn = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    cadence: Cadence,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new(Cadence::EvenMinute)
    }
}

impl RefreshPolicy {
    pub const fn new(cadence: Cadence) -> Self {
        Self { cadence }
    }

    /// 偶数分钟的第 0 秒
    pub fn is_aligned(now: &Zoned) -> bool {
        now.second() == 0 && now.minute() % 2 == 0
    }

    pub fn decide(&self, now: &Zoned, state: &ScreenState, force: bool) -> RefreshDecision {
        if force || !state.has_ever_drawn {
            return RefreshDecision::Full;
        }

        let resumed = match state.last_drawn_at {
            Some(last) => now.timestamp().as_second() - last.as_second() > RESUME_GAP_SECS,
            None => true,
        };
        if resumed {
            return RefreshDecision::Full;
        }

        match self.cadence {
            Cadence::EverySecond => RefreshDecision::Incremental,
            Cadence::EvenMinute if Self::is_aligned(now) => RefreshDecision::Incremental,
            Cadence::EvenMinute => RefreshDecision::Skip,
        }
    }
}
