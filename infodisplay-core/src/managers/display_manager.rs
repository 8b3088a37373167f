use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use infodisplay_common::*;

use crate::screens::Screen;

const NEVER: u64 = u64::MAX;

/// 活动屏幕索引，可在触摸中断线程与主循环之间共享
///
/// 索引和上一次被接受的切换时间都是原子量，`advance` 可以与主循环并发调用。
#[derive(Debug)]
pub struct ScreenCursor {
    index: AtomicUsize,
    len: usize,
    debounce: Duration,
    origin: Instant,
    last_transition_ms: AtomicU64,
}

impl ScreenCursor {
    pub fn new(len: usize, debounce: Duration) -> Self {
        Self {
            index: AtomicUsize::new(0),
            len: len.max(1),
            debounce,
            origin: Instant::now(),
            last_transition_ms: AtomicU64::new(NEVER),
        }
    }

    pub fn index(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    /// 切换到下一屏，去抖窗口内的请求被忽略
    pub fn advance(&self) -> bool {
        self.advance_at(Instant::now())
    }

    pub fn advance_at(&self, at: Instant) -> bool {
        let at_ms = at.saturating_duration_since(self.origin).as_millis() as u64;
        let window = self.debounce.as_millis() as u64;

        let accepted = self
            .last_transition_ms
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                if last != NEVER && at_ms.saturating_sub(last) < window {
                    None
                } else {
                    Some(at_ms)
                }
            })
            .is_ok();

        if !accepted {
            debug!("Screen advance ignored inside debounce window");
            return false;
        }

        let len = self.len;
        let _ = self
            .index
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len));
        true
    }
}

/// 持有所有屏幕，按游标选择当前屏幕
pub struct DisplayManager {
    screens: Vec<Box<dyn Screen>>,
    cursor: Arc<ScreenCursor>,
    last_index: Option<usize>,
}

impl DisplayManager {
    pub fn new(screens: Vec<Box<dyn Screen>>, debounce: Duration) -> Result<Self, ConfigError> {
        if screens.is_empty() {
            return Err(ConfigError::Invalid {
                field: "display.screens",
                reason: "at least one screen is required".into(),
            });
        }
        let cursor = Arc::new(ScreenCursor::new(screens.len(), debounce));
        Ok(Self {
            screens,
            cursor,
            last_index: None,
        })
    }

    /// 交给切屏事件源的句柄
    pub fn cursor(&self) -> Arc<ScreenCursor> {
        Arc::clone(&self.cursor)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn current(&mut self) -> &mut dyn Screen {
        let index = self.cursor.index() % self.screens.len();
        if self.last_index != Some(index) {
            info!("Active screen: {}", self.screens[index].name());
            self.last_index = Some(index);
        }
        self.screens[index].as_mut()
    }
}
