use std::time::Duration;

use infodisplay_common::*;

use super::DisplayManager;

/// 绘制后休眠时长
pub const DRAW_QUANTUM: Duration = Duration::from_millis(500);
/// 秒数未变化时的轮询间隔
pub const IDLE_POLL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Drew,
    Idle,
}

/// 主循环：每个新的挂钟秒绘制一次当前屏幕
pub struct MainLoop<C: Clock, K: Canvas + PanelControl, S: ShutdownSignal> {
    clock: C,
    canvas: K,
    shutdown: S,
    display: DisplayManager,
    last_second: Option<i64>,
}

impl<C: Clock, K: Canvas + PanelControl, S: ShutdownSignal> MainLoop<C, K, S> {
    pub fn new(clock: C, canvas: K, shutdown: S, display: DisplayManager) -> Self {
        Self {
            clock,
            canvas,
            shutdown,
            display,
            last_second: None,
        }
    }

    pub fn canvas(&self) -> &K {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut K {
        &mut self.canvas
    }

    pub fn display(&self) -> &DisplayManager {
        &self.display
    }

    /// 挂钟秒前进时绘制一次当前屏幕
    pub fn poll_once(&mut self) -> Tick {
        let now = self.clock.now();
        let second = now.timestamp().as_second();
        if self.last_second == Some(second) {
            return Tick::Idle;
        }
        self.last_second = Some(second);

        let screen = self.display.current();
        let name = screen.name();
        match screen.draw(&mut self.canvas, &now, false) {
            Ok(report) => {
                if report.decision != RefreshDecision::Skip {
                    debug!(
                        "{}: {:?} painted={} failed={}",
                        name, report.decision, report.painted, report.failed
                    );
                }
            }
            Err(e) => error!("{}: draw failed: {}", name, e),
        }
        Tick::Drew
    }

    /// 运行到收到关机信号，然后关闭面板
    pub fn run(&mut self) {
        info!("Main loop started");
        while !self.shutdown.is_requested() {
            match self.poll_once() {
                Tick::Drew => std::thread::sleep(DRAW_QUANTUM),
                Tick::Idle => std::thread::sleep(IDLE_POLL),
            }
        }
        info!("Shutdown requested");
        self.teardown();
    }

    pub fn teardown(&mut self) {
        if let Err(e) = self.canvas.set_backlight(false) {
            error!("Failed to switch backlight off: {}", e);
        }
        if let Err(e) = self.canvas.sleep() {
            error!("Failed to put panel to sleep: {}", e);
        }
        info!("Display powered down");
    }
}
