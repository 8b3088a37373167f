use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use infodisplay_common::*;
use infodisplay_core::ScreenCursor;
use linux_embedded_hal::sysfs_gpio::{Direction, Edge};

use super::gpio::{gpio_error, init_gpio};
use super::shutdown::SignalShutdown;

/// 轮询超时，决定关机信号的响应延迟
const POLL_TIMEOUT_MS: isize = 500;

/// 监视触摸中断线，每个下降沿切换到下一屏；去抖由游标负责
pub fn spawn_touch_watcher(
    pin: u64,
    cursor: Arc<ScreenCursor>,
    shutdown: SignalShutdown,
) -> Result<JoinHandle<()>, HardwareError> {
    let gpio = init_gpio(pin, Direction::In)?;
    gpio.set_edge(Edge::FallingEdge)
        .map_err(|e| gpio_error(pin, e))?;
    let mut poller = gpio.get_poller().map_err(|e| gpio_error(pin, e))?;

    thread::Builder::new()
        .name("touch-irq".into())
        .spawn(move || {
            info!("Touch watcher started on GPIO {}", pin);
            while !shutdown.is_requested() {
                match poller.poll(POLL_TIMEOUT_MS) {
                    Ok(Some(_)) => {
                        if cursor.advance() {
                            info!("Touch: switching to screen {}", cursor.index());
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!("Touch IRQ poll failed: {}", e);
                        thread::sleep(Duration::from_secs(1));
                    }
                }
            }
            if let Err(e) = gpio.unexport() {
                debug!("Failed to unexport GPIO {}: {}", pin, e);
            }
        })
        .map_err(|e| gpio_error(pin, e))
}
