use std::time::Duration;

use linux_embedded_hal::SysfsPin;
use linux_embedded_hal::sysfs_gpio::Direction;

use infodisplay_common::HardwareError;

/// 等待 sysfs 节点出现的轮询间隔与次数上限
const EXPORT_POLL: Duration = Duration::from_millis(10);
const EXPORT_ATTEMPTS: u32 = 100;

pub(crate) fn gpio_error(pin: u64, e: impl core::fmt::Display) -> HardwareError {
    HardwareError::Communication {
        device: "gpio",
        reason: format!("pin {pin}: {e}"),
    }
}

/// 轮询 `ready` 直到成立，最多 `attempts` 次
fn wait_until(mut ready: impl FnMut() -> bool, attempts: u32, interval: Duration) -> bool {
    for _ in 0..attempts {
        if ready() {
            return true;
        }
        std::thread::sleep(interval);
    }
    ready()
}

/// 导出 sysfs GPIO 并设置方向，输出引脚默认置高
pub fn init_gpio(pin: u64, direction: Direction) -> Result<SysfsPin, HardwareError> {
    let gpio = SysfsPin::new(pin);
    gpio.export().map_err(|e| gpio_error(pin, e))?;

    if !wait_until(|| gpio.is_exported(), EXPORT_ATTEMPTS, EXPORT_POLL) {
        return Err(HardwareError::NotInitialized { device: "gpio" });
    }

    gpio.set_direction(direction).map_err(|e| gpio_error(pin, e))?;

    if direction == Direction::Out {
        gpio.set_value(1).map_err(|e| gpio_error(pin, e))?;
    }

    Ok(gpio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_gives_up_after_attempts() {
        let mut polls = 0;
        let ready = wait_until(
            || {
                polls += 1;
                false
            },
            5,
            Duration::ZERO,
        );
        assert!(!ready);
        assert_eq!(polls, 6);
    }

    #[test]
    fn wait_returns_once_ready() {
        let mut polls = 0;
        let ready = wait_until(
            || {
                polls += 1;
                polls == 3
            },
            EXPORT_ATTEMPTS,
            Duration::ZERO,
        );
        assert!(ready);
        assert_eq!(polls, 3);
    }
}
