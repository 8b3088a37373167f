use jiff::Zoned;

pub trait Clock {
    fn now(&self) -> Zoned;
}

/// 系统时钟，使用本地时区
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now()
    }
}
