use thiserror::Error;

pub type SystemResult<T> = core::result::Result<T, SystemError>;

/// 绘制路径上传到主循环的错误；获取与传感器错误在各自边界处理，不会到达这里
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemError {
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

/// 远程天气获取失败，缓存保留旧数据并在下次过期检查时重试
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("weather API returned code {code}: {message}")]
    Api { code: String, message: String },

    #[error("malformed payload: {0}")]
    Payload(String),
}

/// 单个绘制块失败，不影响其余块
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("icon `{0}` not available")]
    MissingIcon(String),

    #[error("no data for {0}")]
    MissingData(String),

    #[error("bus write failed: {0}")]
    Bus(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorReadError {
    #[error("sensor not initialized")]
    NotInitialized,

    #[error("sensor bus error: {0}")]
    Bus(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(String),

    #[error("cannot parse config: {0}")]
    Parse(String),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HardwareError {
    #[error("{device} not initialized")]
    NotInitialized { device: &'static str },

    #[error("{device} communication error: {reason}")]
    Communication { device: &'static str, reason: String },
}
