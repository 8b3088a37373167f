use enumset::{EnumSet, EnumSetType};
use jiff::Timestamp;

pub type IconId = heapless::String<8>;
pub type ConditionText = heapless::String<24>;

/// 天气快照的新鲜度阈值，固定策略常量
pub const STALE_AFTER_SECS: i64 = 120;

/// 一次成功获取得到的完整天气数据，创建后不再修改
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub observed_at: Timestamp,
    pub current: CurrentWeather,
    pub hourly: Vec<HourPoint>,
    pub daily: Vec<DayPoint>,
}

impl WeatherSnapshot {
    /// 快照在 `now` 时的年龄（秒）
    pub fn age_secs(&self, now: Timestamp) -> i64 {
        now.as_second() - self.observed_at.as_second()
    }

    pub fn is_stale(&self, now: Timestamp) -> bool {
        self.age_secs(now) >= STALE_AFTER_SECS
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub temp: f32,
    pub feels_like: f32,
    pub humidity: f32,
    pub wind_speed: f32,
    pub condition_code: u16,
    pub condition: ConditionText,
    pub icon_id: IconId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourPoint {
    pub at: Timestamp,
    pub temp: f32,
    pub humidity: f32,
    pub condition_code: u16,
    pub condition: ConditionText,
    pub icon_id: IconId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayPoint {
    pub at: Timestamp,
    pub temp_min: f32,
    pub temp_max: f32,
    pub humidity: f32,
    pub condition_code: u16,
    pub condition: ConditionText,
    pub icon_id: IconId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// One Call 接口可排除的数据段
#[derive(Debug, EnumSetType)]
pub enum ForecastPart {
    Current,
    Minutely,
    Hourly,
    Daily,
    Alerts,
}

impl ForecastPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastPart::Current => "current",
            ForecastPart::Minutely => "minutely",
            ForecastPart::Hourly => "hourly",
            ForecastPart::Daily => "daily",
            ForecastPart::Alerts => "alerts",
        }
    }
}

pub type ExcludeSet = EnumSet<ForecastPart>;

/// `exclude` 查询参数使用的逗号分隔形式
pub fn exclude_query(exclude: ExcludeSet) -> String {
    exclude
        .iter()
        .map(|part| part.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndoorReading {
    pub temperature: f32,
    pub humidity: f32,
}

/// Copies as much of `text` as fits into a bounded string.
pub fn bounded<const N: usize>(text: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclude_query_follows_declaration_order() {
        let set = ForecastPart::Daily | ForecastPart::Minutely | ForecastPart::Alerts;
        assert_eq!(exclude_query(set), "minutely,daily,alerts");
        assert_eq!(exclude_query(ExcludeSet::empty()), "");
    }

    #[test]
    fn bounded_truncates_on_char_boundary() {
        let s: heapless::String<4> = bounded("Thunderstorm");
        assert_eq!(s.as_str(), "Thun");
        let s: heapless::String<8> = bounded("04d");
        assert_eq!(s.as_str(), "04d");
    }
}
