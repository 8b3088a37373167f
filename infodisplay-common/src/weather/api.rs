//! OpenWeatherMap One Call 响应结构
//!
//! 只声明显示需要的字段，其余字段由 serde 忽略。被 `exclude` 排除的段
//! 在响应中缺失，因此均为 `Option`。

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct OneCallResponse {
    /// 仅在错误响应中出现，可能是数字或字符串
    pub cod: Option<serde_json::Value>,
    pub message: Option<String>,
    pub timezone_offset: Option<i64>,
    pub current: Option<CurrentSection>,
    pub hourly: Option<Vec<HourlySection>>,
    pub daily: Option<Vec<DailySection>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub id: u16,
    pub main: String,
    #[serde(default)]
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentSection {
    pub dt: i64,
    pub temp: f32,
    pub feels_like: f32,
    pub humidity: f32,
    pub wind_speed: f32,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlySection {
    pub dt: i64,
    pub temp: f32,
    pub humidity: f32,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyTemp {
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailySection {
    pub dt: i64,
    pub temp: DailyTemp,
    pub humidity: f32,
    #[serde(default)]
    pub weather: Vec<Condition>,
}
