use jiff::Timestamp;

use super::api::{Condition, OneCallResponse};
use crate::types::{
    ConditionText, CurrentWeather, DayPoint, FetchError, HourPoint, IconId, WeatherSnapshot,
    bounded,
};

/// 解析 One Call 响应体为快照
pub fn parse_onecall(body: &str) -> Result<WeatherSnapshot, FetchError> {
    let response: OneCallResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Payload(e.to_string()))?;
    convert_onecall(&response)
}

pub fn convert_onecall(response: &OneCallResponse) -> Result<WeatherSnapshot, FetchError> {
    if let Some(code) = response.cod.as_ref().map(cod_to_string) {
        if code != "200" {
            return Err(FetchError::Api {
                code,
                message: response.message.clone().unwrap_or_default(),
            });
        }
    }

    let Some(current) = response.current.as_ref() else {
        return Err(FetchError::Api {
            code: "missing-current".into(),
            message: "response has no current section".into(),
        });
    };

    let (condition_code, condition, icon_id) = first_condition(&current.weather);
    let current_weather = CurrentWeather {
        temp: current.temp,
        feels_like: current.feels_like,
        humidity: current.humidity,
        wind_speed: current.wind_speed,
        condition_code,
        condition,
        icon_id,
    };

    let hourly = response
        .hourly
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|hour| {
            let (condition_code, condition, icon_id) = first_condition(&hour.weather);
            Ok(HourPoint {
                at: timestamp(hour.dt)?,
                temp: hour.temp,
                humidity: hour.humidity,
                condition_code,
                condition,
                icon_id,
            })
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    let daily = response
        .daily
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|day| {
            let (condition_code, condition, icon_id) = first_condition(&day.weather);
            Ok(DayPoint {
                at: timestamp(day.dt)?,
                temp_min: day.temp.min,
                temp_max: day.temp.max,
                humidity: day.humidity,
                condition_code,
                condition,
                icon_id,
            })
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    Ok(WeatherSnapshot {
        observed_at: timestamp(current.dt)?,
        current: current_weather,
        hourly,
        daily,
    })
}

fn cod_to_string(cod: &serde_json::Value) -> String {
    match cod {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn timestamp(dt: i64) -> Result<Timestamp, FetchError> {
    Timestamp::from_second(dt).map_err(|e| FetchError::Payload(format!("bad dt {dt}: {e}")))
}

// 只取第一个天气状况，缺失时留空，由绘制端报告缺图标
fn first_condition(conditions: &[Condition]) -> (u16, ConditionText, IconId) {
    match conditions.first() {
        Some(c) => (c.id, bounded(&c.main), bounded(&c.icon)),
        None => (0, ConditionText::new(), IconId::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "lat": 54.9981, "lon": -7.3093, "timezone": "Europe/London", "timezone_offset": 3600,
        "current": {
            "dt": 1700000000, "temp": 11.25, "feels_like": 10.1, "humidity": 81,
            "wind_speed": 4.63, "pressure": 1012,
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}]
        },
        "hourly": [
            {"dt": 1700000000, "temp": 11.2, "humidity": 80,
             "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}]},
            {"dt": 1700003600, "temp": 10.7, "humidity": 83,
             "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}]}
        ]
    }"#;

    #[test]
    fn maps_current_and_hourly_sections() {
        let snapshot = parse_onecall(SAMPLE).unwrap();
        assert_eq!(snapshot.observed_at.as_second(), 1_700_000_000);
        assert_eq!(snapshot.current.condition.as_str(), "Rain");
        assert_eq!(snapshot.current.icon_id.as_str(), "10d");
        assert_eq!(snapshot.current.humidity, 81.0);
        assert_eq!(snapshot.hourly.len(), 2);
        assert_eq!(snapshot.hourly[1].icon_id.as_str(), "04d");
        assert_eq!(snapshot.hourly[1].at.as_second(), 1_700_003_600);
        assert!(snapshot.daily.is_empty());
    }

    #[test]
    fn maps_daily_temperatures() {
        let body = r#"{
            "current": {"dt": 1700000000, "temp": 5.0, "feels_like": 3.0, "humidity": 70, "wind_speed": 1.0, "weather": []},
            "daily": [{"dt": 1700049600, "temp": {"day": 8.0, "min": 2.5, "max": 9.75},
                       "humidity": 66, "weather": [{"id": 800, "main": "Clear", "icon": "01d"}]}]
        }"#;
        let snapshot = parse_onecall(body).unwrap();
        assert_eq!(snapshot.daily[0].temp_max, 9.75);
        assert_eq!(snapshot.daily[0].temp_min, 2.5);
        assert_eq!(snapshot.daily[0].condition.as_str(), "Clear");
        assert_eq!(snapshot.current.icon_id.as_str(), "");
    }

    #[test]
    fn error_body_becomes_api_error() {
        let err = parse_onecall(r#"{"cod": 401, "message": "Invalid API key"}"#).unwrap_err();
        assert_eq!(
            err,
            FetchError::Api {
                code: "401".into(),
                message: "Invalid API key".into()
            }
        );
    }

    #[test]
    fn missing_current_is_rejected() {
        let err = parse_onecall(r#"{"hourly": []}"#).unwrap_err();
        assert!(matches!(err, FetchError::Api { .. }));
    }

    #[test]
    fn garbage_is_payload_error() {
        assert!(matches!(
            parse_onecall("<html>"),
            Err(FetchError::Payload(_))
        ));
    }
}
