use infodisplay_common::weather::parse_onecall;
use infodisplay_common::*;
use reqwest::blocking::{Client, Request};

/// OpenWeatherMap One Call 客户端
#[derive(Debug, Clone)]
pub struct OwmClient {
    client: Client,
    endpoint: String,
    api_key: String,
    units: String,
    lang: Option<String>,
}

impl OwmClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if config.api_key.is_empty() {
            warn!("No OpenWeatherMap API key configured, requests will be rejected");
        }

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            units: config.units.clone(),
            lang: config.lang.clone(),
        })
    }

    pub fn build_request(
        &self,
        location: Location,
        exclude: ExcludeSet,
    ) -> Result<Request, FetchError> {
        // 告警段从不显示
        let exclude = exclude | ForecastPart::Alerts;

        let mut query: Vec<(&str, String)> = vec![
            ("lat", location.lat.to_string()),
            ("lon", location.lon.to_string()),
            ("exclude", exclude_query(exclude)),
            ("units", self.units.clone()),
            ("appid", self.api_key.clone()),
        ];
        if let Some(lang) = &self.lang {
            query.push(("lang", lang.clone()));
        }

        self.client
            .get(&self.endpoint)
            .query(&query)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}

impl RemoteWeatherSource for OwmClient {
    fn fetch(
        &mut self,
        location: Location,
        exclude: ExcludeSet,
    ) -> Result<WeatherSnapshot, FetchError> {
        let request = self.build_request(location, exclude)?;
        debug!("Requesting weather from {}", self.endpoint);

        let response = self
            .client
            .execute(request)
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        parse_onecall(&body)
    }
}
