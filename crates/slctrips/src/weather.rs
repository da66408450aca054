//! Current-conditions proxy for destination pages.

use crate::config::{ConfigError, WeatherConfig};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error(transparent)]
    NotConfigured(#[from] ConfigError),
    #[error("weather service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("weather service responded with {0}")]
    Status(u16),
}

pub trait WeatherProvider: Send + Sync {
    fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<Value, WeatherError>> + Send;
}

/// OpenWeather "current weather" client, imperial units.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    pub fn new(config: WeatherConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<Value, WeatherError> {
        let api_key = self.config.require_key()?;
        let url = format!("{}/weather", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("units", "imperial".to_string()),
                ("appid", api_key.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "weather lookup failed");
            return Err(WeatherError::Status(status.as_u16()));
        }

        Ok(response.json::<Value>().await?)
    }
}
