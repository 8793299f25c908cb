//! Weather feed
//!
//! Open-Meteo daily forecast client behind the [`WeatherFeed`] trait.
//! The frost check only needs daily minimums; days with holes in the
//! series are dropped rather than invented.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

/// One forecast day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub temp_min: f64,
    pub temp_max: f64,
}

/// Daily forecast source
#[async_trait]
pub trait WeatherFeed: Send + Sync {
    /// Up to `days` daily forecasts starting today
    async fn forecast(&self, lat: f64, lon: f64, days: u8) -> anyhow::Result<Vec<DayForecast>>;
}

const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Open-Meteo client
pub struct OpenMeteoFeed {
    client: reqwest::Client,
}

impl OpenMeteoFeed {
    pub fn new(timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

#[async_trait]
impl WeatherFeed for OpenMeteoFeed {
    async fn forecast(&self, lat: f64, lon: f64, days: u8) -> anyhow::Result<Vec<DayForecast>> {
        let resp = self
            .client
            .get(OPEN_METEO_URL)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                (
                    "daily",
                    "temperature_2m_min,temperature_2m_max".to_string(),
                ),
                ("forecast_days", days.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("Weather feed returned {}", resp.status());
        }

        let body: ApiResponse = resp.json().await?;
        Ok(body.daily.into_rows())
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    daily: DailyBlock,
}

/// Open-Meteo returns the daily block as parallel arrays
#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<NaiveDate>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
}

impl DailyBlock {
    fn into_rows(self) -> Vec<DayForecast> {
        let mut rows = Vec::with_capacity(self.time.len());
        for (i, date) in self.time.iter().enumerate() {
            let (Some(temp_min), Some(temp_max)) = (
                self.temperature_2m_min.get(i).copied().flatten(),
                self.temperature_2m_max.get(i).copied().flatten(),
            ) else {
                continue;
            };
            rows.push(DayForecast {
                date: *date,
                temp_min,
                temp_max,
            });
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_daily_block() {
        let json = r#"{
            "daily": {
                "time": ["2025-11-01", "2025-11-02", "2025-11-03"],
                "temperature_2m_min": [3.2, -1.5, null],
                "temperature_2m_max": [10.1, 4.0, 5.5]
            }
        }"#;
        let resp: ApiResponse = serde_json::from_str(json).unwrap();
        let rows = resp.daily.into_rows();

        // The day with a null minimum is dropped
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        assert_eq!(rows[1].temp_min, -1.5);
    }

    #[test]
    fn test_decode_missing_series() {
        let json = r#"{"daily": {"time": ["2025-11-01"]}}"#;
        let resp: ApiResponse = serde_json::from_str(json).unwrap();
        assert!(resp.daily.into_rows().is_empty());
    }
}
