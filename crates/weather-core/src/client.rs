use crate::config::Config;
use crate::error::{Result, WeatherError};
use crate::model::{
    Coordinates, CurrentWeather, ForecastResponse, GeocodingResponse, HourlyForecast,
    WeatherRange, HOURLY_VARIABLES,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Which slice of the forecast to request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForecastWindow {
    /// The current GMT day.
    Today,
    /// Inclusive date range.
    Range { start: NaiveDate, end: NaiveDate },
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| WeatherError::InvalidDate(s.to_string()))
}

/// Client for the Open-Meteo geocoding and forecast APIs.
#[derive(Debug, Clone)]
pub struct WeatherService {
    client: reqwest::Client,
    config: Config,
}

impl WeatherService {
    pub fn new(config: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve a city name to coordinates using the first geocoding match.
    pub async fn geocode(&self, city: &str) -> Result<Coordinates> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::CityNotFound(city.to_string()));
        }

        let body: GeocodingResponse = self
            .get_json(
                "geocoding",
                &self.config.geocoding_url,
                &[
                    ("name", city.to_string()),
                    ("count", "1".to_string()),
                    ("language", "en".to_string()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        let coords = body
            .results
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| WeatherError::CityNotFound(city.to_string()))?;
        debug!(city, lat = coords.latitude, lon = coords.longitude, "geocoded");
        Ok(coords)
    }

    pub async fn fetch_hourly(
        &self,
        coords: Coordinates,
        window: ForecastWindow,
    ) -> Result<HourlyForecast> {
        let mut query = vec![
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("hourly", HOURLY_VARIABLES.join(",")),
            ("timezone", "GMT".to_string()),
        ];
        match window {
            ForecastWindow::Today => query.push(("forecast_days", "1".to_string())),
            ForecastWindow::Range { start, end } => {
                query.push(("start_date", start.format("%Y-%m-%d").to_string()));
                query.push(("end_date", end.format("%Y-%m-%d").to_string()));
            }
        }

        let body: ForecastResponse = self
            .get_json("forecast", &self.config.forecast_url, &query)
            .await?;
        body.hourly
            .ok_or_else(|| WeatherError::InvalidResponse("missing hourly data".to_string()))
    }

    /// Conditions at the hourly slot nearest to `now`.
    pub async fn current_weather(&self, city: &str, now: DateTime<Utc>) -> Result<CurrentWeather> {
        let coords = self.geocode(city).await?;
        let hourly = self.fetch_hourly(coords, ForecastWindow::Today).await?;

        let idx = hourly
            .closest_index(now.naive_utc())
            .ok_or_else(|| WeatherError::InvalidResponse("no hourly slots returned".to_string()))?;
        let conditions = hourly
            .conditions(idx)
            .ok_or_else(|| WeatherError::InvalidResponse("no hourly slots returned".to_string()))?;

        Ok(CurrentWeather {
            city: city.trim().to_string(),
            latitude: coords.latitude,
            longitude: coords.longitude,
            time: hourly.time[idx].clone(),
            conditions,
        })
    }

    /// Every hourly reading between `start_date` and `end_date` inclusive.
    pub async fn weather_range(
        &self,
        city: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<WeatherRange> {
        let start = parse_date(start_date)?;
        let end = parse_date(end_date)?;
        if start > end {
            return Err(WeatherError::InvalidDateRange {
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }

        let coords = self.geocode(city).await?;
        let hourly = self
            .fetch_hourly(coords, ForecastWindow::Range { start, end })
            .await?;

        Ok(WeatherRange {
            city: city.trim().to_string(),
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
            weather_data: hourly.readings(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let resp = self.client.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(service, status = status.as_u16(), "upstream request failed");
            return Err(WeatherError::Upstream {
                service,
                status: status.as_u16(),
            });
        }
        let text = resp.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| WeatherError::InvalidResponse(format!("{service}: {e}")))
    }
}
