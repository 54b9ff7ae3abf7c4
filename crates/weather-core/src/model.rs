use crate::wmo;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format Open-Meteo uses for hourly slots.
pub const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

// ---------------------------------------------------------------------------
// Geocoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodingResponse {
    #[serde(default)]
    pub results: Option<Vec<Coordinates>>,
}

// ---------------------------------------------------------------------------
// Raw forecast payload
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub hourly: Option<HourlyForecast>,
}

/// The `hourly` block of a forecast response: one array per variable,
/// all indexed by `time`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlyForecast {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub dew_point_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub weather_code: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_direction_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_gusts_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation: Vec<Option<f64>>,
    #[serde(default)]
    pub rain: Vec<Option<f64>>,
    #[serde(default)]
    pub snowfall: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    pub pressure_msl: Vec<Option<f64>>,
    #[serde(default)]
    pub cloud_cover: Vec<Option<f64>>,
    #[serde(default)]
    pub uv_index: Vec<Option<f64>>,
    #[serde(default)]
    pub apparent_temperature: Vec<Option<f64>>,
    #[serde(default)]
    pub visibility: Vec<Option<f64>>,
}

/// Variables requested from the forecast endpoint, in `hourly=` order.
pub const HOURLY_VARIABLES: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "dew_point_2m",
    "weather_code",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
    "precipitation",
    "rain",
    "snowfall",
    "precipitation_probability",
    "pressure_msl",
    "cloud_cover",
    "uv_index",
    "apparent_temperature",
    "visibility",
];

fn at(values: &[Option<f64>], idx: usize) -> Option<f64> {
    values.get(idx).copied().flatten()
}

fn whole(values: &[Option<f64>], idx: usize) -> Option<i64> {
    at(values, idx).map(|v| v.round() as i64)
}

impl HourlyForecast {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Parse the slot timestamp at `idx`.
    pub fn slot_time(&self, idx: usize) -> Option<NaiveDateTime> {
        self.time
            .get(idx)
            .and_then(|t| NaiveDateTime::parse_from_str(t, API_TIME_FORMAT).ok())
    }

    /// Conditions at slot `idx`; `None` when `idx` is past the end of `time`.
    pub fn conditions(&self, idx: usize) -> Option<Conditions> {
        if idx >= self.time.len() {
            return None;
        }
        let weather_code = whole(&self.weather_code, idx);
        Some(Conditions {
            temperature_c: at(&self.temperature_2m, idx),
            relative_humidity_percent: whole(&self.relative_humidity_2m, idx),
            dew_point_c: at(&self.dew_point_2m, idx),
            weather_code,
            weather_description: weather_code.map(|c| wmo::describe(c).to_string()),
            wind_speed_kmh: at(&self.wind_speed_10m, idx),
            wind_direction_degrees: whole(&self.wind_direction_10m, idx),
            wind_gusts_kmh: at(&self.wind_gusts_10m, idx),
            precipitation_mm: at(&self.precipitation, idx),
            rain_mm: at(&self.rain, idx),
            snowfall_cm: at(&self.snowfall, idx),
            precipitation_probability_percent: whole(&self.precipitation_probability, idx),
            pressure_hpa: at(&self.pressure_msl, idx),
            cloud_cover_percent: whole(&self.cloud_cover, idx),
            uv_index: at(&self.uv_index, idx),
            apparent_temperature_c: at(&self.apparent_temperature, idx),
            visibility_m: at(&self.visibility, idx),
        })
    }

    /// Slot at `idx` as a reading with a normalised `YYYY-MM-DDTHH:MM:SS` timestamp.
    pub fn reading(&self, idx: usize) -> Option<HourlyReading> {
        let conditions = self.conditions(idx)?;
        let datetime = match self.slot_time(idx) {
            Some(t) => t.format("%Y-%m-%dT%H:%M:%S").to_string(),
            None => self.time[idx].clone(),
        };
        Some(HourlyReading {
            datetime,
            conditions,
        })
    }

    pub fn readings(&self) -> Vec<HourlyReading> {
        (0..self.len()).filter_map(|i| self.reading(i)).collect()
    }

    /// Index of the slot closest to `now`; slots with unparsable
    /// timestamps are ignored. Falls back to 0 when none parse.
    pub fn closest_index(&self, now: NaiveDateTime) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let best = (0..self.len())
            .filter_map(|i| {
                self.slot_time(i)
                    .map(|t| (i, (t - now).num_seconds().unsigned_abs()))
            })
            .min_by_key(|&(_, distance)| distance)
            .map(|(i, _)| i);
        Some(best.unwrap_or(0))
    }
}

// ---------------------------------------------------------------------------
// Typed views
// ---------------------------------------------------------------------------

/// Weather conditions for one hour. Field names carry their units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub temperature_c: Option<f64>,
    pub relative_humidity_percent: Option<i64>,
    pub dew_point_c: Option<f64>,
    pub weather_code: Option<i64>,
    pub weather_description: Option<String>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_direction_degrees: Option<i64>,
    pub wind_gusts_kmh: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub rain_mm: Option<f64>,
    pub snowfall_cm: Option<f64>,
    pub precipitation_probability_percent: Option<i64>,
    pub pressure_hpa: Option<f64>,
    pub cloud_cover_percent: Option<i64>,
    pub uv_index: Option<f64>,
    pub apparent_temperature_c: Option<f64>,
    pub visibility_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyReading {
    pub datetime: String,
    #[serde(flatten)]
    pub conditions: Conditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub time: String,
    #[serde(flatten)]
    pub conditions: Conditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRange {
    pub city: String,
    pub start_date: String,
    pub end_date: String,
    pub weather_data: Vec<HourlyReading>,
}
