use crate::model::{CurrentWeather, WeatherRange};
use serde::Serialize;
use std::collections::HashMap;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 16-point compass direction for a bearing in degrees.
pub fn compass(degrees: i64) -> &'static str {
    let normalized = degrees.rem_euclid(360) as f64;
    let idx = ((normalized / 22.5).round() as usize) % COMPASS_POINTS.len();
    COMPASS_POINTS[idx]
}

pub fn uv_risk(index: f64) -> &'static str {
    match index {
        i if i < 3.0 => "Low",
        i if i < 6.0 => "Moderate",
        i if i < 8.0 => "High",
        i if i < 11.0 => "Very High",
        _ => "Extreme",
    }
}

/// Multi-line, human-readable rendering of current conditions.
pub fn current_weather_text(w: &CurrentWeather) -> String {
    let c = &w.conditions;
    let mut lines = Vec::new();

    let description = c.weather_description.as_deref().unwrap_or("Unknown conditions");
    lines.push(format!("Current weather in {} ({}):", w.city, w.time));
    lines.push(format!("Conditions: {description}"));

    match (c.temperature_c, c.apparent_temperature_c) {
        (Some(t), Some(feels)) => {
            lines.push(format!("Temperature: {t:.1}°C (feels like {feels:.1}°C)"))
        }
        (Some(t), None) => lines.push(format!("Temperature: {t:.1}°C")),
        _ => {}
    }
    if let Some(h) = c.relative_humidity_percent {
        lines.push(format!("Humidity: {h}%"));
    }
    if let Some(d) = c.dew_point_c {
        lines.push(format!("Dew point: {d:.1}°C"));
    }
    if let Some(speed) = c.wind_speed_kmh {
        let mut wind = format!("Wind: {speed:.1} km/h");
        if let Some(dir) = c.wind_direction_degrees {
            wind.push_str(&format!(" from {} ({dir}°)", compass(dir)));
        }
        if let Some(gusts) = c.wind_gusts_kmh {
            wind.push_str(&format!(", gusts up to {gusts:.1} km/h"));
        }
        lines.push(wind);
    }
    if let Some(p) = c.precipitation_mm {
        let mut precip = format!("Precipitation: {p:.1} mm");
        if let Some(prob) = c.precipitation_probability_percent {
            precip.push_str(&format!(" ({prob}% chance)"));
        }
        lines.push(precip);
    }
    if let Some(snow) = c.snowfall_cm.filter(|s| *s > 0.0) {
        lines.push(format!("Snowfall: {snow:.1} cm"));
    }
    if let Some(p) = c.pressure_hpa {
        lines.push(format!("Pressure: {p:.1} hPa"));
    }
    if let Some(cc) = c.cloud_cover_percent {
        lines.push(format!("Cloud cover: {cc}%"));
    }
    if let Some(uv) = c.uv_index {
        lines.push(format!("UV index: {uv:.1} ({})", uv_risk(uv)));
    }
    if let Some(v) = c.visibility_m {
        lines.push(format!("Visibility: {:.1} km", v / 1000.0));
    }

    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSummary {
    pub hours: usize,
    pub min_temperature_c: Option<f64>,
    pub max_temperature_c: Option<f64>,
    pub avg_temperature_c: Option<f64>,
    pub total_precipitation_mm: f64,
    pub dominant_condition: Option<String>,
}

pub fn range_summary(range: &WeatherRange) -> RangeSummary {
    let temps: Vec<f64> = range
        .weather_data
        .iter()
        .filter_map(|r| r.conditions.temperature_c)
        .collect();

    let min = temps.iter().copied().reduce(f64::min);
    let max = temps.iter().copied().reduce(f64::max);
    let avg = if temps.is_empty() {
        None
    } else {
        let mean = temps.iter().sum::<f64>() / temps.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    let total_precipitation_mm = range
        .weather_data
        .iter()
        .filter_map(|r| r.conditions.precipitation_mm)
        .sum::<f64>();

    // Ties resolve to the condition seen first.
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (pos, r) in range.weather_data.iter().enumerate() {
        if let Some(d) = r.conditions.weather_description.as_deref() {
            counts.entry(d).or_insert((0, pos)).0 += 1;
        }
    }
    let dominant_condition = counts
        .into_iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
        .map(|(d, _)| d.to_string());

    RangeSummary {
        hours: range.weather_data.len(),
        min_temperature_c: min,
        max_temperature_c: max,
        avg_temperature_c: avg,
        total_precipitation_mm: (total_precipitation_mm * 10.0).round() / 10.0,
        dominant_condition,
    }
}
