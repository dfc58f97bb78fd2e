// weather.rs — Current weather and topsoil readings for a lat/lon.
//
// One Open-Meteo call covers both: current conditions plus the hourly soil
// series (soil variables are not exposed in the current block, so the first
// hourly sample stands in). Best-effort like the other enrichment lookups.

use std::time::Duration;

use serde::Deserialize;

use crate::config;
use crate::providers::Availability;

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub precipitation_mm: f64,
    pub wind_speed_kmh: f64,
    pub soil_temperature_c: Option<f64>,
    pub soil_moisture: Option<f64>,
}

impl WeatherReport {
    /// One-line summary for the prompt's field-conditions block.
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Weather: {:.1} °C, {:.0}% humidity, {:.1} mm precipitation, wind {:.1} km/h",
            self.temperature_c, self.humidity_pct, self.precipitation_mm, self.wind_speed_kmh
        );
        if let (Some(t), Some(m)) = (self.soil_temperature_c, self.soil_moisture) {
            s.push_str(&format!(
                "\nTopsoil: {t:.1} °C, {m:.2} m³/m³ moisture"
            ));
        }
        s
    }
}

#[derive(Deserialize)]
struct WeatherPayload {
    current: CurrentBlock,
    #[serde(default)]
    hourly: Option<HourlyBlock>,
}

#[derive(Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    precipitation: f64,
    wind_speed_10m: f64,
}

#[derive(Deserialize, Default)]
struct HourlyBlock {
    #[serde(default)]
    soil_temperature_0cm: Vec<f64>,
    #[serde(default)]
    soil_moisture_0_to_1cm: Vec<f64>,
}

/// Fetch current conditions for the given coordinates.
pub fn fetch_weather(lat: f64, lon: f64) -> Availability<WeatherReport> {
    let resp = match ureq::get(config::enrichment::WEATHER_URL)
        .timeout(Duration::from_secs(config::enrichment::LOOKUP_TIMEOUT_SECS))
        .query("latitude", &lat.to_string())
        .query("longitude", &lon.to_string())
        .query(
            "current",
            "temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m",
        )
        .query("hourly", "soil_temperature_0cm,soil_moisture_0_to_1cm")
        .query("forecast_days", "1")
        .call()
    {
        Ok(r) => r,
        Err(e) => {
            log::warn!("weather lookup failed: {e}");
            return Availability::Unavailable;
        }
    };

    let body: serde_json::Value = match resp.into_json() {
        Ok(v) => v,
        Err(e) => {
            log::warn!("weather response was not JSON: {e}");
            return Availability::Unavailable;
        }
    };

    match parse_report(&body) {
        Some(report) => Availability::Available(report),
        None => {
            log::warn!("weather response unusable");
            Availability::Unavailable
        }
    }
}

fn parse_report(body: &serde_json::Value) -> Option<WeatherReport> {
    let payload: WeatherPayload = serde_json::from_value(body.clone()).ok()?;
    let hourly = payload.hourly.unwrap_or_default();

    Some(WeatherReport {
        temperature_c: payload.current.temperature_2m,
        humidity_pct: payload.current.relative_humidity_2m,
        precipitation_mm: payload.current.precipitation,
        wind_speed_kmh: payload.current.wind_speed_10m,
        soil_temperature_c: hourly.soil_temperature_0cm.first().copied(),
        soil_moisture: hourly.soil_moisture_0_to_1cm.first().copied(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_full() {
        let body = serde_json::json!({
            "current": {
                "temperature_2m": 24.3,
                "relative_humidity_2m": 61.0,
                "precipitation": 0.0,
                "wind_speed_10m": 7.2
            },
            "hourly": {
                "soil_temperature_0cm": [19.4, 19.9],
                "soil_moisture_0_to_1cm": [0.31, 0.30]
            }
        });
        let report = parse_report(&body).unwrap();
        assert!((report.temperature_c - 24.3).abs() < 1e-9);
        assert_eq!(report.soil_temperature_c, Some(19.4));
        assert_eq!(report.soil_moisture, Some(0.31));
        assert!(report.summary().contains("Topsoil"));
    }

    #[test]
    fn test_parse_report_without_soil_series() {
        let body = serde_json::json!({
            "current": {
                "temperature_2m": 12.0,
                "relative_humidity_2m": 80.0,
                "precipitation": 1.4,
                "wind_speed_10m": 20.0
            }
        });
        let report = parse_report(&body).unwrap();
        assert_eq!(report.soil_temperature_c, None);
        assert!(!report.summary().contains("Topsoil"));
    }

    #[test]
    fn test_parse_report_missing_current_block() {
        let body = serde_json::json!({ "hourly": {} });
        assert!(parse_report(&body).is_none());
    }
}
