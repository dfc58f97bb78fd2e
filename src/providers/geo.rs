// geo.rs — IP-based geolocation for prompt enrichment.
//
// No input: the service resolves the caller's public IP. Any transport or
// decode failure reports Unavailable; the prompt then carries no location.

use std::time::Duration;

use serde::Deserialize;

use crate::config;
use crate::providers::Availability;

/// Where the user appears to be farming from.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Location {
    #[serde(default)]
    pub city: String,
    #[serde(rename = "regionName", default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

impl Location {
    /// Human-readable place name, skipping blank components.
    pub fn describe(&self) -> String {
        [&self.city, &self.region, &self.country]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Look up the caller's location from their public IP.
pub fn lookup_location() -> Availability<Location> {
    let resp = match ureq::get(config::enrichment::GEOLOCATION_URL)
        .timeout(Duration::from_secs(config::enrichment::LOOKUP_TIMEOUT_SECS))
        .call()
    {
        Ok(r) => r,
        Err(e) => {
            log::warn!("geolocation lookup failed: {e}");
            return Availability::Unavailable;
        }
    };

    let body: serde_json::Value = match resp.into_json() {
        Ok(v) => v,
        Err(e) => {
            log::warn!("geolocation response was not JSON: {e}");
            return Availability::Unavailable;
        }
    };

    match parse_location(&body) {
        Some(loc) => {
            log::info!("geolocation: {}", loc.describe());
            Availability::Available(loc)
        }
        None => {
            log::warn!("geolocation response unusable");
            Availability::Unavailable
        }
    }
}

/// The service reports errors in-band: status must be "success".
fn parse_location(body: &serde_json::Value) -> Option<Location> {
    if body.get("status").and_then(|s| s.as_str()) != Some("success") {
        return None;
    }
    serde_json::from_value(body.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location_success() {
        let body = serde_json::json!({
            "status": "success",
            "country": "India",
            "regionName": "Punjab",
            "city": "Ludhiana",
            "lat": 30.9,
            "lon": 75.85
        });
        let loc = parse_location(&body).unwrap();
        assert_eq!(loc.describe(), "Ludhiana, Punjab, India");
        assert!((loc.lat - 30.9).abs() < 1e-9);
    }

    #[test]
    fn test_parse_location_failure_status() {
        let body = serde_json::json!({ "status": "fail", "message": "private range" });
        assert!(parse_location(&body).is_none());
    }

    #[test]
    fn test_describe_skips_blank_components() {
        let loc = Location {
            city: String::new(),
            region: "Bavaria".into(),
            country: "Germany".into(),
            lat: 0.0,
            lon: 0.0,
        };
        assert_eq!(loc.describe(), "Bavaria, Germany");
    }
}
