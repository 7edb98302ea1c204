pub mod ws;

use crate::error::NexusError;
use crate::state::WeatherReport;
use reqwest::Client;
use serde::Deserialize;

const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: u8,
}

pub async fn fetch_current(client: &Client, city: &str) -> Result<WeatherReport, NexusError> {
    let (lat, lon) = coordinates(city);
    let url = format!(
        "{}?latitude={}&longitude={}&current_weather=true",
        OPEN_METEO_URL, lat, lon
    );
    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(NexusError::BadStatus("Open-Meteo", response.status()));
    }

    let body: ForecastResponse = response.json().await?;
    Ok(WeatherReport {
        city: city.to_string(),
        temperature_c: body.current_weather.temperature,
        conditions: describe_weathercode(body.current_weather.weathercode).to_string(),
    })
}

fn coordinates(city: &str) -> (f64, f64) {
    match city {
        "London" => (51.51, -0.13),
        "Tokyo" => (35.68, 139.69),
        // New York, also the fallback for untracked cities
        _ => (40.71, -74.01),
    }
}

// WMO weather interpretation codes, coarse buckets.
fn describe_weathercode(code: u8) -> &'static str {
    match code {
        0 => "Clear",
        1..=3 => "Partly cloudy",
        45 | 48 => "Fog",
        51..=57 => "Drizzle",
        61..=67 | 80..=82 => "Rain",
        71..=77 | 85 | 86 => "Snow",
        95..=99 => "Thunderstorm",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_response_parses() {
        let body: ForecastResponse = serde_json::from_str(
            r#"{"current_weather":{"temperature":21.4,"windspeed":11.2,"weathercode":61}}"#,
        )
        .unwrap();
        assert_eq!(body.current_weather.weathercode, 61);
        assert_eq!(describe_weathercode(body.current_weather.weathercode), "Rain");
    }

    #[test]
    fn weathercodes_cover_the_clear_bucket() {
        assert_eq!(describe_weathercode(0), "Clear");
        assert_eq!(describe_weathercode(2), "Partly cloudy");
        assert_eq!(describe_weathercode(200), "Unknown");
    }
}
