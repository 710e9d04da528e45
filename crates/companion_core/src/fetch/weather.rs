//! WeatherAPI current-conditions client.
//!
//! # Invariants
//! - A blank city or missing API key fails before any request is made.
//! - The API key only ever travels in the request URL; it is not logged.

use super::{endpoint_url, FetchError, FetchResult, HttpTransport};
use log::{info, warn};
use reqwest::Url;
use serde::Deserialize;

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.weatherapi.com";
/// Language of the condition text.
pub const WEATHER_LANG: &str = "de";

/// Current conditions for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub temperature_celsius: f64,
    pub condition_text: String,
}

impl WeatherReading {
    /// One decimal, e.g. `"7.0"`.
    pub fn temperature_display(&self) -> String {
        format!("{:.1}", self.temperature_celsius)
    }

    /// Condition text with every word capitalized.
    pub fn condition_display(&self) -> String {
        capitalize_words(&self.condition_text)
    }
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Weather API client over an injected transport.
pub struct WeatherClient<T: HttpTransport> {
    transport: T,
    base_url: String,
    api_key: Option<String>,
}

impl<T: HttpTransport> WeatherClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// `{base}/v1/current.json?key=<key>&q=<city>&lang=de`.
    pub fn current_url(&self, city: &str) -> FetchResult<Url> {
        let city = city.trim();
        if city.is_empty() {
            return Err(FetchError::InvalidInput("city must not be empty"));
        }
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;

        let mut url = endpoint_url(&self.base_url, "/v1/current.json")?;
        url.query_pairs_mut()
            .append_pair("key", api_key)
            .append_pair("q", city)
            .append_pair("lang", WEATHER_LANG);
        Ok(url)
    }

    pub async fn fetch_current(&self, city: &str) -> FetchResult<WeatherReading> {
        let url = self.current_url(city)?;
        let response = self.transport.get(url).await?;
        if !response.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&response.body)
                .ok()
                .map(|decoded| decoded.error.message);
            warn!(
                "event=weather_fetch module=fetch status=error http_status={}",
                response.status
            );
            return Err(FetchError::Status {
                code: response.status,
                message,
            });
        }

        let reading = decode_current(&response.body)?;
        info!("event=weather_fetch module=fetch status=ok");
        Ok(reading)
    }
}

/// Decodes a current-conditions response body.
pub fn decode_current(body: &str) -> FetchResult<WeatherReading> {
    let decoded: CurrentResponse =
        serde_json::from_str(body).map_err(|err| FetchError::Decode(err.to_string()))?;
    Ok(WeatherReading {
        temperature_celsius: decoded.current.temp_c,
        condition_text: decoded.current.condition.text.trim().to_string(),
    })
}

fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{decode_current, WeatherReading};

    #[test]
    fn decode_reads_temperature_and_condition() {
        let body = r#"{"location":{"name":"Wien"},"current":{"temp_c":7.0,"condition":{"text":"leichter Regen","code":1183}}}"#;
        let reading = decode_current(body).unwrap();
        assert_eq!(reading.temperature_celsius, 7.0);
        assert_eq!(reading.temperature_display(), "7.0");
        assert_eq!(reading.condition_display(), "Leichter Regen");
    }

    #[test]
    fn capitalizes_each_word_and_lowercases_the_rest() {
        let reading = WeatherReading {
            temperature_celsius: -3.25,
            condition_text: "teilweise BEWÖLKT".to_string(),
        };
        assert_eq!(reading.condition_display(), "Teilweise Bewölkt");
        assert_eq!(reading.temperature_display(), "-3.2");
    }
}
