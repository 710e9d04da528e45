//! Weather screen state.
//!
//! A failed fetch never clears what is shown: the last good reading stays and
//! the error is kept for the UI to surface.

use crate::fetch::liveness::{FetchTicket, ScreenLiveness};
use crate::fetch::weather::WeatherReading;
use crate::fetch::{FetchError, FetchResult};
use log::{info, warn};

/// Shown before the first successful fetch.
pub const PLACEHOLDER: &str = "--";

#[derive(Debug, Clone, Default)]
pub struct WeatherPanel {
    city: String,
    reading: Option<WeatherReading>,
    is_loading: bool,
    last_error: Option<FetchError>,
    liveness: ScreenLiveness,
}

impl WeatherPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    /// Starts a fetch for the current city and returns the trimmed city the
    /// request should use. A blank city is rejected and recorded.
    pub fn begin_fetch(&mut self) -> FetchResult<(FetchTicket, String)> {
        let city = self.city.trim();
        if city.is_empty() {
            let err = FetchError::InvalidInput("city must not be empty");
            self.last_error = Some(err.clone());
            return Err(err);
        }
        let city = city.to_string();
        self.is_loading = true;
        Ok((self.liveness.begin(), city))
    }

    /// Applies a finished fetch. Returns `false` when the result was stale.
    pub fn finish_fetch(&mut self, ticket: FetchTicket, result: FetchResult<WeatherReading>) -> bool {
        if !self.liveness.accepts(ticket) {
            info!("event=weather_apply module=service status=discarded");
            return false;
        }

        self.is_loading = false;
        match result {
            Ok(reading) => {
                self.reading = Some(reading);
                self.last_error = None;
            }
            Err(err) => {
                warn!("event=weather_apply module=service status=error error={err}");
                self.last_error = Some(err);
            }
        }
        true
    }

    pub fn reading(&self) -> Option<&WeatherReading> {
        self.reading.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn temperature_display(&self) -> String {
        self.reading
            .as_ref()
            .map_or_else(|| PLACEHOLDER.to_string(), WeatherReading::temperature_display)
    }

    pub fn condition_display(&self) -> String {
        self.reading
            .as_ref()
            .map_or_else(|| PLACEHOLDER.to_string(), WeatherReading::condition_display)
    }

    /// Resets the screen for a new visit. Fetches started before stay stale.
    pub fn reopen(&mut self) {
        let mut liveness = std::mem::take(&mut self.liveness);
        liveness.reopen();
        *self = Self {
            liveness,
            ..Self::default()
        };
    }

    pub fn dismiss(&mut self) {
        self.liveness.dismiss();
    }
}

#[cfg(test)]
mod tests {
    use super::WeatherPanel;
    use crate::fetch::weather::WeatherReading;
    use crate::fetch::FetchError;

    fn reading(temp: f64) -> WeatherReading {
        WeatherReading {
            temperature_celsius: temp,
            condition_text: "sonnig".to_string(),
        }
    }

    #[test]
    fn placeholder_until_first_success() {
        let mut panel = WeatherPanel::new();
        assert_eq!(panel.temperature_display(), "--");
        assert_eq!(panel.condition_display(), "--");

        panel.set_city("  Berlin ");
        let (ticket, city) = panel.begin_fetch().unwrap();
        assert_eq!(city, "Berlin");
        assert!(panel.is_loading());
        assert!(panel.finish_fetch(ticket, Ok(reading(21.46))));
        assert_eq!(panel.temperature_display(), "21.5");
        assert_eq!(panel.condition_display(), "Sonnig");
    }

    #[test]
    fn blank_city_is_rejected_before_fetch() {
        let mut panel = WeatherPanel::new();
        panel.set_city("   ");
        assert!(matches!(
            panel.begin_fetch(),
            Err(FetchError::InvalidInput(_))
        ));
        assert!(!panel.is_loading());
        assert!(panel.last_error().is_some());
    }

    #[test]
    fn stale_result_does_not_replace_newer_one() {
        let mut panel = WeatherPanel::new();
        panel.set_city("Graz");
        let (old, _) = panel.begin_fetch().unwrap();
        let (new, _) = panel.begin_fetch().unwrap();
        assert!(panel.finish_fetch(new, Ok(reading(5.0))));
        assert!(!panel.finish_fetch(old, Ok(reading(30.0))));
        assert_eq!(panel.temperature_display(), "5.0");
    }

    #[test]
    fn fetch_from_a_dismissed_visit_is_ignored_after_reopen() {
        let mut panel = WeatherPanel::new();
        panel.set_city("Berlin");
        let (berlin, _) = panel.begin_fetch().unwrap();
        panel.dismiss();

        panel.reopen();
        assert_eq!(panel.city(), "");
        panel.set_city("Graz");
        let (graz, _) = panel.begin_fetch().unwrap();
        assert!(panel.finish_fetch(graz, Ok(reading(5.0))));
        assert!(!panel.finish_fetch(berlin, Ok(reading(30.0))));
        assert_eq!(panel.city(), "Graz");
        assert_eq!(panel.temperature_display(), "5.0");
    }
}
