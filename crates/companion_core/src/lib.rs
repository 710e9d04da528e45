//! Core logic for the Companion app: to-do list, notes, calendar with
//! reminders, trivia quiz, weather, and the customizable main menu.
//! This crate is the single source of truth for record and storage invariants.

pub mod config;
pub mod db;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod registry;
pub mod reminder;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use fetch::liveness::{FetchTicket, ScreenLiveness};
pub use fetch::trivia::{QuestionKind, QuizQuestion, TriviaClient};
pub use fetch::weather::{WeatherClient, WeatherReading};
pub use fetch::{FetchError, FetchResult, HttpResponse, HttpTransport, ReqwestTransport};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::appointment::Appointment;
pub use model::feature::FeatureId;
pub use model::note::Note;
pub use model::record::{Record, RecordId, ValidationError};
pub use model::task::TodoItem;
pub use model::timer::TimerState;
pub use registry::{FeatureRegistry, RegistryError, ScreenDescriptor};
pub use reminder::{QueuedReminderScheduler, ReminderCommand, ReminderRequest, ReminderScheduler};
pub use repo::{
    KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore, StorageKey,
};
pub use service::calendar_service::CalendarService;
pub use service::list_controller::{ControllerError, ControllerResult, ListController};
pub use service::menu_service::MenuService;
pub use service::note_service::NoteService;
pub use service::quiz_session::{AnswerOutcome, QuizPhase, QuizSession};
pub use service::timer_service::TimerService;
pub use service::todo_service::TodoService;
pub use service::weather_panel::WeatherPanel;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
