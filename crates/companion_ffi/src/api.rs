//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Translate core errors into plain response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - List calls open the configured database per call; no connection is
//!   cached between calls.
//! - Quiz and weather screen state lives in process-wide slots; a fetch
//!   result is applied only if its screen is still current.

use chrono::{DateTime, TimeZone, Utc};
use companion_core::db::open_db;
use companion_core::fetch::trivia::DEFAULT_QUESTION_AMOUNT;
use companion_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppConfig, Appointment, CalendarService, FeatureRegistry, MenuService, Note, NoteService, QuestionKind,
    QueuedReminderScheduler, QuizPhase, QuizSession, RecordId, ReminderCommand,
    ReqwestTransport, SqliteKeyValueStore, TimerService, TimerState, TodoItem, TodoService,
    TriviaClient, WeatherClient, WeatherPanel,
};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

static CONFIG: OnceLock<AppConfig> = OnceLock::new();
static REGISTRY: OnceLock<Result<FeatureRegistry, String>> = OnceLock::new();
static REMINDERS: OnceLock<Mutex<QueuedReminderScheduler>> = OnceLock::new();
static QUIZ: OnceLock<Mutex<QuizSession>> = OnceLock::new();
static WEATHER: OnceLock<Mutex<WeatherPanel>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive); an
///   empty string uses the configured level.
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = if level.trim().is_empty() {
        config().log_level.clone()
    } else {
        level
    };
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected record ID, when there is one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<RecordId>) -> Self {
        Self {
            ok: true,
            id: id.map(|id| id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItemView {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListResponse {
    pub ok: bool,
    /// Empty on a clean load; describes a load problem otherwise.
    pub message: String,
    pub items: Vec<TodoItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    pub id: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListResponse {
    pub ok: bool,
    pub message: String,
    pub items: Vec<NoteView>,
}

/// One calendar row in display (date) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentView {
    pub id: String,
    pub title: String,
    pub date_epoch_ms: i64,
    pub notify: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarListResponse {
    pub ok: bool,
    pub message: String,
    pub items: Vec<AppointmentView>,
}

/// Command for the platform notification center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderCommandView {
    /// `schedule` or `cancel`.
    pub kind: String,
    /// Notification identifier (appointment ID).
    pub id: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub fire_at_epoch_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuResponse {
    pub ok: bool,
    pub message: String,
    /// Feature labels in menu order.
    pub labels: Vec<String>,
}

/// Screen to open for one menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureScreenResponse {
    pub ok: bool,
    pub message: String,
    /// `todo`, `notes`, `calendar`, `quiz` or `weather`.
    pub feature: String,
    pub title: String,
    /// Storage keys the screen reads; empty for fetched screens.
    pub storage_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimerResponse {
    pub ok: bool,
    pub message: String,
    pub remaining_secs: f64,
    pub is_running: bool,
    /// `MM:SS`.
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestionView {
    pub prompt: String,
    pub options: Vec<String>,
}

/// Quiz screen snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResponse {
    /// `loading`, `ready` or `empty`.
    pub phase: String,
    pub message: String,
    pub question_count: u32,
    pub current_index: u32,
    pub current: Option<QuizQuestionView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResponse {
    pub ok: bool,
    pub correct: bool,
    pub correct_answer: String,
    pub message: String,
}

/// Weather screen snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherResponse {
    pub ok: bool,
    pub message: String,
    pub city: String,
    /// One decimal, or `--` before the first successful fetch.
    pub temperature: String,
    pub condition: String,
    pub is_loading: bool,
}

/// Lists to-do items in stored order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn todo_list() -> TodoListResponse {
    match with_store(|store| {
        let todo = TodoService::open(store);
        let items = todo.items().iter().map(to_todo_view).collect::<Vec<_>>();
        (issue_message(todo.load_issue()), items)
    }) {
        Ok((message, items)) => TodoListResponse {
            ok: true,
            message,
            items,
        },
        Err(message) => TodoListResponse {
            ok: false,
            message,
            items: Vec::new(),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_add(title: String) -> ActionResponse {
    respond("todo_add", |store| {
        let id = TodoService::open(store).add_task(&title)?;
        Ok(ActionResponse::success("Task added.", Some(id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_toggle(id: String) -> ActionResponse {
    respond("todo_toggle", |store| {
        let id = parse_id(&id)?;
        Ok(if TodoService::open(store).toggle(id)? {
            ActionResponse::success("Task updated.", Some(id))
        } else {
            ActionResponse::failure("Task not found.")
        })
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn todo_remove(position: u32) -> ActionResponse {
    respond("todo_remove", |store| {
        Ok(removed(
            TodoService::open(store).remove(position as usize)?.map(|item| item.id),
        ))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn notes_list() -> NoteListResponse {
    match with_store(|store| {
        let notes = NoteService::open(store);
        let items = notes.items().iter().map(to_note_view).collect::<Vec<_>>();
        (issue_message(notes.load_issue()), items)
    }) {
        Ok((message, items)) => NoteListResponse {
            ok: true,
            message,
            items,
        },
        Err(message) => NoteListResponse {
            ok: false,
            message,
            items: Vec::new(),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn notes_add(title: String, content: String) -> ActionResponse {
    respond("notes_add", |store| {
        let id = NoteService::open(store).add_note(&title, &content)?;
        Ok(ActionResponse::success("Note added.", Some(id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn notes_remove(position: u32) -> ActionResponse {
    respond("notes_remove", |store| {
        Ok(removed(
            NoteService::open(store).remove(position as usize)?.map(|note| note.id),
        ))
    })
}

/// Calendar screen activation: asks for notification permission once and
/// returns the date-sorted list.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_open() -> CalendarListResponse {
    calendar_listing(true)
}

/// Lists appointments sorted by date; positions in this list are what
/// `calendar_remove` expects.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_list() -> CalendarListResponse {
    calendar_listing(false)
}

fn calendar_listing(ask_permission: bool) -> CalendarListResponse {
    let result = with_store(|store| {
        let mut reminders = lock(reminders());
        let calendar = if ask_permission {
            CalendarService::open(store, &mut *reminders)
        } else {
            CalendarService::attach(store, &mut *reminders)
        };
        let items = calendar
            .display()
            .into_iter()
            .map(|row| to_appointment_view(row.appointment))
            .collect::<Vec<_>>();
        (issue_message(calendar.load_issue()), items)
    });
    match result {
        Ok((message, items)) => CalendarListResponse {
            ok: true,
            message,
            items,
        },
        Err(message) => CalendarListResponse {
            ok: false,
            message,
            items: Vec::new(),
        },
    }
}

/// Adds an appointment; with `notify`, a reminder command is queued for
/// `reminder_drain`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_add(title: String, date_epoch_ms: i64, notify: bool) -> ActionResponse {
    respond("calendar_add", |store| {
        let date = from_epoch_ms(date_epoch_ms)?;
        let mut reminders = lock(reminders());
        let added = CalendarService::attach(store, &mut *reminders)
            .add_appointment(&title, date, notify)?;
        Ok(ActionResponse::success(
            format!("Appointment added (reminder: {:?}).", added.reminder),
            Some(added.id),
        ))
    })
}

/// Removes the appointment at `display_position` of `calendar_list`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_remove(display_position: u32) -> ActionResponse {
    respond("calendar_remove", |store| {
        let mut reminders = lock(reminders());
        let removed_row = CalendarService::attach(store, &mut *reminders)
            .remove_displayed(display_position as usize)?;
        Ok(removed(removed_row.map(|row| row.appointment.id)))
    })
}

/// Records the platform's notification permission answer.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_set_permission(granted: bool) {
    lock(reminders()).set_permission(granted);
}

/// Takes queued reminder commands in submission order.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_drain() -> Vec<ReminderCommandView> {
    lock(reminders())
        .drain()
        .into_iter()
        .map(to_reminder_view)
        .collect()
}

#[flutter_rust_bridge::frb(sync)]
pub fn menu_order() -> MenuResponse {
    match with_store(|store| {
        let menu = MenuService::open(store);
        (issue_message(menu.load_issue()), to_labels(menu.labels()))
    }) {
        Ok((message, labels)) => MenuResponse {
            ok: true,
            message,
            labels,
        },
        Err(message) => MenuResponse {
            ok: false,
            message,
            labels: Vec::new(),
        },
    }
}

/// Moves the entries at `sources` before the entry at `destination`
/// (`destination == len` appends) and persists the new order.
#[flutter_rust_bridge::frb(sync)]
pub fn menu_reorder(sources: Vec<u32>, destination: u32) -> MenuResponse {
    let sources = sources.into_iter().map(|s| s as usize).collect::<Vec<_>>();
    let result = with_store(|store| {
        let mut menu = MenuService::open(store);
        let moved = menu.reorder(&sources, destination as usize);
        (moved, to_labels(menu.labels()))
    });
    match result {
        Ok((Ok(moved), labels)) => MenuResponse {
            ok: moved,
            message: if moved {
                String::new()
            } else {
                "Invalid move.".to_string()
            },
            labels,
        },
        Ok((Err(err), labels)) => MenuResponse {
            ok: false,
            message: format!("menu_reorder failed: {err}"),
            labels,
        },
        Err(message) => MenuResponse {
            ok: false,
            message,
            labels: Vec::new(),
        },
    }
}

/// Resolves a menu label to the screen the host should push.
#[flutter_rust_bridge::frb(sync)]
pub fn feature_screen(label: String) -> FeatureScreenResponse {
    let descriptor = registry().and_then(|registry| {
        registry
            .build_for_label(label.trim())
            .map_err(|err| err.to_string())
    });
    match descriptor {
        Ok(descriptor) => FeatureScreenResponse {
            ok: true,
            message: String::new(),
            feature: format!("{:?}", descriptor.feature).to_ascii_lowercase(),
            title: descriptor.title.to_string(),
            storage_keys: descriptor
                .storage_keys
                .iter()
                .map(|key| key.as_str().to_string())
                .collect(),
        },
        Err(message) => FeatureScreenResponse {
            ok: false,
            message,
            feature: String::new(),
            title: String::new(),
            storage_keys: Vec::new(),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn timer_state() -> TimerResponse {
    timer_call("timer_state", |_| Ok(()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn timer_start() -> TimerResponse {
    timer_call("timer_start", |timer| timer.start())
}

#[flutter_rust_bridge::frb(sync)]
pub fn timer_stop() -> TimerResponse {
    timer_call("timer_stop", |timer| timer.stop())
}

#[flutter_rust_bridge::frb(sync)]
pub fn timer_set_remaining(secs: f64) -> TimerResponse {
    timer_call("timer_set_remaining", |timer| timer.set_remaining(secs))
}

/// One-second step; the host calls this every second while running.
#[flutter_rust_bridge::frb(sync)]
pub fn timer_tick() -> TimerResponse {
    timer_call("timer_tick", |timer| timer.tick())
}

/// Resets the quiz screen. Call when the screen appears.
#[flutter_rust_bridge::frb(sync)]
pub fn quiz_open() -> QuizResponse {
    let mut quiz = lock(quiz());
    quiz.reopen();
    to_quiz_response(&quiz)
}

/// Fetches a fresh question set and applies it if the screen is still current.
pub async fn quiz_load() -> QuizResponse {
    let ticket = lock(quiz()).begin_load();

    let config = config();
    let result = match ReqwestTransport::new(config.http_timeout) {
        Ok(transport) => {
            TriviaClient::new(transport, config.trivia_base_url.clone())
                .fetch_questions(DEFAULT_QUESTION_AMOUNT, QuestionKind::Multiple)
                .await
        }
        Err(err) => Err(err),
    };

    let mut quiz = lock(quiz());
    quiz.finish_load(ticket, result);
    to_quiz_response(&quiz)
}

#[flutter_rust_bridge::frb(sync)]
pub fn quiz_answer(option: String) -> AnswerResponse {
    match lock(quiz()).answer(&option) {
        Some(outcome) => AnswerResponse {
            ok: true,
            correct: outcome.correct,
            message: if outcome.correct {
                "Richtig!".to_string()
            } else {
                format!("Falsch! Richtige Antwort: {}", outcome.correct_answer)
            },
            correct_answer: outcome.correct_answer,
        },
        None => AnswerResponse {
            ok: false,
            correct: false,
            correct_answer: String::new(),
            message: "No question loaded.".to_string(),
        },
    }
}

/// Next question; wraps to the first after the last.
#[flutter_rust_bridge::frb(sync)]
pub fn quiz_next() -> QuizResponse {
    let mut quiz = lock(quiz());
    quiz.advance();
    to_quiz_response(&quiz)
}

#[flutter_rust_bridge::frb(sync)]
pub fn quiz_dismiss() {
    lock(quiz()).dismiss();
}

/// Resets the weather screen. Call when the screen appears.
#[flutter_rust_bridge::frb(sync)]
pub fn weather_open() -> WeatherResponse {
    let mut panel = lock(weather());
    panel.reopen();
    to_weather_response(&panel)
}

/// Fetches current conditions for `city`. A failure keeps the last reading.
pub async fn weather_fetch(city: String) -> WeatherResponse {
    let started = {
        let mut panel = lock(weather());
        panel.set_city(city);
        panel.begin_fetch()
    };
    let Ok((ticket, city)) = started else {
        return to_weather_response(&lock(weather()));
    };

    let config = config();
    let result = match ReqwestTransport::new(config.http_timeout) {
        Ok(transport) => {
            WeatherClient::new(
                transport,
                config.weather_base_url.clone(),
                config.weather_api_key.clone(),
            )
            .fetch_current(&city)
            .await
        }
        Err(err) => Err(err),
    };

    let mut panel = lock(weather());
    panel.finish_fetch(ticket, result);
    to_weather_response(&panel)
}

#[flutter_rust_bridge::frb(sync)]
pub fn weather_dismiss() {
    lock(weather()).dismiss();
}

fn config() -> &'static AppConfig {
    CONFIG.get_or_init(|| match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::warn!("event=config_load module=ffi status=fallback error={err}");
            AppConfig::default()
        }
    })
}

fn registry() -> Result<&'static FeatureRegistry, String> {
    REGISTRY
        .get_or_init(|| FeatureRegistry::with_builtin().map_err(|err| err.to_string()))
        .as_ref()
        .map_err(Clone::clone)
}

fn reminders() -> &'static Mutex<QueuedReminderScheduler> {
    REMINDERS.get_or_init(|| Mutex::new(QueuedReminderScheduler::default()))
}

fn quiz() -> &'static Mutex<QuizSession> {
    QUIZ.get_or_init(|| Mutex::new(QuizSession::new()))
}

fn weather() -> &'static Mutex<WeatherPanel> {
    WEATHER.get_or_init(|| Mutex::new(WeatherPanel::new()))
}

fn lock<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_store<R>(f: impl FnOnce(SqliteKeyValueStore<'_>) -> R) -> Result<R, String> {
    let conn = open_db(&config().db_path).map_err(|err| format!("DB open failed: {err}"))?;
    let store =
        SqliteKeyValueStore::try_new(&conn).map_err(|err| format!("store init failed: {err}"))?;
    Ok(f(store))
}

fn respond(
    op: &'static str,
    f: impl FnOnce(SqliteKeyValueStore<'_>) -> Result<ActionResponse, Box<dyn std::error::Error>>,
) -> ActionResponse {
    match with_store(f) {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => {
            log::warn!("event={op} module=ffi status=error error={err}");
            ActionResponse::failure(format!("{op} failed: {err}"))
        }
        Err(message) => ActionResponse::failure(message),
    }
}

fn timer_call(
    op: &'static str,
    f: impl FnOnce(&mut TimerService<SqliteKeyValueStore<'_>>) -> companion_core::RepoResult<()>,
) -> TimerResponse {
    let result = with_store(|store| {
        let mut timer = TimerService::open(store);
        let outcome = f(&mut timer);
        let message = match (&outcome, timer.load_issue()) {
            (Err(err), _) => format!("{op} failed: {err}"),
            (Ok(()), issue) => issue_message(issue),
        };
        (outcome.is_ok(), message, timer.state())
    });
    match result {
        Ok((ok, message, state)) => to_timer_response(ok, message, state),
        Err(message) => to_timer_response(false, message, TimerState::default()),
    }
}

fn removed(id: Option<RecordId>) -> ActionResponse {
    match id {
        Some(id) => ActionResponse::success("Removed.", Some(id)),
        None => ActionResponse::failure("Position out of range."),
    }
}

fn parse_id(raw: &str) -> Result<RecordId, Box<dyn std::error::Error>> {
    Ok(RecordId::parse_str(raw.trim())?)
}

fn from_epoch_ms(epoch_ms: i64) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    Utc.timestamp_millis_opt(epoch_ms)
        .single()
        .ok_or_else(|| format!("date out of range: {epoch_ms}").into())
}

fn issue_message(issue: Option<&companion_core::RepoError>) -> String {
    issue.map_or_else(String::new, |err| format!("stored data unreadable: {err}"))
}

fn to_labels(labels: Vec<&'static str>) -> Vec<String> {
    labels.into_iter().map(str::to_string).collect()
}

fn to_todo_view(item: &TodoItem) -> TodoItemView {
    TodoItemView {
        id: item.id.to_string(),
        title: item.title.clone(),
        is_completed: item.is_completed,
    }
}

fn to_note_view(note: &Note) -> NoteView {
    NoteView {
        id: note.id.to_string(),
        title: note.title.clone(),
        content: note.content.clone(),
    }
}

fn to_appointment_view(appointment: &Appointment) -> AppointmentView {
    AppointmentView {
        id: appointment.id.to_string(),
        title: appointment.title.clone(),
        date_epoch_ms: appointment.date.timestamp_millis(),
        notify: appointment.notify,
    }
}

fn to_reminder_view(command: ReminderCommand) -> ReminderCommandView {
    match command {
        ReminderCommand::Schedule(request) => ReminderCommandView {
            kind: "schedule".to_string(),
            id: request.id.to_string(),
            title: Some(request.title),
            body: Some(request.body),
            fire_at_epoch_ms: Some(request.fire_at.timestamp_millis()),
        },
        ReminderCommand::Cancel(id) => ReminderCommandView {
            kind: "cancel".to_string(),
            id: id.to_string(),
            title: None,
            body: None,
            fire_at_epoch_ms: None,
        },
    }
}

fn to_timer_response(ok: bool, message: String, state: TimerState) -> TimerResponse {
    TimerResponse {
        ok,
        message,
        remaining_secs: state.remaining_secs,
        is_running: state.is_running,
        display: state.display(),
    }
}

fn to_quiz_response(quiz: &QuizSession) -> QuizResponse {
    QuizResponse {
        phase: match quiz.phase() {
            QuizPhase::Loading => "loading",
            QuizPhase::Ready => "ready",
            QuizPhase::Empty => "empty",
        }
        .to_string(),
        message: quiz
            .last_error()
            .map_or_else(String::new, |err| err.to_string()),
        question_count: quiz.questions().len() as u32,
        current_index: quiz.current_index() as u32,
        current: quiz.current_question().map(|question| QuizQuestionView {
            prompt: question.prompt.clone(),
            options: question.options.clone(),
        }),
    }
}

fn to_weather_response(panel: &WeatherPanel) -> WeatherResponse {
    WeatherResponse {
        ok: panel.last_error().is_none(),
        message: panel
            .last_error()
            .map_or_else(String::new, |err| err.to_string()),
        city: panel.city().to_string(),
        temperature: panel.temperature_display(),
        condition: panel.condition_display(),
        is_loading: panel.is_loading(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        calendar_add, calendar_list, calendar_open, calendar_remove, core_version, feature_screen,
        init_logging, menu_order, notes_add, notes_list, ping, quiz_answer, quiz_open, reminder_drain, timer_set_remaining,
        timer_state, todo_add, todo_list, todo_remove, todo_toggle, weather_open,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_relative_log_dir() {
        let error = init_logging("info".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/companion-logs".to_string());
        assert!(error.contains("verbose"));
    }

    #[test]
    fn todo_add_toggle_and_remove_round_trip() {
        let title = unique_token("todo");
        let added = todo_add(title.clone());
        assert!(added.ok, "{}", added.message);
        let id = added.id.expect("todo add should return id");

        let toggled = todo_toggle(id.clone());
        assert!(toggled.ok, "{}", toggled.message);

        let listed = todo_list();
        let position = listed
            .items
            .iter()
            .position(|item| item.id == id)
            .expect("added task should be listed");
        assert!(listed.items[position].is_completed);

        let removed = todo_remove(position as u32);
        assert!(removed.ok, "{}", removed.message);
        assert!(todo_list().items.iter().all(|item| item.title != title));
    }

    #[test]
    fn todo_rejects_blank_title_and_bad_id() {
        assert!(!todo_add("   ".to_string()).ok);
        let response = todo_toggle("not-a-uuid".to_string());
        assert!(!response.ok);
    }

    #[test]
    fn notes_add_is_listed() {
        let title = unique_token("note");
        let added = notes_add(title.clone(), "body".to_string());
        assert!(added.ok, "{}", added.message);
        assert!(notes_list().items.iter().any(|note| note.title == title));
    }

    #[test]
    fn calendar_add_and_remove_queue_reminder_commands() {
        let title = unique_token("termin");
        let added = calendar_add(title.clone(), 4_102_444_800_000, true);
        assert!(added.ok, "{}", added.message);
        let id = added.id.expect("calendar add should return id");

        let position = calendar_list()
            .items
            .iter()
            .position(|row| row.id == id)
            .expect("appointment should be listed");
        let removed = calendar_remove(position as u32);
        assert!(removed.ok, "{}", removed.message);

        let commands = reminder_drain()
            .into_iter()
            .filter(|command| command.id == id)
            .collect::<Vec<_>>();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].kind, "schedule");
        assert_eq!(commands[0].title.as_deref(), Some("Erinnerung"));
        assert_eq!(commands[1].kind, "cancel");
    }

    #[test]
    fn calendar_open_lists_the_same_rows_as_calendar_list() {
        let title = unique_token("kalender");
        let added = calendar_add(title, 4_102_444_800_000, false);
        assert!(added.ok, "{}", added.message);
        let id = added.id.expect("calendar add should return id");

        let opened = calendar_open();
        assert!(opened.ok, "{}", opened.message);
        assert!(opened.items.iter().any(|row| row.id == id));
        let listed = calendar_list();
        assert!(listed.items.iter().any(|row| row.id == id));
    }

    #[test]
    fn menu_order_lists_every_feature() {
        let response = menu_order();
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.labels.len(), 5);
    }

    #[test]
    fn feature_screen_resolves_menu_labels() {
        let calendar = feature_screen("Kalender".to_string());
        assert!(calendar.ok, "{}", calendar.message);
        assert_eq!(calendar.feature, "calendar");
        assert_eq!(calendar.storage_keys, vec!["Appointments".to_string()]);

        let unknown = feature_screen("Einstellungen".to_string());
        assert!(!unknown.ok);
        assert!(unknown.message.contains("Einstellungen"));
    }

    #[test]
    fn timer_state_reflects_last_write() {
        let response = timer_set_remaining(75.0);
        assert!(response.ok, "{}", response.message);
        assert_eq!(timer_state().display, "01:15");
    }

    #[test]
    fn fresh_screens_show_placeholders() {
        let quiz = quiz_open();
        assert_eq!(quiz.phase, "loading");
        assert!(quiz.current.is_none());
        assert!(!quiz_answer("x".to_string()).ok);

        let weather = weather_open();
        assert_eq!(weather.temperature, "--");
        assert_eq!(weather.condition, "--");
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
