//! Quiz screen state.
//!
//! # Invariants
//! - Only the result of the latest load, delivered while the screen is still
//!   shown, is applied.
//! - `current` is always a valid index while `phase == Ready`.

use crate::fetch::liveness::{FetchTicket, ScreenLiveness};
use crate::fetch::trivia::QuizQuestion;
use crate::fetch::{FetchError, FetchResult};
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Loading,
    Ready,
    /// Load finished without questions; see `last_error` for the cause.
    Empty,
}

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    liveness: ScreenLiveness,
    questions: Vec<QuizQuestion>,
    current: usize,
    phase: QuizPhase,
    last_error: Option<FetchError>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self {
            liveness: ScreenLiveness::new(),
            questions: Vec::new(),
            current: 0,
            phase: QuizPhase::Loading,
            last_error: None,
        }
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters `Loading` and returns the ticket the fetch result must carry.
    pub fn begin_load(&mut self) -> FetchTicket {
        self.phase = QuizPhase::Loading;
        self.liveness.begin()
    }

    /// Applies a finished fetch. Returns `false` when the result was stale.
    ///
    /// Any error, and an empty question list, end in `Empty`.
    pub fn finish_load(
        &mut self,
        ticket: FetchTicket,
        result: FetchResult<Vec<QuizQuestion>>,
    ) -> bool {
        if !self.liveness.accepts(ticket) {
            info!("event=quiz_load module=service status=discarded");
            return false;
        }

        self.current = 0;
        match result {
            Ok(questions) => {
                self.phase = if questions.is_empty() {
                    QuizPhase::Empty
                } else {
                    QuizPhase::Ready
                };
                info!(
                    "event=quiz_load module=service status=ok count={}",
                    questions.len()
                );
                self.questions = questions;
                self.last_error = None;
            }
            Err(err) => {
                warn!("event=quiz_load module=service status=error error={err}");
                self.questions.clear();
                self.phase = QuizPhase::Empty;
                self.last_error = Some(err);
            }
        }
        true
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::Ready => self.questions.get(self.current),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Checks `option` against the current question. `None` when no question
    /// is shown.
    pub fn answer(&self, option: &str) -> Option<AnswerOutcome> {
        let question = self.current_question()?;
        Some(AnswerOutcome {
            correct: question.correct_answer == option,
            correct_answer: question.correct_answer.clone(),
        })
    }

    /// Moves to the next question, wrapping to the first after the last.
    pub fn advance(&mut self) -> Option<&QuizQuestion> {
        if self.phase != QuizPhase::Ready {
            return None;
        }
        self.current = (self.current + 1) % self.questions.len();
        self.questions.get(self.current)
    }

    /// Resets the screen for a new visit. Loads started before stay stale.
    pub fn reopen(&mut self) {
        let mut liveness = std::mem::take(&mut self.liveness);
        liveness.reopen();
        *self = Self {
            liveness,
            ..Self::default()
        };
    }

    /// Screen left; pending loads will be discarded.
    pub fn dismiss(&mut self) {
        self.liveness.dismiss();
    }
}
