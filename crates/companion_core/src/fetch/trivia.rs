//! Open Trivia DB client.
//!
//! # Invariants
//! - Each question's options are its incorrect answers plus the correct one,
//!   shuffled independently per question.
//! - Text is HTML-entity decoded before it reaches the UI.

use super::html::decode_html_entities;
use super::{endpoint_url, FetchError, FetchResult, HttpTransport};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use reqwest::Url;
use serde::Deserialize;

pub const DEFAULT_TRIVIA_BASE_URL: &str = "https://opentdb.com";
pub const DEFAULT_QUESTION_AMOUNT: u32 = 10;

/// Answer format requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionKind {
    #[default]
    Multiple,
    Boolean,
}

impl QuestionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Multiple => "multiple",
            Self::Boolean => "boolean",
        }
    }
}

/// One playable quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub prompt: String,
    /// Shuffled; contains `correct_answer` exactly once.
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Debug, Deserialize)]
struct TriviaResponse {
    #[serde(default)]
    response_code: Option<i64>,
    results: Vec<TriviaResult>,
}

#[derive(Debug, Deserialize)]
struct TriviaResult {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

/// Trivia API client over an injected transport.
pub struct TriviaClient<T: HttpTransport> {
    transport: T,
    base_url: String,
}

impl<T: HttpTransport> TriviaClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// `{base}/api.php?amount=<amount>&type=<kind>`.
    pub fn questions_url(&self, amount: u32, kind: QuestionKind) -> FetchResult<Url> {
        if amount == 0 {
            return Err(FetchError::InvalidInput("amount must be positive"));
        }
        let mut url = endpoint_url(&self.base_url, "/api.php")?;
        url.query_pairs_mut()
            .append_pair("amount", &amount.to_string())
            .append_pair("type", kind.as_str());
        Ok(url)
    }

    /// Fetches `amount` questions and shuffles each one's options.
    pub async fn fetch_questions(
        &self,
        amount: u32,
        kind: QuestionKind,
    ) -> FetchResult<Vec<QuizQuestion>> {
        let url = self.questions_url(amount, kind)?;
        let response = self.transport.get(url).await?;
        if !response.is_success() {
            warn!(
                "event=trivia_fetch module=fetch status=error http_status={}",
                response.status
            );
            return Err(FetchError::Status {
                code: response.status,
                message: None,
            });
        }

        let questions = decode_questions(&response.body, &mut StdRng::from_entropy())?;
        info!(
            "event=trivia_fetch module=fetch status=ok count={}",
            questions.len()
        );
        Ok(questions)
    }
}

/// Decodes a trivia response body, shuffling options with `rng`.
pub fn decode_questions<R: Rng + ?Sized>(body: &str, rng: &mut R) -> FetchResult<Vec<QuizQuestion>> {
    let decoded: TriviaResponse =
        serde_json::from_str(body).map_err(|err| FetchError::Decode(err.to_string()))?;

    if let Some(code) = decoded.response_code.filter(|code| *code != 0) {
        warn!("event=trivia_fetch module=fetch status=error response_code={code}");
        return Err(FetchError::Service { code });
    }

    Ok(decoded
        .results
        .into_iter()
        .map(|result| {
            let correct_answer = decode_html_entities(&result.correct_answer);
            let mut options = result
                .incorrect_answers
                .iter()
                .map(|answer| decode_html_entities(answer))
                .collect::<Vec<_>>();
            options.push(correct_answer.clone());
            options.shuffle(&mut *rng);

            QuizQuestion {
                prompt: decode_html_entities(&result.question),
                options,
                correct_answer,
            }
        })
        .collect())
}
