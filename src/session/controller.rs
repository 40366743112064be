use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::api::models::{Category, Difficulty};
use crate::api::{ApiClient, ApiError};

use super::store::{SessionStore, StoredSession};

/// The backend signals completion only through the continuation flag; this
/// constant exists purely for the `Question N/M` progress display.
pub const QUESTIONS_PER_SESSION: u32 = 3;

/// How long an evaluation stays on screen before the next question loads.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("no active session")]
    NoSession,
    #[error("answer cannot be empty")]
    EmptyAnswer,
    #[error("an answer is already being evaluated")]
    EvaluationInFlight,
    #[error("interview is already complete")]
    SessionComplete,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub text: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NextQuestion {
    pub text: String,
    pub number: u32,
}

/// Everything the UI needs about the session currently in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub session_id: String,
    pub category: Category,
    pub question: String,
    pub question_number: u32,
}

impl From<StoredSession> for ActiveSession {
    fn from(record: StoredSession) -> Self {
        Self {
            session_id: record.session_id,
            category: record.category,
            question: record.question,
            question_number: record.question_number,
        }
    }
}

impl From<&ActiveSession> for StoredSession {
    fn from(session: &ActiveSession) -> Self {
        Self {
            session_id: session.session_id.clone(),
            category: session.category,
            question: session.question.clone(),
            question_number: session.question_number,
        }
    }
}

/// One explicit tagged state instead of a pile of booleans; a variant exists
/// for every screen the flow can be on, and nothing else is representable.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Uninitialized,
    AwaitingAnswer,
    Evaluating,
    ShowingEvaluation {
        evaluation: Evaluation,
        next: NextQuestion,
    },
    Complete {
        evaluation: Evaluation,
    },
}

struct Inner {
    phase: Phase,
    session: Option<ActiveSession>,
    /// Last submitted answer, kept across a failed submit so the user can
    /// retry without retyping.
    draft: String,
    /// Bumped on every advance-affecting transition; a scheduled advance only
    /// fires if the sequence it captured is still current.
    advance_seq: u64,
    advance_task: Option<JoinHandle<()>>,
}

/// Client-resident state machine for one interview session:
/// start → answer → evaluate → advance/complete, with the active session
/// persisted across restarts.
pub struct SessionController {
    api: ApiClient,
    store: SessionStore,
    advance_delay: Duration,
    inner: Arc<Mutex<Inner>>,
}

impl SessionController {
    /// Reads the persisted record once; a present record restores the session
    /// at its current question, an absent one means no session and the
    /// backend is not contacted.
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        let (phase, session) = match store.load() {
            Some(record) => {
                info!(
                    "📋 Resuming session {} at question {}",
                    record.session_id, record.question_number
                );
                (Phase::AwaitingAnswer, Some(ActiveSession::from(record)))
            }
            None => (Phase::Uninitialized, None),
        };

        Self {
            api,
            store,
            advance_delay: AUTO_ADVANCE_DELAY,
            inner: Arc::new(Mutex::new(Inner {
                phase,
                session,
                draft: String::new(),
                advance_seq: 0,
                advance_task: None,
            })),
        }
    }

    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().phase.clone()
    }

    pub fn active_session(&self) -> Option<ActiveSession> {
        self.inner.lock().session.clone()
    }

    pub fn draft(&self) -> String {
        self.inner.lock().draft.clone()
    }

    /// Starts a fresh session. Any prior session's client-side state is
    /// discarded; its data on the backend stays retrievable via the summary
    /// and history endpoints.
    pub async fn start(
        &self,
        category: Category,
        difficulty: Option<Difficulty>,
    ) -> Result<ActiveSession, ControllerError> {
        let response = self.api.start_interview(category, difficulty).await?;
        let session = ActiveSession {
            session_id: response.session_id,
            category,
            question: response.question,
            question_number: response.question_number,
        };
        info!(
            "🎬 Started {} interview, session {}",
            category, session.session_id
        );

        let mut inner = self.inner.lock();
        Self::cancel_pending_advance(&mut inner);
        inner.phase = Phase::AwaitingAnswer;
        inner.draft.clear();
        self.store.save(&StoredSession::from(&session));
        inner.session = Some(session.clone());
        Ok(session)
    }

    /// Submits the answer for the current question. Empty answers and
    /// out-of-phase submissions are rejected before any network call; a
    /// backend failure returns the machine to `AwaitingAnswer` with the
    /// draft intact.
    pub async fn submit_answer(&self, answer: &str) -> Result<Evaluation, ControllerError> {
        let trimmed = answer.trim();
        let session_id = {
            let mut inner = self.inner.lock();
            match inner.phase {
                Phase::Uninitialized => return Err(ControllerError::NoSession),
                Phase::Evaluating | Phase::ShowingEvaluation { .. } => {
                    return Err(ControllerError::EvaluationInFlight)
                }
                Phase::Complete { .. } => return Err(ControllerError::SessionComplete),
                Phase::AwaitingAnswer => {}
            }
            if trimmed.is_empty() {
                return Err(ControllerError::EmptyAnswer);
            }
            let session_id = match inner.session.as_ref() {
                Some(session) => session.session_id.clone(),
                None => return Err(ControllerError::NoSession),
            };
            inner.draft = trimmed.to_string();
            inner.phase = Phase::Evaluating;
            session_id
        };

        let result = self.api.submit_answer(&session_id, trimmed).await;

        let mut inner = self.inner.lock();
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("❌ Answer submission failed: {}", e);
                inner.phase = Phase::AwaitingAnswer;
                return Err(e.into());
            }
        };

        inner.draft.clear();
        let evaluation = Evaluation {
            text: response.evaluation,
            score: response.score,
        };

        match (response.should_continue, response.next_question) {
            (true, Some(text)) => {
                let next = NextQuestion {
                    text,
                    number: response.question_number,
                };
                inner.phase = Phase::ShowingEvaluation {
                    evaluation: evaluation.clone(),
                    next,
                };
                self.schedule_advance(&mut inner);
            }
            _ => {
                info!("🎉 Interview complete, final score {}", evaluation.score);
                inner.phase = Phase::Complete {
                    evaluation: evaluation.clone(),
                };
                self.store.clear();
            }
        }

        Ok(evaluation)
    }

    /// Manual advance out of the evaluation screen. Cancels the delayed
    /// advance; together they move to the next question exactly once.
    pub fn skip_wait(&self) {
        let mut inner = self.inner.lock();
        Self::advance_locked(&mut inner, &self.store);
    }

    /// Drops the session from client state and removes the persisted record.
    pub fn discard(&self) {
        let mut inner = self.inner.lock();
        Self::cancel_pending_advance(&mut inner);
        inner.phase = Phase::Uninitialized;
        inner.session = None;
        inner.draft.clear();
        self.store.clear();
        info!("🧹 Session discarded");
    }

    fn schedule_advance(&self, inner: &mut Inner) {
        Self::cancel_pending_advance(inner);
        let seq = inner.advance_seq;
        let shared = Arc::clone(&self.inner);
        let store = self.store.clone();
        let delay = self.advance_delay;
        inner.advance_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut inner = shared.lock();
            if inner.advance_seq == seq {
                Self::advance_locked(&mut inner, &store);
            }
        }));
    }

    fn cancel_pending_advance(inner: &mut Inner) {
        inner.advance_seq += 1;
        if let Some(task) = inner.advance_task.take() {
            task.abort();
        }
    }

    /// Loads the pending next question and overwrites the persisted record.
    /// No-op outside `ShowingEvaluation`, which is what makes the timer and
    /// the manual skip idempotent with respect to each other.
    fn advance_locked(inner: &mut Inner, store: &SessionStore) {
        let next = match &inner.phase {
            Phase::ShowingEvaluation { next, .. } => next.clone(),
            _ => return,
        };
        Self::cancel_pending_advance(inner);
        if let Some(session) = inner.session.as_mut() {
            session.question = next.text;
            session.question_number = next.number;
            info!("➡️ Advancing to question {}", session.question_number);
            store.save(&StoredSession::from(&*session));
        }
        inner.phase = Phase::AwaitingAnswer;
    }
}
