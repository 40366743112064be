pub mod client;
pub mod models;

pub use client::ApiClient;
pub use models::{
    Category, Difficulty, HealthCheck, Leaderboard, LeaderboardEntry, PlatformStats,
    ProgressPoint, QuestionReview, RecentSession, RecentSessions, ScoreBand, SessionSummary,
    StartInterviewResponse, SubmitAnswerResponse, UserProgress, WeakArea, WeakAreas,
};

use thiserror::Error;

/// Single error type surfaced by every API call. Callers get a
/// human-readable message either way; triage beyond that is up to them.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Http {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
