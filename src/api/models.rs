use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Coding,
    SystemDesign,
    Behavioral,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Coding, Category::SystemDesign, Category::Behavioral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Coding => "coding",
            Category::SystemDesign => "system_design",
            Category::Behavioral => "behavioral",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "coding" => Some(Category::Coding),
            "system_design" | "system-design" => Some(Category::SystemDesign),
            "behavioral" => Some(Category::Behavioral),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display band for a 0-100 score. The numbers themselves come from the
/// backend and are treated as opaque beyond this banding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn for_score(score: u32) -> Self {
        if score >= 80 {
            ScoreBand::Good
        } else if score >= 60 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Good => "good",
            ScoreBand::Fair => "fair",
            ScoreBand::Poor => "poor",
        }
    }
}

// Request DTOs

#[derive(Debug, Clone, Serialize)]
pub struct StartInterviewRequest {
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerRequest {
    pub session_id: String,
    pub answer: String,
}

// Response DTOs

#[derive(Debug, Clone, Deserialize)]
pub struct StartInterviewResponse {
    pub session_id: String,
    pub question: String,
    pub question_number: u32,
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswerResponse {
    pub evaluation: String,
    pub score: u32,
    pub question_number: u32,
    /// `false` means the session is over and no further question follows.
    #[serde(rename = "continue")]
    pub should_continue: bool,
    #[serde(default)]
    pub next_question: Option<String>,
    #[serde(default)]
    pub next_question_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub category: String,
    pub difficulty: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub total_questions: u32,
    #[serde(default)]
    pub average_score: Option<f64>,
    pub is_completed: bool,
    #[serde(default)]
    pub responses: Vec<QuestionReview>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionReview {
    pub question_number: u32,
    pub question: String,
    pub answer: String,
    pub score: u32,
    pub evaluation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentSessions {
    pub total: u32,
    #[serde(default)]
    pub sessions: Vec<RecentSession>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentSession {
    pub session_id: String,
    pub category: String,
    pub started_at: DateTime<Utc>,
    pub completed: bool,
    #[serde(default)]
    pub average_score: Option<f64>,
    pub total_questions: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformStats {
    pub total_sessions: u64,
    pub completed_sessions: u64,
    pub completion_rate: f64,
    pub average_score: f64,
    #[serde(default)]
    pub by_category: HashMap<String, u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeakAreas {
    pub threshold: u32,
    #[serde(default)]
    pub weak_areas: HashMap<String, WeakArea>,
    pub total_categories: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeakArea {
    pub count: u32,
    pub avg_score: f64,
    #[serde(default)]
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProgress {
    pub user_id: i64,
    pub total_sessions: u32,
    #[serde(default)]
    pub progress: Vec<ProgressPoint>,
    #[serde(default)]
    pub improvement: f64,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressPoint {
    pub date: String,
    pub category: String,
    pub score: f64,
    pub questions: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Leaderboard {
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
    pub total_entries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based, assigned by the backend.
    pub rank: u32,
    pub session_id: String,
    pub category: String,
    pub score: f64,
    pub questions: u32,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthCheck {
    pub api: String,
    pub database: String,
    pub status: String,
}

impl HealthCheck {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()), Some(category));
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
        assert_eq!(Category::from_str("system-design"), Some(Category::SystemDesign));
        assert_eq!(Category::from_str("quantum"), None);
    }

    #[test]
    fn difficulty_defaults_to_medium() {
        assert_eq!(Difficulty::default(), Difficulty::Medium);
        assert_eq!(Difficulty::from_str("hard"), Some(Difficulty::Hard));
    }

    #[test]
    fn score_bands() {
        assert_eq!(ScoreBand::for_score(100), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(80), ScoreBand::Good);
        assert_eq!(ScoreBand::for_score(79), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_score(60), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_score(59), ScoreBand::Poor);
        assert_eq!(ScoreBand::for_score(0), ScoreBand::Poor);
    }

    #[test]
    fn submit_answer_response_maps_continue_keyword() {
        let raw = r#"{
            "evaluation": "Solid reasoning",
            "score": 85,
            "question_number": 2,
            "continue": true,
            "next_question": "Design a rate limiter"
        }"#;
        let response: SubmitAnswerResponse = serde_json::from_str(raw).unwrap();
        assert!(response.should_continue);
        assert_eq!(response.next_question.as_deref(), Some("Design a rate limiter"));
        assert_eq!(response.next_question_id, None);
        assert_eq!(response.message, None);
    }

    #[test]
    fn start_request_omits_missing_difficulty() {
        let request = StartInterviewRequest {
            category: Category::Coding,
            difficulty: None,
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"category":"coding"}"#
        );

        let request = StartInterviewRequest {
            category: Category::Behavioral,
            difficulty: Some(Difficulty::Hard),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"category":"behavioral","difficulty":"hard"}"#
        );
    }
}
