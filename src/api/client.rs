use std::time::Duration;

use log::{debug, error};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::models::*;
use super::{ApiError, Result};

/// Error body shape used by the backend for non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Typed client for the InterviewIQ backend. One method per endpoint, no
/// retry or caching; the UI layer serializes calls.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        // Answer evaluation runs an LLM server-side, so the read timeout is
        // generous while connects stay fast.
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn start_interview(
        &self,
        category: Category,
        difficulty: Option<Difficulty>,
    ) -> Result<StartInterviewResponse> {
        let request = StartInterviewRequest {
            category,
            difficulty,
        };
        self.post("/api/interview/start", &request).await
    }

    pub async fn submit_answer(
        &self,
        session_id: &str,
        answer: &str,
    ) -> Result<SubmitAnswerResponse> {
        let request = SubmitAnswerRequest {
            session_id: session_id.to_string(),
            answer: answer.to_string(),
        };
        self.post("/api/interview/answer", &request).await
    }

    pub async fn session_summary(&self, session_id: &str) -> Result<SessionSummary> {
        self.get(&format!("/api/interview/{}/summary", session_id), &[])
            .await
    }

    /// Most-recent-first; the ordering is the backend's contract and is not
    /// re-sorted here.
    pub async fn recent_sessions(&self, limit: u32) -> Result<RecentSessions> {
        self.get(
            "/api/interview/sessions/recent",
            &[("limit", limit.to_string())],
        )
        .await
    }

    pub async fn platform_stats(&self) -> Result<PlatformStats> {
        self.get("/api/analytics/stats", &[]).await
    }

    pub async fn weak_areas(&self, threshold: u32, user_id: Option<i64>) -> Result<WeakAreas> {
        let mut query = vec![("threshold", threshold.to_string())];
        if let Some(user_id) = user_id {
            query.push(("user_id", user_id.to_string()));
        }
        self.get("/api/analytics/weak-areas", &query).await
    }

    pub async fn user_progress(&self, user_id: i64, limit: u32) -> Result<UserProgress> {
        self.get(
            &format!("/api/analytics/progress/{}", user_id),
            &[("limit", limit.to_string())],
        )
        .await
    }

    /// The `category` parameter is omitted entirely when not filtering.
    pub async fn leaderboard(
        &self,
        category: Option<Category>,
        limit: u32,
    ) -> Result<Leaderboard> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(category) = category {
            query.push(("category", category.as_str().to_string()));
        }
        self.get("/api/analytics/leaderboard", &query).await
    }

    pub async fn health_check(&self) -> Result<HealthCheck> {
        self.get("/health", &[]).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("🚀 GET {}", url);
        let response = self.client.get(&url).query(query).send().await?;
        Self::read_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("🚀 POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        Self::read_response(response).await
    }

    /// Every call funnels through here. Non-2xx responses become an
    /// [`ApiError::Http`] carrying the backend's `detail`/`message` when one
    /// parses, or a message built from the status line otherwise.
    async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail.or(body.message))
                .unwrap_or_else(|| format!("HTTP {}", status));
            error!("❌ API error ({}): {}", status, message);
            return Err(ApiError::Http { status, message });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn start_interview_decodes_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interview/start"))
            .and(body_json(json!({"category": "coding"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "session_id": "s-1",
                "question": "Explain ownership in one paragraph.",
                "question_number": 1,
                "category": "coding"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let response = client.start_interview(Category::Coding, None).await.unwrap();
        assert_eq!(response.session_id, "s-1");
        assert_eq!(response.question_number, 1);
        assert_eq!(response.category, "coding");
    }

    #[tokio::test]
    async fn submit_answer_decodes_continuation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interview/answer"))
            .and(body_json(json!({"session_id": "s-1", "answer": "use Arc"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "evaluation": "Solid reasoning",
                "score": 85,
                "question_number": 2,
                "continue": true,
                "next_question": "Design a rate limiter",
                "next_question_id": "q-2"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let response = client.submit_answer("s-1", "use Arc").await.unwrap();
        assert!(response.should_continue);
        assert_eq!(response.score, 85);
        assert_eq!(response.next_question.as_deref(), Some("Design a rate limiter"));
    }

    #[tokio::test]
    async fn structured_error_detail_becomes_the_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interview/answer"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"detail": "internal error"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.submit_answer("s-1", "answer").await.unwrap_err();
        match &err {
            ApiError::Http { status, message } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(message, "internal error");
            }
            other => panic!("expected Http error, got {:?}", other),
        }
        assert_eq!(err.to_string(), "internal error");
    }

    #[tokio::test]
    async fn unparseable_error_body_falls_back_to_status_line() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/analytics/stats"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.platform_stats().await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable");
    }

    #[tokio::test]
    async fn leaderboard_includes_category_only_when_filtering() {
        let server = MockServer::start().await;
        let body = json!({
            "leaderboard": [{
                "rank": 1,
                "session_id": "s-9",
                "category": "coding",
                "score": 92.5,
                "questions": 3,
                "date": "2026-08-07T10:00:00"
            }],
            "total_entries": 1
        });
        Mock::given(method("GET"))
            .and(path("/api/analytics/leaderboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let filtered = client.leaderboard(Some(Category::Coding), 5).await.unwrap();
        assert_eq!(filtered.leaderboard[0].rank, 1);
        let unfiltered = client.leaderboard(None, 10).await.unwrap();
        assert_eq!(unfiltered.total_entries, 1);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        let first: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(first.contains(&("category".to_string(), "coding".to_string())));
        assert!(first.contains(&("limit".to_string(), "5".to_string())));
        let second: Vec<(String, String)> = requests[1]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(second.iter().all(|(k, _)| k != "category"));
        assert!(second.contains(&("limit".to_string(), "10".to_string())));
    }

    #[tokio::test]
    async fn weak_areas_decodes_category_map() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/analytics/weak-areas"))
            .and(query_param("threshold", "60"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "threshold": 60,
                "weak_areas": {
                    "system_design": {
                        "count": 4,
                        "avg_score": 42.5,
                        "questions": ["sd_1", "sd_3"]
                    }
                },
                "total_categories": 1
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let weak = client.weak_areas(60, None).await.unwrap();
        assert_eq!(weak.total_categories, 1);
        let area = &weak.weak_areas["system_design"];
        assert_eq!(area.count, 4);
        assert_eq!(area.questions.len(), 2);
    }

    #[tokio::test]
    async fn recent_sessions_parses_timestamps() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/interview/sessions/recent"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "sessions": [{
                    "session_id": "s-1",
                    "category": "behavioral",
                    "started_at": "2026-08-07T10:00:00Z",
                    "completed": true,
                    "average_score": 74.0,
                    "total_questions": 3
                }]
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let recent = client.recent_sessions(10).await.unwrap();
        assert_eq!(recent.sessions[0].started_at.to_rfc3339(), "2026-08-07T10:00:00+00:00");
    }

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "api": "ok",
                "database": "connected",
                "status": "healthy"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let health = client.health_check().await.unwrap();
        assert!(health.is_healthy());
    }
}
