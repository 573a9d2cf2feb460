pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/snapshot", get(handlers::handle_snapshot))
        // Profile
        .route("/api/v1/onboarding", post(handlers::handle_onboarding))
        .route("/api/v1/profile", get(handlers::handle_get_profile))
        .route(
            "/api/v1/profile/refine",
            post(handlers::handle_refine_profile),
        )
        .route(
            "/api/v1/quizzes/:quiz/complete",
            post(handlers::handle_complete_quiz),
        )
        .route("/api/v1/contributions", post(handlers::handle_contribute))
        // Themes and deck
        .route(
            "/api/v1/themes",
            get(handlers::handle_get_themes).post(handlers::handle_add_theme),
        )
        .route("/api/v1/themes/active", put(handlers::handle_select_theme))
        .route("/api/v1/deck", get(handlers::handle_get_deck))
        .route("/api/v1/deck/retry", post(handlers::handle_retry_deck))
        // Swiping
        .route("/api/v1/gesture/down", post(handlers::handle_pointer_down))
        .route("/api/v1/gesture/move", post(handlers::handle_pointer_move))
        .route("/api/v1/gesture/up", post(handlers::handle_pointer_up))
        .route("/api/v1/swipe", post(handlers::handle_swipe))
        .route("/api/v1/collections", get(handlers::handle_get_collections))
        // Conversations
        .route(
            "/api/v1/conversations",
            get(handlers::handle_get_conversations),
        )
        .route(
            "/api/v1/conversations/:id",
            get(handlers::handle_get_conversation),
        )
        .route(
            "/api/v1/conversations/:id/messages",
            post(handlers::handle_send_message),
        )
        .route("/api/v1/live-chat", post(handlers::handle_start_live_chat))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::content::{ContentError, ContentSource, GeneratedProfile, LiveMatch};
    use crate::models::card::Card;
    use crate::session::SessionHandle;

    /// Always fails; the routes under test never need generated content.
    struct Offline;

    #[async_trait]
    impl ContentSource for Offline {
        async fn generate_deck(&self, _theme: &str) -> Result<Vec<Card>, ContentError> {
            Err(ContentError::Fetch("offline".to_string()))
        }

        async fn generate_profile(
            &self,
            _interests: &str,
            _edit_context: Option<&str>,
        ) -> Result<GeneratedProfile, ContentError> {
            Err(ContentError::Fetch("offline".to_string()))
        }

        async fn generate_live_match(
            &self,
            _theme: &str,
            _karma: u32,
        ) -> Result<LiveMatch, ContentError> {
            Err(ContentError::Fetch("offline".to_string()))
        }
    }

    fn app() -> Router {
        let session = SessionHandle::spawn(Arc::new(Offline), Duration::from_millis(300));
        build_router(AppState { session })
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "cardswipe");
    }

    #[tokio::test]
    async fn test_themes_lists_catalog() {
        let (status, body) = send(app(), "GET", "/api/v1/themes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["themes"][0], "Humor");
        assert_eq!(body["active"], "Humor");
    }

    #[tokio::test]
    async fn test_unknown_theme_is_not_found() {
        let (status, body) = send(
            app(),
            "PUT",
            "/api/v1/themes/active",
            Some(json!({ "theme": "Knitting" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_snapshot_before_onboarding() {
        let (status, body) = send(app(), "GET", "/api/v1/snapshot", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["profile"].is_null());
        assert_eq!(body["deck"]["theme"], "Humor");
    }

    #[tokio::test]
    async fn test_profile_missing_before_onboarding() {
        let (status, _) = send(app(), "GET", "/api/v1/profile", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_onboarding_without_interests_is_rejected() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/v1/onboarding",
            Some(json!({ "interests": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generator_failure_is_bad_gateway() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/v1/onboarding",
            Some(json!({ "interests": ["coffee"] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_swipe_without_card_conflicts() {
        let (status, _) = send(
            app(),
            "POST",
            "/api/v1/swipe",
            Some(json!({ "direction": "right" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_release_without_press_is_cancelled() {
        let (status, body) = send(app(), "POST", "/api/v1/gesture/up", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "cancelled");
    }

    #[tokio::test]
    async fn test_unknown_quiz_path_is_rejected() {
        let (status, _) = send(app(), "POST", "/api/v1/quizzes/astrology/complete", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_message_to_unknown_conversation() {
        let (status, _) = send(
            app(),
            "POST",
            "/api/v1/conversations/nope/messages",
            Some(json!({ "text": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
