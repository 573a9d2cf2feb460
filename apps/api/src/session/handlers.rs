use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::card::{Card, Rarity};
use crate::models::collection::CollectionBucket;
use crate::models::conversation::Conversation;
use crate::models::profile::Quiz;
use crate::session::views::{GestureOutcome, ProfileView, Snapshot, SwipeReport, ThemesView};
use crate::state::AppState;
use crate::swipe::deck::DeckView;
use crate::swipe::gesture::{Direction, Offset, Point};

#[derive(Deserialize)]
pub struct OnboardingRequest {
    pub interests: Vec<String>,
}

#[derive(Deserialize)]
pub struct RefineRequest {
    pub edit: String,
}

#[derive(Deserialize)]
pub struct ThemeRequest {
    pub theme: String,
}

#[derive(Deserialize)]
pub struct SwipeRequest {
    pub direction: Direction,
}

#[derive(Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Deserialize, Default)]
pub struct LiveChatRequest {
    pub theme: Option<String>,
}

#[derive(Deserialize)]
pub struct ContributionRequest {
    pub content: String,
    #[serde(rename = "type", default)]
    pub card_type: String,
    #[serde(default)]
    pub rarity: Rarity,
}

/// POST /api/v1/onboarding
pub async fn handle_onboarding(
    State(state): State<AppState>,
    Json(req): Json<OnboardingRequest>,
) -> Result<(StatusCode, Json<ProfileView>), AppError> {
    let view = state.session.onboard(req.interests).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// POST /api/v1/profile/refine
pub async fn handle_refine_profile(
    State(state): State<AppState>,
    Json(req): Json<RefineRequest>,
) -> Result<Json<ProfileView>, AppError> {
    Ok(Json(state.session.refine_profile(req.edit).await?))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
) -> Result<Json<ProfileView>, AppError> {
    Ok(Json(state.session.profile().await?))
}

/// GET /api/v1/snapshot
pub async fn handle_snapshot(State(state): State<AppState>) -> Result<Json<Snapshot>, AppError> {
    Ok(Json(state.session.snapshot().await?))
}

/// GET /api/v1/themes
pub async fn handle_get_themes(
    State(state): State<AppState>,
) -> Result<Json<ThemesView>, AppError> {
    Ok(Json(state.session.themes().await?))
}

/// POST /api/v1/themes
pub async fn handle_add_theme(
    State(state): State<AppState>,
    Json(req): Json<ThemeRequest>,
) -> Result<Json<ThemesView>, AppError> {
    Ok(Json(state.session.add_theme(req.theme).await?))
}

/// PUT /api/v1/themes/active
pub async fn handle_select_theme(
    State(state): State<AppState>,
    Json(req): Json<ThemeRequest>,
) -> Result<Json<DeckView>, AppError> {
    Ok(Json(state.session.select_theme(req.theme).await?))
}

/// GET /api/v1/deck
pub async fn handle_get_deck(State(state): State<AppState>) -> Result<Json<DeckView>, AppError> {
    Ok(Json(state.session.deck().await?))
}

/// POST /api/v1/deck/retry
pub async fn handle_retry_deck(
    State(state): State<AppState>,
) -> Result<Json<DeckView>, AppError> {
    Ok(Json(state.session.retry_deck().await?))
}

/// POST /api/v1/gesture/down
pub async fn handle_pointer_down(
    State(state): State<AppState>,
    Json(at): Json<Point>,
) -> Result<Json<Offset>, AppError> {
    Ok(Json(state.session.pointer_down(at).await?))
}

/// POST /api/v1/gesture/move
pub async fn handle_pointer_move(
    State(state): State<AppState>,
    Json(at): Json<Point>,
) -> Result<Json<Offset>, AppError> {
    Ok(Json(state.session.pointer_move(at).await?))
}

/// POST /api/v1/gesture/up
pub async fn handle_pointer_up(
    State(state): State<AppState>,
) -> Result<Json<GestureOutcome>, AppError> {
    Ok(Json(state.session.pointer_up().await?))
}

/// POST /api/v1/swipe
pub async fn handle_swipe(
    State(state): State<AppState>,
    Json(req): Json<SwipeRequest>,
) -> Result<Json<SwipeReport>, AppError> {
    Ok(Json(state.session.swipe(req.direction).await?))
}

/// GET /api/v1/collections
pub async fn handle_get_collections(
    State(state): State<AppState>,
) -> Result<Json<Vec<CollectionBucket>>, AppError> {
    Ok(Json(state.session.collections().await?))
}

/// GET /api/v1/conversations
pub async fn handle_get_conversations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Conversation>>, AppError> {
    Ok(Json(state.session.conversations().await?))
}

/// GET /api/v1/conversations/:id
pub async fn handle_get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Conversation>, AppError> {
    Ok(Json(state.session.conversation(id).await?))
}

/// POST /api/v1/conversations/:id/messages
pub async fn handle_send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<Conversation>, AppError> {
    Ok(Json(state.session.send_message(id, req.text).await?))
}

/// POST /api/v1/live-chat
pub async fn handle_start_live_chat(
    State(state): State<AppState>,
    req: Option<Json<LiveChatRequest>>,
) -> Result<(StatusCode, Json<Conversation>), AppError> {
    let Json(req) = req.unwrap_or_default();
    let conversation = state.session.start_live_chat(req.theme).await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

/// POST /api/v1/quizzes/:quiz/complete
pub async fn handle_complete_quiz(
    State(state): State<AppState>,
    Path(quiz): Path<Quiz>,
) -> Result<Json<ProfileView>, AppError> {
    Ok(Json(state.session.complete_quiz(quiz).await?))
}

/// POST /api/v1/contributions
pub async fn handle_contribute(
    State(state): State<AppState>,
    Json(req): Json<ContributionRequest>,
) -> Result<(StatusCode, Json<Card>), AppError> {
    let card = state
        .session
        .contribute(req.content, req.card_type, req.rarity)
        .await?;
    Ok((StatusCode::CREATED, Json(card)))
}
