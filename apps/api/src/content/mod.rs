//! Content Source: the external generator of decks, profiles and live-chat
//! openers.
//!
//! The session only ever talks to `Arc<dyn ContentSource>`. The production
//! backend is [`LlmContentSource`]; tests script their own.

pub mod prompts;

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::content::prompts::{
    DECK_PROMPT_TEMPLATE, LIVE_MATCH_PROMPT_TEMPLATE, PROFILE_EDIT_LINE,
    PROFILE_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{CallOptions, LlmClient, LlmError};
use crate::models::card::{Card, CardType, Rarity};
use crate::models::profile::{Connection, Group, Profile, STARTING_KARMA};

/// Why a generation call produced nothing. Callers treat both the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The generator was unreachable or answered with a non-OK status.
    #[error("content fetch failed: {0}")]
    Fetch(String),

    /// The generator answered, but not in the expected shape.
    #[error("malformed content: {0}")]
    Parse(String),
}

impl From<LlmError> for ContentError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Parse(_) | LlmError::EmptyContent => ContentError::Parse(e.to_string()),
            other => ContentError::Fetch(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedProfile {
    pub profile: Profile,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LiveMatch {
    pub name: String,
    pub message: String,
}

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// A finite batch of cards, all tagged with `theme`.
    async fn generate_deck(&self, theme: &str) -> Result<Vec<Card>, ContentError>;

    /// A profile with its starting karma plus suggested connections and groups.
    async fn generate_profile(
        &self,
        interests: &str,
        edit_context: Option<&str>,
    ) -> Result<GeneratedProfile, ContentError>;

    /// An opener from a fictional online user of similar karma.
    async fn generate_live_match(&self, theme: &str, karma: u32)
        -> Result<LiveMatch, ContentError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Deck payload
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedCard {
    id: Option<String>,
    #[serde(rename = "type")]
    card_type: CardType,
    content: String,
    sub_content: Option<String>,
    rarity: Rarity,
}

/// Models return either a bare array or an object wrapping it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeckPayload {
    Bare(Vec<GeneratedCard>),
    Wrapped { cards: Vec<GeneratedCard> },
}

impl DeckPayload {
    /// Validates the whole batch before any card is built; a single bad card
    /// rejects the batch.
    fn into_cards(self, theme: &str) -> Result<Vec<Card>, ContentError> {
        let generated = match self {
            DeckPayload::Bare(cards) | DeckPayload::Wrapped { cards } => cards,
        };
        if generated.is_empty() {
            return Err(ContentError::Parse("deck contained no cards".to_string()));
        }
        if generated.iter().any(|c| c.content.trim().is_empty()) {
            return Err(ContentError::Parse("card with empty content".to_string()));
        }

        Ok(generated
            .into_iter()
            .map(|c| Card {
                id: c
                    .id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                card_type: c.card_type,
                content: c.content,
                sub_content: c.sub_content.filter(|s| !s.trim().is_empty()),
                theme: theme.to_string(),
                rarity: c.rarity,
            })
            .collect())
    }
}

/// Parses raw model output into a deck for `theme`.
pub fn parse_deck(text: &str, theme: &str) -> Result<Vec<Card>, ContentError> {
    let payload: DeckPayload = crate::llm_client::parse_json_text(text)?;
    payload.into_cards(theme)
}

// ────────────────────────────────────────────────────────────────────────────
// LlmContentSource
// ────────────────────────────────────────────────────────────────────────────

const DECK_OPTIONS: CallOptions = CallOptions {
    temperature: 1.1,
    json_object: false,
};
const PROFILE_OPTIONS: CallOptions = CallOptions {
    temperature: 0.8,
    json_object: true,
};
const LIVE_MATCH_OPTIONS: CallOptions = CallOptions {
    temperature: 1.0,
    json_object: true,
};

/// Generates all content with one JSON chat completion per request.
pub struct LlmContentSource {
    llm: LlmClient,
}

impl LlmContentSource {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

fn with_json_instruction(prompt: String) -> String {
    format!("{prompt}\n\n{JSON_ONLY_INSTRUCTION}")
}

/// A peer karma within a few points of the user's.
fn nearby_karma(karma: u32) -> u32 {
    let mut rng = rand::rng();
    let variance = rng.random_range(0..5);
    if rng.random_bool(0.5) {
        karma.saturating_add(variance)
    } else {
        karma.saturating_sub(variance)
    }
}

#[async_trait]
impl ContentSource for LlmContentSource {
    async fn generate_deck(&self, theme: &str) -> Result<Vec<Card>, ContentError> {
        let prompt = with_json_instruction(DECK_PROMPT_TEMPLATE.replace("{theme}", theme));
        let response = self.llm.call(&prompt, DECK_OPTIONS).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        let cards = parse_deck(text, theme)?;
        info!("generated {} cards for theme '{}'", cards.len(), theme);
        Ok(cards)
    }

    async fn generate_profile(
        &self,
        interests: &str,
        edit_context: Option<&str>,
    ) -> Result<GeneratedProfile, ContentError> {
        let edit_line = edit_context
            .map(|edit| PROFILE_EDIT_LINE.replace("{edit}", edit))
            .unwrap_or_default();
        let prompt = with_json_instruction(
            PROFILE_PROMPT_TEMPLATE
                .replace("{interests}", interests)
                .replace("{edit_context}", &edit_line),
        );

        let mut generated: GeneratedProfile =
            self.llm.call_json(&prompt, PROFILE_OPTIONS).await?;
        generated.profile.karma = STARTING_KARMA;
        Ok(generated)
    }

    async fn generate_live_match(
        &self,
        theme: &str,
        karma: u32,
    ) -> Result<LiveMatch, ContentError> {
        let match_karma = nearby_karma(karma);
        let prompt = with_json_instruction(
            LIVE_MATCH_PROMPT_TEMPLATE
                .replace("{theme}", theme)
                .replace("{match_karma}", &match_karma.to_string())
                .replace("{user_karma}", &karma.to_string()),
        );

        let live: LiveMatch = self.llm.call_json(&prompt, LIVE_MATCH_OPTIONS).await?;
        if live.name.trim().is_empty() || live.message.trim().is_empty() {
            return Err(ContentError::Parse("live match missing name or message".to_string()));
        }
        Ok(live)
    }
}
