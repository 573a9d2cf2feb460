use serde::Serialize;

use crate::models::card::Card;
use crate::models::collection::CollectionBucket;
use crate::models::conversation::Conversation;
use crate::models::profile::{Connection, Group, Profile};
use crate::swipe::deck::DeckView;
use crate::swipe::reducer::SwipeEffects;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub profile: Profile,
    pub level: u32,
    pub completeness: u32,
    pub connections: Vec<Connection>,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemesView {
    pub themes: Vec<String>,
    pub active: Option<String>,
}

/// Everything the client needs after a swipe. The store has already been
/// updated; `settleMs` is only how long to animate the card out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeReport {
    /// The card as it was presented, before any rarity override.
    pub card: Card,
    #[serde(flatten)]
    pub effects: SwipeEffects,
    pub karma: Option<u32>,
    pub deck: DeckView,
    pub settle_ms: u64,
}

/// The whole session at a glance, for clients that reconnect.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub profile: Option<ProfileView>,
    pub themes: ThemesView,
    pub deck: DeckView,
    pub collections: Vec<CollectionBucket>,
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GestureOutcome {
    /// Released under the thresholds; the card snaps back.
    Cancelled,
    Swiped(SwipeReport),
}
