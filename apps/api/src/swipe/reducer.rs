//! Outcome Reducer: folds a resolved swipe into collection, karma and
//! conversation changes.
//!
//! `reduce` is pure: it reads one immutable snapshot (the card, the direction
//! and whether a profile exists) and projects the three independent effects
//! from it. `AppStore::apply_swipe` then writes all of them in the same
//! reaction, so no effect ever observes another's result.

use serde::Serialize;

use crate::models::card::{Card, Rarity};
use crate::models::conversation::Conversation;
use crate::models::profile::Profile;
use crate::swipe::gesture::Direction;

pub const MATCH_GREETING: &str = "You matched! Say hello.";
pub const LEGENDARY_KARMA: u32 = 10;
pub const COLLECT_KARMA: u32 = 2;

/// Everything a single swipe changes. A `left` swipe yields the empty value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeEffects {
    pub direction: Direction,
    /// The effective card appended to its theme's collection.
    pub collected: Option<Card>,
    pub new_match: Option<Conversation>,
    pub karma_delta: u32,
}

impl SwipeEffects {
    pub fn is_noop(&self) -> bool {
        self.collected.is_none() && self.new_match.is_none() && self.karma_delta == 0
    }
}

/// Projects the effects of swiping `card` in `direction`.
///
/// `match_token` makes the id of a newly created conversation unique.
pub fn reduce(
    direction: Direction,
    card: &Card,
    profile: Option<&Profile>,
    match_token: &str,
) -> SwipeEffects {
    let effective = match direction {
        Direction::Left => {
            return SwipeEffects {
                direction,
                collected: None,
                new_match: None,
                karma_delta: 0,
            }
        }
        Direction::Right => card.clone(),
        Direction::Up => card.with_rarity(Rarity::Legendary),
    };

    // Only an explicit like on a person creates a match; a super-like does not.
    let new_match = (direction == Direction::Right && effective.is_person())
        .then(|| match_conversation(&effective, match_token));

    let karma_delta = match (profile, effective.rarity) {
        (None, _) => 0,
        (Some(_), Rarity::Legendary) => LEGENDARY_KARMA,
        (Some(_), _) => COLLECT_KARMA,
    };

    SwipeEffects {
        direction,
        collected: Some(effective),
        new_match,
        karma_delta,
    }
}

/// Builds the conversation opened by liking a person card. The person's name
/// is whatever precedes the first comma of the card text.
pub fn match_conversation(card: &Card, match_token: &str) -> Conversation {
    let name = card
        .content
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    Conversation {
        id: format!("{}-{}", card.id, match_token),
        name,
        avatar_char: card.content.chars().next().unwrap_or('?'),
        last_message: MATCH_GREETING.to_string(),
        unread_count: 1,
        messages: Vec::new(),
        is_live: false,
        theme_context: None,
    }
}
