//! Deck Manager: keeps a themed queue of cards supplied and advances it.
//!
//! This is a synchronous state machine. It never calls the Content Source
//! itself; every operation that decides a fetch is needed returns a
//! [`FetchTicket`], and the caller runs the fetch and hands the outcome back
//! through [`DeckManager::complete`] together with the same ticket.
//!
//! Every ticket is tagged with the theme and activation epoch it was issued
//! for. A completion whose ticket is not the one currently pending (the theme
//! changed, or the deck was re-activated) is dropped on arrival.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::content::ContentError;
use crate::models::card::Card;

/// Refill when fewer than this many unconsumed cards remain.
pub const REFILL_THRESHOLD: usize = 3;
/// Consumed cards held before the front of the deck is drained.
pub const PRUNE_AFTER: usize = 32;

/// Identifies one in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub theme: String,
    pub epoch: u64,
    pub seq: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum FetchState {
    /// Nothing fetched yet for this activation, or the last fetch failed.
    #[default]
    Idle,
    Fetching(FetchTicket),
    /// Last fetch succeeded and nothing is pending.
    Ready,
}

/// What the presentation layer should show for the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckStatus {
    Ready,
    /// No current card; a fetch is in flight.
    Fetching,
    /// No current card and nothing in flight. Shown as "fetching more" until
    /// the next refill check succeeds.
    Empty,
}

#[derive(Debug)]
struct Deck {
    theme: String,
    cards: Vec<Card>,
    cursor: usize,
    pruned: usize,
}

impl Deck {
    fn new(theme: &str) -> Self {
        Self {
            theme: theme.to_string(),
            cards: Vec::new(),
            cursor: 0,
            pruned: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.cards.len() - self.cursor
    }

    fn prune(&mut self) {
        if self.cursor > PRUNE_AFTER {
            self.cards.drain(..self.cursor);
            self.pruned += self.cursor;
            self.cursor = 0;
            debug!("pruned consumed cards for theme '{}'", self.theme);
        }
    }
}

/// Serializable snapshot of the active deck.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckView {
    pub theme: Option<String>,
    pub current: Option<Card>,
    pub next: Option<Card>,
    pub remaining: usize,
    pub consumed: usize,
    pub status: DeckStatus,
}

#[derive(Debug, Default)]
pub struct DeckManager {
    deck: Option<Deck>,
    fetch: FetchState,
    epoch: u64,
    next_seq: u64,
}

impl DeckManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn theme(&self) -> Option<&str> {
        self.deck.as_ref().map(|d| d.theme.as_str())
    }

    /// Makes `theme` the active theme with a fresh, empty deck and requests
    /// the initial batch. Re-activating the active theme is a no-op.
    pub fn activate(&mut self, theme: &str) -> Option<FetchTicket> {
        if self.theme() == Some(theme) {
            return None;
        }
        if let Some(previous) = self.theme() {
            info!("switching deck theme '{previous}' -> '{theme}'");
        } else {
            info!("activating deck theme '{theme}'");
        }
        self.epoch += 1;
        self.deck = Some(Deck::new(theme));
        self.fetch = FetchState::Idle;
        self.refill()
    }

    pub fn current(&self) -> Option<&Card> {
        let deck = self.deck.as_ref()?;
        deck.cards.get(deck.cursor)
    }

    /// The card after the current one, for preview.
    pub fn peek_next(&self) -> Option<&Card> {
        let deck = self.deck.as_ref()?;
        deck.cards.get(deck.cursor + 1)
    }

    pub fn remaining(&self) -> usize {
        self.deck.as_ref().map_or(0, Deck::remaining)
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.fetch, FetchState::Fetching(_))
    }

    pub fn status(&self) -> DeckStatus {
        match (self.current(), self.is_fetching()) {
            (Some(_), _) => DeckStatus::Ready,
            (None, true) => DeckStatus::Fetching,
            (None, false) => DeckStatus::Empty,
        }
    }

    pub fn view(&self) -> DeckView {
        DeckView {
            theme: self.theme().map(str::to_string),
            current: self.current().cloned(),
            next: self.peek_next().cloned(),
            remaining: self.remaining(),
            consumed: self.deck.as_ref().map_or(0, |d| d.pruned + d.cursor),
            status: self.status(),
        }
    }

    /// Moves past the current card, then runs the refill check. When the
    /// deck is already exhausted the cursor stays put.
    pub fn advance(&mut self) -> Option<FetchTicket> {
        if let Some(deck) = self.deck.as_mut() {
            if deck.cursor < deck.cards.len() {
                deck.cursor += 1;
                deck.prune();
            }
        }
        self.refill()
    }

    /// Issues a fetch for the active theme when the buffer is low and no
    /// fetch is already pending.
    pub fn refill(&mut self) -> Option<FetchTicket> {
        let deck = self.deck.as_ref()?;
        if self.is_fetching() || deck.remaining() >= REFILL_THRESHOLD {
            return None;
        }
        self.next_seq += 1;
        let ticket = FetchTicket {
            theme: deck.theme.clone(),
            epoch: self.epoch,
            seq: self.next_seq,
        };
        info!(
            "requesting cards for theme '{}' ({} remaining)",
            ticket.theme,
            deck.remaining()
        );
        self.fetch = FetchState::Fetching(ticket.clone());
        Some(ticket)
    }

    /// Applies the outcome of the fetch identified by `ticket`.
    ///
    /// Stale completions are discarded. A failure leaves the held cards
    /// untouched and clears the pending flag without re-running the refill
    /// check; the next `advance` or `refill` retries.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Card>, ContentError>,
    ) -> Option<FetchTicket> {
        let pending = matches!(&self.fetch, FetchState::Fetching(t) if t == ticket);
        if !pending || ticket.epoch != self.epoch {
            warn!(
                "discarding stale fetch for theme '{}' (epoch {}, active theme {:?})",
                ticket.theme,
                ticket.epoch,
                self.theme()
            );
            return None;
        }

        match result {
            Ok(cards) => {
                let deck = self.deck.as_mut()?;
                info!(
                    "appending {} cards to theme '{}'",
                    cards.len(),
                    deck.theme
                );
                deck.cards.extend(cards);
                self.fetch = FetchState::Ready;
                self.refill()
            }
            Err(e) => {
                warn!("card fetch for theme '{}' failed: {e}", ticket.theme);
                self.fetch = FetchState::Idle;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::card::{CardType, Rarity};

    fn batch(theme: &str, prefix: &str, n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| Card {
                id: format!("{prefix}-{i}"),
                card_type: CardType::Joke,
                content: format!("{prefix} joke {i}"),
                sub_content: None,
                theme: theme.to_string(),
                rarity: Rarity::Common,
            })
            .collect()
    }

    #[test]
    fn test_activate_issues_initial_fetch() {
        let mut deck = DeckManager::new();
        let ticket = deck.activate("Humor").expect("initial fetch");
        assert_eq!(ticket.theme, "Humor");
        assert_eq!(deck.status(), DeckStatus::Fetching);
        assert!(deck.current().is_none());
    }

    #[test]
    fn test_activate_same_theme_is_noop() {
        let mut deck = DeckManager::new();
        let first = deck.activate("Humor").unwrap();
        assert!(deck.activate("Humor").is_none());
        deck.complete(&first, Ok(batch("Humor", "h", 6)));
        assert!(deck.activate("Humor").is_none());
        assert_eq!(deck.remaining(), 6);
    }

    #[test]
    fn test_refill_once_below_threshold() {
        let mut deck = DeckManager::new();
        let t = deck.activate("Tech").unwrap();
        assert!(deck.complete(&t, Ok(batch("Tech", "a", 5))).is_none());

        assert!(deck.advance().is_none()); // 4 left
        assert!(deck.advance().is_none()); // 3 left
        let refill = deck.advance().expect("2 left triggers refill");
        assert_eq!(refill.theme, "Tech");

        // Still below threshold, but one is already pending.
        assert!(deck.advance().is_none());
        assert!(deck.refill().is_none());

        deck.complete(&refill, Ok(batch("Tech", "b", 6)));
        assert_eq!(deck.remaining(), 7);
        assert_eq!(deck.current().unwrap().id, "a-4");
    }

    #[test]
    fn test_small_batch_chains_another_fetch() {
        let mut deck = DeckManager::new();
        let t = deck.activate("Tech").unwrap();
        let next = deck.complete(&t, Ok(batch("Tech", "a", 2)));
        assert!(next.is_some());
        assert_eq!(deck.status(), DeckStatus::Ready);
    }

    #[test]
    fn test_stale_fetch_after_theme_switch_is_dropped() {
        let mut deck = DeckManager::new();
        let humor = deck.activate("Humor").unwrap();
        let tech = deck.activate("Tech").unwrap();

        assert!(deck.complete(&humor, Ok(batch("Humor", "h", 6))).is_none());
        assert_eq!(deck.remaining(), 0);
        assert_eq!(deck.status(), DeckStatus::Fetching);

        deck.complete(&tech, Ok(batch("Tech", "t", 6)));
        assert_eq!(deck.remaining(), 6);
        assert!(deck.view().current.unwrap().id.starts_with("t-"));
    }

    #[test]
    fn test_stale_fetch_after_reactivating_same_theme_is_dropped() {
        let mut deck = DeckManager::new();
        let first = deck.activate("Humor").unwrap();
        let _ = deck.activate("Tech").unwrap();
        let again = deck.activate("Humor").unwrap();
        assert_ne!(first, again);

        assert!(deck.complete(&first, Ok(batch("Humor", "old", 6))).is_none());
        assert_eq!(deck.remaining(), 0);
        deck.complete(&again, Ok(batch("Humor", "new", 6)));
        assert_eq!(deck.current().unwrap().id, "new-0");
    }

    #[test]
    fn test_failed_fetch_keeps_cards_and_clears_pending() {
        let mut deck = DeckManager::new();
        let t = deck.activate("Music").unwrap();
        deck.complete(&t, Ok(batch("Music", "m", 3)));
        let refill = deck.advance().unwrap();

        let next = deck.complete(&refill, Err(ContentError::Fetch("503".to_string())));
        assert!(next.is_none());
        assert_eq!(deck.remaining(), 2);
        assert!(!deck.is_fetching());

        // The next refill check retries.
        assert!(deck.refill().is_some());
    }

    #[test]
    fn test_failed_initial_fetch_reports_empty() {
        let mut deck = DeckManager::new();
        let t = deck.activate("Music").unwrap();
        deck.complete(&t, Err(ContentError::Parse("not json".to_string())));
        assert_eq!(deck.status(), DeckStatus::Empty);
        assert!(deck.current().is_none());
    }

    #[test]
    fn test_advance_past_end_reports_empty() {
        let mut deck = DeckManager::new();
        let t = deck.activate("Nature").unwrap();
        let refill = deck
            .complete(&t, Ok(batch("Nature", "n", 1)))
            .expect("one card is below the refill threshold");
        assert!(deck.advance().is_none());
        assert!(deck.current().is_none());
        assert_eq!(deck.status(), DeckStatus::Fetching);

        deck.complete(&refill, Err(ContentError::Fetch("timeout".to_string())));
        assert_eq!(deck.status(), DeckStatus::Empty);
        assert!(deck.advance().is_some());
        assert_eq!(deck.view().consumed, 1);
    }

    #[test]
    fn test_peek_next() {
        let mut deck = DeckManager::new();
        let t = deck.activate("Cinema").unwrap();
        deck.complete(&t, Ok(batch("Cinema", "c", 6)));
        assert_eq!(deck.current().unwrap().id, "c-0");
        assert_eq!(deck.peek_next().unwrap().id, "c-1");
    }

    #[test]
    fn test_consumed_cards_are_pruned() {
        let mut deck = DeckManager::new();
        let t = deck.activate("Foodie").unwrap();
        deck.complete(&t, Ok(batch("Foodie", "f", 60)));
        for _ in 0..40 {
            deck.advance();
        }
        let view = deck.view();
        assert_eq!(view.consumed, 40);
        assert_eq!(view.remaining, 20);
        assert_eq!(view.current.unwrap().id, "f-40");
        assert!(deck.deck.as_ref().unwrap().cards.len() < 60);
    }
}
