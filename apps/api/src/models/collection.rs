use serde::Serialize;

use crate::models::card::Card;

/// Cards collected per level step.
pub const CARDS_PER_LEVEL: usize = 5;

/// All cards collected for one theme.
///
/// `count` and `level` are derived from `cards` and only change through
/// [`CollectionBucket::push`], which keeps them consistent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionBucket {
    pub theme: String,
    cards: Vec<Card>,
    count: usize,
    level: usize,
}

impl CollectionBucket {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            cards: Vec::new(),
            count: 0,
            level: 1,
        }
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
        self.count = self.cards.len();
        self.level = self.count / CARDS_PER_LEVEL + 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::card::{CardType, Rarity};

    fn card(n: usize) -> Card {
        Card {
            id: format!("c{n}"),
            card_type: CardType::Fact,
            content: format!("fact {n}"),
            sub_content: None,
            theme: "Nature".to_string(),
            rarity: Rarity::Common,
        }
    }

    #[test]
    fn test_new_bucket_is_level_one() {
        let bucket = CollectionBucket::new("Nature");
        assert_eq!(bucket.count(), 0);
        assert_eq!(bucket.level(), 1);
    }

    #[test]
    fn test_level_steps_every_five_cards() {
        let mut bucket = CollectionBucket::new("Nature");
        for n in 0..4 {
            bucket.push(card(n));
        }
        assert_eq!(bucket.level(), 1);
        bucket.push(card(4));
        assert_eq!(bucket.count(), 5);
        assert_eq!(bucket.level(), 2);
        for n in 5..10 {
            bucket.push(card(n));
        }
        assert_eq!(bucket.count(), bucket.cards.len());
        assert_eq!(bucket.level(), 3);
    }
}
