use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-tier quality tag. Drives karma reward and visual treatment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Legendary,
}

/// Card category. The four built-in kinds plus any user-defined label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CardType {
    Person,
    Quote,
    Fact,
    Joke,
    Custom(String),
}

impl CardType {
    pub fn as_str(&self) -> &str {
        match self {
            CardType::Person => "person",
            CardType::Quote => "quote",
            CardType::Fact => "fact",
            CardType::Joke => "joke",
            CardType::Custom(label) => label,
        }
    }

    /// Builds a type from a user-supplied label. Blank labels become `Custom`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() {
            CardType::Custom("Custom".to_string())
        } else {
            CardType::from(label.to_string())
        }
    }
}

impl From<String> for CardType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "person" => CardType::Person,
            "quote" => CardType::Quote,
            "fact" => CardType::Fact,
            "joke" => CardType::Joke,
            _ => CardType::Custom(value),
        }
    }
}

impl From<CardType> for String {
    fn from(value: CardType) -> Self {
        match value {
            CardType::Custom(label) => label,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A collectible card. Never mutated after creation; overrides go through
/// [`Card::with_rarity`], which returns a derived copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_content: Option<String>,
    pub theme: String,
    pub rarity: Rarity,
}

impl Card {
    pub fn with_rarity(&self, rarity: Rarity) -> Card {
        Card {
            rarity,
            ..self.clone()
        }
    }

    pub fn is_person(&self) -> bool {
        self.card_type == CardType::Person
    }
}
