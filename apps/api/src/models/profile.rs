use serde::{Deserialize, Serialize};

use crate::models::card::Card;

/// Karma every freshly generated profile starts with.
pub const STARTING_KARMA: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
    pub looking_for: String,
    pub offering: String,
    #[serde(default)]
    pub karma: u32,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub contributions: Vec<Card>,
}

impl Profile {
    /// User level shown next to the theme picker.
    pub fn level(&self) -> u32 {
        self.karma / 10 + 1
    }

    /// Rough 0-100 score of how filled-in the profile is.
    pub fn completeness(&self) -> u32 {
        let mut score = 0;
        if self.summary.chars().count() > 5 {
            score += 10;
        }
        if self
            .about_me
            .as_deref()
            .is_some_and(|about| about.chars().count() > 10)
        {
            score += 20;
        }
        if self.looking_for.chars().count() > 5 {
            score += 15;
        }
        if self.offering.chars().count() > 5 {
            score += 15;
        }
        if self.interests.len() >= 5 {
            score += 20;
        }
        if !self.badges.is_empty() {
            score += 20;
        }
        score.min(100)
    }

    /// Adds a badge unless the profile already carries it.
    pub fn award_badge(&mut self, badge: &str) {
        if !self.badges.iter().any(|b| b == badge) {
            self.badges.push(badge.to_string());
        }
    }
}

/// A generated persona that shares the user's interests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub name: String,
    pub bio: String,
    #[serde(default)]
    pub shared_interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub author: String,
    pub content: String,
    pub time_ago: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// Fixed personality quizzes. Completing one grants karma and a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quiz {
    Hobbies,
    Character,
    Social,
}

impl Quiz {
    pub fn title(self) -> &'static str {
        match self {
            Quiz::Hobbies => "The Adventurer",
            Quiz::Character => "The Philosopher",
            Quiz::Social => "The Socialite",
        }
    }

    pub fn karma(self) -> u32 {
        match self {
            Quiz::Hobbies => 30,
            Quiz::Character => 40,
            Quiz::Social => 35,
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Quiz::Hobbies => "Explorer",
            Quiz::Character => "Deep Soul",
            Quiz::Social => "Connector",
        }
    }
}
