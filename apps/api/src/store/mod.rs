//! Application store: the single owner of Profile, Collections and
//! Conversations. Swipes reach it only through [`AppStore::apply_swipe`].

pub mod conversations;

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::card::{Card, CardType, Rarity};
use crate::models::collection::CollectionBucket;
use crate::models::profile::{Connection, Group, Profile, Quiz};
use crate::store::conversations::ConversationStore;
use crate::swipe::reducer::SwipeEffects;

/// Karma granted for authoring a card.
pub const CONTRIBUTION_KARMA: u32 = 50;

#[derive(Debug, Default, Clone, Serialize)]
pub struct AppStore {
    profile: Option<Profile>,
    collections: Vec<CollectionBucket>,
    conversations: ConversationStore,
    connections: Vec<Connection>,
    groups: Vec<Group>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn collections(&self) -> &[CollectionBucket] {
        &self.collections
    }

    pub fn bucket(&self, theme: &str) -> Option<&CollectionBucket> {
        self.collections.iter().find(|b| b.theme == theme)
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    pub fn conversations_mut(&mut self) -> &mut ConversationStore {
        &mut self.conversations
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Writes every effect of one swipe.
    pub fn apply_swipe(&mut self, effects: &SwipeEffects) {
        if let Some(card) = &effects.collected {
            self.collect(card.clone());
        }
        if let Some(conversation) = &effects.new_match {
            info!("new match: {}", conversation.name);
            self.conversations.prepend(conversation.clone());
        }
        if let Some(profile) = self.profile.as_mut() {
            profile.karma = profile.karma.saturating_add(effects.karma_delta);
        }
    }

    fn collect(&mut self, card: Card) {
        let index = match self.collections.iter().position(|b| b.theme == card.theme) {
            Some(index) => index,
            None => {
                self.collections.push(CollectionBucket::new(card.theme.clone()));
                self.collections.len() - 1
            }
        };
        self.collections[index].push(card);
    }

    /// Installs a freshly generated profile along with its suggested
    /// connections and groups. Only the first profile is accepted; later
    /// changes go through [`AppStore::refine_profile`].
    pub fn install_profile(
        &mut self,
        mut profile: Profile,
        connections: Vec<Connection>,
        groups: Vec<Group>,
    ) -> Result<&Profile, AppError> {
        if self.profile.is_some() {
            return Err(already_onboarded());
        }
        profile.contributions.clear();
        info!("profile installed for '{}'", profile.name);
        self.connections = connections;
        self.groups = groups;
        Ok(self.profile.insert(profile))
    }

    /// Replaces the generated text of the profile. Karma, badges and
    /// contributions carry over so karma never goes down.
    pub fn refine_profile(
        &mut self,
        generated: Profile,
        connections: Vec<Connection>,
        groups: Vec<Group>,
    ) -> Result<&Profile, AppError> {
        let current = self.profile.as_mut().ok_or_else(profile_required)?;
        let Profile {
            name,
            summary,
            about_me,
            looking_for,
            offering,
            interests,
            ..
        } = generated;
        current.name = name;
        current.summary = summary;
        current.about_me = about_me.or(current.about_me.take());
        current.looking_for = looking_for;
        current.offering = offering;
        if !interests.is_empty() {
            current.interests = interests;
        }
        self.connections = connections;
        self.groups = groups;
        Ok(&*current)
    }

    pub fn complete_quiz(&mut self, quiz: Quiz) -> Result<&Profile, AppError> {
        let profile = self.profile.as_mut().ok_or_else(profile_required)?;
        profile.karma = profile.karma.saturating_add(quiz.karma());
        profile.award_badge(quiz.badge());
        info!("quiz '{}' completed, karma now {}", quiz.title(), profile.karma);
        Ok(&*profile)
    }

    /// Records a user-authored card on the profile. Contributions never enter
    /// the active deck.
    pub fn contribute(
        &mut self,
        id: String,
        content: &str,
        card_type: CardType,
        rarity: Rarity,
        theme: &str,
    ) -> Result<Card, AppError> {
        if content.trim().is_empty() {
            return Err(AppError::Validation(
                "card content cannot be empty".to_string(),
            ));
        }
        let profile = self.profile.as_mut().ok_or_else(profile_required)?;
        let card = Card {
            id,
            card_type,
            content: content.to_string(),
            sub_content: None,
            theme: theme.to_string(),
            rarity,
        };
        profile.contributions.insert(0, card.clone());
        profile.karma = profile.karma.saturating_add(CONTRIBUTION_KARMA);
        Ok(card)
    }
}

pub fn already_onboarded() -> AppError {
    AppError::Conflict("a profile already exists; refine it instead".to_string())
}

fn profile_required() -> AppError {
    AppError::Conflict("complete onboarding to create a profile first".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::STARTING_KARMA;
    use crate::swipe::gesture::Direction;
    use crate::swipe::reducer::reduce;

    fn profile(karma: u32) -> Profile {
        Profile {
            name: "Wanderer".to_string(),
            summary: "Collects odd facts.".to_string(),
            about_me: Some("Former librarian.".to_string()),
            looking_for: "Trivia nights".to_string(),
            offering: "Obscure knowledge".to_string(),
            karma,
            interests: vec!["trivia".to_string()],
            badges: vec![],
            contributions: vec![],
        }
    }

    fn card(id: &str, card_type: CardType, rarity: Rarity, theme: &str) -> Card {
        Card {
            id: id.to_string(),
            card_type,
            content: "Jun, amateur astronomer, night owl".to_string(),
            sub_content: None,
            theme: theme.to_string(),
            rarity,
        }
    }

    fn onboarded(karma: u32) -> AppStore {
        let mut store = AppStore::new();
        store.install_profile(profile(karma), vec![], vec![]).unwrap();
        store
    }

    fn swipe(store: &mut AppStore, direction: Direction, card: &Card) -> SwipeEffects {
        let effects = reduce(direction, card, store.profile(), "tok");
        store.apply_swipe(&effects);
        effects
    }

    #[test]
    fn test_collect_creates_bucket_then_appends() {
        let mut store = onboarded(STARTING_KARMA);
        swipe(&mut store, Direction::Right, &card("a", CardType::Fact, Rarity::Common, "Nature"));
        let bucket = store.bucket("Nature").unwrap();
        assert_eq!(bucket.count(), 1);
        assert_eq!(bucket.level(), 1);

        for n in 0..4 {
            let c = card(&format!("n{n}"), CardType::Fact, Rarity::Common, "Nature");
            swipe(&mut store, Direction::Up, &c);
        }
        let bucket = store.bucket("Nature").unwrap();
        assert_eq!(bucket.count(), 5);
        assert_eq!(bucket.level(), 2);
        assert_eq!(store.collections().len(), 1);
    }

    #[test]
    fn test_buckets_are_per_theme() {
        let mut store = onboarded(STARTING_KARMA);
        swipe(&mut store, Direction::Right, &card("a", CardType::Fact, Rarity::Common, "Nature"));
        swipe(&mut store, Direction::Right, &card("b", CardType::Joke, Rarity::Common, "Humor"));
        assert_eq!(store.collections().len(), 2);
        assert_eq!(store.bucket("Humor").unwrap().count(), 1);
    }

    #[test]
    fn test_left_swipe_changes_nothing() {
        let mut store = onboarded(STARTING_KARMA);
        let before = serde_json::to_value(&store).unwrap();
        swipe(&mut store, Direction::Left, &card("a", CardType::Person, Rarity::Legendary, "Tech"));
        assert_eq!(serde_json::to_value(&store).unwrap(), before);
    }

    #[test]
    fn test_person_like_scenario() {
        let mut store = onboarded(30);
        let card_a = card("a", CardType::Person, Rarity::Common, "Tech");
        swipe(&mut store, Direction::Right, &card_a);

        assert_eq!(store.profile().unwrap().karma, 32);
        assert_eq!(store.conversations().list().len(), 1);
        let conv = &store.conversations().list()[0];
        assert_eq!(conv.name, "Jun");
        assert_eq!(conv.unread_count, 1);
        assert!(conv.messages.is_empty());
        let bucket = store.bucket("Tech").unwrap();
        assert_eq!((bucket.count(), bucket.level()), (1, 1));
    }

    #[test]
    fn test_super_like_scenario() {
        let mut store = onboarded(30);
        let card_b = card("b", CardType::Quote, Rarity::Rare, "Tech");
        swipe(&mut store, Direction::Up, &card_b);

        assert_eq!(store.profile().unwrap().karma, 40);
        assert!(store.conversations().list().is_empty());
        let bucket = serde_json::to_value(store.bucket("Tech").unwrap()).unwrap();
        assert_eq!(bucket["cards"][0]["rarity"], "legendary");
    }

    #[test]
    fn test_collect_without_profile() {
        let mut store = AppStore::new();
        swipe(&mut store, Direction::Right, &card("a", CardType::Fact, Rarity::Common, "Tech"));
        assert!(store.profile().is_none());
        assert_eq!(store.bucket("Tech").unwrap().count(), 1);
    }

    #[test]
    fn test_quiz_adds_karma_and_badge_once() {
        let mut store = onboarded(30);
        store.complete_quiz(Quiz::Hobbies).unwrap();
        let p = store.complete_quiz(Quiz::Hobbies).unwrap();
        assert_eq!(p.karma, 90);
        assert_eq!(p.badges, vec!["Explorer".to_string()]);
    }

    #[test]
    fn test_second_profile_is_rejected() {
        let mut store = onboarded(30);
        store.complete_quiz(Quiz::Character).unwrap();
        let result = store.install_profile(profile(STARTING_KARMA), vec![], vec![]);
        assert!(matches!(result, Err(AppError::Conflict(_))));
        let p = store.profile().unwrap();
        assert_eq!(p.karma, 70);
        assert_eq!(p.badges, vec!["Deep Soul".to_string()]);
    }

    #[test]
    fn test_karma_saturates_instead_of_wrapping() {
        let mut store = onboarded(u32::MAX - 5);
        let p = store.complete_quiz(Quiz::Social).unwrap();
        assert_eq!(p.karma, u32::MAX);
        let card = store
            .contribute("c1".to_string(), "Still here.", CardType::Quote, Rarity::Common, "Tech")
            .unwrap();
        assert_eq!(card.id, "c1");
        assert_eq!(store.profile().unwrap().karma, u32::MAX);
        swipe(&mut store, Direction::Up, &card);
        assert_eq!(store.profile().unwrap().karma, u32::MAX);
    }

    #[test]
    fn test_quiz_requires_profile() {
        let mut store = AppStore::new();
        assert!(matches!(
            store.complete_quiz(Quiz::Social),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_contribution_prepends_and_rewards() {
        let mut store = onboarded(30);
        store
            .contribute("custom-1".into(), "first", CardType::Quote, Rarity::Common, "Humor")
            .unwrap();
        let card = store
            .contribute(
                "custom-2".into(),
                "second",
                CardType::from_label(""),
                Rarity::Rare,
                "Humor",
            )
            .unwrap();
        assert_eq!(card.card_type, CardType::Custom("Custom".to_string()));
        let p = store.profile().unwrap();
        assert_eq!(p.karma, 130);
        assert_eq!(p.contributions[0].id, "custom-2");
        assert_eq!(p.contributions[1].theme, "Humor");
    }

    #[test]
    fn test_blank_contribution_rejected() {
        let mut store = onboarded(30);
        let err = store
            .contribute("c".into(), "  ", CardType::Joke, Rarity::Common, "Humor")
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.profile().unwrap().karma, 30);
    }

    #[test]
    fn test_refine_keeps_karma_badges_and_contributions() {
        let mut store = onboarded(30);
        store.complete_quiz(Quiz::Character).unwrap();
        store
            .contribute("custom-1".into(), "mine", CardType::Fact, Rarity::Common, "Tech")
            .unwrap();

        let mut regenerated = profile(30);
        regenerated.name = "Stargazer".to_string();
        regenerated.about_me = None;
        regenerated.interests = vec![];
        let p = store.refine_profile(regenerated, vec![], vec![]).unwrap();

        assert_eq!(p.name, "Stargazer");
        assert_eq!(p.karma, 120);
        assert_eq!(p.badges, vec!["Deep Soul".to_string()]);
        assert_eq!(p.contributions.len(), 1);
        assert_eq!(p.about_me.as_deref(), Some("Former librarian."));
        assert_eq!(p.interests, vec!["trivia".to_string()]);
    }
}
