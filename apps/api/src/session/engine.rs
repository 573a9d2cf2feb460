use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::content::{ContentError, ContentSource, GeneratedProfile, LiveMatch};
use crate::errors::AppError;
use crate::models::card::{Card, CardType, Rarity};
use crate::models::conversation::Conversation;
use crate::session::views::{GestureOutcome, ProfileView, Snapshot, SwipeReport, ThemesView};
use crate::session::{Command, Event, Reply};
use crate::store::{already_onboarded, AppStore};
use crate::swipe::deck::{DeckManager, DeckView, FetchTicket};
use crate::swipe::gesture::{Direction, GestureClassifier, GestureState, Offset, Point, Release};
use crate::swipe::reducer::reduce;

pub const DEFAULT_THEMES: [&str; 9] = [
    "Humor",
    "Tech",
    "Travel",
    "Deep Thoughts",
    "Startups",
    "Foodie",
    "Music",
    "Cinema",
    "Nature",
];
pub const INITIAL_THEME: &str = "Humor";

/// Owns the classifier, the deck and the store. Only ever touched from the
/// task running [`SessionEngine::run`].
pub struct SessionEngine {
    content: Arc<dyn ContentSource>,
    /// Loopback for content completions. Weak so the engine stops once every
    /// handle and in-flight call is gone.
    events: mpsc::WeakSender<Event>,
    settle: Duration,
    classifier: GestureClassifier,
    deck: DeckManager,
    themes: Vec<String>,
    store: AppStore,
}

fn token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn respond<T>(reply: Reply<T>, result: Result<T, AppError>) {
    // The requester may have gone away; nothing to do then.
    let _ = reply.send(result);
}

impl SessionEngine {
    pub fn new(
        content: Arc<dyn ContentSource>,
        events: mpsc::WeakSender<Event>,
        settle: Duration,
    ) -> Self {
        Self {
            content,
            events,
            settle,
            classifier: GestureClassifier::new(),
            deck: DeckManager::new(),
            themes: DEFAULT_THEMES.iter().map(|t| t.to_string()).collect(),
            store: AppStore::new(),
        }
    }

    pub async fn run(mut self, mut events: mpsc::Receiver<Event>) {
        self.activate(INITIAL_THEME);
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        info!("session engine stopped");
    }

    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Command(command) => self.handle_command(command),
            Event::DeckFetched { ticket, result } => {
                if let Some(next) = self.deck.complete(&ticket, result) {
                    self.spawn_fetch(next);
                }
            }
            Event::ProfileGenerated {
                onboarding,
                result,
                reply,
            } => respond(reply, self.profile_generated(onboarding, result)),
            Event::LiveMatchFound {
                theme,
                result,
                reply,
            } => respond(reply, self.live_match_found(&theme, result)),
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Onboard { interests, reply } => self.onboard(interests, reply),
            Command::RefineProfile { edit, reply } => self.refine_profile(edit, reply),
            Command::Profile { reply } => respond(reply, self.profile_view()),
            Command::Themes { reply } => respond(reply, Ok(self.themes_view())),
            Command::SelectTheme { theme, reply } => respond(reply, self.select_theme(&theme)),
            Command::AddTheme { theme, reply } => respond(reply, self.add_theme(&theme)),
            Command::Deck { reply } => respond(reply, Ok(self.deck.view())),
            Command::RetryDeck { reply } => {
                if let Some(ticket) = self.deck.refill() {
                    self.spawn_fetch(ticket);
                }
                respond(reply, Ok(self.deck.view()))
            }
            Command::PointerDown { at, reply } => respond(reply, self.pointer_down(at)),
            Command::PointerMove { at, reply } => respond(reply, Ok(self.classifier.track(at))),
            Command::PointerUp { reply } => respond(reply, self.pointer_up()),
            Command::Swipe { direction, reply } => {
                self.classifier.reset();
                respond(reply, self.resolve(direction))
            }
            Command::Collections { reply } => {
                respond(reply, Ok(self.store.collections().to_vec()))
            }
            Command::Conversations { reply } => {
                respond(reply, Ok(self.store.conversations().list().to_vec()))
            }
            Command::Conversation { id, reply } => {
                let found = self.store.conversations().get(&id).cloned();
                respond(
                    reply,
                    found.ok_or_else(|| AppError::NotFound(format!("Conversation {id} not found"))),
                )
            }
            Command::SendMessage {
                conversation_id,
                text,
                reply,
            } => respond(reply, self.send_message(&conversation_id, &text)),
            Command::StartLiveChat { theme, reply } => self.start_live_chat(theme, reply),
            Command::CompleteQuiz { quiz, reply } => {
                let result = self.store.complete_quiz(quiz).map(|_| ());
                respond(reply, result.and_then(|_| self.profile_view()))
            }
            Command::Snapshot { reply } => respond(reply, Ok(self.snapshot())),
            Command::Contribute {
                content,
                card_type,
                rarity,
                reply,
            } => respond(reply, self.contribute(&content, &card_type, rarity)),
        }
    }

    // ── Deck ────────────────────────────────────────────────────────────────

    fn activate(&mut self, theme: &str) {
        if self.deck.theme() != Some(theme) {
            self.classifier.reset();
        }
        if let Some(ticket) = self.deck.activate(theme) {
            self.spawn_fetch(ticket);
        }
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let Some(events) = self.events.upgrade() else {
            warn!("session closing; not fetching cards for '{}'", ticket.theme);
            return;
        };
        let content = Arc::clone(&self.content);
        tokio::spawn(async move {
            let result = content.generate_deck(&ticket.theme).await;
            let _ = events.send(Event::DeckFetched { ticket, result }).await;
        });
    }

    fn themes_view(&self) -> ThemesView {
        ThemesView {
            themes: self.themes.clone(),
            active: self.deck.theme().map(str::to_string),
        }
    }

    fn select_theme(&mut self, theme: &str) -> Result<DeckView, AppError> {
        let theme = theme.trim();
        if !self.themes.iter().any(|t| t == theme) {
            return Err(AppError::NotFound(format!("Theme '{theme}' is not available")));
        }
        self.activate(theme);
        Ok(self.deck.view())
    }

    fn add_theme(&mut self, theme: &str) -> Result<ThemesView, AppError> {
        let theme = theme.trim();
        if theme.is_empty() {
            return Err(AppError::Validation("theme cannot be empty".to_string()));
        }
        if !self.themes.iter().any(|t| t == theme) {
            self.themes.insert(0, theme.to_string());
        }
        self.activate(theme);
        Ok(self.themes_view())
    }

    // ── Gestures and swipes ─────────────────────────────────────────────────

    fn pointer_down(&mut self, at: Point) -> Result<Offset, AppError> {
        if self.deck.current().is_none() {
            return Err(AppError::Conflict("no card to swipe yet".to_string()));
        }
        if let GestureState::Dragging { anchor, .. } = self.classifier.state() {
            debug!("pointer already down at ({}, {}); keeping anchor", anchor.x, anchor.y);
        }
        self.classifier.press(at);
        Ok(self.classifier.offset())
    }

    fn pointer_up(&mut self) -> Result<GestureOutcome, AppError> {
        match self.classifier.release() {
            Release::Cancelled => Ok(GestureOutcome::Cancelled),
            Release::Resolved(direction) => self.resolve(direction).map(GestureOutcome::Swiped),
        }
    }

    /// Applies a swipe on the current card: reduce, write the store, advance.
    fn resolve(&mut self, direction: Direction) -> Result<SwipeReport, AppError> {
        let card = self
            .deck
            .current()
            .cloned()
            .ok_or_else(|| AppError::Conflict("no card to swipe yet".to_string()))?;

        let effects = reduce(direction, &card, self.store.profile(), &token());
        if effects.is_noop() {
            debug!("passed on card {}", card.id);
        } else {
            self.store.apply_swipe(&effects);
            if let Some(bucket) = self.store.bucket(&card.theme) {
                debug!(
                    "collected card {} into '{}' ({} cards, level {})",
                    card.id,
                    bucket.theme,
                    bucket.count(),
                    bucket.level()
                );
            }
        }

        if let Some(ticket) = self.deck.advance() {
            self.spawn_fetch(ticket);
        }

        Ok(SwipeReport {
            card,
            effects,
            karma: self.store.profile().map(|p| p.karma),
            deck: self.deck.view(),
            settle_ms: self.settle.as_millis() as u64,
        })
    }

    // ── Profile ─────────────────────────────────────────────────────────────

    fn profile_view(&self) -> Result<ProfileView, AppError> {
        let profile = self
            .store
            .profile()
            .cloned()
            .ok_or_else(|| AppError::NotFound("No profile yet".to_string()))?;
        Ok(ProfileView {
            level: profile.level(),
            completeness: profile.completeness(),
            profile,
            connections: self.store.connections().to_vec(),
            groups: self.store.groups().to_vec(),
        })
    }

    fn onboard(&mut self, interests: Vec<String>, reply: Reply<ProfileView>) {
        if self.store.profile().is_some() {
            respond(reply, Err(already_onboarded()));
            return;
        }
        let interests: Vec<String> = interests
            .into_iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        if interests.is_empty() {
            respond(
                reply,
                Err(AppError::Validation(
                    "You must select at least one interest to start.".to_string(),
                )),
            );
            return;
        }

        let joined = interests.join(", ");
        self.spawn_profile(joined, None, Some(interests), reply);
    }

    fn refine_profile(&mut self, edit: String, reply: Reply<ProfileView>) {
        let Some(profile) = self.store.profile() else {
            respond(
                reply,
                Err(AppError::Conflict(
                    "complete onboarding to create a profile first".to_string(),
                )),
            );
            return;
        };
        if edit.trim().is_empty() {
            respond(
                reply,
                Err(AppError::Validation("edit request cannot be empty".to_string())),
            );
            return;
        }
        let interests = profile.interests.join(", ");
        self.spawn_profile(interests, Some(edit), None, reply);
    }

    fn spawn_profile(
        &self,
        interests: String,
        edit: Option<String>,
        onboarding: Option<Vec<String>>,
        reply: Reply<ProfileView>,
    ) {
        let Some(events) = self.events.upgrade() else {
            respond(reply, Err(AppError::Internal(anyhow::anyhow!("session closing"))));
            return;
        };
        let content = Arc::clone(&self.content);
        tokio::spawn(async move {
            let result = content.generate_profile(&interests, edit.as_deref()).await;
            let _ = events
                .send(Event::ProfileGenerated {
                    onboarding,
                    result,
                    reply,
                })
                .await;
        });
    }

    fn profile_generated(
        &mut self,
        onboarding: Option<Vec<String>>,
        result: Result<GeneratedProfile, ContentError>,
    ) -> Result<ProfileView, AppError> {
        let GeneratedProfile {
            mut profile,
            connections,
            groups,
        } = result?;

        match onboarding {
            Some(interests) => {
                if profile.interests.is_empty() {
                    profile.interests = interests;
                }
                self.store.install_profile(profile, connections, groups)?;
            }
            None => {
                self.store.refine_profile(profile, connections, groups)?;
            }
        }
        self.profile_view()
    }

    // ── Conversations ───────────────────────────────────────────────────────

    fn send_message(&mut self, conversation_id: &str, text: &str) -> Result<Conversation, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("message cannot be empty".to_string()));
        }
        self.store
            .conversations_mut()
            .send_message(conversation_id, token(), text, Utc::now())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Conversation {conversation_id} not found")))
    }

    fn start_live_chat(&mut self, theme: Option<String>, reply: Reply<Conversation>) {
        let Some(karma) = self.store.profile().map(|p| p.karma) else {
            respond(
                reply,
                Err(AppError::Conflict(
                    "complete onboarding to create a profile first".to_string(),
                )),
            );
            return;
        };
        let theme = theme
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| self.deck.theme().map(str::to_string))
            .unwrap_or_else(|| INITIAL_THEME.to_string());

        let Some(events) = self.events.upgrade() else {
            respond(reply, Err(AppError::Internal(anyhow::anyhow!("session closing"))));
            return;
        };
        let content = Arc::clone(&self.content);
        tokio::spawn(async move {
            let result = content.generate_live_match(&theme, karma).await;
            let _ = events
                .send(Event::LiveMatchFound {
                    theme,
                    result,
                    reply,
                })
                .await;
        });
    }

    fn live_match_found(
        &mut self,
        theme: &str,
        result: Result<LiveMatch, ContentError>,
    ) -> Result<Conversation, AppError> {
        let live = result?;
        info!("live chat opened with {} in '{}'", live.name, theme);
        let conversation = self.store.conversations_mut().open_live(
            format!("live-{}", token()),
            &live.name,
            &live.message,
            theme,
            Utc::now(),
        );
        Ok(conversation.clone())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            profile: self.profile_view().ok(),
            themes: self.themes_view(),
            deck: self.deck.view(),
            collections: self.store.collections().to_vec(),
            conversations: self.store.conversations().list().to_vec(),
        }
    }

    // ── Contributions ───────────────────────────────────────────────────────

    fn contribute(
        &mut self,
        content: &str,
        card_type: &str,
        rarity: Rarity,
    ) -> Result<Card, AppError> {
        let theme = self.deck.theme().unwrap_or(INITIAL_THEME).to_string();
        self.store.contribute(
            format!("custom-{}", token()),
            content,
            CardType::from_label(card_type),
            rarity,
            &theme,
        )
    }
}
