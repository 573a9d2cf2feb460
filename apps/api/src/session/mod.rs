//! Session: the single logical thread that owns all swipe state.
//!
//! Every request and every Content Source completion arrives as an [`Event`]
//! on one channel and is handled to completion before the next one is read,
//! so state is never shared or locked. Content calls run on their own tasks
//! and report back through the same channel.

pub mod engine;
pub mod handlers;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::{mpsc, oneshot};

use crate::content::{ContentError, ContentSource, GeneratedProfile, LiveMatch};
use crate::errors::AppError;
use crate::models::card::{Card, Rarity};
use crate::models::collection::CollectionBucket;
use crate::models::conversation::Conversation;
use crate::models::profile::Quiz;
use crate::session::engine::SessionEngine;
use crate::session::views::{GestureOutcome, ProfileView, Snapshot, SwipeReport, ThemesView};
use crate::swipe::deck::{DeckView, FetchTicket};
use crate::swipe::gesture::{Direction, Offset, Point};

const EVENT_QUEUE: usize = 256;

pub type Reply<T> = oneshot::Sender<Result<T, AppError>>;

/// Requests from outside the session.
#[derive(Debug)]
pub enum Command {
    Onboard { interests: Vec<String>, reply: Reply<ProfileView> },
    RefineProfile { edit: String, reply: Reply<ProfileView> },
    Profile { reply: Reply<ProfileView> },
    Themes { reply: Reply<ThemesView> },
    SelectTheme { theme: String, reply: Reply<DeckView> },
    AddTheme { theme: String, reply: Reply<ThemesView> },
    Deck { reply: Reply<DeckView> },
    RetryDeck { reply: Reply<DeckView> },
    PointerDown { at: Point, reply: Reply<Offset> },
    PointerMove { at: Point, reply: Reply<Offset> },
    PointerUp { reply: Reply<GestureOutcome> },
    Swipe { direction: Direction, reply: Reply<SwipeReport> },
    Collections { reply: Reply<Vec<CollectionBucket>> },
    Conversations { reply: Reply<Vec<Conversation>> },
    Conversation { id: String, reply: Reply<Conversation> },
    SendMessage {
        conversation_id: String,
        text: String,
        reply: Reply<Conversation>,
    },
    StartLiveChat { theme: Option<String>, reply: Reply<Conversation> },
    CompleteQuiz { quiz: Quiz, reply: Reply<ProfileView> },
    Snapshot { reply: Reply<Snapshot> },
    Contribute {
        content: String,
        card_type: String,
        rarity: Rarity,
        reply: Reply<Card>,
    },
}

/// Everything the engine reacts to.
#[derive(Debug)]
pub enum Event {
    Command(Command),
    DeckFetched {
        ticket: FetchTicket,
        result: Result<Vec<Card>, ContentError>,
    },
    ProfileGenerated {
        /// Interests the user typed at onboarding; `None` when refining.
        onboarding: Option<Vec<String>>,
        result: Result<GeneratedProfile, ContentError>,
        reply: Reply<ProfileView>,
    },
    LiveMatchFound {
        theme: String,
        result: Result<LiveMatch, ContentError>,
        reply: Reply<Conversation>,
    },
}

/// Cloneable front door to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    events: mpsc::Sender<Event>,
}

impl SessionHandle {
    /// Starts a session engine on its own task.
    pub fn spawn(content: Arc<dyn ContentSource>, settle: Duration) -> SessionHandle {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE);
        let engine = SessionEngine::new(content, tx.downgrade(), settle);
        tokio::spawn(engine.run(rx));
        SessionHandle { events: tx }
    }

    async fn request<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Result<T, AppError> {
        let (reply, response) = oneshot::channel();
        self.events
            .send(Event::Command(command(reply)))
            .await
            .map_err(|_| AppError::Internal(anyhow!("session engine has stopped")))?;
        response
            .await
            .map_err(|_| AppError::Internal(anyhow!("session engine dropped the request")))?
    }

    pub async fn onboard(&self, interests: Vec<String>) -> Result<ProfileView, AppError> {
        self.request(|reply| Command::Onboard { interests, reply }).await
    }

    pub async fn refine_profile(&self, edit: String) -> Result<ProfileView, AppError> {
        self.request(|reply| Command::RefineProfile { edit, reply }).await
    }

    pub async fn profile(&self) -> Result<ProfileView, AppError> {
        self.request(|reply| Command::Profile { reply }).await
    }

    pub async fn themes(&self) -> Result<ThemesView, AppError> {
        self.request(|reply| Command::Themes { reply }).await
    }

    pub async fn select_theme(&self, theme: String) -> Result<DeckView, AppError> {
        self.request(|reply| Command::SelectTheme { theme, reply }).await
    }

    pub async fn add_theme(&self, theme: String) -> Result<ThemesView, AppError> {
        self.request(|reply| Command::AddTheme { theme, reply }).await
    }

    pub async fn deck(&self) -> Result<DeckView, AppError> {
        self.request(|reply| Command::Deck { reply }).await
    }

    pub async fn retry_deck(&self) -> Result<DeckView, AppError> {
        self.request(|reply| Command::RetryDeck { reply }).await
    }

    pub async fn pointer_down(&self, at: Point) -> Result<Offset, AppError> {
        self.request(|reply| Command::PointerDown { at, reply }).await
    }

    pub async fn pointer_move(&self, at: Point) -> Result<Offset, AppError> {
        self.request(|reply| Command::PointerMove { at, reply }).await
    }

    pub async fn pointer_up(&self) -> Result<GestureOutcome, AppError> {
        self.request(|reply| Command::PointerUp { reply }).await
    }

    pub async fn swipe(&self, direction: Direction) -> Result<SwipeReport, AppError> {
        self.request(|reply| Command::Swipe { direction, reply }).await
    }

    pub async fn collections(&self) -> Result<Vec<CollectionBucket>, AppError> {
        self.request(|reply| Command::Collections { reply }).await
    }

    pub async fn conversations(&self) -> Result<Vec<Conversation>, AppError> {
        self.request(|reply| Command::Conversations { reply }).await
    }

    pub async fn conversation(&self, id: String) -> Result<Conversation, AppError> {
        self.request(|reply| Command::Conversation { id, reply }).await
    }

    pub async fn send_message(
        &self,
        conversation_id: String,
        text: String,
    ) -> Result<Conversation, AppError> {
        self.request(|reply| Command::SendMessage {
            conversation_id,
            text,
            reply,
        })
        .await
    }

    pub async fn start_live_chat(&self, theme: Option<String>) -> Result<Conversation, AppError> {
        self.request(|reply| Command::StartLiveChat { theme, reply }).await
    }

    pub async fn complete_quiz(&self, quiz: Quiz) -> Result<ProfileView, AppError> {
        self.request(|reply| Command::CompleteQuiz { quiz, reply }).await
    }

    pub async fn snapshot(&self) -> Result<Snapshot, AppError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn contribute(
        &self,
        content: String,
        card_type: String,
        rarity: Rarity,
    ) -> Result<Card, AppError> {
        self.request(|reply| Command::Contribute {
            content,
            card_type,
            rarity,
            reply,
        })
        .await
    }
}
