//! The swipe pipeline: pointer gestures become swipes, swipes become effects,
//! and the deck keeps a card in front of the user.

pub mod deck;
pub mod gesture;
pub mod reducer;
