pub mod card;
pub mod collection;
pub mod conversation;
pub mod profile;
