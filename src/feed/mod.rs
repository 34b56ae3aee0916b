//! Landmark feed: the engine's view of the external pose model

pub mod protocol;
pub mod source;

pub use protocol::{FeedMsg, GameEvent, MatchMsg, MatchStats, PlayerMatchStats};
pub use source::{FeedError, LandmarkFeed};
