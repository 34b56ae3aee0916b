//! Game simulation modules

pub mod combat;
pub mod gesture;
pub mod r#match;
pub mod physics;
pub mod player;
pub mod rules;
pub mod snapshot;

pub use gesture::{ActionKind, CombatAction, GestureRecognizer};
pub use player::{PlayerId, PlayerState};
pub use r#match::{GameMatch, MatchCommand, MatchError, MatchHandle, MatchOutcome, MatchState, MatchStatus};

use serde::{Deserialize, Serialize};

use crate::pose::Skeleton;

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Everything the simulation needs for one rendered frame
#[derive(Debug, Clone)]
pub struct FrameInput {
    /// Frame clock in milliseconds, sampled once per frame
    pub timestamp_ms: f64,
    pub canvas: CanvasSize,
    pub skeletons: Vec<Skeleton>,
}
