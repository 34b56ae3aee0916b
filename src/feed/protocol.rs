//! Feed and presentation message definitions
//! These are the wire types between the engine and its external collaborators

use serde::{Deserialize, Serialize};

use crate::game::combat::{HitResult, Projectile};
use crate::game::gesture::CombatAction;
use crate::game::player::{PlayerId, PlayerState};
use crate::game::{CanvasSize, FrameInput, MatchOutcome, MatchStatus};
use crate::pose::Skeleton;

/// Messages read from the landmark feed, one JSON object per line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMsg {
    /// Pose model output for one rendered frame
    Frame {
        /// Frame clock; the driver's own clock is used when absent
        #[serde(default)]
        timestamp_ms: Option<f64>,
        /// Canvas size; configured defaults are used when absent
        #[serde(default)]
        width: Option<f32>,
        #[serde(default)]
        height: Option<f32>,
        /// Zero or more detected people
        #[serde(default)]
        skeletons: Vec<Skeleton>,
    },

    /// Reset all per-match state
    Restart,
}

impl FeedMsg {
    /// Build a frame input, filling gaps from the driver's defaults
    pub fn into_frame(self, defaults: CanvasSize, clock_ms: f64) -> Option<FrameInput> {
        match self {
            FeedMsg::Frame {
                timestamp_ms,
                width,
                height,
                skeletons,
            } => Some(FrameInput {
                timestamp_ms: timestamp_ms.unwrap_or(clock_ms),
                canvas: CanvasSize {
                    width: width.unwrap_or(defaults.width),
                    height: height.unwrap_or(defaults.height),
                },
                skeletons,
            }),
            FeedMsg::Restart => None,
        }
    }
}

/// Messages sent from the match to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchMsg {
    /// State after a frame
    Snapshot {
        frame: u64,
        status: MatchStatus,
        players: Vec<PlayerState>,
        projectiles: Vec<Projectile>,
        /// Events since the previous snapshot
        events: Vec<GameEvent>,
    },

    /// Match reached gameover
    MatchEnd {
        outcome: MatchOutcome,
        stats: MatchStats,
    },
}

/// Game events (actions, hits, lifecycle)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Match status changed
    StatusChanged { status: MatchStatus },

    /// Both players detected, fighting begins
    MatchStarted { frame: u64 },

    /// Gesture recognized and projectile(s) spawned
    ActionPerformed {
        action: CombatAction,
        projectile_ids: Vec<u64>,
    },

    /// Projectile reached its target
    Hit(HitResult),

    /// Match over
    MatchEnded { outcome: MatchOutcome },

    /// Short-lived label for the HUD
    Notification { text: String },
}

impl GameEvent {
    pub fn notification(text: impl Into<String>) -> Self {
        GameEvent::Notification { text: text.into() }
    }
}

/// Match statistics at end
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub frames_played: u64,
    pub player_stats: Vec<PlayerMatchStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    pub player: PlayerId,
    pub punches: u32,
    pub slashes: u32,
    pub area_attacks: u32,
    pub specials: u32,
    pub hits_landed: u32,
    pub hits_blocked: u32,
    pub damage_dealt: i32,
    pub damage_taken: i32,
}

impl PlayerMatchStats {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            punches: 0,
            slashes: 0,
            area_attacks: 0,
            specials: 0,
            hits_landed: 0,
            hits_blocked: 0,
            damage_dealt: 0,
            damage_taken: 0,
        }
    }
}
