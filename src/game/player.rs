//! Per-player state: health, cooldowns, charge and motion history

use serde::{Deserialize, Serialize};

use crate::pose::Point;

use super::rules::{HIT_FLASH_DURATION, MAX_HP};

/// Logical player slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    /// Visual left, fires toward video-left
    #[serde(rename = "1")]
    One,
    /// Visual right, fires toward video-right
    #[serde(rename = "2")]
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Horizontal sign of this player's projectiles in pixel space
    pub fn direction(self) -> f32 {
        match self {
            PlayerId::One => -1.0,
            PlayerId::Two => 1.0,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

/// Frame-counted refractory periods, one per attack family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldowns {
    pub punch: u32,
    pub sword: u32,
    pub area: u32,
}

impl Cooldowns {
    /// Advance one frame; each counter stops at zero
    pub fn tick(&mut self) {
        self.punch = self.punch.saturating_sub(1);
        self.sword = self.sword.saturating_sub(1);
        self.area = self.area.saturating_sub(1);
    }

    pub fn all_ready(&self) -> bool {
        self.punch == 0 && self.sword == 0 && self.area == 0
    }
}

/// Held special-attack charge
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub active: bool,
    /// 0.0 to 1.0
    pub progress: f32,
    pub complete: bool,
    /// Milliseconds on the frame clock when the charge began
    pub start_time: f64,
}

impl Charge {
    /// Begin charging if not already active
    pub fn begin(&mut self, now_ms: f64) {
        if !self.active {
            *self = Self {
                active: true,
                progress: 0.0,
                complete: false,
                start_time: now_ms,
            };
        }
    }

    /// Recompute progress from elapsed time. Progress never decreases while
    /// active, even if the clock steps backwards.
    pub fn advance(&mut self, now_ms: f64, duration_ms: f64) {
        let elapsed = (now_ms - self.start_time).max(0.0);
        let progress = (elapsed / duration_ms).min(1.0) as f32;
        self.progress = self.progress.max(progress);
        if self.progress >= 1.0 {
            self.complete = true;
        }
    }

    /// Drop the charge entirely
    pub fn cancel(&mut self) {
        self.active = false;
        self.progress = 0.0;
        self.complete = false;
    }
}

/// Authoritative player state for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    /// May go below zero on the frame of defeat
    pub hp: i32,
    pub max_hp: i32,
    /// Recomputed by the recognizer every frame the player is tracked
    pub is_blocking: bool,
    pub is_hit: bool,
    pub hit_timer: u32,
    pub cooldowns: Cooldowns,
    pub charge: Charge,
}

impl PlayerState {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            hp: MAX_HP,
            max_hp: MAX_HP,
            is_blocking: false,
            is_hit: false,
            hit_timer: 0,
            cooldowns: Cooldowns::default(),
            charge: Charge::default(),
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// Per-frame bookkeeping before gesture recognition
    pub fn begin_frame(&mut self) {
        if self.hit_timer > 0 {
            self.hit_timer -= 1;
        } else {
            self.is_hit = false;
        }
        self.is_blocking = false;
        self.cooldowns.tick();
    }

    /// Subtract damage without clamping, returns true if health changed
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.hp -= damage;
        damage != 0
    }

    /// Flag as hit and start the flash timer
    pub fn flag_hit(&mut self) {
        self.is_hit = true;
        self.hit_timer = HIT_FLASH_DURATION;
    }
}

/// Previous wrist and hand-center samples for one player.
///
/// A stored sample of exactly `(0, 0)` (or `0.0` for the hand-center) means
/// nothing has been observed yet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionHistory {
    left_wrist: Point,
    right_wrist: Point,
    hand_center_y: f32,
}

impl MotionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prev_left_wrist(&self) -> Option<Point> {
        seeded(self.left_wrist)
    }

    pub fn prev_right_wrist(&self) -> Option<Point> {
        seeded(self.right_wrist)
    }

    pub fn prev_hand_center_y(&self) -> Option<f32> {
        if self.hand_center_y == 0.0 {
            None
        } else {
            Some(self.hand_center_y)
        }
    }

    /// Store the current frame's samples for next frame's velocities
    pub fn record(&mut self, left_wrist: Point, right_wrist: Point) {
        self.left_wrist = left_wrist;
        self.right_wrist = right_wrist;
        self.hand_center_y = left_wrist.midpoint(right_wrist).y;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn seeded(p: Point) -> Option<Point> {
    if p.x == 0.0 && p.y == 0.0 {
        None
    } else {
        Some(p)
    }
}
