//! Canonical combat ruleset
//!
//! Distances are in normalized landmark space, velocities in normalized units
//! per frame unless noted, cooldowns in frames.

pub const MAX_HP: i32 = 100;

/// Frames a target flashes after an unblocked hit
pub const HIT_FLASH_DURATION: u32 = 10;

// Block: wrists crossed onto the opposite shoulders
pub const BLOCK_SHOULDER_DIST: f32 = 0.25;

// Sword: hands together, swing vertically
pub const SWORD_HAND_DIST: f32 = 0.1;
/// Right wrist further right than this relative to the left wrist is a cross
pub const SWORD_CROSS_CHECK_X: f32 = 0.05;
/// Wrists closer than this to the opposite shoulder are an imminent block
pub const SWORD_BLOCK_BUFFER: f32 = 0.35;
pub const SWORD_SWING_THRESHOLD: f32 = 0.015;
pub const SWORD_COOLDOWN: u32 = 20;

// Area attack: arms spread wide and flapped
pub const FLAP_WINGSPAN: f32 = 0.1;
pub const FLAP_VELOCITY_THRESHOLD: f32 = 0.03;
pub const AREA_COOLDOWN: u32 = 90;
pub const AREA_PROJECTILE_COUNT: usize = 5;
/// Spawn height above the top edge, pixels
pub const AREA_SPAWN_Y: f32 = -40.0;
/// Opponent-side landing band as fractions of canvas width
pub const AREA_BAND_NEAR: f32 = 0.05;
pub const AREA_BAND_FAR: f32 = 0.45;
/// Max horizontal jitter per projectile, fraction of canvas width
pub const AREA_JITTER: f32 = 0.02;

// Charge / special
pub const CHARGE_DURATION_MS: f64 = 2500.0;
/// Min vertical distance between wrists
pub const CHARGE_HAND_Y_DIFF: f32 = 0.2;
/// Max horizontal distance between wrists
pub const CHARGE_HAND_X_DIFF: f32 = 0.4;
/// How far above its shoulder a wrist must be to count as raised
pub const POSE_VERTICAL_THRESHOLD: f32 = 0.02;

// Punch
pub const PUNCH_COOLDOWN: u32 = 15;
pub const PUNCH_VELOCITY_THRESHOLD: f32 = 0.05;
/// Min horizontal displacement toward the opponent
pub const PUNCH_DIRECTION_THRESHOLD: f32 = 0.02;
/// Elbow angle in degrees; 180 is a straight arm
pub const ARM_EXTENSION_THRESHOLD: f32 = 140.0;
/// Min horizontal wrist-to-shoulder distance
pub const PUNCH_REACH_THRESHOLD: f32 = 0.1;

// Collision
pub const HITBOX_PADDING: f32 = 0.05;
