//! Combat system - projectiles, damage matrix, hit results

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::pose::Point;

use super::player::PlayerId;
use super::rules::{AREA_BAND_FAR, AREA_BAND_NEAR, AREA_JITTER, AREA_PROJECTILE_COUNT, AREA_SPAWN_Y};

/// Projectile family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Punch
    Normal,
    /// Released full charge
    Special,
    /// Sword swing
    Slash,
    /// Falling flap attack, breaks guard
    Area,
}

/// Stats fixed at spawn per projectile kind
#[derive(Debug, Clone, Copy)]
pub struct ProjectileStats {
    /// Damage on an unblocked hit (area: on a blocked hit)
    pub damage: i32,
    /// Damage when the target is blocking
    pub blocked_damage: i32,
    /// Pixels per frame
    pub speed: f32,
}

impl ProjectileStats {
    pub fn for_kind(kind: ProjectileKind) -> Self {
        match kind {
            ProjectileKind::Normal => Self {
                damage: 2,
                blocked_damage: 1,
                speed: 15.0,
            },
            ProjectileKind::Special => Self {
                damage: 10,
                blocked_damage: 3,
                speed: 10.0,
            },
            ProjectileKind::Slash => Self {
                damage: 3,
                blocked_damage: 0,
                speed: 25.0,
            },
            ProjectileKind::Area => Self {
                damage: 4,
                blocked_damage: 4,
                speed: 12.0,
            },
        }
    }
}

/// Live projectile in pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u64,
    pub owner: PlayerId,
    pub kind: ProjectileKind,
    pub x: f32,
    pub y: f32,
    pub vel_x: f32,
    pub vel_y: f32,
    pub damage: i32,
}

impl Projectile {
    /// Horizontal shot travelling in `direction` (-1 or +1)
    pub fn horizontal(id: u64, owner: PlayerId, kind: ProjectileKind, at: Point, direction: f32) -> Self {
        let stats = ProjectileStats::for_kind(kind);
        Self {
            id,
            owner,
            kind,
            x: at.x,
            y: at.y,
            vel_x: direction * stats.speed,
            vel_y: 0.0,
            damage: stats.damage,
        }
    }

    /// Area projectile falling straight down
    pub fn falling(id: u64, owner: PlayerId, at: Point) -> Self {
        let stats = ProjectileStats::for_kind(ProjectileKind::Area);
        Self {
            id,
            owner,
            kind: ProjectileKind::Area,
            x: at.x,
            y: at.y,
            vel_x: 0.0,
            vel_y: stats.speed,
            damage: stats.damage,
        }
    }

    /// Integrate one frame of fixed velocity
    pub fn update(&mut self) {
        self.x += self.vel_x;
        self.y += self.vel_y;
    }

    /// Still inside the play field: horizontally within the canvas, and not
    /// past the bottom edge when falling
    pub fn in_bounds(&self, width: f32, height: f32) -> bool {
        if self.x < 0.0 || self.x > width {
            return false;
        }
        !(self.vel_y > 0.0 && self.y > height)
    }
}

/// What a collision does to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub damage: i32,
    /// Target starts its hit flash (which also preserves a held charge)
    pub flags_hit: bool,
    pub notification: Option<&'static str>,
}

/// Combat rules independent of the match loop
pub struct CombatSystem;

impl CombatSystem {
    /// Check if an attack family is off cooldown
    pub fn can_fire(cooldown: u32) -> bool {
        cooldown == 0
    }

    /// Spawn points (pixels) for an area attack: evenly spread over the
    /// opponent's half of the canvas with a little horizontal jitter, just
    /// above the top edge
    pub fn area_drop_points<R: Rng>(owner: PlayerId, width: f32, rng: &mut R) -> Vec<Point> {
        // Player 1 stands at video-right, so its rain lands on video-left
        let (near, far) = match owner {
            PlayerId::One => (AREA_BAND_NEAR, AREA_BAND_FAR),
            PlayerId::Two => (1.0 - AREA_BAND_FAR, 1.0 - AREA_BAND_NEAR),
        };
        let spacing = (far - near) / AREA_PROJECTILE_COUNT as f32;

        (0..AREA_PROJECTILE_COUNT)
            .map(|i| {
                let jitter = rng.gen_range(-AREA_JITTER..=AREA_JITTER);
                let x = near + spacing * (i as f32 + 0.5) + jitter;
                Point::new(x * width, AREA_SPAWN_Y)
            })
            .collect()
    }

    /// Damage/block matrix for a projectile reaching its target
    pub fn resolve_hit(projectile: &Projectile, target_blocking: bool) -> HitOutcome {
        let stats = ProjectileStats::for_kind(projectile.kind);
        match (projectile.kind, target_blocking) {
            (ProjectileKind::Area, false) => HitOutcome {
                damage: 0,
                flags_hit: false,
                notification: Some("MISSED!"),
            },
            (ProjectileKind::Area, true) => HitOutcome {
                damage: projectile.damage,
                flags_hit: false,
                notification: Some("GUARD BREAK!"),
            },
            (_, false) => HitOutcome {
                damage: projectile.damage,
                flags_hit: true,
                notification: None,
            },
            (ProjectileKind::Normal, true) => HitOutcome {
                damage: stats.blocked_damage,
                flags_hit: false,
                notification: Some("BLOCKED!"),
            },
            (ProjectileKind::Slash, true) => HitOutcome {
                damage: stats.blocked_damage,
                flags_hit: false,
                notification: Some("FULL BLOCK!"),
            },
            (ProjectileKind::Special, true) => HitOutcome {
                damage: stats.blocked_damage,
                flags_hit: false,
                notification: Some("HEAVY HIT!"),
            },
        }
    }
}

/// Hit result from combat resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitResult {
    pub projectile_id: u64,
    pub kind: ProjectileKind,
    pub attacker: PlayerId,
    pub target: PlayerId,
    pub damage: i32,
    pub blocked: bool,
    pub x: f32,
    pub y: f32,
    pub target_defeated: bool,
}
