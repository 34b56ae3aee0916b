//! Match state and the frame-driven match task

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::feed::protocol::{GameEvent, MatchMsg, MatchStats, PlayerMatchStats};
use crate::pose::{assign_players, AssignedSkeletons};

use super::combat::{CombatSystem, HitResult, Projectile, ProjectileKind};
use super::gesture::{ActionKind, CombatAction, GestureRecognizer};
use super::physics::PhysicsSystem;
use super::player::{MotionHistory, PlayerId, PlayerState};
use super::snapshot::SnapshotBuilder;
use super::{CanvasSize, FrameInput};

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Pose model not ready yet
    Loading,
    /// Model ready, waiting for both players in frame
    Waiting,
    /// Gestures and combat active
    Playing,
    /// Someone reached zero health; only a restart leaves this state
    GameOver,
}

/// Result of a finished match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Player1Wins,
    Player2Wins,
    Draw,
}

impl MatchOutcome {
    /// Outcome from current health, `None` while both are standing
    pub fn from_players(p1: &PlayerState, p2: &PlayerState) -> Option<Self> {
        match (p1.is_defeated(), p2.is_defeated()) {
            (true, true) => Some(MatchOutcome::Draw),
            (true, false) => Some(MatchOutcome::Player2Wins),
            (false, true) => Some(MatchOutcome::Player1Wins),
            (false, false) => None,
        }
    }

    pub fn announcement(self) -> &'static str {
        match self {
            MatchOutcome::Player1Wins => "PLAYER 1 WINS!",
            MatchOutcome::Player2Wins => "PLAYER 2 WINS!",
            MatchOutcome::Draw => "DRAW!",
        }
    }
}

/// Match errors
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("Pose model is still loading")]
    NotReady,

    #[error("Match task has shut down")]
    Closed,
}

/// Match state (owned by the match task)
///
/// The single owner of player state, motion history and projectiles. Created
/// at match start and reset in place on restart.
pub struct MatchState {
    pub id: Uuid,
    pub seed: u64,
    pub status: MatchStatus,
    pub frame: u64,
    pub players: [PlayerState; 2],
    pub histories: [MotionHistory; 2],
    pub projectiles: Vec<Projectile>,
    pub stats: [PlayerMatchStats; 2],
    next_projectile_id: u64,
    rng: ChaCha8Rng,
    recognizer: GestureRecognizer,
}

impl MatchState {
    pub fn new(id: Uuid, seed: u64) -> Self {
        Self {
            id,
            seed,
            status: MatchStatus::Loading,
            frame: 0,
            players: [PlayerState::new(PlayerId::One), PlayerState::new(PlayerId::Two)],
            histories: [MotionHistory::new(), MotionHistory::new()],
            projectiles: Vec::new(),
            stats: [PlayerMatchStats::new(PlayerId::One), PlayerMatchStats::new(PlayerId::Two)],
            next_projectile_id: 1,
            rng: ChaCha8Rng::seed_from_u64(seed),
            recognizer: GestureRecognizer::new(),
        }
    }

    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id.index()]
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        MatchOutcome::from_players(&self.players[0], &self.players[1])
    }

    /// Pose model finished initializing
    pub fn model_ready(&mut self) -> Vec<GameEvent> {
        if self.status != MatchStatus::Loading {
            return Vec::new();
        }
        self.status = MatchStatus::Waiting;
        info!(match_id = %self.id, "Pose model ready, waiting for players");
        vec![GameEvent::StatusChanged {
            status: self.status,
        }]
    }

    /// Reset all per-match state and wait for players again
    pub fn restart(&mut self) -> Result<Vec<GameEvent>, MatchError> {
        if self.status == MatchStatus::Loading {
            return Err(MatchError::NotReady);
        }

        self.players = [PlayerState::new(PlayerId::One), PlayerState::new(PlayerId::Two)];
        self.histories.iter_mut().for_each(MotionHistory::clear);
        self.projectiles.clear();
        self.stats = [PlayerMatchStats::new(PlayerId::One), PlayerMatchStats::new(PlayerId::Two)];
        self.next_projectile_id = 1;
        self.frame = 0;
        self.status = MatchStatus::Waiting;

        info!(match_id = %self.id, "Match restarted");
        Ok(vec![GameEvent::StatusChanged {
            status: self.status,
        }])
    }

    /// Run one frame: assignment, cooldowns, gestures, combat, status
    pub fn step(&mut self, input: &FrameInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if matches!(self.status, MatchStatus::Loading | MatchStatus::GameOver) {
            return events;
        }
        self.frame += 1;

        for player in self.players.iter_mut() {
            player.begin_frame();
        }

        let assigned = assign_players(&input.skeletons);

        if self.status == MatchStatus::Waiting && assigned.both_present() {
            self.status = MatchStatus::Playing;
            info!(match_id = %self.id, frame = self.frame, "Both players detected, match started");
            events.push(GameEvent::StatusChanged {
                status: self.status,
            });
            events.push(GameEvent::MatchStarted { frame: self.frame });
            events.push(GameEvent::notification("FIGHT!"));
        }

        if self.status != MatchStatus::Playing {
            return events;
        }

        // Recognize gestures
        let mut actions = Vec::new();
        for id in PlayerId::ALL {
            let Some(skeleton) = assigned.get(id) else {
                continue;
            };
            let idx = id.index();
            if let Some(action) = self.recognizer.recognize(
                skeleton,
                &mut self.players[idx],
                &mut self.histories[idx],
                input.timestamp_ms,
            ) {
                actions.push(action);
            }
        }

        for action in actions {
            self.spawn_projectiles(action, input.canvas, &mut events);
        }

        self.update_projectiles(&assigned, input.canvas, &mut events);

        if self.status == MatchStatus::GameOver {
            if let Some(outcome) = self.outcome() {
                info!(match_id = %self.id, ?outcome, frame = self.frame, "Match over");
                events.push(GameEvent::StatusChanged {
                    status: self.status,
                });
                events.push(GameEvent::MatchEnded { outcome });
                events.push(GameEvent::notification(outcome.announcement()));
            }
        }

        events
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        id
    }

    /// Turn a recognized action into projectiles
    fn spawn_projectiles(&mut self, action: CombatAction, canvas: CanvasSize, events: &mut Vec<GameEvent>) {
        let owner = action.player;
        let origin = action.origin.to_pixels(canvas.width, canvas.height);
        let stats = &mut self.stats[owner.index()];

        let kind = match action.kind {
            ActionKind::Punch { .. } => {
                stats.punches += 1;
                Some(ProjectileKind::Normal)
            }
            ActionKind::SwordSlash => {
                stats.slashes += 1;
                Some(ProjectileKind::Slash)
            }
            ActionKind::Special => {
                stats.specials += 1;
                Some(ProjectileKind::Special)
            }
            ActionKind::AreaAttack => {
                stats.area_attacks += 1;
                None
            }
        };

        let mut projectile_ids = Vec::new();
        match kind {
            Some(kind) => {
                let id = self.next_id();
                self.projectiles
                    .push(Projectile::horizontal(id, owner, kind, origin, owner.direction()));
                projectile_ids.push(id);
            }
            None => {
                let drops = CombatSystem::area_drop_points(owner, canvas.width, &mut self.rng);
                for at in drops {
                    let id = self.next_id();
                    self.projectiles.push(Projectile::falling(id, owner, at));
                    projectile_ids.push(id);
                }
            }
        }

        debug!(
            match_id = %self.id,
            player = ?owner,
            kind = ?action.kind,
            count = projectile_ids.len(),
            "Projectiles spawned"
        );

        events.push(GameEvent::ActionPerformed {
            action,
            projectile_ids,
        });
        if action.kind == ActionKind::Special {
            events.push(GameEvent::notification("SPECIAL BLAST!"));
        }
    }

    /// Move projectiles, cull the ones that left the field, resolve hits
    fn update_projectiles(&mut self, assigned: &AssignedSkeletons<'_>, canvas: CanvasSize, events: &mut Vec<GameEvent>) {
        let mut hits: Vec<Projectile> = Vec::new();

        self.projectiles.retain_mut(|projectile| {
            projectile.update();
            if !projectile.in_bounds(canvas.width, canvas.height) {
                return false;
            }

            let Some(target) = assigned.get(projectile.owner.opponent()) else {
                return true;
            };
            if PhysicsSystem::check_hit(projectile, target, canvas.width, canvas.height) {
                hits.push(projectile.clone());
                return false;
            }
            true
        });

        for projectile in hits {
            self.apply_hit(projectile, events);
        }
    }

    /// Apply the damage/block matrix for one collision
    fn apply_hit(&mut self, projectile: Projectile, events: &mut Vec<GameEvent>) {
        let attacker = projectile.owner;
        let target_id = attacker.opponent();
        let target = &mut self.players[target_id.index()];
        let blocked = target.is_blocking;

        let outcome = CombatSystem::resolve_hit(&projectile, blocked);
        let health_changed = target.take_damage(outcome.damage);
        if outcome.flags_hit {
            target.flag_hit();
        }
        let target_defeated = target.is_defeated();

        let attacker_stats = &mut self.stats[attacker.index()];
        attacker_stats.damage_dealt += outcome.damage;
        if outcome.damage > 0 {
            attacker_stats.hits_landed += 1;
        }
        let target_stats = &mut self.stats[target_id.index()];
        target_stats.damage_taken += outcome.damage;
        if blocked {
            target_stats.hits_blocked += 1;
        }

        debug!(
            match_id = %self.id,
            attacker = ?attacker,
            kind = ?projectile.kind,
            damage = outcome.damage,
            blocked,
            "Projectile hit"
        );

        events.push(GameEvent::Hit(HitResult {
            projectile_id: projectile.id,
            kind: projectile.kind,
            attacker,
            target: target_id,
            damage: outcome.damage,
            blocked,
            x: projectile.x,
            y: projectile.y,
            target_defeated,
        }));
        if let Some(text) = outcome.notification {
            events.push(GameEvent::notification(text));
        }

        if health_changed {
            self.check_game_over();
        }
    }

    /// Either player at or below zero health ends the match
    fn check_game_over(&mut self) {
        if self.status == MatchStatus::Playing && self.players.iter().any(PlayerState::is_defeated) {
            self.status = MatchStatus::GameOver;
        }
    }

    /// Final statistics
    pub fn match_stats(&self) -> MatchStats {
        MatchStats {
            frames_played: self.frame,
            player_stats: self.stats.to_vec(),
        }
    }
}

/// Commands accepted by the match task
#[derive(Debug, Clone)]
pub enum MatchCommand {
    /// One rendered frame of landmarks
    Frame(FrameInput),
    /// Pose model initialized
    ModelReady,
    /// Pose model failed to initialize; the match stays in loading
    ModelFailed(String),
    /// External restart request
    Restart,
}

/// Handle to a running match
#[derive(Clone)]
pub struct MatchHandle {
    pub id: Uuid,
    pub command_tx: mpsc::Sender<MatchCommand>,
    pub update_tx: broadcast::Sender<MatchMsg>,
}

impl MatchHandle {
    /// Subscribe to snapshots and end-of-match messages
    pub fn subscribe(&self) -> broadcast::Receiver<MatchMsg> {
        self.update_tx.subscribe()
    }

    pub async fn submit_frame(&self, frame: FrameInput) -> Result<(), MatchError> {
        self.send(MatchCommand::Frame(frame)).await
    }

    pub async fn model_ready(&self) -> Result<(), MatchError> {
        self.send(MatchCommand::ModelReady).await
    }

    pub async fn model_failed(&self, reason: impl Into<String>) -> Result<(), MatchError> {
        self.send(MatchCommand::ModelFailed(reason.into())).await
    }

    pub async fn restart(&self) -> Result<(), MatchError> {
        self.send(MatchCommand::Restart).await
    }

    async fn send(&self, cmd: MatchCommand) -> Result<(), MatchError> {
        self.command_tx.send(cmd).await.map_err(|_| MatchError::Closed)
    }
}

/// The match task: owns the state and processes commands one at a time, so
/// frames never overlap
pub struct GameMatch {
    state: MatchState,
    command_rx: mpsc::Receiver<MatchCommand>,
    update_tx: broadcast::Sender<MatchMsg>,
    snapshot_builder: SnapshotBuilder,
}

impl GameMatch {
    /// Create a new match
    pub fn new(id: Uuid, seed: u64, snapshot_interval: u32) -> (Self, MatchHandle) {
        let (command_tx, command_rx) = mpsc::channel(256);
        let (update_tx, _) = broadcast::channel(64);

        let handle = MatchHandle {
            id,
            command_tx,
            update_tx: update_tx.clone(),
        };

        let game_match = Self {
            state: MatchState::new(id, seed),
            command_rx,
            update_tx,
            snapshot_builder: SnapshotBuilder::new(snapshot_interval),
        };

        (game_match, handle)
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Process commands until every handle is dropped
    pub async fn run(mut self) {
        info!(match_id = %self.state.id, seed = self.state.seed, "Match task started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        info!(match_id = %self.state.id, frames = self.state.frame, "Match task stopped");
    }

    /// Apply one command and publish whatever it produced
    pub fn handle_command(&mut self, cmd: MatchCommand) {
        match cmd {
            MatchCommand::Frame(input) => {
                let was_playing = self.state.status == MatchStatus::Playing;
                let events = self.state.step(&input);
                self.snapshot_builder.push_events(events);

                if self.snapshot_builder.should_send() {
                    let snapshot = self.snapshot_builder.build(&self.state);
                    let _ = self.update_tx.send(snapshot);
                }

                if was_playing && self.state.status == MatchStatus::GameOver {
                    if let Some(outcome) = self.state.outcome() {
                        let _ = self.update_tx.send(MatchMsg::MatchEnd {
                            outcome,
                            stats: self.state.match_stats(),
                        });
                    }
                }
            }
            MatchCommand::ModelReady => {
                let events = self.state.model_ready();
                self.snapshot_builder.push_events(events);
                self.snapshot_builder.force_next();
            }
            MatchCommand::ModelFailed(reason) => {
                error!(match_id = %self.state.id, %reason, "Pose model failed to initialize, match stays in loading");
            }
            MatchCommand::Restart => match self.state.restart() {
                Ok(events) => {
                    self.snapshot_builder.push_events(events);
                    self.snapshot_builder.force_next();
                }
                Err(e) => {
                    warn!(match_id = %self.state.id, error = %e, "Restart ignored");
                }
            },
        }
    }
}
