//! Snapshot building for the presentation layer

use crate::feed::protocol::{GameEvent, MatchMsg};

use super::r#match::MatchState;

/// Batches events and decides when to publish match state
pub struct SnapshotBuilder {
    /// Frames since last snapshot
    frames_since_snapshot: u32,
    /// Snapshot interval in frames
    snapshot_interval: u32,
    /// Events not yet delivered
    pending: Vec<GameEvent>,
}

impl SnapshotBuilder {
    pub fn new(snapshot_interval: u32) -> Self {
        Self {
            frames_since_snapshot: 0,
            snapshot_interval: snapshot_interval.max(1),
            pending: Vec::new(),
        }
    }

    /// Queue events for the next snapshot
    pub fn push_events(&mut self, events: Vec<GameEvent>) {
        self.pending.extend(events);
    }

    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    /// Check if it's time to send a snapshot
    pub fn should_send(&mut self) -> bool {
        self.frames_since_snapshot += 1;
        if self.frames_since_snapshot >= self.snapshot_interval {
            self.frames_since_snapshot = 0;
            true
        } else {
            false
        }
    }

    /// Force snapshot on next check (status changes)
    pub fn force_next(&mut self) {
        self.frames_since_snapshot = self.snapshot_interval;
    }

    /// Build a snapshot message, draining pending events
    pub fn build(&mut self, state: &MatchState) -> MatchMsg {
        MatchMsg::Snapshot {
            frame: state.frame,
            status: state.status,
            players: state.players.to_vec(),
            projectiles: state.projectiles.clone(),
            events: std::mem::take(&mut self.pending),
        }
    }
}
