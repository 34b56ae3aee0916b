//! Gesture recognition - turns one skeleton into at most one combat action
//!
//! Gestures are checked by an ordered chain of evaluators. The first one that
//! matches ends evaluation for the frame, so a pose can never fire two attack
//! families at once. Order: block, sword, area (flap), charge, punch.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pose::geometry::joint_angle;
use crate::pose::{Point, Skeleton};

use super::combat::CombatSystem;
use super::player::{MotionHistory, PlayerId, PlayerState};
use super::rules::*;

/// Which arm threw a punch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Left,
    Right,
}

/// Attack family of an emitted action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionKind {
    Punch { hand: Hand },
    SwordSlash,
    AreaAttack,
    Special,
}

/// A discrete action recognized for one player in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatAction {
    pub player: PlayerId,
    #[serde(flatten)]
    pub kind: ActionKind,
    /// Spawn point in normalized coordinates
    pub origin: Point,
}

/// Result of a single evaluator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Pose does not belong to this gesture class; try the next one
    NoMatch,
    /// Pose claimed by this class, with or without an action this frame
    Matched(Option<CombatAction>),
}

/// Everything an evaluator may read or mutate for one player
pub struct GestureContext<'a> {
    pub skeleton: &'a Skeleton,
    pub player: &'a mut PlayerState,
    pub history: &'a MotionHistory,
    /// Frame clock in milliseconds
    pub now_ms: f64,
}

impl GestureContext<'_> {
    fn direction(&self) -> f32 {
        self.player.id.direction()
    }

    fn action(&self, kind: ActionKind, origin: Point) -> CombatAction {
        CombatAction {
            player: self.player.id,
            kind,
            origin,
        }
    }
}

/// One gesture class in the priority chain
pub trait GestureEvaluator: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, ctx: &mut GestureContext<'_>) -> GestureOutcome;
}

/// Crossed arms, each wrist on the opposite shoulder
pub struct BlockGesture;

impl GestureEvaluator for BlockGesture {
    fn name(&self) -> &'static str {
        "block"
    }

    fn evaluate(&self, ctx: &mut GestureContext<'_>) -> GestureOutcome {
        let s = ctx.skeleton;
        let (lw, rw) = (s.left_wrist(), s.right_wrist());
        let blocking = lw.distance(s.right_shoulder()) < BLOCK_SHOULDER_DIST
            && rw.distance(s.left_shoulder()) < BLOCK_SHOULDER_DIST
            && rw.x > lw.x;

        ctx.player.is_blocking = blocking;
        if blocking {
            ctx.player.charge.cancel();
            GestureOutcome::Matched(None)
        } else {
            GestureOutcome::NoMatch
        }
    }
}

/// How the two hands relate to a sword grip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grip {
    /// Wrists apart, not a sword pose
    Apart,
    /// Hands together but crossing or closing on a block
    Guarded,
    Stance,
}

/// Hands held together as a sword; a fast vertical swing throws a slash
pub struct SwordGesture;

impl SwordGesture {
    fn grip(s: &Skeleton) -> Grip {
        let (lw, rw) = (s.left_wrist(), s.right_wrist());
        if lw.distance(rw) >= SWORD_HAND_DIST {
            return Grip::Apart;
        }
        // Right wrist well right of the left one is a cross, not a grip
        if rw.x - lw.x > SWORD_CROSS_CHECK_X {
            return Grip::Guarded;
        }
        if lw.distance(s.right_shoulder()) < SWORD_BLOCK_BUFFER
            || rw.distance(s.left_shoulder()) < SWORD_BLOCK_BUFFER
        {
            return Grip::Guarded;
        }
        Grip::Stance
    }
}

impl GestureEvaluator for SwordGesture {
    fn name(&self) -> &'static str {
        "sword"
    }

    fn evaluate(&self, ctx: &mut GestureContext<'_>) -> GestureOutcome {
        match Self::grip(ctx.skeleton) {
            Grip::Apart => return GestureOutcome::NoMatch,
            // Hands closing on a block: hold every lower gesture this frame
            Grip::Guarded => return GestureOutcome::Matched(None),
            Grip::Stance => {}
        }
        ctx.player.charge.cancel();

        let center = ctx.skeleton.hand_center();
        let swinging = ctx
            .history
            .prev_hand_center_y()
            .map(|prev| (center.y - prev).abs() > SWORD_SWING_THRESHOLD)
            .unwrap_or(false);

        if swinging && CombatSystem::can_fire(ctx.player.cooldowns.sword) {
            ctx.player.cooldowns.sword = SWORD_COOLDOWN;
            return GestureOutcome::Matched(Some(ctx.action(ActionKind::SwordSlash, center)));
        }
        GestureOutcome::Matched(None)
    }
}

/// Arms spread past the shoulders and flapped; rains guard-breaking shots
pub struct FlapGesture;

impl FlapGesture {
    /// How far a wrist reaches beyond its shoulder, away from the body midline
    fn outward_reach(wrist: Point, shoulder: Point, midline_x: f32) -> f32 {
        let side = shoulder.x - midline_x;
        if side == 0.0 {
            return 0.0;
        }
        (wrist.x - shoulder.x) * side.signum()
    }
}

impl GestureEvaluator for FlapGesture {
    fn name(&self) -> &'static str {
        "flap"
    }

    fn evaluate(&self, ctx: &mut GestureContext<'_>) -> GestureOutcome {
        let s = ctx.skeleton;
        let (ls, rs) = (s.left_shoulder(), s.right_shoulder());
        let (lw, rw) = (s.left_wrist(), s.right_wrist());
        let midline_x = (ls.x + rs.x) / 2.0;

        let spread = Self::outward_reach(lw, ls, midline_x) > FLAP_WINGSPAN
            && Self::outward_reach(rw, rs, midline_x) > FLAP_WINGSPAN;
        if !spread {
            return GestureOutcome::NoMatch;
        }

        let (Some(prev_l), Some(prev_r)) = (ctx.history.prev_left_wrist(), ctx.history.prev_right_wrist()) else {
            return GestureOutcome::NoMatch;
        };
        let flapping = (lw.y - prev_l.y).abs() > FLAP_VELOCITY_THRESHOLD
            && (rw.y - prev_r.y).abs() > FLAP_VELOCITY_THRESHOLD;

        if flapping && CombatSystem::can_fire(ctx.player.cooldowns.area) {
            ctx.player.cooldowns.area = AREA_COOLDOWN;
            return GestureOutcome::Matched(Some(ctx.action(ActionKind::AreaAttack, s.hand_center())));
        }
        GestureOutcome::NoMatch
    }
}

/// One hand raised, the other low: hold to charge, drop to release
pub struct ChargeGesture;

impl ChargeGesture {
    fn is_ready(s: &Skeleton) -> bool {
        let (lw, rw) = (s.left_wrist(), s.right_wrist());
        let raised = |wrist: Point, shoulder: Point| wrist.y < shoulder.y - POSE_VERTICAL_THRESHOLD;

        (lw.y - rw.y).abs() > CHARGE_HAND_Y_DIFF
            && (lw.x - rw.x).abs() < CHARGE_HAND_X_DIFF
            && (raised(lw, s.left_shoulder()) || raised(rw, s.right_shoulder()))
    }
}

impl GestureEvaluator for ChargeGesture {
    fn name(&self) -> &'static str {
        "charge"
    }

    fn evaluate(&self, ctx: &mut GestureContext<'_>) -> GestureOutcome {
        let ready = Self::is_ready(ctx.skeleton);
        let player = &mut *ctx.player;

        // A hit does not interrupt a charge already in progress
        if ready || (player.charge.active && player.is_hit) {
            player.charge.begin(ctx.now_ms);
            player.charge.advance(ctx.now_ms, CHARGE_DURATION_MS);
            return GestureOutcome::Matched(None);
        }

        if !player.charge.active {
            return GestureOutcome::NoMatch;
        }

        let fire = player.charge.complete;
        player.charge.cancel();
        if fire {
            let center = ctx.skeleton.hand_center();
            GestureOutcome::Matched(Some(ctx.action(ActionKind::Special, center)))
        } else {
            GestureOutcome::Matched(None)
        }
    }
}

/// Fast, straight-armed thrust toward the opponent
pub struct PunchGesture;

impl PunchGesture {
    fn qualifies(&self, wrist: Point, elbow: Point, shoulder: Point, prev: Point, direction: f32) -> bool {
        let dx = wrist.x - prev.x;
        let dy = wrist.y - prev.y;
        let velocity = (dx * dx + dy * dy).sqrt();
        let arm_angle = joint_angle(shoulder, elbow, wrist);

        velocity > PUNCH_VELOCITY_THRESHOLD
            && arm_angle > ARM_EXTENSION_THRESHOLD
            && dx * direction > PUNCH_DIRECTION_THRESHOLD
            && (wrist.x - elbow.x) * direction > 0.0
            && (wrist.x - shoulder.x).abs() > PUNCH_REACH_THRESHOLD
    }
}

impl GestureEvaluator for PunchGesture {
    fn name(&self) -> &'static str {
        "punch"
    }

    fn evaluate(&self, ctx: &mut GestureContext<'_>) -> GestureOutcome {
        if !CombatSystem::can_fire(ctx.player.cooldowns.punch) {
            return GestureOutcome::NoMatch;
        }

        let s = ctx.skeleton;
        let hands = [
            (Hand::Left, s.left_wrist(), s.left_elbow(), s.left_shoulder(), ctx.history.prev_left_wrist()),
            (Hand::Right, s.right_wrist(), s.right_elbow(), s.right_shoulder(), ctx.history.prev_right_wrist()),
        ];

        for (hand, wrist, elbow, shoulder, prev) in hands {
            // Unseeded hands get their first sample when history is recorded
            let Some(prev) = prev else { continue };
            if self.qualifies(wrist, elbow, shoulder, prev, ctx.direction()) {
                ctx.player.cooldowns.punch = PUNCH_COOLDOWN;
                return GestureOutcome::Matched(Some(ctx.action(ActionKind::Punch { hand }, wrist)));
            }
        }
        GestureOutcome::NoMatch
    }
}

/// Runs the evaluator chain for one player per frame
pub struct GestureRecognizer {
    evaluators: Vec<Box<dyn GestureEvaluator>>,
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self {
            evaluators: vec![
                Box::new(BlockGesture),
                Box::new(SwordGesture),
                Box::new(FlapGesture),
                Box::new(ChargeGesture),
                Box::new(PunchGesture),
            ],
        }
    }

    /// Evaluator names in priority order
    pub fn order(&self) -> Vec<&'static str> {
        self.evaluators.iter().map(|e| e.name()).collect()
    }

    /// Classify one skeleton. Motion history is refreshed afterwards whatever
    /// the outcome.
    pub fn recognize(
        &self,
        skeleton: &Skeleton,
        player: &mut PlayerState,
        history: &mut MotionHistory,
        now_ms: f64,
    ) -> Option<CombatAction> {
        let mut action = None;
        {
            let mut ctx = GestureContext {
                skeleton,
                player,
                history,
                now_ms,
            };
            for evaluator in &self.evaluators {
                if let GestureOutcome::Matched(result) = evaluator.evaluate(&mut ctx) {
                    if let Some(a) = &result {
                        debug!(player = ?a.player, gesture = evaluator.name(), kind = ?a.kind, "Gesture fired");
                    }
                    action = result;
                    break;
                }
            }
        }

        history.record(skeleton.left_wrist(), skeleton.right_wrist());
        action
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::landmark::*;

    type P = (f32, f32);

    /// Player 1 body: shoulders at y=0.35, left shoulder at the larger x
    fn body(lw: P, rw: P, le: P, re: P) -> Skeleton {
        let mut s = Skeleton::default();
        s.set(NOSE, Landmark::new(0.7, 0.2));
        s.set(LEFT_SHOULDER, Landmark::new(0.78, 0.35));
        s.set(RIGHT_SHOULDER, Landmark::new(0.62, 0.35));
        s.set(LEFT_ELBOW, Landmark::new(le.0, le.1));
        s.set(RIGHT_ELBOW, Landmark::new(re.0, re.1));
        s.set(LEFT_WRIST, Landmark::new(lw.0, lw.1));
        s.set(RIGHT_WRIST, Landmark::new(rw.0, rw.1));
        s.set(LEFT_HIP, Landmark::new(0.76, 0.7));
        s.set(RIGHT_HIP, Landmark::new(0.64, 0.7));
        s
    }

    fn idle() -> Skeleton {
        body((0.82, 0.65), (0.6, 0.65), (0.8, 0.5), (0.6, 0.5))
    }

    /// Right arm drawn back, ready to jab toward video-left
    fn jab_windup() -> Skeleton {
        body((0.82, 0.65), (0.40, 0.35), (0.8, 0.5), (0.5, 0.4))
    }

    /// Right arm straight out at x=0.20, elbow angle about 170 degrees
    fn jab_extended() -> Skeleton {
        body((0.82, 0.65), (0.20, 0.35), (0.8, 0.5), (0.41, 0.37))
    }

    fn mirrored(s: &Skeleton) -> Skeleton {
        let mut out = Skeleton::default();
        for idx in 0..s.len() {
            let lm = s.get(idx);
            out.set(idx, Landmark::new(1.0 - lm.x, lm.y));
        }
        out
    }

    struct Rig {
        recognizer: GestureRecognizer,
        player: PlayerState,
        history: MotionHistory,
    }

    impl Rig {
        fn new(id: PlayerId) -> Self {
            Self {
                recognizer: GestureRecognizer::new(),
                player: PlayerState::new(id),
                history: MotionHistory::new(),
            }
        }

        fn frame(&mut self, s: &Skeleton, now_ms: f64) -> Option<CombatAction> {
            self.recognizer.recognize(s, &mut self.player, &mut self.history, now_ms)
        }
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            GestureRecognizer::new().order(),
            vec!["block", "sword", "flap", "charge", "punch"]
        );
    }

    #[test]
    fn test_punch_scenario_player_one() {
        let mut rig = Rig::new(PlayerId::One);
        assert!(rig.frame(&jab_windup(), 0.0).is_none());

        let action = rig.frame(&jab_extended(), 16.0).expect("punch");
        assert_eq!(action.kind, ActionKind::Punch { hand: Hand::Right });
        assert_eq!(action.origin, Point::new(0.20, 0.35));
        assert_eq!(rig.player.cooldowns.punch, PUNCH_COOLDOWN);
    }

    #[test]
    fn test_first_frame_seeds_history_only() {
        let mut rig = Rig::new(PlayerId::One);
        // No prior sample: no velocity, no punch
        assert!(rig.frame(&jab_extended(), 0.0).is_none());
        assert_eq!(rig.history.prev_right_wrist(), Some(Point::new(0.20, 0.35)));
    }

    #[test]
    fn test_punch_away_from_opponent_ignored() {
        let mut rig = Rig::new(PlayerId::One);
        rig.frame(&jab_extended(), 0.0);
        // Pulling the arm back toward the body
        assert!(rig.frame(&jab_windup(), 16.0).is_none());
    }

    #[test]
    fn test_punch_player_two_mirrored() {
        let mut rig = Rig::new(PlayerId::Two);
        rig.frame(&mirrored(&jab_windup()), 0.0);
        let action = rig.frame(&mirrored(&jab_extended()), 16.0).expect("punch");
        assert_eq!(action.player, PlayerId::Two);
        assert!((action.origin.x - 0.80).abs() < 1e-6);

        // Player 1 direction rules reject the same mirrored motion
        let mut wrong = Rig::new(PlayerId::One);
        wrong.frame(&mirrored(&jab_windup()), 0.0);
        assert!(wrong.frame(&mirrored(&jab_extended()), 16.0).is_none());
    }

    #[test]
    fn test_punch_blocked_by_cooldown() {
        let mut rig = Rig::new(PlayerId::One);
        rig.player.cooldowns.punch = 3;
        rig.frame(&jab_windup(), 0.0);
        assert!(rig.frame(&jab_extended(), 16.0).is_none());
        assert_eq!(rig.player.cooldowns.punch, 3);
    }

    #[test]
    fn test_both_hands_punching_fires_once() {
        let mut rig = Rig::new(PlayerId::One);
        rig.frame(&body((0.62, 0.35), (0.40, 0.35), (0.7, 0.4), (0.5, 0.4)), 0.0);
        let action = rig
            .frame(&body((0.42, 0.35), (0.20, 0.35), (0.60, 0.37), (0.41, 0.37)), 16.0)
            .expect("punch");
        assert_eq!(action.kind, ActionKind::Punch { hand: Hand::Left });
        assert_eq!(action.origin, Point::new(0.42, 0.35));
    }

    #[test]
    fn test_block_scenario_suppresses_punch() {
        let mut rig = Rig::new(PlayerId::One);
        rig.frame(&jab_windup(), 0.0);
        rig.player.charge.begin(0.0);
        rig.player.charge.progress = 0.3;

        // Wrists crossed onto opposite shoulders, moving fast
        let crossed = body((0.64, 0.37), (0.76, 0.37), (0.7, 0.5), (0.7, 0.5));
        assert!(rig.frame(&crossed, 16.0).is_none());
        assert!(rig.player.is_blocking);
        assert!(!rig.player.charge.active);
        assert_eq!(rig.player.charge.progress, 0.0);
    }

    #[test]
    fn test_uncrossed_wrists_do_not_block() {
        let mut rig = Rig::new(PlayerId::One);
        rig.player.is_blocking = true;
        let uncrossed = body((0.76, 0.37), (0.64, 0.37), (0.7, 0.5), (0.7, 0.5));
        rig.frame(&uncrossed, 0.0);
        assert!(!rig.player.is_blocking);
    }

    #[test]
    fn test_sword_swing_and_cooldown() {
        let mut rig = Rig::new(PlayerId::One);
        rig.player.charge.begin(0.0);
        rig.player.charge.progress = 0.6;
        rig.player.charge.complete = true;

        let low = body((0.69, 0.75), (0.70, 0.76), (0.72, 0.6), (0.66, 0.6));
        let high = body((0.69, 0.70), (0.70, 0.71), (0.72, 0.6), (0.66, 0.6));

        // Entering the stance cancels the charge, no swing without history
        assert!(rig.frame(&low, 0.0).is_none());
        assert!(!rig.player.charge.active);
        assert_eq!(rig.player.charge.progress, 0.0);
        assert!(!rig.player.charge.complete);

        let slash = rig.frame(&high, 16.0).expect("slash");
        assert_eq!(slash.kind, ActionKind::SwordSlash);
        assert!((slash.origin.x - 0.695).abs() < 1e-6);
        assert_eq!(rig.player.cooldowns.sword, SWORD_COOLDOWN);

        // Still in stance, swinging back during cooldown: nothing, not even a punch
        assert!(rig.frame(&low, 32.0).is_none());
    }

    #[test]
    fn test_sword_grip_classification() {
        // Hands together at chest height sit inside the block buffer
        let chest = body((0.70, 0.45), (0.71, 0.45), (0.75, 0.5), (0.65, 0.5));
        assert_eq!(SwordGesture::grip(&chest), Grip::Guarded);
        assert_eq!(SwordGesture::grip(&idle()), Grip::Apart);

        let low = body((0.69, 0.75), (0.70, 0.76), (0.72, 0.6), (0.66, 0.6));
        assert_eq!(SwordGesture::grip(&low), Grip::Stance);
    }

    #[test]
    fn test_hands_closing_on_block_suppress_punch() {
        let mut rig = Rig::new(PlayerId::One);
        rig.frame(&body((0.75, 0.35), (0.6, 0.65), (0.8, 0.4), (0.6, 0.5)), 0.0);
        rig.player.charge.begin(0.0);

        // Left wrist thrusts toward video-left into a clasp near the right
        // shoulder: fast and straight enough to punch, but not yet a block
        let clasp = body((0.67, 0.35), (0.66, 0.36), (0.72, 0.35), (0.6, 0.45));
        assert!(rig.frame(&clasp, 16.0).is_none());
        assert!(!rig.player.is_blocking);
        assert_eq!(rig.player.cooldowns.punch, 0);
        // Guarded grip leaves a running charge alone
        assert!(rig.player.charge.active);
    }

    #[test]
    fn test_flap_rains_once_per_cooldown() {
        let mut rig = Rig::new(PlayerId::One);
        let wings_up = body((0.95, 0.30), (0.45, 0.30), (0.87, 0.32), (0.53, 0.32));
        let wings_down = body((0.95, 0.40), (0.45, 0.40), (0.87, 0.37), (0.53, 0.37));

        assert!(rig.frame(&wings_up, 0.0).is_none());
        let action = rig.frame(&wings_down, 16.0).expect("area");
        assert_eq!(action.kind, ActionKind::AreaAttack);
        assert_eq!(rig.player.cooldowns.area, AREA_COOLDOWN);

        assert!(rig.frame(&wings_up, 32.0).is_none());
    }

    fn charge_pose() -> Skeleton {
        body((0.80, 0.15), (0.66, 0.55), (0.8, 0.25), (0.64, 0.45))
    }

    #[test]
    fn test_charge_release_early_fizzles() {
        let mut rig = Rig::new(PlayerId::One);
        assert!(rig.frame(&charge_pose(), 0.0).is_none());
        assert!(rig.player.charge.active);
        rig.frame(&charge_pose(), 1000.0);
        assert!((rig.player.charge.progress - 0.4).abs() < 1e-6);

        assert!(rig.frame(&idle(), 1500.0).is_none());
        assert!(!rig.player.charge.active);
        assert_eq!(rig.player.charge.progress, 0.0);
    }

    #[test]
    fn test_full_charge_fires_special() {
        let mut rig = Rig::new(PlayerId::One);
        rig.frame(&charge_pose(), 0.0);
        rig.frame(&charge_pose(), 1250.0);
        rig.frame(&charge_pose(), 2600.0);
        assert!(rig.player.charge.complete);

        let action = rig.frame(&idle(), 2616.0).expect("special");
        assert_eq!(action.kind, ActionKind::Special);
        assert_eq!(action.origin, idle().hand_center());
        assert!(!rig.player.charge.active);
        assert!(!rig.player.charge.complete);
        assert_eq!(rig.player.charge.progress, 0.0);
    }

    #[test]
    fn test_super_armor_keeps_charge_through_hit() {
        let mut rig = Rig::new(PlayerId::One);
        rig.frame(&charge_pose(), 0.0);

        rig.player.flag_hit();
        assert!(rig.frame(&idle(), 500.0).is_none());
        assert!(rig.player.charge.active);
        assert!((rig.player.charge.progress - 0.2).abs() < 1e-6);

        rig.player.is_hit = false;
        assert!(rig.frame(&idle(), 600.0).is_none());
        assert!(!rig.player.charge.active);
    }

    #[test]
    fn test_hit_without_charge_does_not_start_one() {
        let mut rig = Rig::new(PlayerId::One);
        rig.player.flag_hit();
        rig.frame(&idle(), 0.0);
        assert!(!rig.player.charge.active);
    }
}
