//! Maps detected skeletons onto the two player slots

use crate::game::player::PlayerId;

use super::landmark::Skeleton;

/// Normalized x of the split between the two halves of the frame
pub const MIDLINE_X: f32 = 0.5;

/// Skeletons assigned to player slots for one frame
#[derive(Debug, Clone, Default)]
pub struct AssignedSkeletons<'a> {
    pub player1: Option<&'a Skeleton>,
    pub player2: Option<&'a Skeleton>,
}

impl<'a> AssignedSkeletons<'a> {
    pub fn get(&self, id: PlayerId) -> Option<&'a Skeleton> {
        match id {
            PlayerId::One => self.player1,
            PlayerId::Two => self.player2,
        }
    }

    /// Both slots filled in the same frame
    pub fn both_present(&self) -> bool {
        self.player1.is_some() && self.player2.is_some()
    }
}

/// Slot for a single skeleton.
///
/// Video-left (nose x below the midline) is the visual right of the mirrored
/// display, which is Player 2.
pub fn slot_for(skeleton: &Skeleton) -> PlayerId {
    if skeleton.nose().x < MIDLINE_X {
        PlayerId::Two
    } else {
        PlayerId::One
    }
}

/// Assign every skeleton to a slot. Two skeletons on the same side: the later
/// one wins.
pub fn assign_players(skeletons: &[Skeleton]) -> AssignedSkeletons<'_> {
    let mut assigned = AssignedSkeletons::default();
    for skeleton in skeletons {
        match slot_for(skeleton) {
            PlayerId::One => assigned.player1 = Some(skeleton),
            PlayerId::Two => assigned.player2 = Some(skeleton),
        }
    }
    assigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::landmark::{Landmark, NOSE};

    fn skeleton_with_nose(x: f32) -> Skeleton {
        let mut s = Skeleton::default();
        s.set(NOSE, Landmark::new(x, 0.3));
        s
    }

    #[test]
    fn test_nose_left_of_midline_is_player_two() {
        let skeletons = vec![skeleton_with_nose(0.3), skeleton_with_nose(0.7)];
        let assigned = assign_players(&skeletons);
        assert_eq!(assigned.player2.unwrap().nose().x, 0.3);
        assert_eq!(assigned.player1.unwrap().nose().x, 0.7);
        assert!(assigned.both_present());
    }

    #[test]
    fn test_midline_belongs_to_player_one() {
        assert_eq!(slot_for(&skeleton_with_nose(0.5)), PlayerId::One);
    }

    #[test]
    fn test_same_side_later_wins() {
        let skeletons = vec![skeleton_with_nose(0.6), skeleton_with_nose(0.9)];
        let assigned = assign_players(&skeletons);
        assert_eq!(assigned.player1.unwrap().nose().x, 0.9);
        assert!(assigned.player2.is_none());
        assert!(!assigned.both_present());
    }

    #[test]
    fn test_no_skeletons() {
        let assigned = assign_players(&[]);
        assert!(assigned.get(PlayerId::One).is_none());
        assert!(assigned.get(PlayerId::Two).is_none());
    }
}
