//! Picks the one body that drives the gestures.

use crate::joint::Subject;

/// Ranking score for a fully tracked subject: depth times horizontal offset.
///
/// Lower is better.  This favours people who are close to the sensor *and*
/// near the center line; it is not a distance.
pub fn subject_score(subject: &Subject) -> f32 {
    subject.position.z * subject.position.x.abs()
}

/// Select the subject with the lowest [`subject_score`] among the fully
/// tracked ones.
///
/// Equal scores resolve to the subject that appears first in `subjects`.
/// Subjects with a non-finite score are skipped.  Returns `None` for an empty
/// slice or when nobody is fully tracked.
pub fn select_subject(subjects: &[Subject]) -> Option<&Subject> {
    let mut best: Option<(f32, &Subject)> = None;
    for subject in subjects.iter().filter(|s| s.is_fully_tracked()) {
        let score = subject_score(subject);
        if !score.is_finite() {
            continue;
        }
        match best {
            // strict: the earlier subject keeps ties
            Some((best_score, _)) if score >= best_score => {}
            _ => best = Some((score, subject)),
        }
    }
    best.map(|(_, s)| s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::{BodyTracking, Vec3};

    fn body(id: u32, x: f32, z: f32, tracking: BodyTracking) -> Subject {
        Subject {
            tracking_id: id,
            tracking,
            position: Vec3::new(x, 0.0, z),
            joints: Vec::new(),
        }
    }

    #[test]
    fn lower_score_wins() {
        // A: 2 * 0.1 = 0.2, B: 1 * 3 = 3
        let subjects = [
            body(1, 3.0, 1.0, BodyTracking::Tracked),
            body(2, 0.1, 2.0, BodyTracking::Tracked),
        ];
        assert_eq!(select_subject(&subjects).map(|s| s.tracking_id), Some(2));
    }

    #[test]
    fn position_only_bodies_are_ignored() {
        let subjects = [
            body(1, 0.0, 1.0, BodyTracking::PositionOnly),
            body(2, 0.5, 3.0, BodyTracking::Tracked),
        ];
        assert_eq!(select_subject(&subjects).map(|s| s.tracking_id), Some(2));
    }

    #[test]
    fn nobody_tracked_selects_none() {
        let subjects = [
            body(1, 0.0, 1.0, BodyTracking::PositionOnly),
            body(2, 0.0, 2.0, BodyTracking::NotTracked),
        ];
        assert!(select_subject(&subjects).is_none());
        assert!(select_subject(&[]).is_none());
    }

    #[test]
    fn tie_goes_to_first_in_frame() {
        // Both score 0.5.
        let subjects = [
            body(9, 0.25, 2.0, BodyTracking::Tracked),
            body(4, -0.5, 1.0, BodyTracking::Tracked),
        ];
        assert_eq!(select_subject(&subjects).map(|s| s.tracking_id), Some(9));

        let swapped = [subjects[1].clone(), subjects[0].clone()];
        assert_eq!(select_subject(&swapped).map(|s| s.tracking_id), Some(4));
    }

    #[test]
    fn centered_subjects_all_score_zero() {
        let subjects = [
            body(1, 0.0, 3.0, BodyTracking::Tracked),
            body(2, 0.0, 1.0, BodyTracking::Tracked),
        ];
        assert_eq!(select_subject(&subjects).map(|s| s.tracking_id), Some(1));
    }

    #[test]
    fn non_finite_position_is_skipped() {
        let subjects = [
            body(1, f32::NAN, 1.0, BodyTracking::Tracked),
            body(2, 1.0, 2.0, BodyTracking::Tracked),
        ];
        assert_eq!(select_subject(&subjects).map(|s| s.tracking_id), Some(2));
    }
}
