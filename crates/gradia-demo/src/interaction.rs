use gradia_engine::coords::Vec2;

/// Pointer interaction with the control points.
///
/// `closest` is recomputed on every pointer move while nothing is grabbed;
/// `grabbed` is set by a left press on the closest point and cleared on release.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct InteractionState {
    pub closest: Option<usize>,
    pub grabbed: Option<usize>,
}

/// Derived view of [`InteractionState`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PointerPhase {
    Idle,
    Hovering(usize),
    Dragging(usize),
}

impl InteractionState {
    pub fn phase(&self) -> PointerPhase {
        match (self.grabbed, self.closest) {
            (Some(i), _) => PointerPhase::Dragging(i),
            (None, Some(i)) => PointerPhase::Hovering(i),
            (None, None) => PointerPhase::Idle,
        }
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.grabbed.is_some()
    }

    /// Forgets indices that do not address one of the first `count` points.
    pub fn retain_below(&mut self, count: usize) {
        if self.closest.is_some_and(|i| i >= count) {
            self.closest = None;
        }
        if self.grabbed.is_some_and(|i| i >= count) {
            self.grabbed = None;
        }
    }
}

/// Index of the point nearest to `pos` among those strictly closer than
/// `max_distance`. The lowest index wins exact ties.
pub fn closest_control_point(points: &[Vec2], pos: Vec2, max_distance: f32) -> Option<usize> {
    let mut best = max_distance;
    let mut closest = None;
    for (i, p) in points.iter().enumerate() {
        let d = p.distance(pos);
        if d < best {
            best = d;
            closest = Some(i);
        }
    }
    closest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_nearest_within_threshold() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        assert_eq!(closest_control_point(&pts, Vec2::new(8.0, 0.0), 5.0), Some(1));
        assert_eq!(closest_control_point(&pts, Vec2::new(1.0, 1.0), 5.0), Some(0));
    }

    #[test]
    fn threshold_is_exclusive() {
        let pts = [Vec2::new(0.0, 0.0)];
        assert_eq!(closest_control_point(&pts, Vec2::new(5.0, 0.0), 5.0), None);
        assert_eq!(closest_control_point(&pts, Vec2::new(4.99, 0.0), 5.0), Some(0));
    }

    #[test]
    fn first_index_wins_ties() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0)];
        assert_eq!(closest_control_point(&pts, Vec2::new(2.0, 0.0), 5.0), Some(0));
    }

    #[test]
    fn no_points_means_no_hit() {
        assert_eq!(closest_control_point(&[], Vec2::zero(), 5.0), None);
    }

    #[test]
    fn phase_prefers_drag_over_hover() {
        let s = InteractionState { closest: Some(0), grabbed: Some(1) };
        assert_eq!(s.phase(), PointerPhase::Dragging(1));
        assert_eq!(InteractionState::default().phase(), PointerPhase::Idle);
    }

    #[test]
    fn retain_below_drops_hidden_indices() {
        let mut s = InteractionState { closest: Some(1), grabbed: Some(1) };
        s.retain_below(1);
        assert_eq!(s, InteractionState::default());

        let mut s = InteractionState { closest: Some(0), grabbed: None };
        s.retain_below(1);
        assert_eq!(s.closest, Some(0));
    }
}
