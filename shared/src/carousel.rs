//! View-state math for the bounded horizontal carousel.
//!
//! All geometry is computed here from plain numbers so the navigation and
//! drag rules can be tested without a DOM; the component layer only feeds
//! in measurements and pointer deltas and renders the resulting offset.

/// Slide width assumed until the component reports a real measurement.
pub const ASSUMED_SLIDE_WIDTH: f64 = 280.0;
/// Horizontal gap between slides, in px.
pub const SLIDE_GAP: f64 = 16.0;
/// Net drag displacement needed to commit to the adjacent slide.
pub const DRAG_THRESHOLD: f64 = 50.0;
/// Scale applied to drag movement past either boundary.
pub const EDGE_RESISTANCE: f64 = 0.3;

/// Outcome of releasing a drag gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragRelease {
    /// Displacement exceeded the threshold toward the start of the list.
    Prev,
    /// Displacement exceeded the threshold toward the end of the list.
    Next,
    /// Below the threshold; snap back to the current slide.
    Snap,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CarouselState {
    current: usize,
    total: usize,
    per_view: usize,
    slide_width: f64,
}

impl CarouselState {
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total,
            per_view: 1,
            slide_width: ASSUMED_SLIDE_WIDTH,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn per_view(&self) -> usize {
        self.per_view
    }

    /// Largest index the viewport may start at: `max(0, total - per_view)`.
    pub fn max_index(&self) -> usize {
        self.total.saturating_sub(self.per_view)
    }

    pub fn at_start(&self) -> bool {
        self.current == 0
    }

    pub fn at_end(&self) -> bool {
        self.current >= self.max_index()
    }

    /// One indicator per reachable index.
    pub fn indicator_count(&self) -> usize {
        self.max_index() + 1
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.per_view = self.per_view.clamp(1, self.total.max(1));
        self.clamp();
    }

    /// Recompute `per_view` from a container measurement. Falls back to the
    /// assumed slide width when the slide has not been laid out yet.
    pub fn measure(&mut self, container_width: f64, slide_width: f64) {
        self.slide_width = if slide_width > 0.0 {
            slide_width
        } else {
            ASSUMED_SLIDE_WIDTH
        };
        let fit = ((container_width + SLIDE_GAP) / (self.slide_width + SLIDE_GAP)).floor();
        self.per_view = (fit.max(0.0) as usize).clamp(1, self.total.max(1));
        self.clamp();
    }

    fn clamp(&mut self) {
        self.current = self.current.min(self.max_index());
    }

    pub fn next(&mut self) -> bool {
        if self.current < self.max_index() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn jump(&mut self, index: usize) -> bool {
        let clamped = index.min(self.max_index());
        let changed = clamped != self.current;
        self.current = clamped;
        changed
    }

    /// Resting translation of the track for the current index.
    pub fn base_offset_px(&self) -> f64 {
        -(self.current as f64) * (self.slide_width + SLIDE_GAP)
    }

    /// Track translation while a drag is in flight. `delta` is the pointer
    /// displacement from the drag origin (positive when moving toward the
    /// previous slide); movement past either boundary is scaled down.
    pub fn drag_offset_px(&self, delta: f64) -> f64 {
        let past_edge = (self.at_start() && delta > 0.0) || (self.at_end() && delta < 0.0);
        let effective = if past_edge {
            delta * EDGE_RESISTANCE
        } else {
            delta
        };
        self.base_offset_px() + effective
    }

    /// Release-time decision for a drag that ended with displacement `delta`.
    pub fn release(delta: f64) -> DragRelease {
        if delta < -DRAG_THRESHOLD {
            DragRelease::Next
        } else if delta > DRAG_THRESHOLD {
            DragRelease::Prev
        } else {
            DragRelease::Snap
        }
    }

    /// Apply the release decision, clamped at the bounds. Returns whether
    /// the index changed.
    pub fn apply_release(&mut self, delta: f64) -> bool {
        match Self::release(delta) {
            DragRelease::Next => self.next(),
            DragRelease::Prev => self.prev(),
            DragRelease::Snap => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_stays_within_bounds_for_any_operation_sequence() {
        let mut state = CarouselState::new(8);
        state.measure(900.0, 280.0); // fits 3 per view
        assert_eq!(state.per_view(), 3);
        assert_eq!(state.max_index(), 5);

        for _ in 0..20 {
            state.next();
            assert!(state.current() <= state.max_index());
        }
        assert_eq!(state.current(), 5);
        for _ in 0..20 {
            state.prev();
        }
        assert_eq!(state.current(), 0);

        state.jump(999);
        assert_eq!(state.current(), 5);
        state.jump(2);
        assert_eq!(state.current(), 2);
    }

    #[test]
    fn step_navigation_is_a_noop_at_bounds() {
        let mut state = CarouselState::new(3);
        assert!(!state.prev());
        assert!(state.next());
        assert!(state.next());
        assert!(!state.next());
        assert_eq!(state.current(), state.max_index());
    }

    #[test]
    fn per_view_is_clamped_to_item_count() {
        let mut state = CarouselState::new(2);
        state.measure(5000.0, 280.0);
        assert_eq!(state.per_view(), 2);
        assert_eq!(state.max_index(), 0);
        assert_eq!(state.indicator_count(), 1);
    }

    #[test]
    fn measure_with_unlaid_out_slide_uses_assumed_width() {
        let mut state = CarouselState::new(10);
        state.measure(600.0, 0.0);
        assert_eq!(state.per_view(), 2);
    }

    #[test]
    fn shrinking_the_list_reclamps_the_index() {
        let mut state = CarouselState::new(10);
        state.jump(9);
        state.set_total(4);
        assert!(state.current() <= state.max_index());
    }

    #[test]
    fn release_commits_one_step_only_past_the_threshold() {
        let mut state = CarouselState::new(5);
        assert!(!state.apply_release(-DRAG_THRESHOLD)); // exactly at threshold: snap
        assert_eq!(state.current(), 0);
        assert!(state.apply_release(-(DRAG_THRESHOLD + 1.0)));
        assert_eq!(state.current(), 1);
        assert!(state.apply_release(DRAG_THRESHOLD + 1.0));
        assert_eq!(state.current(), 0);
        // clamped at the lower bound
        assert!(!state.apply_release(300.0));
        assert_eq!(state.current(), 0);
    }

    #[test]
    fn drag_past_boundaries_is_resisted() {
        let mut state = CarouselState::new(4);
        state.measure(280.0, 280.0); // one per view
        assert_eq!(state.drag_offset_px(100.0), 100.0 * EDGE_RESISTANCE);

        state.jump(3);
        let base = state.base_offset_px();
        assert_eq!(state.drag_offset_px(-100.0), base - 100.0 * EDGE_RESISTANCE);
        // inward drag at the end is not resisted
        assert_eq!(state.drag_offset_px(40.0), base + 40.0);
    }

    #[test]
    fn track_offset_matches_index_times_slide_stride() {
        let mut state = CarouselState::new(6);
        state.measure(900.0, 280.0);
        state.jump(2);
        assert_eq!(state.base_offset_px(), -2.0 * (280.0 + SLIDE_GAP));
    }
}
