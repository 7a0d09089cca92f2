//! Poll-loop state and one-shot milestone tracking for batch jobs.

use strum_macros::Display;

/// Lifecycle of the client-side poll loop for one batch job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Display)]
pub enum BatchPhase {
    #[default]
    Idle,
    Polling,
    Completed,
    Failed,
    Cancelled,
}

impl BatchPhase {
    /// Whether a poll timer should currently be running.
    pub fn is_active(self) -> bool {
        self == BatchPhase::Polling
    }

    /// Whether a response for this phase should still be applied. Guards
    /// handlers against ticks that resolve after the loop was stopped.
    pub fn accepts_tick(self) -> bool {
        self.is_active()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Milestone {
    Quarter,
    Half,
    ThreeQuarters,
}

impl Milestone {
    pub fn threshold(self) -> f32 {
        match self {
            Milestone::Quarter => 25.0,
            Milestone::Half => 50.0,
            Milestone::ThreeQuarters => 75.0,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Milestone::Quarter => "25% complete!",
            Milestone::Half => "Halfway there!",
            Milestone::ThreeQuarters => "Almost done!",
        }
    }

    const ALL: [Milestone; 3] = [Milestone::Quarter, Milestone::Half, Milestone::ThreeQuarters];
}

/// Fires each milestone at most once per job. The high-water mark is kept
/// instead of the last report so an out-of-order percentage can never cause
/// a threshold to be re-announced.
#[derive(Clone, Debug, Default)]
pub struct MilestoneTracker {
    high_water: f32,
}

impl MilestoneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a progress report and return the milestones newly crossed.
    pub fn advance(&mut self, percentage: f32) -> Vec<Milestone> {
        let crossed = Milestone::ALL
            .into_iter()
            .filter(|m| percentage >= m.threshold() && self.high_water < m.threshold())
            .collect();
        self.high_water = self.high_water.max(percentage);
        crossed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestones_fire_once_in_order() {
        let mut tracker = MilestoneTracker::new();
        assert!(tracker.advance(10.0).is_empty());
        assert_eq!(tracker.advance(30.0), vec![Milestone::Quarter]);
        assert!(tracker.advance(30.0).is_empty());
        assert_eq!(tracker.advance(60.0), vec![Milestone::Half]);
        assert_eq!(tracker.advance(80.0), vec![Milestone::ThreeQuarters]);
        assert!(tracker.advance(100.0).is_empty());
    }

    #[test]
    fn coarse_polling_reports_every_skipped_milestone() {
        let mut tracker = MilestoneTracker::new();
        assert_eq!(
            tracker.advance(100.0),
            vec![Milestone::Quarter, Milestone::Half, Milestone::ThreeQuarters]
        );
    }

    #[test]
    fn out_of_order_reports_never_refire() {
        let mut tracker = MilestoneTracker::new();
        assert_eq!(tracker.advance(55.0).len(), 2);
        assert!(tracker.advance(20.0).is_empty());
        assert!(tracker.advance(55.0).is_empty());
        assert_eq!(tracker.advance(75.0), vec![Milestone::ThreeQuarters]);
    }

    #[test]
    fn only_the_polling_phase_accepts_ticks() {
        assert!(BatchPhase::Polling.accepts_tick());
        for phase in [
            BatchPhase::Idle,
            BatchPhase::Completed,
            BatchPhase::Failed,
            BatchPhase::Cancelled,
        ] {
            assert!(!phase.accepts_tick());
        }
    }
}
