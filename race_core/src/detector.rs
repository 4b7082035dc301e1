//! Finish and out-of-bounds detection.
//!
//! Two watchers classify players: [`FinishWatcher`] reacts to finish-line
//! contacts, [`BoundaryWatcher`] polls live positions on a fixed period.
//! Each reports a player at most once while enabled; the ledger enforces the
//! same rule across both.

use std::collections::HashSet;

use crate::map::MapConfig;
use crate::tracker::PositionTracker;
use crate::vec3::Vec3;

/// Slack added to the horizontal half-extents.
pub const BOUNDARY_BUFFER: f64 = 5.0;
/// Lowest allowed Y, relative to the finish line.
pub const MIN_Y_OFFSET: f64 = -20.0;
/// Highest allowed Y, relative to the area height.
pub const MAX_Y_OFFSET: f64 = 50.0;
/// Default boundary polling period.
pub const BOUNDARY_CHECK_INTERVAL_SECS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Finished,
    OutOfBounds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub id: String,
    pub kind: Classification,
}

/// Axis-aligned box a live player must stay inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryBox {
    pub half_width: f64,
    pub half_depth: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundaryBox {
    pub fn from_map(map: &MapConfig) -> Self {
        let b = &map.game_area.boundaries;
        Self {
            half_width: b.width / 2.0 + BOUNDARY_BUFFER,
            half_depth: b.depth / 2.0 + BOUNDARY_BUFFER,
            min_y: map.finish_line.position.y + MIN_Y_OFFSET,
            max_y: b.height + MAX_Y_OFFSET,
        }
    }

    pub fn is_outside(&self, p: Vec3) -> bool {
        p.x.abs() > self.half_width
            || p.z.abs() > self.half_depth
            || p.y < self.min_y
            || p.y > self.max_y
    }
}

/// Event-driven watcher on the finish line's contact-begin signal.
#[derive(Debug, Default)]
pub struct FinishWatcher {
    enabled: bool,
    classified: HashSet<String>,
}

impl FinishWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enabling or disabling always starts from an empty classified set.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.classified.clear();
        }
        self.enabled = enabled;
    }

    /// A player touched the finish line. Physics engines may report several
    /// begin events for one contact; only the first one classifies.
    pub fn on_contact(&mut self, player_id: &str) -> Option<Classified> {
        if !self.enabled || !self.classified.insert(player_id.to_string()) {
            return None;
        }
        Some(Classified {
            id: player_id.to_string(),
            kind: Classification::Finished,
        })
    }
}

/// Polling watcher that flags players who left the play area.
#[derive(Debug)]
pub struct BoundaryWatcher {
    bounds: BoundaryBox,
    interval_secs: f64,
    enabled: bool,
    elapsed_secs: f64,
    checked: HashSet<String>,
}

impl BoundaryWatcher {
    pub fn new(bounds: BoundaryBox, interval_secs: f64) -> Self {
        Self {
            bounds,
            interval_secs,
            enabled: false,
            elapsed_secs: 0.0,
            checked: HashSet::new(),
        }
    }

    pub fn bounds(&self) -> BoundaryBox {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: BoundaryBox) {
        self.bounds = bounds;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling stops the timer; any transition drops the checked set so
    /// the next race starts clean.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.checked.clear();
            self.elapsed_secs = 0.0;
        }
        self.enabled = enabled;
    }

    /// Advance the poll timer by `dt` seconds. Runs at most one check per
    /// call, once a full period has accumulated.
    pub fn advance(
        &mut self,
        dt: f64,
        tracker: &PositionTracker,
        is_active: impl Fn(&str) -> bool,
    ) -> Vec<Classified> {
        if !self.enabled {
            return Vec::new();
        }
        self.elapsed_secs += dt.max(0.0);
        if self.elapsed_secs < self.interval_secs {
            return Vec::new();
        }
        self.elapsed_secs %= self.interval_secs;
        self.check(tracker, is_active)
    }

    /// One poll over the active, unchecked players.
    pub fn check(
        &mut self,
        tracker: &PositionTracker,
        is_active: impl Fn(&str) -> bool,
    ) -> Vec<Classified> {
        if !self.enabled {
            return Vec::new();
        }
        let mut out = Vec::new();
        for record in tracker.snapshot() {
            if self.checked.contains(&record.id) || !is_active(&record.id) {
                continue;
            }
            if self.bounds.is_outside(record.current_position) {
                self.checked.insert(record.id.clone());
                out.push(Classified {
                    id: record.id.clone(),
                    kind: Classification::OutOfBounds,
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> BoundaryBox {
        // width 20, depth 10, height 40, finish line at y = 0
        BoundaryBox {
            half_width: 10.0 + BOUNDARY_BUFFER,
            half_depth: 5.0 + BOUNDARY_BUFFER,
            min_y: MIN_Y_OFFSET,
            max_y: 40.0 + MAX_Y_OFFSET,
        }
    }

    fn tracker_with(points: &[(&str, Vec3)]) -> PositionTracker {
        let mut tracker = PositionTracker::new();
        for (id, pos) in points {
            tracker.register(id);
            tracker.on_position_update(id, *pos);
        }
        tracker
    }

    mod boundary_box {
        use super::*;

        #[test]
        fn inside_is_not_outside() {
            assert!(!bounds().is_outside(Vec3::new(14.9, 0.0, -9.9)));
            assert!(!bounds().is_outside(Vec3::new(0.0, -20.0, 0.0)));
            assert!(!bounds().is_outside(Vec3::new(0.0, 90.0, 0.0)));
        }

        #[test]
        fn each_face_is_checked() {
            let b = bounds();
            assert!(b.is_outside(Vec3::new(15.1, 0.0, 0.0)));
            assert!(b.is_outside(Vec3::new(-15.1, 0.0, 0.0)));
            assert!(b.is_outside(Vec3::new(0.0, 0.0, 10.1)));
            assert!(b.is_outside(Vec3::new(0.0, 0.0, -10.1)));
            assert!(b.is_outside(Vec3::new(0.0, -20.1, 0.0)));
            assert!(b.is_outside(Vec3::new(0.0, 90.1, 0.0)));
        }
    }

    mod finish_watcher {
        use super::*;

        #[test]
        fn classifies_once() {
            let mut watcher = FinishWatcher::new();
            watcher.set_enabled(true);
            let first = watcher.on_contact("a").unwrap();
            assert_eq!(first.kind, Classification::Finished);
            assert!(watcher.on_contact("a").is_none());
            assert!(watcher.on_contact("b").is_some());
        }

        #[test]
        fn ignores_contacts_while_disabled() {
            let mut watcher = FinishWatcher::new();
            assert!(watcher.on_contact("a").is_none());
            watcher.set_enabled(true);
            assert!(watcher.on_contact("a").is_some());
        }

        #[test]
        fn disable_then_enable_forgets_classified() {
            let mut watcher = FinishWatcher::new();
            watcher.set_enabled(true);
            watcher.on_contact("a");
            watcher.set_enabled(false);
            watcher.set_enabled(true);
            assert!(watcher.on_contact("a").is_some());
        }
    }

    mod boundary_watcher {
        use super::*;

        #[test]
        fn waits_for_a_full_period() {
            let tracker = tracker_with(&[("a", Vec3::new(100.0, 0.0, 0.0))]);
            let mut watcher = BoundaryWatcher::new(bounds(), 1.0);
            watcher.set_enabled(true);

            assert!(watcher.advance(0.5, &tracker, |_| true).is_empty());
            assert!(watcher.advance(0.4, &tracker, |_| true).is_empty());
            let hits = watcher.advance(0.2, &tracker, |_| true);
            assert_eq!(
                hits,
                [Classified {
                    id: "a".to_string(),
                    kind: Classification::OutOfBounds
                }]
            );
        }

        #[test]
        fn reports_each_player_once() {
            let tracker = tracker_with(&[("a", Vec3::new(0.0, -50.0, 0.0))]);
            let mut watcher = BoundaryWatcher::new(bounds(), 1.0);
            watcher.set_enabled(true);

            assert_eq!(watcher.advance(1.0, &tracker, |_| true).len(), 1);
            assert!(watcher.advance(1.0, &tracker, |_| true).is_empty());
        }

        #[test]
        fn skips_inactive_players() {
            let tracker = tracker_with(&[
                ("gone", Vec3::new(0.0, -50.0, 0.0)),
                ("live", Vec3::new(0.0, -50.0, 0.0)),
            ]);
            let mut watcher = BoundaryWatcher::new(bounds(), 1.0);
            watcher.set_enabled(true);

            let hits = watcher.advance(1.0, &tracker, |id| id != "gone");
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].id, "live");
        }

        #[test]
        fn ignores_players_inside() {
            let tracker = tracker_with(&[("a", Vec3::new(1.0, 5.0, 1.0))]);
            let mut watcher = BoundaryWatcher::new(bounds(), 1.0);
            watcher.set_enabled(true);
            assert!(watcher.advance(3.0, &tracker, |_| true).is_empty());
        }

        #[test]
        fn disabled_watcher_never_fires() {
            let tracker = tracker_with(&[("a", Vec3::new(0.0, -50.0, 0.0))]);
            let mut watcher = BoundaryWatcher::new(bounds(), 1.0);
            assert!(watcher.advance(10.0, &tracker, |_| true).is_empty());
            assert!(watcher.check(&tracker, |_| true).is_empty());
        }

        #[test]
        fn disabling_drops_timer_and_checked_set() {
            let tracker = tracker_with(&[("a", Vec3::new(0.0, -50.0, 0.0))]);
            let mut watcher = BoundaryWatcher::new(bounds(), 1.0);
            watcher.set_enabled(true);
            assert_eq!(watcher.advance(1.0, &tracker, |_| true).len(), 1);

            watcher.advance(0.9, &tracker, |_| true);
            watcher.set_enabled(false);
            watcher.set_enabled(true);

            // Stale 0.9s was dropped with the disable.
            assert!(watcher.advance(0.5, &tracker, |_| true).is_empty());
            // Checked set was dropped too.
            assert_eq!(watcher.advance(0.5, &tracker, |_| true).len(), 1);
        }

        #[test]
        fn long_frame_runs_a_single_check() {
            let mut tracker = tracker_with(&[("a", Vec3::new(0.0, 5.0, 0.0))]);
            let mut watcher = BoundaryWatcher::new(bounds(), 1.0);
            watcher.set_enabled(true);

            assert!(watcher.advance(3.5, &tracker, |_| true).is_empty());
            tracker.on_position_update("a", Vec3::new(0.0, -50.0, 0.0));
            // Remainder 0.5s carried; another 0.5s completes the period.
            assert!(watcher.advance(0.4, &tracker, |_| true).is_empty());
            assert_eq!(watcher.advance(0.1, &tracker, |_| true).len(), 1);
        }
    }
}
