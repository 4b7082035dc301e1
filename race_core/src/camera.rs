//! Follow camera for the lowest active marble.

use crate::map::CameraHome;
use crate::tracker::PositionTracker;
use crate::vec3::{add, lerp, Vec3};

pub const CAMERA_HEIGHT_OFFSET: f64 = 8.0;
pub const CAMERA_DISTANCE_OFFSET: f64 = 12.0;
pub const CAMERA_LERP_FACTOR: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl From<&CameraHome> for CameraPose {
    fn from(home: &CameraHome) -> Self {
        Self {
            position: home.position,
            look_at: home.look_at(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Idle,
    Tracking,
}

/// What the renderer should do with its camera this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    /// Jump to the home pose.
    Park(CameraPose),
    /// Place the camera at `position` looking at `look_at`.
    Move(CameraPose),
    /// Leave the camera alone.
    Hold,
}

#[derive(Debug, Clone, Copy)]
pub struct CameraFrameInput {
    /// Race is running and the user wants the camera to follow.
    pub follow: bool,
    /// Where the rendered camera is right now.
    pub camera_position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTuning {
    pub height_offset: f64,
    pub distance_offset: f64,
    pub lerp_factor: f64,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            height_offset: CAMERA_HEIGHT_OFFSET,
            distance_offset: CAMERA_DISTANCE_OFFSET,
            lerp_factor: CAMERA_LERP_FACTOR,
        }
    }
}

#[derive(Debug)]
pub struct CameraDirector {
    mode: CameraMode,
    home: CameraPose,
    current: CameraPose,
    tuning: CameraTuning,
    park_pending: bool,
}

impl CameraDirector {
    pub fn new(home: CameraPose, tuning: CameraTuning) -> Self {
        Self {
            mode: CameraMode::Idle,
            home,
            current: home,
            tuning,
            park_pending: true,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn home(&self) -> CameraPose {
        self.home
    }

    pub fn set_home(&mut self, home: CameraPose) {
        self.home = home;
    }

    /// Return to idle and move to the home pose on the next frame.
    pub fn park(&mut self) {
        self.mode = CameraMode::Idle;
        self.current = self.home;
        self.park_pending = true;
    }

    /// Advance one rendered frame.
    pub fn frame(
        &mut self,
        input: CameraFrameInput,
        tracker: &PositionTracker,
        is_active: impl Fn(&str) -> bool,
    ) -> CameraCommand {
        if self.park_pending {
            self.park_pending = false;
            return CameraCommand::Park(self.home);
        }

        match (self.mode, input.follow) {
            (CameraMode::Idle, false) => return CameraCommand::Hold,
            (CameraMode::Tracking, false) => {
                self.mode = CameraMode::Idle;
                return CameraCommand::Hold;
            }
            (CameraMode::Idle, true) => {
                // Start from wherever the camera is, no snap.
                self.current = CameraPose {
                    position: input.camera_position,
                    look_at: self.home.look_at,
                };
                self.mode = CameraMode::Tracking;
            }
            (CameraMode::Tracking, true) => {}
        }

        let Some(target) = lowest_active(tracker, is_active) else {
            return CameraCommand::Hold;
        };

        let target_position = add(
            target,
            Vec3::new(0.0, self.tuning.height_offset, self.tuning.distance_offset),
        );
        let t = self.tuning.lerp_factor;
        self.current.position = lerp(self.current.position, target_position, t);
        self.current.look_at = lerp(self.current.look_at, target, t);
        CameraCommand::Move(self.current)
    }
}

/// Position of the active player with the smallest Y. Ties keep the earlier
/// registered player.
pub fn lowest_active(
    tracker: &PositionTracker,
    is_active: impl Fn(&str) -> bool,
) -> Option<Vec3> {
    tracker
        .snapshot()
        .iter()
        .filter(|r| is_active(&r.id))
        .fold(None, |best: Option<Vec3>, r| match best {
            Some(b) if b.y <= r.current_position.y => Some(b),
            _ => Some(r.current_position),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> CameraPose {
        CameraPose {
            position: Vec3::new(0.0, 30.0, 40.0),
            look_at: Vec3::new(0.0, 10.0, 0.0),
        }
    }

    fn follow(at: Vec3) -> CameraFrameInput {
        CameraFrameInput {
            follow: true,
            camera_position: at,
        }
    }

    fn director() -> CameraDirector {
        let mut d = CameraDirector::new(home(), CameraTuning::default());
        // Consume the initial park.
        let idle = CameraFrameInput {
            follow: false,
            camera_position: home().position,
        };
        assert_eq!(
            d.frame(idle, &PositionTracker::new(), |_| true),
            CameraCommand::Park(home())
        );
        d
    }

    fn tracker_with(points: &[(&str, Vec3)]) -> PositionTracker {
        let mut tracker = PositionTracker::new();
        for (id, pos) in points {
            tracker.register(id);
            tracker.on_position_update(id, *pos);
        }
        tracker
    }

    #[test]
    fn lowest_ignores_removed_players() {
        let tracker = tracker_with(&[
            ("A", Vec3::new(0.0, 5.0, 0.0)),
            ("B", Vec3::new(1.0, 3.0, 0.0)),
            ("C", Vec3::new(2.0, -40.0, 0.0)),
        ]);
        let lowest = lowest_active(&tracker, |id| id == "A" || id == "B");
        assert_eq!(lowest, Some(Vec3::new(1.0, 3.0, 0.0)));
    }

    #[test]
    fn lowest_of_nothing_is_none() {
        let tracker = tracker_with(&[("A", Vec3::ZERO)]);
        assert_eq!(lowest_active(&tracker, |_| false), None);
        assert_eq!(lowest_active(&PositionTracker::new(), |_| true), None);
    }

    #[test]
    fn idle_without_follow_holds() {
        let mut d = director();
        let tracker = tracker_with(&[("A", Vec3::ZERO)]);
        let input = CameraFrameInput {
            follow: false,
            camera_position: Vec3::new(5.0, 5.0, 5.0),
        };
        assert_eq!(d.frame(input, &tracker, |_| true), CameraCommand::Hold);
        assert_eq!(d.mode(), CameraMode::Idle);
    }

    #[test]
    fn tracking_seeds_from_current_camera() {
        let mut d = director();
        let tracker = tracker_with(&[("A", Vec3::new(0.0, 0.0, 0.0))]);
        let camera_at = Vec3::new(10.0, 20.0, 30.0);

        let CameraCommand::Move(pose) = d.frame(follow(camera_at), &tracker, |_| true) else {
            panic!("expected Move");
        };
        assert_eq!(d.mode(), CameraMode::Tracking);

        // One lerp step from the live camera toward (0, 8, 12).
        let expected = lerp(camera_at, Vec3::new(0.0, 8.0, 12.0), CAMERA_LERP_FACTOR);
        assert!((pose.position.x - expected.x).abs() < 1e-9);
        assert!((pose.position.y - expected.y).abs() < 1e-9);
        assert!((pose.position.z - expected.z).abs() < 1e-9);
        // Look-at starts from the home target.
        let expected_look = lerp(home().look_at, Vec3::ZERO, CAMERA_LERP_FACTOR);
        assert!((pose.look_at.y - expected_look.y).abs() < 1e-9);
    }

    #[test]
    fn converges_on_followed_player() {
        let mut d = director();
        let target = Vec3::new(2.0, -4.0, 1.0);
        let tracker = tracker_with(&[("A", target), ("B", Vec3::new(0.0, 9.0, 0.0))]);

        let mut last = CameraCommand::Hold;
        for _ in 0..2000 {
            last = d.frame(follow(Vec3::ZERO), &tracker, |_| true);
        }
        let CameraCommand::Move(pose) = last else {
            panic!("expected Move");
        };
        assert!((pose.position.x - 2.0).abs() < 1e-6);
        assert!((pose.position.y - 4.0).abs() < 1e-6);
        assert!((pose.position.z - 13.0).abs() < 1e-6);
        assert!((pose.look_at.y + 4.0).abs() < 1e-6);
    }

    #[test]
    fn never_follows_removed_player() {
        let mut d = director();
        let tracker = tracker_with(&[
            ("A", Vec3::new(0.0, 10.0, 0.0)),
            ("B", Vec3::new(0.0, 6.0, 0.0)),
            ("C", Vec3::new(0.0, -100.0, 0.0)),
        ]);
        let mut pose = None;
        for _ in 0..3000 {
            let cmd = d.frame(follow(Vec3::ZERO), &tracker, |id| id != "C");
            if let CameraCommand::Move(p) = cmd {
                pose = Some(p);
            }
        }
        let pose = pose.unwrap();
        assert!((pose.look_at.y - 6.0).abs() < 1e-6);
    }

    #[test]
    fn holds_when_no_active_players() {
        let mut d = director();
        let tracker = tracker_with(&[("A", Vec3::ZERO)]);
        assert!(matches!(
            d.frame(follow(Vec3::ZERO), &tracker, |_| true),
            CameraCommand::Move(_)
        ));
        assert_eq!(
            d.frame(follow(Vec3::ZERO), &tracker, |_| false),
            CameraCommand::Hold
        );
        assert_eq!(d.mode(), CameraMode::Tracking);
    }

    #[test]
    fn stop_following_goes_idle() {
        let mut d = director();
        let tracker = tracker_with(&[("A", Vec3::ZERO)]);
        d.frame(follow(Vec3::ZERO), &tracker, |_| true);
        let stop = CameraFrameInput {
            follow: false,
            camera_position: Vec3::ZERO,
        };
        assert_eq!(d.frame(stop, &tracker, |_| true), CameraCommand::Hold);
        assert_eq!(d.mode(), CameraMode::Idle);
    }

    #[test]
    fn park_returns_home_once() {
        let mut d = director();
        let tracker = tracker_with(&[("A", Vec3::ZERO)]);
        d.frame(follow(Vec3::ZERO), &tracker, |_| true);
        d.park();
        assert_eq!(d.mode(), CameraMode::Idle);
        let idle = CameraFrameInput {
            follow: false,
            camera_position: Vec3::ZERO,
        };
        assert_eq!(
            d.frame(idle, &tracker, |_| true),
            CameraCommand::Park(home())
        );
        assert_eq!(d.frame(idle, &tracker, |_| true), CameraCommand::Hold);
    }
}
