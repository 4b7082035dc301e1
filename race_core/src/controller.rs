//! Race orchestration.
//!
//! [`RaceController`] owns every piece of race state and is the only entry
//! point the physics adapter talks to. All calls happen on one thread; the
//! adapter forwards engine callbacks (`on_position_update`,
//! `on_finish_contact`) and drives the clock with `advance`.

use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::camera::{CameraCommand, CameraDirector, CameraFrameInput, CameraPose};
use crate::config::RaceSettings;
use crate::detector::{BoundaryBox, BoundaryWatcher, Classification, Classified, FinishWatcher};
use crate::error::{MapError, RaceError, RosterError};
use crate::gravity::GravitySetting;
use crate::ledger::{FinishRecord, RankingLedger};
use crate::map::{MapConfig, MapRegistry};
use crate::roster::{self, Player};
use crate::spawn::{self, resolve_spawn_count};
use crate::tracker::PositionTracker;
use crate::vec3::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePhase {
    Setup,
    Running,
    Finished,
}

/// Changes the physics adapter has to mirror.
#[derive(Debug, Clone, PartialEq)]
pub enum RaceEvent {
    /// Players were regenerated; respawn every body.
    RosterRebuilt,
    /// A player left the active set; despawn its body.
    PlayerRemoved { id: String, kind: Classification },
    PhaseChanged(RacePhase),
    /// A different map was selected; rebuild the arena.
    MapChanged(String),
}

pub struct RaceController {
    registry: MapRegistry,
    map_id: String,
    map: MapConfig,
    settings: RaceSettings,
    phase: RacePhase,
    roster_text: String,
    roster_error: Option<RosterError>,
    gravity: GravitySetting,
    spawn_points: Vec<Vec3>,
    players: Vec<Player>,
    removed: HashSet<String>,
    tracker: PositionTracker,
    ledger: RankingLedger,
    finish_watcher: FinishWatcher,
    boundary_watcher: BoundaryWatcher,
    camera: CameraDirector,
    camera_follow: bool,
    clock: f64,
    rng: ChaCha8Rng,
    events: Vec<RaceEvent>,
}

impl RaceController {
    pub fn new(settings: RaceSettings, roster_text: &str) -> Result<Self, RaceError> {
        settings.validate().map_err(RaceError::Settings)?;
        let registry = MapRegistry::builtin()?;
        let map = registry
            .get(&settings.map_id)
            .ok_or_else(|| MapError::UnknownMap(settings.map_id.clone()))?
            .config
            .clone();

        let rng = match settings.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut controller = Self {
            map_id: settings.map_id.clone(),
            gravity: GravitySetting::clamped(map.physics.gravity.y),
            boundary_watcher: BoundaryWatcher::new(
                BoundaryBox::from_map(&map),
                settings.boundary_check_interval_secs,
            ),
            camera: CameraDirector::new(CameraPose::from(&map.camera), settings.camera),
            registry,
            map,
            settings,
            phase: RacePhase::Setup,
            roster_text: roster_text.to_string(),
            roster_error: None,
            spawn_points: Vec::new(),
            players: Vec::new(),
            removed: HashSet::new(),
            tracker: PositionTracker::new(),
            ledger: RankingLedger::new(),
            finish_watcher: FinishWatcher::new(),
            camera_follow: true,
            clock: 0.0,
            rng,
            events: Vec::new(),
        };
        controller.rebuild_roster();
        Ok(controller)
    }

    // === Setup ===

    /// Replace the roster text. In setup a valid text immediately rebuilds
    /// the preview roster; an invalid one keeps the last committed roster.
    pub fn set_roster_spec(&mut self, text: &str) -> Result<(), RaceError> {
        self.require_phase(RacePhase::Setup)?;
        self.roster_text = text.to_string();
        self.rebuild_roster();
        Ok(())
    }

    pub fn set_gravity(&mut self, y: f64) -> Result<(), RaceError> {
        self.require_phase(RacePhase::Setup)?;
        self.gravity = GravitySetting::new(y)?;
        Ok(())
    }

    pub fn nudge_gravity(&mut self, delta: f64) -> Result<(), RaceError> {
        self.require_phase(RacePhase::Setup)?;
        self.gravity = self.gravity.nudged(delta);
        Ok(())
    }

    pub fn select_map(&mut self, id: &str) -> Result<(), RaceError> {
        self.require_phase(RacePhase::Setup)?;
        let map = self
            .registry
            .get(id)
            .ok_or_else(|| MapError::UnknownMap(id.to_string()))?
            .config
            .clone();

        self.boundary_watcher.set_bounds(BoundaryBox::from_map(&map));
        self.camera.set_home(CameraPose::from(&map.camera));
        self.camera.park();
        self.gravity = GravitySetting::clamped(map.physics.gravity.y);
        self.map = map;
        self.map_id = id.to_string();
        self.events.push(RaceEvent::MapChanged(self.map_id.clone()));
        self.rebuild_roster();
        tracing::info!("Selected map {}", id);
        Ok(())
    }

    /// Leave setup. On a roster validation error nothing changes and the
    /// error is returned.
    pub fn start(&mut self) -> Result<(), RaceError> {
        self.require_phase(RacePhase::Setup)?;
        if let Err(err) = roster::validate(&self.roster_text) {
            self.roster_error = Some(err.clone());
            return Err(err.into());
        }

        self.ledger.reset();
        self.removed.clear();
        self.clock = 0.0;
        self.finish_watcher.set_enabled(true);
        self.boundary_watcher.set_enabled(true);
        self.set_phase(RacePhase::Running);
        tracing::info!(
            "Race started on {} with {} players, gravity {}",
            self.map_id,
            self.players.len(),
            self.gravity.y()
        );
        Ok(())
    }

    /// Back to setup from any phase with a fresh roster draw.
    pub fn reset(&mut self) {
        self.finish_watcher.set_enabled(false);
        self.boundary_watcher.set_enabled(false);
        self.ledger.reset();
        self.removed.clear();
        self.clock = 0.0;
        self.camera.park();
        self.set_phase(RacePhase::Setup);
        self.rebuild_roster();
    }

    // === Engine callbacks ===

    pub fn on_position_update(&mut self, id: &str, position: Vec3) {
        self.tracker.on_position_update(id, position);
    }

    /// Finish-line contact-begin for `player_id`.
    pub fn on_finish_contact(&mut self, player_id: &str) {
        if self.phase != RacePhase::Running {
            return;
        }
        match self.finish_watcher.on_contact(player_id) {
            Some(hit) => self.classify(hit),
            None => tracing::debug!("Ignoring repeated finish contact for {}", player_id),
        }
    }

    /// Advance the race clock by `dt` seconds and run the boundary poll.
    pub fn advance(&mut self, dt: f64) {
        if self.phase != RacePhase::Running {
            return;
        }
        self.clock += dt;
        let removed = &self.removed;
        let hits = self
            .boundary_watcher
            .advance(dt, &self.tracker, |id| !removed.contains(id));
        for hit in hits {
            self.classify(hit);
        }
    }

    /// Camera update for this frame.
    pub fn camera_frame(&mut self, camera_position: Vec3) -> CameraCommand {
        let input = CameraFrameInput {
            follow: self.phase == RacePhase::Running && self.camera_follow,
            camera_position,
        };
        let removed = &self.removed;
        self.camera
            .frame(input, &self.tracker, |id| !removed.contains(id))
    }

    pub fn set_camera_follow(&mut self, follow: bool) {
        self.camera_follow = follow;
    }

    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        std::mem::take(&mut self.events)
    }

    // === Queries ===

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn is_active(&self, id: &str) -> bool {
        !self.removed.contains(id) && self.players.iter().any(|p| p.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.players
            .iter()
            .filter(|p| !self.removed.contains(&p.id))
            .count()
    }

    pub fn rankings(&self) -> Vec<FinishRecord> {
        self.ledger.list()
    }

    pub fn roster_text(&self) -> &str {
        &self.roster_text
    }

    /// Validation error of the current roster text, if any.
    pub fn roster_error(&self) -> Option<&RosterError> {
        self.roster_error.as_ref()
    }

    pub fn gravity(&self) -> GravitySetting {
        self.gravity
    }

    /// Gravity the physics world should use right now: none during setup so
    /// marbles rest on their spawn grid.
    pub fn effective_gravity(&self) -> Vec3 {
        match self.phase {
            RacePhase::Setup => Vec3::ZERO,
            RacePhase::Running | RacePhase::Finished => {
                let g = self.map.physics.gravity;
                Vec3::new(g.x, self.gravity.y(), g.z)
            }
        }
    }

    pub fn map(&self) -> &MapConfig {
        &self.map
    }

    pub fn map_id(&self) -> &str {
        &self.map_id
    }

    pub fn registry(&self) -> &MapRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &RaceSettings {
        &self.settings
    }

    /// Start grid for the current roster text.
    pub fn spawn_points(&self) -> &[Vec3] {
        &self.spawn_points
    }

    /// Race clock in seconds since start.
    pub fn elapsed(&self) -> f64 {
        self.clock
    }

    pub fn camera_follow(&self) -> bool {
        self.camera_follow
    }

    /// The user steers the camera: during setup, or with follow switched off.
    pub fn manual_camera(&self) -> bool {
        self.phase == RacePhase::Setup || !self.camera_follow
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    // === Internals ===

    fn require_phase(&self, phase: RacePhase) -> Result<(), RaceError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(RaceError::WrongPhase(self.phase))
        }
    }

    fn set_phase(&mut self, phase: RacePhase) {
        if self.phase != phase {
            self.phase = phase;
            self.events.push(RaceEvent::PhaseChanged(phase));
        }
    }

    fn rebuild_roster(&mut self) {
        let validated = roster::validate(&self.roster_text);
        let count = resolve_spawn_count(validated.as_ref().ok().map(|s| s.total_count()));
        let top = spawn::top_obstacle_height(&self.map.obstacles);
        self.spawn_points = spawn::allocate(count, top, &mut self.rng);

        match validated {
            Ok(spec) => {
                self.players = spec.expand(&self.spawn_points, &mut self.rng);
                self.roster_error = None;
            }
            Err(err) => {
                tracing::debug!("Keeping previous roster: {}", err);
                self.roster_error = Some(err);
                // Previous players keep their spawn positions.
            }
        }

        self.tracker.clear();
        for player in &self.players {
            self.tracker.register(&player.id);
            self.tracker.on_position_update(&player.id, player.position);
        }
        self.events.push(RaceEvent::RosterRebuilt);
    }

    /// Record a classification and drop the player from the active set.
    fn classify(&mut self, hit: Classified) {
        let Some(player) = self.players.iter().find(|p| p.id == hit.id) else {
            tracing::debug!("Classification for unknown player {}", hit.id);
            return;
        };

        let recorded = match hit.kind {
            Classification::Finished => {
                self.ledger
                    .record_finish(&player.id, &player.name, self.clock)
            }
            Classification::OutOfBounds => {
                self.ledger
                    .record_out_of_bounds(&player.id, &player.name, self.clock)
            }
        };
        let Some(record) = recorded else {
            tracing::debug!("{} already classified", hit.id);
            return;
        };
        tracing::info!(
            "{} {} at {:.2}s (rank {})",
            record.name,
            if record.is_out_of_bounds {
                "out of bounds"
            } else {
                "finished"
            },
            record.finish_time,
            record.rank
        );

        self.removed.insert(hit.id.clone());
        self.events.push(RaceEvent::PlayerRemoved {
            id: hit.id,
            kind: hit.kind,
        });

        if self.active_count() == 0 {
            self.finish_watcher.set_enabled(false);
            self.boundary_watcher.set_enabled(false);
            self.set_phase(RacePhase::Finished);
            tracing::info!("All players classified after {:.2}s", self.clock);
        }
    }
}
