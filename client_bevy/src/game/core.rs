use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use bevy::time::Virtual;
use bevy_rapier3d::prelude::{PhysicsSet, RapierConfiguration, TimestepMode};
use marble_race_core::{RaceController, RaceEvent, RacePhase};
use std::time::Duration;

use crate::constants::{
    color_from_hex, Colors, PHYSICS_DT, PHYSICS_MAX_CATCHUP_SECS, PHYSICS_SUBSTEPS,
};

use super::to_world;

#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub(crate) enum UpdateSet {
    Input,
    Race,
    Visuals,
}

#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub(crate) enum FixedSet {
    Simulate,
    PostPhysics,
    Race,
}

/// The race controller. Every core call goes through this resource.
#[derive(Resource)]
pub struct RaceState {
    pub(crate) controller: RaceController,
}

impl RaceState {
    pub fn new(controller: RaceController) -> Self {
        Self { controller }
    }
}

/// Controller events re-published for the arena, marble and HUD plugins.
#[derive(Message, Clone, Debug)]
pub(crate) struct RaceMessage(pub(crate) RaceEvent);

#[derive(Component)]
pub(crate) struct MainCamera;

/// Wires the race controller into the frame schedule. Expects [`RaceState`]
/// to be inserted by the app.
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<RaceMessage>()
            .insert_resource(ClearColor(color_from_hex(Colors::BACKGROUND)))
            .insert_resource(Time::<Fixed>::from_seconds(PHYSICS_DT as f64))
            .insert_resource(TimestepMode::Fixed {
                dt: PHYSICS_DT,
                substeps: PHYSICS_SUBSTEPS,
            })
            .configure_sets(
                Update,
                (UpdateSet::Input, UpdateSet::Race, UpdateSet::Visuals).chain(),
            )
            .configure_sets(
                FixedUpdate,
                (FixedSet::Simulate, FixedSet::PostPhysics, FixedSet::Race).chain(),
            )
            .configure_sets(
                FixedUpdate,
                FixedSet::Simulate.before(PhysicsSet::SyncBackend),
            )
            .configure_sets(
                FixedUpdate,
                FixedSet::PostPhysics.after(PhysicsSet::Writeback),
            )
            .add_systems(
                Startup,
                (setup_camera, setup_lights, configure_virtual_time_catchup_cap),
            )
            .add_systems(FixedUpdate, sync_gravity.in_set(FixedSet::Simulate))
            .add_systems(FixedUpdate, advance_race_clock.in_set(FixedSet::Race))
            .add_systems(Update, publish_race_events.in_set(UpdateSet::Race));
    }
}

fn setup_camera(mut commands: Commands, race: Res<RaceState>) {
    #[cfg(target_arch = "wasm32")]
    let msaa = Msaa::Off;
    #[cfg(not(target_arch = "wasm32"))]
    let msaa = Msaa::Sample4;

    let home = race.controller.map().camera;
    commands.spawn((
        Camera3d::default(),
        // No tonemapping LUTs are bundled.
        Tonemapping::None,
        msaa,
        Transform::from_translation(to_world(home.position))
            .looking_at(to_world(home.look_at()), Vec3::Y),
        MainCamera,
    ));
}

fn setup_lights(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 40.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    // Fill from the opposite side.
    commands.spawn((
        DirectionalLight {
            illuminance: 3_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-20.0, 15.0, -10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn configure_virtual_time_catchup_cap(mut virtual_time: ResMut<Time<Virtual>>) {
    virtual_time.set_max_delta(Duration::from_secs_f64(PHYSICS_MAX_CATCHUP_SECS));
}

/// Zero gravity in setup keeps marbles resting on their spawn grid.
fn sync_gravity(race: Res<RaceState>, mut q_config: Query<&mut RapierConfiguration>) {
    let gravity = to_world(race.controller.effective_gravity());
    for mut cfg in &mut q_config {
        if cfg.gravity != gravity {
            cfg.gravity = gravity;
        }
    }
}

fn advance_race_clock(mut race: ResMut<RaceState>, time: Res<Time<Fixed>>) {
    if race.controller.phase() == RacePhase::Running {
        race.controller.advance(time.delta_secs_f64());
    }
}

fn publish_race_events(mut race: ResMut<RaceState>, mut writer: MessageWriter<RaceMessage>) {
    for event in race.controller.drain_events() {
        if let RaceEvent::PhaseChanged(phase) = &event {
            info!("Race phase: {:?}", phase);
        }
        writer.write(RaceMessage(event));
    }
}
