use std::collections::{HashMap, HashSet};

use bevy::math::Isometry3d;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use marble_race_core::roster::Player;
use marble_race_core::{RaceEvent, RacePhase};

use crate::constants::{
    color_from_hex, Colors, MARBLE_FRICTION, MARBLE_RADIUS, MARBLE_RESTITUTION,
    SPAWN_MARKER_RADIUS,
};

use super::arena::FinishLine;
use super::{to_race, to_world, FixedSet, RaceMessage, RaceState, UpdateSet};

pub struct MarblesPlugin;

/// Physics body of one player.
#[derive(Component)]
pub(crate) struct Marble {
    pub(crate) player_id: String,
}

#[derive(Resource)]
struct MarbleMesh(Handle<Mesh>);

impl Plugin for MarblesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_marble_mesh)
            .add_systems(
                FixedUpdate,
                (publish_positions, finish_contact_system)
                    .chain()
                    .in_set(FixedSet::PostPhysics),
            )
            .add_systems(Update, apply_race_messages.in_set(UpdateSet::Visuals))
            .add_systems(Update, draw_spawn_markers.in_set(UpdateSet::Visuals));
    }
}

fn load_marble_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.insert_resource(MarbleMesh(meshes.add(Sphere::new(MARBLE_RADIUS))));
}

/// Respawn the whole field on a roster rebuild, otherwise despawn the
/// marbles of removed players.
fn apply_race_messages(
    mut commands: Commands,
    mut messages: MessageReader<RaceMessage>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mesh: Option<Res<MarbleMesh>>,
    race: Res<RaceState>,
    q_marbles: Query<(Entity, &Marble)>,
) {
    let mut rebuild = false;
    let mut removed = HashSet::new();
    for msg in messages.read() {
        match &msg.0 {
            RaceEvent::RosterRebuilt => rebuild = true,
            RaceEvent::PlayerRemoved { id, .. } => {
                removed.insert(id.clone());
            }
            RaceEvent::PhaseChanged(_) | RaceEvent::MapChanged(_) => {}
        }
    }

    if rebuild {
        for (entity, _) in &q_marbles {
            commands.entity(entity).despawn();
        }
        let Some(mesh) = mesh else {
            warn!("Marble mesh not loaded, skipping spawn");
            return;
        };
        spawn_marbles(
            &mut commands,
            &mut materials,
            &mesh.0,
            race.controller.players(),
        );
        return;
    }

    for (entity, marble) in &q_marbles {
        if removed.contains(&marble.player_id) {
            commands.entity(entity).despawn();
        }
    }
}

fn spawn_marbles(
    commands: &mut Commands,
    materials: &mut Assets<StandardMaterial>,
    mesh: &Handle<Mesh>,
    players: &[Player],
) {
    // One material per group color.
    let mut by_color: HashMap<u32, Handle<StandardMaterial>> = HashMap::new();

    for player in players {
        let material = by_color
            .entry(player.color)
            .or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: color_from_hex(player.color),
                    perceptual_roughness: 0.3,
                    metallic: 0.1,
                    ..default()
                })
            })
            .clone();

        commands.spawn((
            RigidBody::Dynamic,
            Collider::ball(MARBLE_RADIUS),
            ColliderMassProperties::Mass(player.mass as f32),
            Restitution::coefficient(MARBLE_RESTITUTION),
            Friction::coefficient(MARBLE_FRICTION),
            ActiveEvents::COLLISION_EVENTS,
            Ccd::enabled(),
            // Gravity switches on at race start; sleeping bodies would not notice.
            Sleeping::disabled(),
            Velocity::zero(),
            Transform::from_translation(to_world(player.position)),
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material),
            Marble {
                player_id: player.id.clone(),
            },
        ));
    }
    debug!("Spawned {} marbles", players.len());
}

fn publish_positions(mut race: ResMut<RaceState>, q_marbles: Query<(&Transform, &Marble)>) {
    for (transform, marble) in &q_marbles {
        race.controller
            .on_position_update(&marble.player_id, to_race(transform.translation));
    }
}

fn finish_contact_system(
    mut race: ResMut<RaceState>,
    mut collision_events: MessageReader<CollisionEvent>,
    q_marbles: Query<&Marble>,
    q_finish: Query<(), With<FinishLine>>,
) {
    for event in collision_events.read() {
        if let CollisionEvent::Started(a, b, _) = event {
            let marble = if q_finish.get(*a).is_ok() {
                q_marbles.get(*b).ok()
            } else if q_finish.get(*b).is_ok() {
                q_marbles.get(*a).ok()
            } else {
                None
            };
            if let Some(marble) = marble {
                race.controller.on_finish_contact(&marble.player_id);
            }
        }
    }
}

/// Outline of the start grid while the race is being set up.
fn draw_spawn_markers(mut gizmos: Gizmos, race: Res<RaceState>) {
    if race.controller.phase() != RacePhase::Setup {
        return;
    }
    let color = color_from_hex(Colors::SPAWN_MARKER).with_alpha(0.5);
    for point in race.controller.spawn_points() {
        gizmos.sphere(
            Isometry3d::from_translation(to_world(*point)),
            SPAWN_MARKER_RADIUS,
            color,
        );
    }
}
