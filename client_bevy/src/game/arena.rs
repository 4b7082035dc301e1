use bevy::math::primitives::ConicalFrustum;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use marble_race_core::map::{MapConfig, ObstacleConfig, ObstacleKind};
use marble_race_core::vec3::Vec3 as RaceVec3;
use marble_race_core::RaceEvent;

use crate::constants::{
    map_color, Colors, FLOOR_EXTENT, FLOOR_THICKNESS, WALL_ALPHA_COLORED, WALL_ALPHA_PLAIN,
};

use super::{to_world, RaceMessage, RaceState, UpdateSet};

pub struct ArenaPlugin;

/// Anything built from the map; despawned when the map changes.
#[derive(Component)]
pub(crate) struct ArenaPiece;

#[derive(Component)]
pub(crate) struct FinishLine;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_initial_arena)
            .add_systems(Update, rebuild_arena_on_map_change.in_set(UpdateSet::Visuals));
    }
}

/// How an obstacle moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ObstacleMotion {
    Fixed,
    /// Spins in place at the given angular velocity (rad/s per axis).
    Spinning(Vec3),
    /// Pushed around by marbles.
    Loose { mass: f32 },
}

pub(crate) fn obstacle_motion(obstacle: &ObstacleConfig) -> ObstacleMotion {
    if let Some(spin) = obstacle.rotation_speed.map(to_world) {
        if spin != Vec3::ZERO {
            return ObstacleMotion::Spinning(spin);
        }
    }
    match obstacle.mass {
        Some(mass) if mass > 0.0 => ObstacleMotion::Loose { mass: mass as f32 },
        _ => ObstacleMotion::Fixed,
    }
}

/// Euler angles in radians, applied X then Y then Z.
fn rotation_of(rotation: Option<RaceVec3>) -> Quat {
    rotation.map_or(Quat::IDENTITY, |r| {
        Quat::from_euler(EulerRot::XYZ, r.x as f32, r.y as f32, r.z as f32)
    })
}

fn spawn_initial_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    race: Res<RaceState>,
) {
    spawn_arena(&mut commands, &mut meshes, &mut materials, race.controller.map());
}

fn rebuild_arena_on_map_change(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut messages: MessageReader<RaceMessage>,
    race: Res<RaceState>,
    q_pieces: Query<Entity, With<ArenaPiece>>,
) {
    let changes = messages
        .read()
        .filter(|msg| matches!(msg.0, RaceEvent::MapChanged(_)))
        .count();
    if changes == 0 {
        return;
    }

    for entity in &q_pieces {
        commands.entity(entity).despawn();
    }
    spawn_arena(&mut commands, &mut meshes, &mut materials, race.controller.map());
    info!("Arena rebuilt for {}", race.controller.map().name);
}

fn spawn_arena(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    map: &MapConfig,
) {
    let floor = &map.game_area.floor;
    let floor_top = to_world(floor.position);
    commands.spawn((
        RigidBody::Fixed,
        Collider::cuboid(FLOOR_EXTENT / 2.0, FLOOR_THICKNESS / 2.0, FLOOR_EXTENT / 2.0),
        Transform::from_translation(floor_top - Vec3::Y * (FLOOR_THICKNESS / 2.0)),
        Mesh3d(meshes.add(Cuboid::new(FLOOR_EXTENT, FLOOR_THICKNESS, FLOOR_EXTENT))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: map_color(floor.color.as_deref(), Colors::FLOOR),
            perceptual_roughness: 0.9,
            ..default()
        })),
        ArenaPiece,
    ));

    for wall in &map.walls {
        let size = to_world(wall.size);
        let alpha = if wall.color.is_some() {
            WALL_ALPHA_COLORED
        } else {
            WALL_ALPHA_PLAIN
        };
        commands.spawn((
            RigidBody::Fixed,
            Collider::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
            Restitution::coefficient(0.3),
            Transform::from_translation(to_world(wall.position))
                .with_rotation(rotation_of(wall.rotation)),
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: map_color(wall.color.as_deref(), Colors::WALL).with_alpha(alpha),
                alpha_mode: AlphaMode::Blend,
                ..default()
            })),
            ArenaPiece,
        ));
    }

    for obstacle in &map.obstacles {
        spawn_obstacle(commands, meshes, materials, obstacle);
    }

    let finish = &map.finish_line;
    let size = to_world(finish.size);
    commands.spawn((
        RigidBody::Fixed,
        Collider::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
        ActiveEvents::COLLISION_EVENTS,
        Transform::from_translation(to_world(finish.position)),
        Mesh3d(meshes.add(Cuboid::from_size(size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: map_color(finish.color.as_deref(), Colors::FINISH),
            perceptual_roughness: 0.1,
            metallic: 0.2,
            ..default()
        })),
        FinishLine,
        ArenaPiece,
    ));
}

fn spawn_obstacle(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    obstacle: &ObstacleConfig,
) {
    let size = to_world(obstacle.size);
    let (mesh, collider, fallback_color) = match obstacle.kind {
        ObstacleKind::Box => (
            Mesh::from(Cuboid::from_size(size)),
            Collider::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
            Colors::BOX,
        ),
        ObstacleKind::Ramp => (
            Mesh::from(Cuboid::from_size(size)),
            Collider::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
            Colors::RAMP,
        ),
        ObstacleKind::Sphere => (
            Mesh::from(Sphere::new(size.x / 2.0)),
            Collider::ball(size.x / 2.0),
            Colors::SPHERE,
        ),
        // `size.x` is the radius for cylinders.
        ObstacleKind::Cylinder => (
            Mesh::from(Cylinder::new(size.x, size.y)),
            Collider::cylinder(size.y / 2.0, size.x),
            Colors::CYLINDER,
        ),
        ObstacleKind::Funnel => funnel_shape(size),
    };

    let mut entity = commands.spawn((
        collider,
        Restitution::coefficient(0.3),
        Transform::from_translation(to_world(obstacle.position))
            .with_rotation(rotation_of(obstacle.rotation)),
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: map_color(obstacle.color.as_deref(), fallback_color),
            ..default()
        })),
        ArenaPiece,
    ));

    match obstacle_motion(obstacle) {
        ObstacleMotion::Fixed => {
            entity.insert(RigidBody::Fixed);
        }
        ObstacleMotion::Spinning(spin) => {
            entity.insert((RigidBody::KinematicVelocityBased, Velocity::angular(spin)));
        }
        ObstacleMotion::Loose { mass } => {
            entity.insert((RigidBody::Dynamic, ColliderMassProperties::Mass(mass)));
        }
    }
}

/// Wide at the top, narrow at the bottom. The collider is the convex hull of
/// both rims.
fn funnel_shape(size: Vec3) -> (Mesh, Collider, u32) {
    const RIM_SEGMENTS: usize = 16;
    let radius_top = size.x / 2.0;
    let radius_bottom = size.z / 4.0;
    let half_height = size.y / 2.0;

    let mesh = Mesh::from(ConicalFrustum {
        radius_top,
        radius_bottom,
        height: size.y,
    });

    let rims: Vec<Vec3> = (0..RIM_SEGMENTS)
        .flat_map(|i| {
            let angle = i as f32 / RIM_SEGMENTS as f32 * std::f32::consts::TAU;
            let (sin, cos) = angle.sin_cos();
            [
                Vec3::new(cos * radius_top, half_height, sin * radius_top),
                Vec3::new(cos * radius_bottom, -half_height, sin * radius_bottom),
            ]
        })
        .collect();
    let collider = Collider::convex_hull(&rims)
        .unwrap_or_else(|| Collider::cylinder(half_height, radius_top));

    (mesh, collider, Colors::FUNNEL)
}
