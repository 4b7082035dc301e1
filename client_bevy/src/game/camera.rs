use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use marble_race_core::camera::{CameraCommand, CameraPose};

use super::core::MainCamera;
use super::{to_race, to_world, RaceState, UpdateSet};

pub struct CameraPlugin;

/// Radians per pixel of mouse drag.
const ORBIT_SENSITIVITY: f32 = 0.005;
/// Fraction of the distance covered by one scroll line.
const ZOOM_STEP: f32 = 0.1;
/// Pixel-unit scroll deltas per line.
const PIXELS_PER_LINE: f32 = 100.0;
const MIN_ORBIT_DISTANCE: f32 = 3.0;
const MAX_ORBIT_DISTANCE: f32 = 150.0;
/// Stops the camera short of the poles so `looking_at` keeps a stable up.
const MAX_ORBIT_PITCH: f32 = 1.54;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (follow_camera_system, orbit_camera_system)
                .chain()
                .in_set(UpdateSet::Visuals),
        );
    }
}

fn follow_camera_system(
    mut race: ResMut<RaceState>,
    mut q_camera: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(mut transform) = q_camera.single_mut() else {
        return;
    };

    match race.controller.camera_frame(to_race(transform.translation)) {
        CameraCommand::Park(pose) | CameraCommand::Move(pose) => {
            *transform = pose_transform(pose);
        }
        CameraCommand::Hold => {}
    }
}

/// Left-drag orbits around the map's camera target, the wheel zooms.
fn orbit_camera_system(
    race: Res<RaceState>,
    buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut q_camera: Query<&mut Transform, With<MainCamera>>,
) {
    if !race.controller.manual_camera() {
        return;
    }
    let over_rankings = q_window
        .single()
        .is_ok_and(|window| super::hud::cursor_over_rankings(window, &race.controller));

    let drag = if buttons.pressed(MouseButton::Left) {
        motion.delta
    } else {
        Vec2::ZERO
    };
    let zoom = match scroll.unit {
        _ if over_rankings => 0.0,
        MouseScrollUnit::Line => scroll.delta.y,
        MouseScrollUnit::Pixel => scroll.delta.y / PIXELS_PER_LINE,
    };
    if drag == Vec2::ZERO && zoom == 0.0 {
        return;
    }

    let Ok(mut transform) = q_camera.single_mut() else {
        return;
    };
    let target = to_world(race.controller.map().camera.look_at());
    let position = orbit_position(transform.translation, target, drag, zoom);
    *transform = Transform::from_translation(position).looking_at(target, Vec3::Y);
}

/// New camera position after a drag of `drag` pixels and `zoom` scroll
/// lines. Positive zoom moves closer.
fn orbit_position(position: Vec3, target: Vec3, drag: Vec2, zoom: f32) -> Vec3 {
    let offset = position - target;
    let distance = offset.length().max(MIN_ORBIT_DISTANCE);

    let yaw = offset.x.atan2(offset.z) - drag.x * ORBIT_SENSITIVITY;
    let pitch = ((offset.y / distance).clamp(-1.0, 1.0).asin() + drag.y * ORBIT_SENSITIVITY)
        .clamp(-MAX_ORBIT_PITCH, MAX_ORBIT_PITCH);
    let distance =
        (distance * (1.0 - zoom * ZOOM_STEP)).clamp(MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);

    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    target
        + Vec3::new(
            distance * cos_pitch * sin_yaw,
            distance * sin_pitch,
            distance * cos_pitch * cos_yaw,
        )
}

fn pose_transform(pose: CameraPose) -> Transform {
    Transform::from_translation(to_world(pose.position)).looking_at(to_world(pose.look_at), Vec3::Y)
}
