mod arena;
mod camera;
mod core;
mod input;
mod marbles;

pub mod hud;

pub use arena::ArenaPlugin;
pub use camera::CameraPlugin;
pub use core::CorePlugin;
pub(crate) use core::{FixedSet, RaceMessage, RaceState, UpdateSet};
pub use hud::HudPlugin;
pub(crate) use input::RosterEditor;
pub use input::InputPlugin;
pub use marbles::MarblesPlugin;

use bevy::prelude::Vec3;
use marble_race_core::vec3::Vec3 as RaceVec3;

pub(crate) fn to_world(v: RaceVec3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

pub(crate) fn to_race(v: Vec3) -> RaceVec3 {
    RaceVec3::new(v.x as f64, v.y as f64, v.z as f64)
}
