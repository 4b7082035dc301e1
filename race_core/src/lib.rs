//! Marble race coordination library.
//!
//! Engine-independent race state: roster parsing, spawn grid, live positions,
//! finish and bounds watchers, rankings and the follow camera. A physics
//! adapter drives it through [`controller::RaceController`].

pub mod camera;
pub mod config;
pub mod controller;
pub mod detector;
pub mod error;
pub mod gravity;
pub mod ledger;
pub mod map;
pub mod roster;
pub mod spawn;
pub mod storage;
pub mod tracker;
pub mod vec3;

pub use controller::{RaceController, RaceEvent, RacePhase};
pub use error::{MapError, RaceError, RosterError};
pub use vec3::Vec3;
