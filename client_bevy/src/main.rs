mod config;
mod constants;
mod game;
mod storage;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use bevy_rapier3d::prelude::*;
use marble_race_core::config::RaceSettings;
use marble_race_core::storage::load_roster;
use marble_race_core::RaceController;

use config::ClientConfig;
use game::{
    ArenaPlugin, CameraPlugin, CorePlugin, HudPlugin, InputPlugin, MarblesPlugin, RaceState,
};

fn main() {
    let config = ClientConfig::from_env_or_location();
    let store = storage::open(&config);
    let roster = load_roster(&store);

    let settings = RaceSettings {
        map_id: config.map_id.clone(),
        rng_seed: config.seed,
        ..Default::default()
    };
    let controller = match RaceController::new(settings, &roster) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("Cannot start race on map {:?}: {}", config.map_id, e);
            // Unknown map ids from the URL or environment fall back to the default map.
            let fallback = RaceSettings {
                rng_seed: config.seed,
                ..Default::default()
            };
            match RaceController::new(fallback, &roster) {
                Ok(controller) => controller,
                Err(e) => {
                    eprintln!("Invalid race configuration: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Marble Race".to_string(),
                resolution: WindowResolution::new(1280, 800),
                present_mode: PresentMode::AutoVsync,
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .insert_resource(RaceState::new(controller))
        .insert_resource(store)
        .add_plugins(CorePlugin)
        .add_plugins(ArenaPlugin)
        .add_plugins(MarblesPlugin)
        .add_plugins(CameraPlugin)
        .add_plugins(InputPlugin)
        .add_plugins(HudPlugin)
        .run();
}
