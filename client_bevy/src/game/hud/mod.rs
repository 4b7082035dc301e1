mod spawn;
mod systems;
mod types;

use bevy::prelude::*;
use marble_race_core::RaceController;

use super::UpdateSet;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn::spawn_hud).add_systems(
            Update,
            (
                systems::update_status_ui,
                systems::update_roster_ui,
                systems::update_ranking_ui,
                systems::scroll_ranking_ui,
            )
                .chain()
                .in_set(UpdateSet::Visuals),
        );
    }
}

/// Whether the cursor sits on the visible ranking panel. Wheel input there
/// scrolls the list instead of zooming the camera.
pub(crate) fn cursor_over_rankings(window: &Window, race: &RaceController) -> bool {
    types::ranking_panel_shown(race.phase(), race.rankings().len())
        && window
            .cursor_position()
            .is_some_and(|cursor| types::over_ranking_panel(cursor, window.width()))
}
