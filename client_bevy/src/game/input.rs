use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;
use marble_race_core::gravity::{GRAVITY_PRESETS, GRAVITY_STEP};
use marble_race_core::storage::save_roster;
use marble_race_core::RacePhase;

use crate::storage::RosterStore;

use super::{RaceState, UpdateSet};

pub struct InputPlugin;

/// Longest roster text the editor accepts.
const MAX_ROSTER_INPUT_LEN: usize = 256;

const PRESET_KEYS: [KeyCode; 4] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
];

/// Inline roster text editor, opened with Tab during setup.
#[derive(Resource, Default)]
pub(crate) struct RosterEditor {
    pub(crate) editing: bool,
    pub(crate) buffer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditAction {
    Continue,
    Commit,
    Cancel,
}

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RosterEditor>()
            .add_systems(Update, input_system.in_set(UpdateSet::Input));
    }
}

/// Apply one key press to the editor buffer.
pub(crate) fn apply_key(buffer: &mut String, key: &Key) -> EditAction {
    match key {
        Key::Enter => return EditAction::Commit,
        Key::Escape => return EditAction::Cancel,
        Key::Backspace => {
            buffer.pop();
        }
        Key::Space => push_limited(buffer, " "),
        Key::Character(text) => push_limited(buffer, text),
        _ => {}
    }
    EditAction::Continue
}

fn push_limited(buffer: &mut String, text: &str) {
    for ch in text.chars().filter(|c| !c.is_control()) {
        if buffer.chars().count() >= MAX_ROSTER_INPUT_LEN {
            return;
        }
        buffer.push(ch);
    }
}

fn input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut key_events: MessageReader<KeyboardInput>,
    mut editor: ResMut<RosterEditor>,
    mut race: ResMut<RaceState>,
    mut store: ResMut<RosterStore>,
) {
    if editor.editing {
        let editor = &mut *editor;
        for event in key_events.read() {
            if event.state != ButtonState::Pressed {
                continue;
            }
            match apply_key(&mut editor.buffer, &event.logical_key) {
                EditAction::Continue => {}
                EditAction::Commit => {
                    editor.editing = false;
                    save_roster(&mut *store, &editor.buffer);
                    if let Err(e) = race.controller.set_roster_spec(&editor.buffer) {
                        warn!("Roster not applied: {}", e);
                    }
                    break;
                }
                EditAction::Cancel => {
                    editor.editing = false;
                    break;
                }
            }
        }
        return;
    }
    key_events.clear();

    let controller = &mut race.controller;
    let in_setup = controller.phase() == RacePhase::Setup;

    if keys.just_pressed(KeyCode::Tab) && in_setup {
        editor.editing = true;
        editor.buffer = controller.roster_text().to_string();
        return;
    }

    if keys.just_pressed(KeyCode::Enter) || keys.just_pressed(KeyCode::Space) {
        if in_setup {
            if let Err(e) = controller.start() {
                warn!("Cannot start race: {}", e);
            }
        } else if controller.phase() == RacePhase::Finished {
            controller.reset();
        }
    }

    if keys.just_pressed(KeyCode::KeyR) {
        controller.reset();
    }

    if keys.just_pressed(KeyCode::KeyC) {
        let follow = !controller.camera_follow();
        controller.set_camera_follow(follow);
    }

    if !in_setup {
        return;
    }

    for (key, preset) in PRESET_KEYS.iter().zip(GRAVITY_PRESETS) {
        if keys.just_pressed(*key) {
            if let Err(e) = controller.set_gravity(preset) {
                warn!("{}", e);
            }
        }
    }

    let nudge = if keys.just_pressed(KeyCode::ArrowUp) {
        GRAVITY_STEP
    } else if keys.just_pressed(KeyCode::ArrowDown) {
        -GRAVITY_STEP
    } else {
        0.0
    };
    if nudge != 0.0 {
        if let Err(e) = controller.nudge_gravity(nudge) {
            warn!("{}", e);
        }
    }

    if keys.just_pressed(KeyCode::KeyM) {
        let next = controller
            .registry()
            .next_id(controller.map_id())
            .map(str::to_string);
        if let Some(next) = next {
            if let Err(e) = controller.select_map(&next) {
                warn!("Cannot switch map: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(buffer: &mut String, text: &str) {
        for ch in text.chars() {
            let key = if ch == ' ' {
                Key::Space
            } else {
                Key::Character(ch.to_string().into())
            };
            assert_eq!(apply_key(buffer, &key), EditAction::Continue);
        }
    }

    #[test]
    fn typing_appends() {
        let mut buffer = String::new();
        type_str(&mut buffer, "Mike*5, Ann*2");
        assert_eq!(buffer, "Mike*5, Ann*2");
    }

    #[test]
    fn backspace_removes_last_char() {
        let mut buffer = "Ann*23".to_string();
        apply_key(&mut buffer, &Key::Backspace);
        assert_eq!(buffer, "Ann*2");

        let mut empty = String::new();
        apply_key(&mut empty, &Key::Backspace);
        assert!(empty.is_empty());
    }

    #[test]
    fn enter_commits_escape_cancels() {
        let mut buffer = "A*1".to_string();
        assert_eq!(apply_key(&mut buffer, &Key::Enter), EditAction::Commit);
        assert_eq!(apply_key(&mut buffer, &Key::Escape), EditAction::Cancel);
        assert_eq!(buffer, "A*1");
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut buffer = "A*1".to_string();
        assert_eq!(apply_key(&mut buffer, &Key::ArrowLeft), EditAction::Continue);
        assert_eq!(apply_key(&mut buffer, &Key::Tab), EditAction::Continue);
        assert_eq!(buffer, "A*1");
    }

    #[test]
    fn input_length_is_capped() {
        let mut buffer = "x".repeat(MAX_ROSTER_INPUT_LEN);
        apply_key(&mut buffer, &Key::Character("y".into()));
        assert_eq!(buffer.chars().count(), MAX_ROSTER_INPUT_LEN);
        assert!(!buffer.ends_with('y'));
    }
}
