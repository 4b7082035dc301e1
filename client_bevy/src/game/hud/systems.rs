use std::collections::HashMap;

use bevy::ecs::system::SystemParam;
use bevy::input::mouse::{AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use marble_race_core::RacePhase;

use crate::constants::color_from_hex;
use crate::game::{RaceState, RosterEditor};

use super::types::{
    phase_label, rank_line, ranking_panel_shown, scrolled_offset, HudGravityText, HudMapText,
    HudRankEntryDot, HudRankEntryText, HudRankRow, HudRankingList, HudRankingPanel,
    HudRosterErrorText, HudRosterText, HudStatusText, RANK_SCROLL_LINE, UI_EDITING, UI_ERROR,
    UI_TEXT,
};

type StatusTextSet<'w, 's> = ParamSet<
    'w,
    's,
    (
        Query<'w, 's, &'static mut Text, With<HudStatusText>>,
        Query<'w, 's, &'static mut Text, With<HudMapText>>,
        Query<'w, 's, &'static mut Text, With<HudGravityText>>,
    ),
>;

type RosterTextQuery<'w, 's> =
    Query<'w, 's, (&'static mut Text, &'static mut TextColor), With<HudRosterText>>;
type RosterErrorQuery<'w, 's> = Query<
    'w,
    's,
    (&'static mut Text, &'static mut Visibility),
    (With<HudRosterErrorText>, Without<HudRosterText>),
>;

type RankRowsQuery<'w, 's> = Query<'w, 's, (&'static HudRankRow, &'static mut Node)>;
type RankTextsQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static HudRankEntryText,
        &'static mut Text,
        &'static mut TextColor,
    ),
>;
type RankDotsQuery<'w, 's> =
    Query<'w, 's, (&'static HudRankEntryDot, &'static mut BackgroundColor)>;
type RankListQuery<'w, 's> = Query<'w, 's, &'static mut ScrollPosition, With<HudRankingList>>;
type RankPanelQuery<'w, 's> = Query<'w, 's, &'static mut Visibility, With<HudRankingPanel>>;
type RankingSet<'w, 's> = ParamSet<
    'w,
    's,
    (
        RankRowsQuery<'w, 's>,
        RankTextsQuery<'w, 's>,
        RankDotsQuery<'w, 's>,
        RankListQuery<'w, 's>,
        RankPanelQuery<'w, 's>,
    ),
>;

#[derive(SystemParam)]
pub(super) struct StatusUiQueries<'w, 's> {
    texts: StatusTextSet<'w, 's>,
}

#[derive(SystemParam)]
pub(super) struct RosterUiQueries<'w, 's> {
    roster: RosterTextQuery<'w, 's>,
    error: RosterErrorQuery<'w, 's>,
}

#[derive(SystemParam)]
pub(super) struct RankingUiQueries<'w, 's> {
    sets: RankingSet<'w, 's>,
}

pub(super) fn update_status_ui(race: Res<RaceState>, mut queries: StatusUiQueries) {
    let c = &race.controller;
    let follow = if c.camera_follow() { "follow" } else { "free" };

    if let Ok(mut text) = queries.texts.p0().single_mut() {
        text.0 = match c.phase() {
            RacePhase::Setup => format!(
                "{} | {} players | camera {follow}",
                phase_label(c.phase()),
                c.players().len()
            ),
            RacePhase::Running | RacePhase::Finished => format!(
                "{} | {:.1}s | {}/{} racing | camera {follow}",
                phase_label(c.phase()),
                c.elapsed(),
                c.active_count(),
                c.players().len()
            ),
        };
    }
    if let Ok(mut text) = queries.texts.p1().single_mut() {
        let map = c.map();
        text.0 = format!("Map: {} ({})", map.name, c.map_id());
    }
    if let Ok(mut text) = queries.texts.p2().single_mut() {
        let frozen = if c.phase() == RacePhase::Setup {
            ""
        } else {
            " (locked)"
        };
        text.0 = format!("Gravity: {:.2}{frozen}", c.gravity().y());
    }
}

pub(super) fn update_roster_ui(
    race: Res<RaceState>,
    editor: Res<RosterEditor>,
    mut queries: RosterUiQueries,
) {
    if let Ok((mut text, mut color)) = queries.roster.single_mut() {
        if editor.editing {
            text.0 = format!("Roster: {}_", editor.buffer);
            color.0 = color_from_hex(UI_EDITING);
        } else {
            text.0 = format!("Roster: {}", race.controller.roster_text());
            color.0 = color_from_hex(UI_TEXT);
        }
    }

    if let Ok((mut text, mut visibility)) = queries.error.single_mut() {
        match race.controller.roster_error() {
            Some(err) if !editor.editing => {
                text.0 = err.to_string();
                *visibility = Visibility::Visible;
            }
            _ => *visibility = Visibility::Hidden,
        }
    }
}

pub(super) fn update_ranking_ui(
    race: Res<RaceState>,
    mut queries: RankingUiQueries,
    mut last_signature: Local<Option<(RacePhase, usize, usize)>>,
) {
    let c = &race.controller;
    let rankings = c.rankings();
    let signature = (c.phase(), rankings.len(), c.players().len());
    if *last_signature == Some(signature) {
        return;
    }
    *last_signature = Some(signature);

    let colors: HashMap<&str, u32> = c
        .players()
        .iter()
        .map(|p| (p.id.as_str(), p.color))
        .collect();

    for (row, mut node) in &mut queries.sets.p0() {
        node.display = if row.index < rankings.len() {
            Display::Flex
        } else {
            Display::None
        };
    }

    for (entry, mut text, mut text_color) in &mut queries.sets.p1() {
        if let Some(record) = rankings.get(entry.index) {
            text.0 = rank_line(record);
            text_color.0 = if record.is_out_of_bounds {
                color_from_hex(UI_ERROR)
            } else {
                color_from_hex(UI_TEXT)
            };
        }
    }

    for (entry, mut fill) in &mut queries.sets.p2() {
        fill.0 = rankings
            .get(entry.index)
            .and_then(|r| colors.get(r.id.as_str()))
            .map_or(Color::NONE, |&color| color_from_hex(color));
    }

    if rankings.is_empty() {
        for mut scroll in &mut queries.sets.p3() {
            *scroll = ScrollPosition::default();
        }
    }

    if let Ok(mut visibility) = queries.sets.p4().single_mut() {
        *visibility = if ranking_panel_shown(c.phase(), rankings.len()) {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

/// Mouse wheel over the ranking panel scrolls the list.
pub(super) fn scroll_ranking_ui(
    race: Res<RaceState>,
    scroll: Res<AccumulatedMouseScroll>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut q_list: Query<&mut ScrollPosition, With<HudRankingList>>,
) {
    if scroll.delta.y == 0.0 {
        return;
    }
    let Ok(window) = q_window.single() else {
        return;
    };
    if !super::cursor_over_rankings(window, &race.controller) {
        return;
    }

    let delta = match scroll.unit {
        MouseScrollUnit::Line => -scroll.delta.y * RANK_SCROLL_LINE,
        MouseScrollUnit::Pixel => -scroll.delta.y,
    };
    let rows = race.controller.rankings().len();
    for mut position in &mut q_list {
        position.y = scrolled_offset(position.y, delta, rows);
    }
}
