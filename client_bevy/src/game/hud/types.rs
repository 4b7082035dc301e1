use bevy::prelude::*;
use marble_race_core::ledger::FinishRecord;
use marble_race_core::roster::MAX_TOTAL_PLAYERS;
use marble_race_core::RacePhase;

/// One row per possible player; the list scrolls.
pub(super) const RANK_ROWS: usize = MAX_TOTAL_PLAYERS as usize;

pub(super) const PANEL_MARGIN: f32 = 12.0;
pub(super) const PANEL_PADDING: f32 = 10.0;
pub(super) const STATUS_PANEL_WIDTH: f32 = 340.0;
pub(super) const RANKING_PANEL_WIDTH: f32 = 220.0;
pub(super) const RANKING_TITLE_HEIGHT: f32 = 26.0;
pub(super) const RANKING_LIST_HEIGHT: f32 = 400.0;
pub(super) const RANK_ROW_HEIGHT: f32 = 18.0;
/// Pixels scrolled per wheel line.
pub(super) const RANK_SCROLL_LINE: f32 = RANK_ROW_HEIGHT * 3.0;

pub(super) const UI_TEXT: u32 = 0xecf0f1;
pub(super) const UI_DIM: u32 = 0x95a5a6;
pub(super) const UI_ERROR: u32 = 0xff6b6b;
pub(super) const UI_WINNER: u32 = 0xf9ca24;
pub(super) const UI_EDITING: u32 = 0x4ecdc4;

#[derive(Component)]
pub(super) struct HudStatusText;

#[derive(Component)]
pub(super) struct HudMapText;

#[derive(Component)]
pub(super) struct HudGravityText;

#[derive(Component)]
pub(super) struct HudRosterText;

#[derive(Component)]
pub(super) struct HudRosterErrorText;

#[derive(Component)]
pub(super) struct HudRankingPanel;

/// Scrolling container of the rank rows.
#[derive(Component)]
pub(super) struct HudRankingList;

#[derive(Component)]
pub(super) struct HudRankRow {
    pub(super) index: usize,
}

#[derive(Component)]
pub(super) struct HudRankEntryText {
    pub(super) index: usize,
}

#[derive(Component)]
pub(super) struct HudRankEntryDot {
    pub(super) index: usize,
}

pub(super) fn panel_bg(alpha: f32) -> Color {
    Color::srgba(0.0, 0.0, 0.0, alpha)
}

pub(super) fn phase_label(phase: RacePhase) -> &'static str {
    match phase {
        RacePhase::Setup => "Setup",
        RacePhase::Running => "Racing",
        RacePhase::Finished => "Finished",
    }
}

pub(super) fn ranking_panel_shown(phase: RacePhase, records: usize) -> bool {
    phase != RacePhase::Setup && records > 0
}

/// `cursor` in logical window pixels, origin top-left.
pub(super) fn over_ranking_panel(cursor: Vec2, window_width: f32) -> bool {
    let right = window_width - PANEL_MARGIN;
    let left = right - RANKING_PANEL_WIDTH;
    let bottom = PANEL_MARGIN + 2.0 * PANEL_PADDING + RANKING_TITLE_HEIGHT + RANKING_LIST_HEIGHT;
    (left..=right).contains(&cursor.x) && (PANEL_MARGIN..=bottom).contains(&cursor.y)
}

/// Scroll offset after moving by `delta` pixels, kept inside the rows shown.
pub(super) fn scrolled_offset(offset: f32, delta: f32, rows: usize) -> f32 {
    let max = (rows as f32 * RANK_ROW_HEIGHT - RANKING_LIST_HEIGHT).max(0.0);
    (offset + delta).clamp(0.0, max)
}

/// Badge shown left of the name: the rank, or `X` for out-of-bounds.
pub(super) fn rank_badge(record: &FinishRecord) -> String {
    if record.is_out_of_bounds {
        "X".to_string()
    } else {
        record.rank.to_string()
    }
}

pub(super) fn rank_line(record: &FinishRecord) -> String {
    if record.is_out_of_bounds {
        format!("{:>3}  {}  (out)", rank_badge(record), record.name)
    } else {
        format!(
            "{:>3}  {}  {:.2}s",
            rank_badge(record),
            record.name,
            record.finish_time
        )
    }
}
