use bevy::prelude::*;

use crate::constants::color_from_hex;

use super::types::{
    panel_bg, HudGravityText, HudMapText, HudRankEntryDot, HudRankEntryText, HudRankRow,
    HudRankingList, HudRankingPanel, HudRosterErrorText, HudRosterText, HudStatusText,
    PANEL_MARGIN, PANEL_PADDING, RANKING_LIST_HEIGHT, RANKING_PANEL_WIDTH, RANKING_TITLE_HEIGHT,
    RANK_ROWS, RANK_ROW_HEIGHT, STATUS_PANEL_WIDTH, UI_DIM, UI_ERROR, UI_TEXT, UI_WINNER,
};

const HELP_TEXT: &str = "Tab edit roster | Enter start | R reset | C camera\n\
                         1-4 gravity preset | Up/Down gravity | M next map\n\
                         Drag orbit | Wheel zoom, or scroll the ranking";

pub(super) fn spawn_hud(mut commands: Commands) {
    let small = TextFont::from_font_size(12.0);
    let medium = TextFont::from_font_size(15.0);

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(PANEL_MARGIN),
                top: Val::Px(PANEL_MARGIN),
                width: Val::Px(STATUS_PANEL_WIDTH),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(PANEL_PADDING)),
                row_gap: Val::Px(4.0),
                ..default()
            },
            BackgroundColor(panel_bg(0.7)),
            BorderRadius::all(Val::Px(6.0)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Marble Race"),
                TextFont::from_font_size(18.0),
                TextColor(color_from_hex(UI_WINNER)),
            ));
            parent.spawn((
                Text::new(""),
                medium.clone(),
                TextColor(color_from_hex(UI_TEXT)),
                HudStatusText,
            ));
            parent.spawn((
                Text::new(""),
                small.clone(),
                TextColor(color_from_hex(UI_TEXT)),
                HudMapText,
            ));
            parent.spawn((
                Text::new(""),
                small.clone(),
                TextColor(color_from_hex(UI_TEXT)),
                HudGravityText,
            ));
            parent.spawn((
                Text::new(""),
                small.clone(),
                TextColor(color_from_hex(UI_TEXT)),
                HudRosterText,
            ));
            parent.spawn((
                Text::new(""),
                small.clone(),
                TextColor(color_from_hex(UI_ERROR)),
                Visibility::Hidden,
                HudRosterErrorText,
            ));
            parent.spawn((
                Text::new(HELP_TEXT),
                TextFont::from_font_size(10.0),
                TextColor(color_from_hex(UI_DIM)),
            ));
        });

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(PANEL_MARGIN),
                top: Val::Px(PANEL_MARGIN),
                width: Val::Px(RANKING_PANEL_WIDTH),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(PANEL_PADDING)),
                ..default()
            },
            BackgroundColor(panel_bg(0.8)),
            BorderRadius::all(Val::Px(6.0)),
            Visibility::Hidden,
            HudRankingPanel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Ranking"),
                TextFont::from_font_size(16.0),
                TextColor(color_from_hex(UI_WINNER)),
                Node {
                    height: Val::Px(RANKING_TITLE_HEIGHT),
                    ..default()
                },
            ));

            parent
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        max_height: Val::Px(RANKING_LIST_HEIGHT),
                        overflow: Overflow::scroll_y(),
                        ..default()
                    },
                    ScrollPosition::default(),
                    HudRankingList,
                ))
                .with_children(|list| {
                    for index in 0..RANK_ROWS {
                        list.spawn((
                            Node {
                                display: Display::None,
                                height: Val::Px(RANK_ROW_HEIGHT),
                                min_height: Val::Px(RANK_ROW_HEIGHT),
                                align_items: AlignItems::Center,
                                column_gap: Val::Px(6.0),
                                ..default()
                            },
                            HudRankRow { index },
                        ))
                        .with_children(|row| {
                            row.spawn((
                                Node {
                                    width: Val::Px(8.0),
                                    height: Val::Px(8.0),
                                    ..default()
                                },
                                BackgroundColor(Color::NONE),
                                BorderRadius::MAX,
                                HudRankEntryDot { index },
                            ));
                            row.spawn((
                                Text::new(""),
                                small.clone(),
                                TextColor(color_from_hex(UI_TEXT)),
                                HudRankEntryText { index },
                            ));
                        });
                    }
                });
        });
}
