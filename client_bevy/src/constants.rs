pub const MARBLE_RADIUS: f32 = 0.5;
pub const MARBLE_RESTITUTION: f32 = 0.4;
pub const MARBLE_FRICTION: f32 = 0.3;

pub const PHYSICS_DT: f32 = 1.0 / 60.0;
pub const PHYSICS_SUBSTEPS: usize = 2;
/// Longest frame the fixed schedule will catch up on.
pub const PHYSICS_MAX_CATCHUP_SECS: f64 = 0.25;

/// Thickness of the floor slab under the map's floor position.
pub const FLOOR_THICKNESS: f32 = 0.2;
pub const FLOOR_EXTENT: f32 = 100.0;

pub const SPAWN_MARKER_RADIUS: f32 = 0.15;

#[derive(Clone, Copy)]
pub struct Colors;

impl Colors {
    pub const BACKGROUND: u32 = 0x1e272e;
    pub const FLOOR: u32 = 0xcccccc;
    pub const WALL: u32 = 0xdfe6e9;
    pub const BOX: u32 = 0xe67e22;
    pub const CYLINDER: u32 = 0xe74c3c;
    pub const SPHERE: u32 = 0xf39c12;
    pub const RAMP: u32 = 0x3498db;
    pub const FUNNEL: u32 = 0x8e44ad;
    pub const FINISH: u32 = 0x2ecc71;
    pub const SPAWN_MARKER: u32 = 0xffffff;
}

/// Wall opacity with and without an explicit map color.
pub const WALL_ALPHA_COLORED: f32 = 0.7;
pub const WALL_ALPHA_PLAIN: f32 = 0.1;

pub fn color_from_hex(rgb: u32) -> bevy::prelude::Color {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    bevy::prelude::Color::srgb(r, g, b)
}

/// `#rrggbb` (or `rrggbb`) from map files. Anything else is `None`.
pub fn parse_css_hex(css: &str) -> Option<u32> {
    let digits = css.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Map color if present and readable, else `fallback`.
pub fn map_color(css: Option<&str>, fallback: u32) -> bevy::prelude::Color {
    color_from_hex(css.and_then(parse_css_hex).unwrap_or(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_hex_parses_correctly() {
        let c = color_from_hex(0xFF8040);
        if let bevy::prelude::Color::Srgba(srgba) = c {
            assert!((srgba.red - 1.0).abs() < 1e-3);
            assert!((srgba.green - 0.502).abs() < 1e-2);
            assert!((srgba.blue - 0.251).abs() < 1e-2);
        } else {
            panic!("Expected Srgba color variant");
        }
    }

    #[test]
    fn css_hex_accepts_six_digits() {
        assert_eq!(parse_css_hex("#2ecc71"), Some(0x2ecc71));
        assert_eq!(parse_css_hex("FFFFFF"), Some(0xffffff));
        assert_eq!(parse_css_hex("#fff"), None);
        assert_eq!(parse_css_hex("#zzzzzz"), None);
        assert_eq!(parse_css_hex(""), None);
    }

    #[test]
    fn map_color_falls_back() {
        assert_eq!(map_color(None, 0x000000), color_from_hex(0x000000));
        assert_eq!(map_color(Some("bogus"), 0x112233), color_from_hex(0x112233));
        assert_eq!(map_color(Some("#112233"), 0x000000), color_from_hex(0x112233));
    }
}
