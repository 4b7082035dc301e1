//! Roster text parsing.
//!
//! A roster is written as comma separated groups, `name*count`, e.g.
//! `"Mike*5,David*5"`. Validation is all-or-nothing; expansion turns a
//! validated roster into players with stable ids, group colors and random
//! masses.

use rand::Rng;

use crate::error::RosterError;
use crate::vec3::Vec3;

pub const MAX_PLAYERS_PER_NAME: u32 = 50;
pub const MAX_TOTAL_PLAYERS: u32 = 100;
pub const MIN_MASS: f64 = 0.5;
pub const MAX_MASS: f64 = 2.0;

/// Group colors, cycled by group index.
pub const PALETTE: [u32; 15] = [
    0xff6b6b, 0x4ecdc4, 0x45b7d1, 0xf9ca24, 0x6c5ce7, 0xfd79a8, 0x00b894, 0xe17055, 0xa29bfe,
    0xfdcb6e, 0xe84393, 0x00cec9, 0xfd79a8, 0x2d3436, 0x636e72,
];

/// One race participant.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Player {
    /// `{name}-{seq}`, unique within a race.
    pub id: String,
    /// `{name}#{seq}`, shown on the scoreboard.
    pub name: String,
    pub color: u32,
    pub mass: f64,
    pub position: Vec3,
}

/// One `name*count` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterGroup {
    pub name: String,
    pub count: u32,
}

/// A validated roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSpec {
    groups: Vec<RosterGroup>,
}

impl RosterSpec {
    pub fn groups(&self) -> &[RosterGroup] {
        &self.groups
    }

    /// Number of players the roster asks for.
    pub fn total_count(&self) -> usize {
        self.groups.iter().map(|g| g.count as usize).sum()
    }

    /// Expand groups into players, taking positions in order. Stops quietly
    /// once `positions` runs out.
    pub fn expand<R: Rng + ?Sized>(&self, positions: &[Vec3], rng: &mut R) -> Vec<Player> {
        let mut players = Vec::with_capacity(self.total_count().min(positions.len()));
        let mut next_position = positions.iter();

        'groups: for (group_index, group) in self.groups.iter().enumerate() {
            let color = PALETTE[group_index % PALETTE.len()];
            for seq in 1..=group.count {
                let Some(&position) = next_position.next() else {
                    break 'groups;
                };
                players.push(Player {
                    id: format!("{}-{}", group.name, seq),
                    name: format!("{}#{}", group.name, seq),
                    color,
                    mass: rng.gen_range(MIN_MASS..=MAX_MASS),
                    position,
                });
            }
        }

        players
    }
}

/// Validate roster text.
pub fn validate(input: &str) -> Result<RosterSpec, RosterError> {
    if input.trim().is_empty() {
        return Err(RosterError::Empty);
    }

    let mut groups = Vec::new();
    let mut total: u64 = 0;

    for entry in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let group = parse_entry(entry)?;
        total += u64::from(group.count);
        groups.push(group);
    }

    if total > u64::from(MAX_TOTAL_PLAYERS) {
        return Err(RosterError::TooManyPlayers {
            total,
            max: MAX_TOTAL_PLAYERS,
        });
    }

    Ok(RosterSpec { groups })
}

/// Validate and expand in one step.
pub fn parse<R: Rng + ?Sized>(
    input: &str,
    positions: &[Vec3],
    rng: &mut R,
) -> Result<Vec<Player>, RosterError> {
    Ok(validate(input)?.expand(positions, rng))
}

fn parse_entry(entry: &str) -> Result<RosterGroup, RosterError> {
    let malformed = || RosterError::MalformedEntry {
        entry: entry.to_string(),
    };

    // Greedy name: the last '*' separates the count. Entries arrive trimmed,
    // so a non-empty name always has a visible character.
    let (name, digits) = entry.rsplit_once('*').ok_or_else(malformed)?;
    if name.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let too_large = || RosterError::GroupTooLarge {
        entry: entry.to_string(),
        max: MAX_PLAYERS_PER_NAME,
    };
    // All-digit strings only fail to parse on overflow.
    let count: u64 = digits.parse().map_err(|_| too_large())?;
    if count == 0 {
        return Err(RosterError::InvalidCount {
            entry: entry.to_string(),
        });
    }
    if count > u64::from(MAX_PLAYERS_PER_NAME) {
        return Err(too_large());
    }

    Ok(RosterGroup {
        name: name.to_string(),
        count: count as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn grid(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f64, 10.0, 0.0)).collect()
    }

    mod validation {
        use super::*;

        #[test]
        fn accepts_multiple_groups() {
            let spec = validate("Mike*5, David*3 ,Steve*1").unwrap();
            assert_eq!(spec.groups().len(), 3);
            assert_eq!(spec.total_count(), 9);
            assert_eq!(spec.groups()[1].name, "David");
        }

        #[test]
        fn blank_input_is_empty() {
            assert_eq!(validate("   "), Err(RosterError::Empty));
            assert_eq!(validate(""), Err(RosterError::Empty));
        }

        #[test]
        fn drops_empty_entries() {
            let spec = validate("A*1,, ,B*2,").unwrap();
            assert_eq!(spec.total_count(), 3);
        }

        #[test]
        fn missing_count_names_the_entry() {
            let err = validate("Bad").unwrap_err();
            assert_eq!(
                err,
                RosterError::MalformedEntry {
                    entry: "Bad".to_string()
                }
            );
            assert!(err.to_string().contains("\"Bad\""));
        }

        #[test]
        fn one_bad_entry_rejects_everything() {
            assert!(validate("Good*3,Bad,Fine*2").is_err());
        }

        #[test]
        fn non_numeric_count_is_malformed() {
            assert!(matches!(
                validate("A*x"),
                Err(RosterError::MalformedEntry { .. })
            ));
            assert!(matches!(
                validate("A*-3"),
                Err(RosterError::MalformedEntry { .. })
            ));
            assert!(matches!(
                validate("A*"),
                Err(RosterError::MalformedEntry { .. })
            ));
        }

        #[test]
        fn missing_name_is_malformed() {
            assert!(matches!(
                validate("*4"),
                Err(RosterError::MalformedEntry { .. })
            ));
        }

        #[test]
        fn blank_name_after_trim_is_malformed() {
            assert!(matches!(
                validate("A*1,   *2"),
                Err(RosterError::MalformedEntry { entry }) if entry == "*2"
            ));
        }

        #[test]
        fn zero_count_rejected() {
            assert_eq!(
                validate("A*0"),
                Err(RosterError::InvalidCount {
                    entry: "A*0".to_string()
                })
            );
        }

        #[test]
        fn group_limit_is_inclusive() {
            assert!(validate("A*50").is_ok());
            assert!(matches!(
                validate("A*51"),
                Err(RosterError::GroupTooLarge { max: 50, .. })
            ));
        }

        #[test]
        fn huge_count_is_too_large_not_a_panic() {
            assert!(matches!(
                validate("A*99999999999999999999999"),
                Err(RosterError::GroupTooLarge { .. })
            ));
        }

        #[test]
        fn total_limit_is_inclusive() {
            assert!(validate("A*50,B*50").is_ok());
            assert_eq!(
                validate("A*50,B*50,C*1"),
                Err(RosterError::TooManyPlayers {
                    total: 101,
                    max: 100
                })
            );
        }

        #[test]
        fn name_may_contain_star() {
            let spec = validate("a*b*3").unwrap();
            assert_eq!(spec.groups()[0].name, "a*b");
            assert_eq!(spec.groups()[0].count, 3);
        }
    }

    mod expansion {
        use super::*;

        #[test]
        fn group_shares_color_and_numbers_from_one() {
            let players = parse("X*5", &grid(5), &mut rng()).unwrap();
            let ids: Vec<_> = players.iter().map(|p| p.id.as_str()).collect();
            let names: Vec<_> = players.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(ids, ["X-1", "X-2", "X-3", "X-4", "X-5"]);
            assert_eq!(names, ["X#1", "X#2", "X#3", "X#4", "X#5"]);
            assert!(players.iter().all(|p| p.color == PALETTE[0]));
            assert!(players
                .iter()
                .all(|p| (MIN_MASS..=MAX_MASS).contains(&p.mass)));
        }

        #[test]
        fn groups_take_consecutive_palette_entries() {
            let players = parse("Mike*2,Dana*1", &grid(3), &mut rng()).unwrap();
            let ids: Vec<_> = players.iter().map(|p| p.id.as_str()).collect();
            assert_eq!(ids, ["Mike-1", "Mike-2", "Dana-1"]);
            assert_eq!(players[0].color, players[1].color);
            assert_eq!(players[2].color, PALETTE[1]);
        }

        #[test]
        fn palette_wraps() {
            let input: Vec<String> = (0..16).map(|i| format!("P{i}*1")).collect();
            let players = parse(&input.join(","), &grid(16), &mut rng()).unwrap();
            assert_eq!(players[15].color, PALETTE[0]);
        }

        #[test]
        fn positions_assigned_in_order() {
            let positions = grid(4);
            let players = parse("A*2,B*2", &positions, &mut rng()).unwrap();
            for (player, pos) in players.iter().zip(&positions) {
                assert_eq!(player.position, *pos);
            }
        }

        #[test]
        fn stops_when_positions_run_out() {
            let players = parse("A*3,B*3", &grid(4), &mut rng()).unwrap();
            assert_eq!(players.len(), 4);
            assert_eq!(players[3].id, "B-1");
        }

        #[test]
        fn length_is_min_of_requested_and_positions() {
            for (input, positions) in [("A*10", 3), ("A*2,B*2", 10), ("A*50,B*50", 100)] {
                let spec = validate(input).unwrap();
                let players = spec.expand(&grid(positions), &mut rng());
                assert_eq!(players.len(), spec.total_count().min(positions));
            }
        }

        #[test]
        fn no_positions_no_players() {
            let players = parse("A*3", &[], &mut rng()).unwrap();
            assert!(players.is_empty());
        }
    }
}
