use crate::types::{GhostMode, GhostType, Vec2};

pub const TICK_RATE: u32 = 50;
pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;

pub const BOARD_WIDTH: i32 = 28;
pub const BOARD_HEIGHT: i32 = 31;

pub const PLAYER_SPAWN: Vec2 = Vec2 { x: 13, y: 23 };
pub const PLAYER_BASE_SPEED: f32 = 8.0;

pub const GHOST_SPAWN: Vec2 = Vec2 { x: 13, y: 11 };
pub const GHOST_RELEASE_INTERVAL_MS: u64 = 12_000;

/// Release order of the ghost house together with each ghost's speed in
/// cells per second.
pub const GHOST_ROSTER: [(GhostType, f32); 4] = [
    (GhostType::Blinky, 6.0),
    (GhostType::Inky, 9.0),
    (GhostType::Pinky, 7.0),
    (GhostType::Clyde, 7.0),
];

/// Phase list consumed front to back. `None` marks the final, unbounded phase.
pub const MODE_TIMELINE: [(GhostMode, Option<u64>); 8] = [
    (GhostMode::Scatter, Some(7_000)),
    (GhostMode::Chase, Some(20_000)),
    (GhostMode::Scatter, Some(7_000)),
    (GhostMode::Chase, Some(20_000)),
    (GhostMode::Scatter, Some(5_000)),
    (GhostMode::Chase, Some(20_000)),
    (GhostMode::Scatter, Some(5_000)),
    (GhostMode::Chase, None),
];

pub const PELLET_SCORE: u32 = 10;
pub const WIN_SCORE: u32 = 2_400;

/// Clyde gives up the chase within this distance of the player.
pub const CLYDE_SHY_DISTANCE: f32 = 8.0;
/// How far ahead of the player Pinky and Inky aim.
pub const AMBUSH_LOOKAHEAD: i32 = 2;

pub const LEFT_PORTAL: Vec2 = Vec2 { x: 0, y: 14 };
pub const LEFT_PORTAL_EXIT: Vec2 = Vec2 { x: 1, y: 14 };
pub const RIGHT_PORTAL: Vec2 = Vec2 { x: 27, y: 14 };
pub const RIGHT_PORTAL_EXIT: Vec2 = Vec2 { x: 26, y: 14 };

pub const CLASSIC_LAYOUT: [&str; BOARD_HEIGHT as usize] = [
    "XXXXXXXXXXXXXXXXXXXXXXXXXXXX",
    "XooooooooooooXXooooooooooooX",
    "XoXXXXoXXXXXoXXoXXXXXoXXXXoX",
    "XOXXXXoXXXXXoXXoXXXXXoXXXXOX",
    "XoXXXXoXXXXXoXXoXXXXXoXXXXoX",
    "XooooooooooooooooooooooooooX",
    "XoXXXXoXXoXXXXXXXXoXXoXXXXoX",
    "XoXXXXoXXoXXXXXXXXoXXoXXXXoX",
    "XooooooXXooooXXooooXXooooooX",
    "XXXXXXoXXXXX XX XXXXXoXXXXXX",
    "XXXXXXoXXXXX XX XXXXXoXXXXXX",
    "XXXXXXoXX          XXoXXXXXX",
    "XXXXXXoXX XXXXXXXX XXoXXXXXX",
    "XXXXXXoXX X      X XXoXXXXXX",
    "      o   X      X   o      ",
    "XXXXXXoXX X      X XXoXXXXXX",
    "XXXXXXoXX XXXXXXXX XXoXXXXXX",
    "XXXXXXoXX          XXoXXXXXX",
    "XXXXXXoXX XXXXXXXX XXoXXXXXX",
    "XXXXXXoXX XXXXXXXX XXoXXXXXX",
    "XooooooooooooXXooooooooooooX",
    "XoXXXXoXXXXXoXXoXXXXXoXXXXoX",
    "XoXXXXoXXXXXoXXoXXXXXoXXXXoX",
    "XOooXXooooooo  oooooooXXooOX",
    "XXXoXXoXXoXXXXXXXXoXXoXXoXXX",
    "XXXoXXoXXoXXXXXXXXoXXoXXoXXX",
    "XooooooXXooooXXooooXXooooooX",
    "XoXXXXXXXXXXoXXoXXXXXXXXXXoX",
    "XoXXXXXXXXXXoXXoXXXXXXXXXXoX",
    "XooooooooooooooooooooooooooX",
    "XXXXXXXXXXXXXXXXXXXXXXXXXXXX",
];
