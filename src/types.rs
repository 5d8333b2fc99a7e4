use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    /// Evaluation order used everywhere a tie has to be broken: N, S, W, E.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn parse_move(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    /// Maps browser `KeyboardEvent.key` names onto directions.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::None => (0, 0),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Self {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Self::Up,
            (0, 1) => Self::Down,
            (-1, 0) => Self::Left,
            (1, 0) => Self::Right,
            _ => Self::None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::None => Self::None,
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn distance_to(self, other: Vec2) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Wall,
    /// Floor whose pellet has been eaten.
    Empty,
    Pellet,
    PowerPellet,
    /// Floor that never carried a pellet (ghost house, tunnel).
    Gap,
}

impl Cell {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'X' => Some(Self::Wall),
            'o' => Some(Self::Pellet),
            'O' => Some(Self::PowerPellet),
            ' ' => Some(Self::Gap),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Wall => 'X',
            Self::Pellet => 'o',
            Self::PowerPellet => 'O',
            Self::Empty | Self::Gap => ' ',
        }
    }

    pub fn is_wall(self) -> bool {
        self == Self::Wall
    }

    pub fn is_pellet(self) -> bool {
        matches!(self, Self::Pellet | Self::PowerPellet)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostType {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostType {
    /// Corner each ghost heads for while scattering. The corners sit outside
    /// the board so the ghosts circle the nearest block instead of parking.
    pub fn scatter_target(self) -> Vec2 {
        match self {
            Self::Blinky => Vec2 { x: 32, y: 0 },
            Self::Pinky => Vec2 { x: 0, y: 0 },
            Self::Inky => Vec2 { x: 32, y: 32 },
            Self::Clyde => Vec2 { x: 0, y: 32 },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blinky => "blinky",
            Self::Pinky => "pinky",
            Self::Inky => "inky",
            Self::Clyde => "clyde",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostMode {
    Scatter,
    Chase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn message(self, score: u32) -> String {
        match self {
            Self::Playing => format!("Score: {score}"),
            Self::Won => "You Win!".to_string(),
            Self::Lost => "Game Over".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    Player,
    Ghost(GhostType),
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "rawX")]
    pub raw_x: f32,
    #[serde(rename = "rawY")]
    pub raw_y: f32,
    pub dir: Direction,
    #[serde(rename = "facingDir")]
    pub facing_dir: Direction,
    #[serde(rename = "inputDir")]
    pub input_dir: Direction,
    pub speed: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    #[serde(rename = "type")]
    pub ghost_type: GhostType,
    pub x: i32,
    pub y: i32,
    #[serde(rename = "rawX")]
    pub raw_x: f32,
    #[serde(rename = "rawY")]
    pub raw_y: f32,
    pub dir: Direction,
    pub mode: GhostMode,
    pub target: Vec2,
    pub speed: f32,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    PelletEaten {
        x: i32,
        y: i32,
        power: bool,
        score: u32,
    },
    ModeChanged {
        mode: GhostMode,
    },
    GhostReleased {
        #[serde(rename = "ghostType")]
        ghost_type: GhostType,
    },
    PortalUsed {
        actor: ActorKind,
        from: Vec2,
        to: Vec2,
    },
    GameOver {
        status: GameStatus,
        score: u32,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
    pub score: u32,
    pub status: GameStatus,
    pub message: String,
    pub mode: GhostMode,
    #[serde(rename = "pelletsLeft")]
    pub pellets_left: usize,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    pub autopilot: bool,
    #[serde(rename = "autopilotPath")]
    pub autopilot_path: Vec<Vec2>,
    pub events: Vec<RuntimeEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameSummary {
    pub status: GameStatus,
    pub ticks: u64,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    pub score: u32,
    #[serde(rename = "pelletsEaten")]
    pub pellets_eaten: u32,
    #[serde(rename = "pelletsLeft")]
    pub pellets_left: usize,
    #[serde(rename = "ghostsReleased")]
    pub ghosts_released: usize,
    #[serde(rename = "playerSpeed")]
    pub player_speed: f32,
    pub seed: u32,
}
