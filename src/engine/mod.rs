use std::collections::VecDeque;

use crate::actor::ActorPos;
use crate::constants::{
    LEFT_PORTAL, LEFT_PORTAL_EXIT, PELLET_SCORE, PLAYER_BASE_SPEED, PLAYER_SPAWN, RIGHT_PORTAL,
    RIGHT_PORTAL_EXIT, TICK_MS, WIN_SCORE,
};
use crate::rng::Rng;
use crate::types::{
    ActorKind, Cell, Direction, GameStatus, GameSummary, GhostMode, GhostType, GhostView,
    PlayerView, RuntimeEvent, Snapshot, Vec2,
};
use crate::world::Grid;

mod autopilot;
mod ghost_system;
mod player_system;
mod spawn_system;

pub use self::autopilot::find_path_to_nearest_pellet;
pub use self::ghost_system::{chase_target, choose_next_step, TargetingContext};

use self::spawn_system::{build_ghost_queue, build_mode_timeline, ModePhase};

/// How fast the player runs for a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerSpeed {
    Fixed(f32),
    /// Rolled once per session from the engine seed.
    Range { min: f32, max: f32 },
}

#[derive(Clone, Debug)]
pub struct GameEngineOptions {
    pub seed: u32,
    pub autopilot: bool,
    pub player_speed: PlayerSpeed,
}

impl Default for GameEngineOptions {
    fn default() -> Self {
        Self {
            seed: 1,
            autopilot: false,
            player_speed: PlayerSpeed::Fixed(PLAYER_BASE_SPEED),
        }
    }
}

/// Position and heading of a ghost as seen by the others during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostPeer {
    pub ghost_type: GhostType,
    pub cell: Vec2,
    pub dir: Direction,
}

#[derive(Clone, Debug)]
struct PlayerInternal {
    pos: ActorPos,
    dir: Direction,
    facing_dir: Direction,
    input_dir: Direction,
    speed: f32,
}

#[derive(Clone, Debug)]
struct GhostInternal {
    ghost_type: GhostType,
    pos: ActorPos,
    next_pos: Vec2,
    speed: f32,
    mode: GhostMode,
    dir: Direction,
    target: Vec2,
}

impl GhostInternal {
    fn peer(&self) -> GhostPeer {
        GhostPeer {
            ghost_type: self.ghost_type,
            cell: self.pos.cell(),
            dir: self.dir,
        }
    }

    fn set_pos(&mut self, cell: Vec2) {
        self.pos.snap_to(cell);
        self.next_pos = cell;
    }
}

#[derive(Clone, Debug, Default)]
struct AutopilotState {
    enabled: bool,
    path: Vec<Vec2>,
}

#[derive(Clone, Debug)]
pub struct GameEngine {
    grid: Grid,
    player: PlayerInternal,
    ghosts: Vec<GhostInternal>,
    ghost_queue: VecDeque<GhostInternal>,
    mode_timeline: VecDeque<ModePhase>,
    ghost_mode: GhostMode,
    autopilot: AutopilotState,
    events: Vec<RuntimeEvent>,

    seed: u32,
    score: u32,
    pellets_eaten: u32,
    status: GameStatus,
    tick_counter: u64,
    elapsed_ms: u64,
    mode_started_at_ms: u64,
    last_release_at_ms: Option<u64>,
}

impl GameEngine {
    pub fn new(options: GameEngineOptions) -> Self {
        let mut rng = Rng::new(options.seed);
        let speed = match options.player_speed {
            PlayerSpeed::Fixed(speed) => speed,
            PlayerSpeed::Range { min, max } => rng.range_f32(min, max),
        };
        let mode_timeline = build_mode_timeline();
        let ghost_mode = mode_timeline
            .front()
            .map(|phase| phase.mode)
            .unwrap_or(GhostMode::Scatter);

        Self {
            grid: Grid::classic(),
            player: PlayerInternal {
                pos: ActorPos::at(PLAYER_SPAWN),
                dir: Direction::None,
                facing_dir: Direction::Right,
                input_dir: Direction::None,
                speed,
            },
            ghosts: Vec::new(),
            ghost_queue: build_ghost_queue(),
            mode_timeline,
            ghost_mode,
            autopilot: AutopilotState {
                enabled: options.autopilot,
                path: Vec::new(),
            },
            events: Vec::new(),
            seed: options.seed,
            score: 0,
            pellets_eaten: 0,
            status: GameStatus::Playing,
            tick_counter: 0,
            elapsed_ms: 0,
            mode_started_at_ms: 0,
            last_release_at_ms: None,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.status != GameStatus::Playing
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn header(&self) -> String {
        self.status.message(self.score)
    }

    pub fn tiles(&self) -> Vec<String> {
        self.grid.tiles()
    }

    pub fn autopilot_enabled(&self) -> bool {
        self.autopilot.enabled
    }

    pub fn autopilot_path(&self) -> &[Vec2] {
        &self.autopilot.path
    }

    /// Latest input wins; nothing is queued.
    pub fn set_input(&mut self, dir: Direction) {
        self.player.input_dir = dir;
    }

    /// Feeds a browser key name. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match Direction::from_key(key) {
            Some(dir) => {
                self.set_input(dir);
                true
            }
            None => false,
        }
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot.enabled = enabled;
        if !enabled {
            self.autopilot.path.clear();
        }
    }

    pub fn toggle_autopilot(&mut self) {
        self.set_autopilot(!self.autopilot.enabled);
    }

    /// Advances one fixed tick at the nominal tick length.
    pub fn update(&mut self) {
        self.step(TICK_MS);
    }

    /// Advances one fixed movement tick. `dt_ms` is the monotonic time the
    /// caller attributes to this tick and drives the mode and release timers.
    pub fn step(&mut self, dt_ms: u64) {
        if self.is_ended() {
            return;
        }
        self.tick_counter += 1;
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);

        self.advance_mode_timeline();
        self.release_ghosts();

        let peers: Vec<GhostPeer> = self.ghosts.iter().map(GhostInternal::peer).collect();
        self.update_ghosts(&peers);
        self.update_player();
        if self.autopilot.enabled {
            self.update_autopilot();
        }

        self.collect_pellet();
        if self.is_ended() {
            return;
        }
        self.resolve_portals();
        self.resolve_ghost_collisions();
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let snapshot = Snapshot {
            tick: self.tick_counter,
            elapsed_ms: self.elapsed_ms,
            score: self.score,
            status: self.status,
            message: self.header(),
            mode: self.ghost_mode,
            pellets_left: self.grid.pellets_left(),
            player: self.player_view(),
            ghosts: self.ghosts.iter().map(ghost_view).collect(),
            autopilot: self.autopilot.enabled,
            autopilot_path: self.autopilot.path.clone(),
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    pub fn build_summary(&self) -> GameSummary {
        GameSummary {
            status: self.status,
            ticks: self.tick_counter,
            duration_ms: self.elapsed_ms,
            score: self.score,
            pellets_eaten: self.pellets_eaten,
            pellets_left: self.grid.pellets_left(),
            ghosts_released: self.ghosts.len(),
            player_speed: self.player.speed,
            seed: self.seed,
        }
    }

    fn player_view(&self) -> PlayerView {
        PlayerView {
            x: self.player.pos.x(),
            y: self.player.pos.y(),
            raw_x: self.player.pos.raw_x,
            raw_y: self.player.pos.raw_y,
            dir: self.player.dir,
            facing_dir: self.player.facing_dir,
            input_dir: self.player.input_dir,
            speed: self.player.speed,
        }
    }

    fn collect_pellet(&mut self) {
        let cell = self.player.pos.cell();
        let Some(eaten) = self.grid.clear_cell(cell) else {
            return;
        };
        self.score += PELLET_SCORE;
        self.pellets_eaten += 1;
        self.events.push(RuntimeEvent::PelletEaten {
            x: cell.x,
            y: cell.y,
            power: eaten == Cell::PowerPellet,
            score: self.score,
        });

        if self.score >= WIN_SCORE {
            self.end_game(GameStatus::Won);
        }
    }

    fn resolve_portals(&mut self) {
        if let Some(exit) = portal_exit(self.player.pos.cell()) {
            let from = self.player.pos.cell();
            self.player.pos.snap_to(exit);
            self.events.push(RuntimeEvent::PortalUsed {
                actor: ActorKind::Player,
                from,
                to: exit,
            });
        }
        for ghost in &mut self.ghosts {
            let from = ghost.pos.cell();
            if let Some(exit) = portal_exit(from) {
                ghost.set_pos(exit);
                self.events.push(RuntimeEvent::PortalUsed {
                    actor: ActorKind::Ghost(ghost.ghost_type),
                    from,
                    to: exit,
                });
            }
        }
    }

    fn resolve_ghost_collisions(&mut self) {
        let player_cell = self.player.pos.cell();
        if self
            .ghosts
            .iter()
            .any(|ghost| ghost.pos.cell() == player_cell)
        {
            self.end_game(GameStatus::Lost);
        }
    }

    fn end_game(&mut self, status: GameStatus) {
        if self.is_ended() {
            return;
        }
        self.status = status;
        self.events.push(RuntimeEvent::GameOver {
            status,
            score: self.score,
        });
    }
}

fn portal_exit(cell: Vec2) -> Option<Vec2> {
    if cell == LEFT_PORTAL {
        Some(RIGHT_PORTAL_EXIT)
    } else if cell == RIGHT_PORTAL {
        Some(LEFT_PORTAL_EXIT)
    } else {
        None
    }
}

fn ghost_view(ghost: &GhostInternal) -> GhostView {
    GhostView {
        ghost_type: ghost.ghost_type,
        x: ghost.pos.x(),
        y: ghost.pos.y(),
        raw_x: ghost.pos.raw_x,
        raw_y: ghost.pos.raw_y,
        dir: ghost.dir,
        mode: ghost.mode,
        target: ghost.target,
        speed: ghost.speed,
    }
}
