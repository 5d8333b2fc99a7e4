use super::*;

use crate::constants::{AMBUSH_LOOKAHEAD, CLYDE_SHY_DISTANCE, TICK_RATE};

/// What a ghost may look at when picking its chase target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetingContext {
    pub player_cell: Vec2,
    pub player_facing: Direction,
    /// Blinky's cell at the start of the tick, if Blinky is out.
    pub blinky_cell: Option<Vec2>,
}

impl TargetingContext {
    fn ambush_point(&self) -> Vec2 {
        let (dx, dy) = self.player_facing.delta();
        Vec2 {
            x: self.player_cell.x + dx * AMBUSH_LOOKAHEAD,
            y: self.player_cell.y + dy * AMBUSH_LOOKAHEAD,
        }
    }
}

pub fn chase_target(ghost_type: GhostType, ghost_cell: Vec2, ctx: &TargetingContext) -> Vec2 {
    match ghost_type {
        GhostType::Blinky => ctx.player_cell,
        GhostType::Pinky => ctx.ambush_point(),
        GhostType::Inky => {
            let ahead = ctx.ambush_point();
            match ctx.blinky_cell {
                Some(blinky) => Vec2 {
                    x: (ahead.x - blinky.x) * 2,
                    y: (ahead.y - blinky.y) * 2,
                },
                None => ahead,
            }
        }
        GhostType::Clyde => {
            if ghost_cell.distance_to(ctx.player_cell) > CLYDE_SHY_DISTANCE {
                ctx.player_cell
            } else {
                GhostType::Clyde.scatter_target()
            }
        }
    }
}

/// Greedy one-step decision at a cell centre.
///
/// Never reverses unless stationary or boxed in; among the remaining open
/// neighbours picks the one closest to `target`, ties going to the earlier
/// entry of N, S, W, E.
pub fn choose_next_step(grid: &Grid, cell: Vec2, dir: Direction, target: Vec2) -> (Direction, Vec2) {
    let best = Direction::CARDINALS
        .into_iter()
        .filter(|candidate| dir.is_none() || *candidate != dir.opposite())
        .map(|candidate| (candidate, cell.offset(candidate)))
        .filter(|(_, next)| grid.is_walkable(*next))
        .map(|(candidate, next)| (candidate, next, next.distance_to(target)))
        .min_by(|a, b| a.2.total_cmp(&b.2));

    match best {
        Some((candidate, next, _)) => (candidate, next),
        None => {
            let back = dir.opposite();
            (back, cell.offset(back))
        }
    }
}

impl GameEngine {
    /// Moves every released ghost. `peers` is the roster as it stood before
    /// any ghost moved this tick.
    pub(super) fn update_ghosts(&mut self, peers: &[GhostPeer]) {
        let ctx = TargetingContext {
            player_cell: self.player.pos.cell(),
            player_facing: self.player.facing_dir,
            blinky_cell: peers
                .iter()
                .find(|peer| peer.ghost_type == GhostType::Blinky)
                .map(|peer| peer.cell),
        };

        for ghost in &mut self.ghosts {
            let cell = ghost.pos.cell();
            if cell == ghost.next_pos {
                ghost.target = match ghost.mode {
                    GhostMode::Scatter => ghost.ghost_type.scatter_target(),
                    GhostMode::Chase => chase_target(ghost.ghost_type, cell, &ctx),
                };
                let (dir, next) = choose_next_step(&self.grid, cell, ghost.dir, ghost.target);
                ghost.dir = dir;
                ghost.next_pos = next;
            }
            ghost.pos.advance(ghost.dir, ghost.speed / TICK_RATE as f32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GHOST_SPAWN;

    fn grid(rows: &[&str]) -> Grid {
        Grid::parse(rows).expect("valid test layout")
    }

    fn ctx(player: Vec2, facing: Direction, blinky: Option<Vec2>) -> TargetingContext {
        TargetingContext {
            player_cell: player,
            player_facing: facing,
            blinky_cell: blinky,
        }
    }

    #[test]
    fn blinky_targets_player_cell() {
        let ctx = ctx(Vec2::new(5, 7), Direction::Left, None);
        assert_eq!(
            chase_target(GhostType::Blinky, Vec2::new(1, 1), &ctx),
            Vec2::new(5, 7)
        );
    }

    #[test]
    fn pinky_targets_two_cells_ahead_of_facing() {
        let ctx = ctx(Vec2::new(5, 7), Direction::Up, None);
        assert_eq!(
            chase_target(GhostType::Pinky, Vec2::new(1, 1), &ctx),
            Vec2::new(5, 5)
        );
    }

    #[test]
    fn inky_doubles_vector_from_blinky_to_ambush_point() {
        let ctx = ctx(Vec2::new(10, 10), Direction::Right, Some(Vec2::new(8, 9)));
        // ahead = (12, 10); 2 * ((12, 10) - (8, 9)) = (8, 2)
        assert_eq!(
            chase_target(GhostType::Inky, Vec2::new(1, 1), &ctx),
            Vec2::new(8, 2)
        );
    }

    #[test]
    fn inky_without_blinky_aims_at_ambush_point() {
        let ctx = ctx(Vec2::new(10, 10), Direction::Down, None);
        assert_eq!(
            chase_target(GhostType::Inky, Vec2::new(1, 1), &ctx),
            Vec2::new(10, 12)
        );
    }

    #[test]
    fn clyde_chases_from_afar_and_retreats_up_close() {
        let ctx = ctx(Vec2::new(20, 20), Direction::Right, None);
        assert_eq!(
            chase_target(GhostType::Clyde, Vec2::new(1, 1), &ctx),
            Vec2::new(20, 20)
        );
        assert_eq!(
            chase_target(GhostType::Clyde, Vec2::new(20, 12), &ctx),
            GhostType::Clyde.scatter_target()
        );
        // Exactly eight cells away is still "close".
        assert_eq!(
            chase_target(GhostType::Clyde, Vec2::new(20, 28), &ctx),
            GhostType::Clyde.scatter_target()
        );
    }

    #[test]
    fn picks_neighbour_closest_to_target() {
        let grid = grid(&["XXXXX", "X   X", "X   X", "X   X", "XXXXX"]);
        let (dir, next) = choose_next_step(&grid, Vec2::new(2, 2), Direction::None, Vec2::new(9, 2));
        assert_eq!(dir, Direction::Right);
        assert_eq!(next, Vec2::new(3, 2));
    }

    #[test]
    fn ties_follow_north_south_west_east_order() {
        let grid = grid(&["XXXXX", "X   X", "X   X", "X   X", "XXXXX"]);
        // Target straight through the centre: every neighbour is equally far.
        let (dir, _) = choose_next_step(&grid, Vec2::new(2, 2), Direction::None, Vec2::new(2, 2));
        assert_eq!(dir, Direction::Up);

        // West and east tie once north is excluded as a reverse move.
        let (dir, _) = choose_next_step(&grid, Vec2::new(2, 2), Direction::Down, Vec2::new(2, 0));
        assert_eq!(dir, Direction::Left);
    }

    #[test]
    fn never_reverses_while_another_exit_exists() {
        let grid = grid(&["XXXXXX", "X    X", "XXXXXX"]);
        // Heading right with the target behind: must keep going right.
        let (dir, next) = choose_next_step(&grid, Vec2::new(2, 1), Direction::Right, Vec2::new(0, 1));
        assert_eq!(dir, Direction::Right);
        assert_eq!(next, Vec2::new(3, 1));
    }

    #[test]
    fn reverses_when_boxed_in() {
        let grid = grid(&["XXXXX", "X  XX", "XXXXX"]);
        let (dir, next) = choose_next_step(&grid, Vec2::new(2, 1), Direction::Right, Vec2::new(9, 9));
        assert_eq!(dir, Direction::Left);
        assert_eq!(next, Vec2::new(1, 1));
    }

    #[test]
    fn stationary_ghost_may_move_any_open_way() {
        let grid = grid(&["XXXXX", "X  XX", "XXXXX"]);
        let (dir, next) = choose_next_step(&grid, Vec2::new(2, 1), Direction::None, Vec2::new(9, 9));
        assert_eq!(dir, Direction::Left);
        assert_eq!(next, Vec2::new(1, 1));
    }

    #[test]
    fn decision_is_deterministic() {
        let grid = Grid::classic();
        let first = choose_next_step(&grid, GHOST_SPAWN, Direction::None, Vec2::new(32, 0));
        for _ in 0..16 {
            assert_eq!(
                choose_next_step(&grid, GHOST_SPAWN, Direction::None, Vec2::new(32, 0)),
                first
            );
        }
        assert_eq!(first, (Direction::Right, Vec2::new(14, 11)));
    }

    #[test]
    fn ghost_retargets_only_on_reaching_its_next_cell() {
        let mut engine = GameEngine::new(GameEngineOptions::default());
        engine.release_ghosts();
        let peers: Vec<GhostPeer> = engine.ghosts.iter().map(GhostInternal::peer).collect();

        engine.update_ghosts(&peers);
        assert_eq!(engine.ghosts[0].dir, Direction::Right);
        assert_eq!(engine.ghosts[0].next_pos, Vec2::new(14, 11));
        assert_eq!(engine.ghosts[0].target, GhostType::Blinky.scatter_target());

        // Mid-transit mode changes do not redirect the ghost.
        engine.set_ghost_mode(GhostMode::Chase);
        engine.update_ghosts(&peers);
        assert_eq!(engine.ghosts[0].target, GhostType::Blinky.scatter_target());
        assert_eq!(engine.ghosts[0].next_pos, Vec2::new(14, 11));
    }

    #[test]
    fn ghost_moves_at_its_speed_per_tick() {
        let mut engine = GameEngine::new(GameEngineOptions::default());
        engine.release_ghosts();
        let start = engine.ghosts[0].pos;
        engine.update_ghosts(&[]);
        let after = engine.ghosts[0].pos;
        let step = engine.ghosts[0].speed / TICK_RATE as f32;
        assert!((after.raw_x - start.raw_x - step).abs() < 1e-5);
        assert_eq!(after.raw_y, start.raw_y);
    }
}
