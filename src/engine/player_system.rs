use super::*;

use crate::constants::TICK_RATE;

impl GameEngine {
    pub(super) fn update_player(&mut self) {
        let player = &mut self.player;
        let cell = player.pos.cell();

        // Turns are only accepted towards open floor; a blocked request stays
        // pending and is retried every tick.
        if !player.input_dir.is_none() && player.input_dir != player.dir {
            let wanted = self.grid.get_neighboring_cell(cell, player.input_dir);
            if !wanted.is_wall() {
                player.dir = player.input_dir;
                player.facing_dir = player.input_dir;
            }
        }

        if self.grid.get_neighboring_cell(cell, player.dir).is_wall() {
            player.dir = Direction::None;
            player.pos.snap_to(cell);
            return;
        }
        player.pos.advance(player.dir, player.speed / TICK_RATE as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::new(GameEngineOptions::default())
    }

    #[test]
    fn idle_player_stays_on_spawn() {
        let mut engine = engine();
        for _ in 0..10 {
            engine.update_player();
        }
        assert_eq!(engine.player.pos, ActorPos::at(PLAYER_SPAWN));
        assert_eq!(engine.player.facing_dir, Direction::Right);
    }

    #[test]
    fn input_into_wall_is_ignored_until_it_opens() {
        let mut engine = engine();
        engine.set_input(Direction::Up);
        engine.update_player();
        assert_eq!(engine.player.dir, Direction::None);
        assert_eq!(engine.player.facing_dir, Direction::Right);
        assert_eq!(engine.player.input_dir, Direction::Up);
    }

    #[test]
    fn accepted_input_sets_direction_and_facing() {
        let mut engine = engine();
        engine.set_input(Direction::Left);
        engine.update_player();
        assert_eq!(engine.player.dir, Direction::Left);
        assert_eq!(engine.player.facing_dir, Direction::Left);
        let step = PLAYER_BASE_SPEED / TICK_RATE as f32;
        assert!((engine.player.pos.raw_x - (PLAYER_SPAWN.x as f32 - step)).abs() < 1e-5);
        assert_eq!(engine.player.pos.raw_y, PLAYER_SPAWN.y as f32);
    }

    #[test]
    fn wall_ahead_stops_and_snaps_but_keeps_facing() {
        let mut engine = engine();
        // (14, 22) is a wall.
        engine.player.pos = ActorPos {
            raw_x: 14.3,
            raw_y: 23.0,
        };
        engine.player.dir = Direction::Up;
        engine.player.facing_dir = Direction::Up;
        engine.player.input_dir = Direction::Up;
        engine.update_player();

        assert_eq!(engine.player.dir, Direction::None);
        assert_eq!(engine.player.facing_dir, Direction::Up);
        assert_eq!(engine.player.pos, ActorPos::at(Vec2::new(14, 23)));
    }

    #[test]
    fn turning_mid_cell_snaps_the_old_axis() {
        let mut engine = engine();
        // Row 5 is an open corridor; (6, 6) below column 6 is open as well.
        engine.player.pos = ActorPos {
            raw_x: 5.8,
            raw_y: 5.0,
        };
        engine.player.dir = Direction::Right;
        engine.set_input(Direction::Down);
        engine.update_player();

        assert_eq!(engine.player.dir, Direction::Down);
        assert_eq!(engine.player.pos.raw_x, 6.0);
        let step = PLAYER_BASE_SPEED / TICK_RATE as f32;
        assert!((engine.player.pos.raw_y - (5.0 + step)).abs() < 1e-5);
    }

    #[test]
    fn randomized_speed_is_drawn_from_range_and_seeded() {
        let options = GameEngineOptions {
            seed: 99,
            autopilot: false,
            player_speed: PlayerSpeed::Range { min: 6.0, max: 9.0 },
        };
        let a = GameEngine::new(options.clone());
        let b = GameEngine::new(options);
        assert!((6.0..=9.0).contains(&a.player.speed));
        assert_eq!(a.player.speed.to_bits(), b.player.speed.to_bits());
    }
}
