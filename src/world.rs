use std::collections::{HashSet, VecDeque};

use thiserror::Error;

use crate::constants::CLASSIC_LAYOUT;
use crate::types::{Cell, Direction, Vec2};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,
    #[error("row {row} is {width} cells wide, expected {expected}")]
    RaggedRow {
        row: usize,
        width: usize,
        expected: usize,
    },
    #[error("unknown cell symbol {symbol:?} at ({x},{y})")]
    UnknownSymbol { symbol: char, x: usize, y: usize },
}

/// Static maze plus the pellets still lying in it.
#[derive(Clone, Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    pellets_left: usize,
}

impl Grid {
    pub fn classic() -> Self {
        Self::parse(&CLASSIC_LAYOUT).expect("built-in layout is well formed")
    }

    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let row_width = row.chars().count();
            if row_width != width {
                return Err(LayoutError::RaggedRow {
                    row: y,
                    width: row_width,
                    expected: width,
                });
            }
            for (x, symbol) in row.chars().enumerate() {
                let cell =
                    Cell::from_symbol(symbol).ok_or(LayoutError::UnknownSymbol { symbol, x, y })?;
                cells.push(cell);
            }
        }

        let pellets_left = cells.iter().filter(|cell| cell.is_pellet()).count();
        Ok(Self {
            width: width as i32,
            height: rows.len() as i32,
            cells,
            pellets_left,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pellets_left(&self) -> usize {
        self.pellets_left
    }

    pub fn in_bounds(&self, pos: Vec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Vec2) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    pub fn cell(&self, pos: Vec2) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Cell lookup for positions the caller knows to be on the board.
    ///
    /// Portal handling keeps every actor in bounds, so an off-board read is a
    /// logic error: it panics in debug builds and reads as a wall otherwise.
    pub fn get_cell(&self, pos: Vec2) -> Cell {
        debug_assert!(
            self.in_bounds(pos),
            "cell ({},{}) is outside the {}x{} board",
            pos.x,
            pos.y,
            self.width,
            self.height
        );
        self.cell(pos).unwrap_or(Cell::Wall)
    }

    pub fn is_walkable(&self, pos: Vec2) -> bool {
        self.cell(pos).map(|cell| !cell.is_wall()).unwrap_or(false)
    }

    /// Eats the pellet at `pos`. Returns the cell that was cleared, or `None`
    /// when there was nothing to eat.
    pub fn clear_cell(&mut self, pos: Vec2) -> Option<Cell> {
        let idx = self.index(pos)?;
        let cell = self.cells[idx];
        if !cell.is_pellet() {
            return None;
        }
        self.cells[idx] = Cell::Empty;
        self.pellets_left -= 1;
        Some(cell)
    }

    pub fn get_neighboring_cell(&self, pos: Vec2, dir: Direction) -> Cell {
        self.get_cell(pos.offset(dir))
    }

    /// On-board neighbours in N, S, W, E order.
    pub fn get_neighboring_cells(&self, pos: Vec2) -> impl Iterator<Item = (Vec2, Cell)> + '_ {
        Direction::CARDINALS.into_iter().filter_map(move |dir| {
            let next = pos.offset(dir);
            self.cell(next).map(|cell| (next, cell))
        })
    }

    pub fn tiles(&self) -> Vec<String> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    pub fn pellet_cells(&self) -> Vec<Vec2> {
        let mut out = Vec::with_capacity(self.pellets_left);
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Vec2 { x, y };
                if self.get_cell(pos).is_pellet() {
                    out.push(pos);
                }
            }
        }
        out
    }

    /// Floor cells connected to `start` through orthogonal moves.
    pub fn reachable_from(&self, start: Vec2) -> HashSet<Vec2> {
        let mut out = HashSet::new();
        if !self.is_walkable(start) {
            return out;
        }

        let mut queue = VecDeque::new();
        out.insert(start);
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            for (next, cell) in self.get_neighboring_cells(pos) {
                if cell.is_wall() {
                    continue;
                }
                if out.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Grid, LayoutError};
    use crate::constants::{
        BOARD_HEIGHT, BOARD_WIDTH, GHOST_SPAWN, LEFT_PORTAL, LEFT_PORTAL_EXIT, PELLET_SCORE,
        PLAYER_SPAWN, RIGHT_PORTAL, RIGHT_PORTAL_EXIT, WIN_SCORE,
    };
    use crate::types::{Cell, Direction, Vec2};

    #[test]
    fn classic_layout_has_expected_shape() {
        let grid = Grid::classic();
        assert_eq!(grid.width(), BOARD_WIDTH);
        assert_eq!(grid.height(), BOARD_HEIGHT);
        assert_eq!(grid.pellets_left(), 244);
        assert!(grid.pellets_left() as u32 * PELLET_SCORE >= WIN_SCORE);
    }

    #[test]
    fn spawns_and_portals_are_walkable() {
        let grid = Grid::classic();
        for pos in [
            PLAYER_SPAWN,
            GHOST_SPAWN,
            LEFT_PORTAL,
            LEFT_PORTAL_EXIT,
            RIGHT_PORTAL,
            RIGHT_PORTAL_EXIT,
        ] {
            assert!(grid.is_walkable(pos), "({},{}) should be floor", pos.x, pos.y);
        }
    }

    #[test]
    fn every_pellet_is_reachable_from_player_spawn() {
        let grid = Grid::classic();
        let reachable = grid.reachable_from(PLAYER_SPAWN);
        for pellet in grid.pellet_cells() {
            assert!(
                reachable.contains(&pellet),
                "pellet is unreachable: ({},{})",
                pellet.x,
                pellet.y
            );
        }
        assert!(reachable.contains(&GHOST_SPAWN));
    }

    #[test]
    fn clear_cell_is_idempotent() {
        let mut grid = Grid::classic();
        let pos = Vec2::new(15, 23);
        let before = grid.pellets_left();
        assert_eq!(grid.get_cell(pos), Cell::Pellet);

        assert_eq!(grid.clear_cell(pos), Some(Cell::Pellet));
        let tiles_once = grid.tiles();
        assert_eq!(grid.clear_cell(pos), None);

        assert_eq!(grid.tiles(), tiles_once);
        assert_eq!(grid.pellets_left(), before - 1);
        assert_eq!(grid.get_cell(pos), Cell::Empty);
    }

    #[test]
    fn clear_cell_ignores_walls_and_gaps() {
        let mut grid = Grid::classic();
        assert_eq!(grid.clear_cell(Vec2::new(0, 0)), None);
        assert_eq!(grid.clear_cell(GHOST_SPAWN), None);
        assert_eq!(grid.get_cell(Vec2::new(0, 0)), Cell::Wall);
        assert_eq!(grid.get_cell(GHOST_SPAWN), Cell::Gap);
    }

    #[test]
    fn neighbours_come_in_north_south_west_east_order() {
        let grid = Grid::classic();
        let neighbours: Vec<_> = grid.get_neighboring_cells(PLAYER_SPAWN).collect();
        assert_eq!(
            neighbours.iter().map(|(pos, _)| *pos).collect::<Vec<_>>(),
            vec![
                Vec2::new(13, 22),
                Vec2::new(13, 24),
                Vec2::new(12, 23),
                Vec2::new(14, 23),
            ]
        );
        assert_eq!(
            grid.get_neighboring_cell(PLAYER_SPAWN, Direction::Up),
            Cell::Wall
        );
        assert_eq!(
            grid.get_neighboring_cell(PLAYER_SPAWN, Direction::Right),
            Cell::Gap
        );
    }

    #[test]
    fn neighbours_skip_off_board_cells() {
        let grid = Grid::classic();
        let neighbours: Vec<_> = grid.get_neighboring_cells(LEFT_PORTAL).collect();
        assert_eq!(neighbours.len(), 3);
        assert!(neighbours.iter().all(|(pos, _)| grid.in_bounds(*pos)));
    }

    #[test]
    fn parse_rejects_malformed_layouts() {
        let empty: [&str; 0] = [];
        assert_eq!(Grid::parse(&empty).unwrap_err(), LayoutError::Empty);
        assert_eq!(
            Grid::parse(&["XXX", "XX"]).unwrap_err(),
            LayoutError::RaggedRow {
                row: 1,
                width: 2,
                expected: 3
            }
        );
        assert_eq!(
            Grid::parse(&["XXX", "X#X"]).unwrap_err(),
            LayoutError::UnknownSymbol {
                symbol: '#',
                x: 1,
                y: 1
            }
        );
    }

    #[test]
    fn tiles_reflect_eaten_pellets() {
        let mut grid = Grid::parse(&["XXXX", "XoOX", "XXXX"]).expect("valid layout");
        assert_eq!(grid.pellets_left(), 2);
        grid.clear_cell(Vec2::new(2, 1));
        assert_eq!(grid.tiles(), vec!["XXXX", "Xo X", "XXXX"]);
        assert_eq!(grid.pellet_cells(), vec![Vec2::new(1, 1)]);
    }
}
