use crate::types::{Direction, Vec2};

/// Sub-cell position of a moving actor.
///
/// The raw coordinates interpolate between cells for drawing. Every grid
/// lookup and collision test goes through [`ActorPos::cell`], the rounded
/// projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorPos {
    pub raw_x: f32,
    pub raw_y: f32,
}

impl ActorPos {
    pub fn at(cell: Vec2) -> Self {
        Self {
            raw_x: cell.x as f32,
            raw_y: cell.y as f32,
        }
    }

    pub fn x(&self) -> i32 {
        self.raw_x.round() as i32
    }

    pub fn y(&self) -> i32 {
        self.raw_y.round() as i32
    }

    pub fn cell(&self) -> Vec2 {
        Vec2 {
            x: self.x(),
            y: self.y(),
        }
    }

    /// Places the actor exactly on `cell`, dropping any in-flight fraction.
    pub fn snap_to(&mut self, cell: Vec2) {
        self.raw_x = cell.x as f32;
        self.raw_y = cell.y as f32;
    }

    pub fn is_aligned(&self) -> bool {
        self.raw_x == self.x() as f32 && self.raw_y == self.y() as f32
    }

    /// Moves `step` cells along the single axis of `dir` and pins the other
    /// axis to its rounded value, so turns can only happen on cell centres.
    pub fn advance(&mut self, dir: Direction, step: f32) {
        let (dx, dy) = dir.delta();
        if dx != 0 {
            self.raw_x += dx as f32 * step;
            self.raw_y = self.y() as f32;
        }
        if dy != 0 {
            self.raw_x = self.x() as f32;
            self.raw_y += dy as f32 * step;
        }
    }
}
