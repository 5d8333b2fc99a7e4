use std::collections::{HashMap, HashSet};

use super::*;

/// Breadth-first search from `start` to the closest pellet.
///
/// A neighbour is skipped when it is a wall, or when a ghost stands on it and
/// is heading straight into the cell being expanded: stepping there would
/// swap places with the ghost. Ghosts moving elsewhere do not block.
///
/// Returns the path from `start` to the pellet, both ends included, or `None`
/// when no pellet is reachable.
pub fn find_path_to_nearest_pellet(
    grid: &Grid,
    start: Vec2,
    ghosts: &[GhostPeer],
) -> Option<Vec<Vec2>> {
    let mut prev: HashMap<Vec2, Vec2> = HashMap::new();
    let mut visited: HashSet<Vec2> = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(pos) = queue.pop_front() {
        if grid.get_cell(pos).is_pellet() {
            return Some(reconstruct_path(&prev, start, pos));
        }

        for (next, cell) in grid.get_neighboring_cells(pos) {
            if cell.is_wall() || visited.contains(&next) {
                continue;
            }
            let swaps_with_ghost = ghosts
                .iter()
                .any(|ghost| ghost.cell == next && ghost.cell.offset(ghost.dir) == pos);
            if swaps_with_ghost {
                continue;
            }
            visited.insert(next);
            prev.insert(next, pos);
            queue.push_back(next);
        }
    }

    None
}

fn reconstruct_path(prev: &HashMap<Vec2, Vec2>, start: Vec2, goal: Vec2) -> Vec<Vec2> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        let Some(&before) = prev.get(&current) else {
            break;
        };
        path.push(before);
        current = before;
    }
    path.reverse();
    path
}

impl GameEngine {
    /// Points the player's input at the first step towards the nearest
    /// pellet. Leaves the input alone when nothing is reachable.
    pub(super) fn update_autopilot(&mut self) {
        let start = self.player.pos.cell();
        let peers: Vec<GhostPeer> = self.ghosts.iter().map(GhostInternal::peer).collect();

        match find_path_to_nearest_pellet(&self.grid, start, &peers) {
            Some(path) => {
                if let [first, second, ..] = path.as_slice() {
                    self.player.input_dir =
                        Direction::from_delta(second.x - first.x, second.y - first.y);
                }
                self.autopilot.path = path;
            }
            None => self.autopilot.path.clear(),
        }
    }
}
