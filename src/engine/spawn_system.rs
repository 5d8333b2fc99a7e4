use super::*;

use crate::constants::{GHOST_RELEASE_INTERVAL_MS, GHOST_ROSTER, GHOST_SPAWN, MODE_TIMELINE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct ModePhase {
    pub(super) mode: GhostMode,
    /// `None` for the last phase, which never ends.
    pub(super) duration_ms: Option<u64>,
}

pub(super) fn build_mode_timeline() -> VecDeque<ModePhase> {
    MODE_TIMELINE
        .iter()
        .map(|&(mode, duration_ms)| ModePhase { mode, duration_ms })
        .collect()
}

pub(super) fn build_ghost_queue() -> VecDeque<GhostInternal> {
    GHOST_ROSTER
        .iter()
        .map(|&(ghost_type, speed)| GhostInternal {
            ghost_type,
            pos: ActorPos::at(GHOST_SPAWN),
            next_pos: GHOST_SPAWN,
            speed,
            mode: GhostMode::Scatter,
            dir: Direction::None,
            target: Vec2::default(),
        })
        .collect()
}

impl GameEngine {
    /// Pops the current phase once it has run longer than its duration and
    /// broadcasts the next phase's mode.
    pub(super) fn advance_mode_timeline(&mut self) {
        let Some(duration_ms) = self.mode_timeline.front().and_then(|phase| phase.duration_ms)
        else {
            return;
        };
        if self.elapsed_ms.saturating_sub(self.mode_started_at_ms) <= duration_ms {
            return;
        }
        self.mode_timeline.pop_front();
        self.mode_started_at_ms = self.elapsed_ms;
        if let Some(next) = self.mode_timeline.front() {
            let mode = next.mode;
            self.set_ghost_mode(mode);
        }
    }

    pub(super) fn set_ghost_mode(&mut self, mode: GhostMode) {
        self.ghost_mode = mode;
        for ghost in &mut self.ghosts {
            ghost.mode = mode;
        }
        self.events.push(RuntimeEvent::ModeChanged { mode });
    }

    /// Lets the next ghost out of the house. The first release happens on the
    /// first tick; later ones wait out the release interval.
    pub(super) fn release_ghosts(&mut self) {
        if let Some(last) = self.last_release_at_ms {
            if self.elapsed_ms.saturating_sub(last) < GHOST_RELEASE_INTERVAL_MS {
                return;
            }
        }
        let Some(mut ghost) = self.ghost_queue.pop_front() else {
            return;
        };
        ghost.mode = self.ghost_mode;
        self.last_release_at_ms = Some(self.elapsed_ms);
        self.events.push(RuntimeEvent::GhostReleased {
            ghost_type: ghost.ghost_type,
        });
        self.ghosts.push(ghost);
    }
}
