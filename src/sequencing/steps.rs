use rand::seq::SliceRandom;
use rand::Rng;

use super::grid::NoteGrid;
use super::planes::PlaneTable;

/// One step of the expanded sequence: a grid slot played on a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Grid slot, 0..GRID_SLOTS. May point at a rest.
    pub slot: usize,
    /// Plane number, 1..=MAX_PLANES.
    pub plane: u8,
}

/// Expand the grid into the flat step list, note-major: all planes of
/// slot 0, then all planes of slot 1, and so on up to the highest active
/// slot. Rest slots still contribute one step per plane so the rhythmic
/// grid stays aligned.
pub fn expand(grid: &NoteGrid, planes: &PlaneTable) -> Vec<Step> {
    let slots = grid.highest_active() + 1;
    let mut steps = Vec::with_capacity(slots * planes.active() as usize);
    for slot in 0..slots {
        for plane in 1..=planes.active() {
            steps.push(Step { slot, plane });
        }
    }
    steps
}

/// The expanded step list plus the circular play cursor.
/// Always non-empty: slot 0 is pinned and at least one plane is active.
#[derive(Debug, Clone)]
pub struct StepRing {
    steps: Vec<Step>,
    cursor: usize,
}

impl StepRing {
    pub fn new(grid: &NoteGrid, planes: &PlaneTable) -> Self {
        Self {
            steps: expand(grid, planes),
            cursor: 0,
        }
    }

    /// Regenerate from the current grid and plane table. With `shuffle`
    /// the first step stays pinned and the tail is permuted
    /// (Fisher-Yates). The cursor keeps its position modulo the new
    /// length so an edit mid-performance does not jump the playhead.
    pub fn rebuild(
        &mut self,
        grid: &NoteGrid,
        planes: &PlaneTable,
        shuffle: bool,
        rng: &mut impl Rng,
    ) {
        self.steps = expand(grid, planes);
        if shuffle && self.steps.len() > 2 {
            self.steps[1..].shuffle(rng);
        }
        self.cursor %= self.steps.len().max(1);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Step {
        self.steps[self.cursor]
    }

    /// Move the cursor one step forward, wrapping at the end.
    pub fn advance(&mut self) -> Step {
        self.cursor = (self.cursor + 1) % self.steps.len().max(1);
        self.current()
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }
}
