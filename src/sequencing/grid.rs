use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{DEGREE_SPAN, GRID_SLOTS};

/// The eight-slot note grid holding the plane-1 reference notes.
///
/// Each slot is a scale degree (0-15) or a rest. Slot 0 anchors the
/// sequence and can never be a rest: clearing it is a no-op and loading a
/// grid with slot 0 empty re-pins it to degree 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteGrid {
    slots: [Option<u8>; GRID_SLOTS],
}

impl Default for NoteGrid {
    fn default() -> Self {
        let mut slots = [None; GRID_SLOTS];
        slots[0] = Some(0);
        Self { slots }
    }
}

impl NoteGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a degree at a slot, clamping it into the degree range.
    /// Out-of-range slots are ignored.
    pub fn set(&mut self, slot: usize, degree: u8) {
        if slot < GRID_SLOTS {
            self.slots[slot] = Some(degree.min(DEGREE_SPAN - 1));
        }
    }

    /// Clear a slot to a rest. Slot 0 stays put.
    pub fn clear(&mut self, slot: usize) {
        if slot > 0 && slot < GRID_SLOTS {
            self.slots[slot] = None;
        }
    }

    pub fn get(&self, slot: usize) -> Option<u8> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<u8>; GRID_SLOTS] {
        &self.slots
    }

    /// Index of the highest non-rest slot. Slot 0 is always active, so
    /// this never fails.
    pub fn highest_active(&self) -> usize {
        self.slots
            .iter()
            .rposition(|s| s.is_some())
            .unwrap_or(0)
    }

    /// Whether any slot after `slot` holds a note. Drives the
    /// legato-hold-vs-silence decision on rest steps.
    pub fn has_note_after(&self, slot: usize) -> bool {
        self.slots[slot.min(GRID_SLOTS - 1) + 1..]
            .iter()
            .any(|s| s.is_some())
    }

    /// Permute slots 1-7 in place, leaving the anchor slot alone.
    pub fn shuffle_tail(&mut self, rng: &mut impl Rng) {
        self.slots[1..].shuffle(rng);
    }

    /// Restore the invariants after deserializing: slot 0 active, all
    /// degrees inside the degree range.
    pub fn normalize(&mut self) {
        if self.slots[0].is_none() {
            self.slots[0] = Some(0);
        }
        for slot in self.slots.iter_mut().flatten() {
            *slot = (*slot).min(DEGREE_SPAN - 1);
        }
    }
}

impl From<[Option<u8>; GRID_SLOTS]> for NoteGrid {
    fn from(slots: [Option<u8>; GRID_SLOTS]) -> Self {
        let mut grid = Self { slots };
        grid.normalize();
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn slot_zero_starts_active() {
        assert_eq!(NoteGrid::default().get(0), Some(0));
    }

    #[test]
    fn slot_zero_cannot_be_cleared() {
        let mut grid = NoteGrid::default();
        grid.set(0, 5);
        grid.clear(0);
        assert_eq!(grid.get(0), Some(5));
    }

    #[test]
    fn set_clamps_into_degree_range() {
        let mut grid = NoteGrid::default();
        grid.set(3, 200);
        assert_eq!(grid.get(3), Some(DEGREE_SPAN - 1));
    }

    #[test]
    fn out_of_range_slots_are_ignored() {
        let mut grid = NoteGrid::default();
        grid.set(GRID_SLOTS, 4);
        grid.clear(GRID_SLOTS + 3);
        assert_eq!(grid, NoteGrid::default());
    }

    #[test]
    fn highest_active_tracks_the_last_note() {
        let mut grid = NoteGrid::default();
        assert_eq!(grid.highest_active(), 0);
        grid.set(5, 3);
        assert_eq!(grid.highest_active(), 5);
        grid.set(2, 7);
        assert_eq!(grid.highest_active(), 5);
        grid.clear(5);
        assert_eq!(grid.highest_active(), 2);
    }

    #[test]
    fn has_note_after_sees_past_rests() {
        let mut grid = NoteGrid::default();
        grid.set(6, 1);
        assert!(grid.has_note_after(0));
        assert!(grid.has_note_after(5));
        assert!(!grid.has_note_after(6));
        assert!(!grid.has_note_after(7));
    }

    #[test]
    fn shuffle_tail_keeps_the_anchor() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut grid = NoteGrid::default();
        grid.set(0, 9);
        for (slot, degree) in (1..GRID_SLOTS).zip(0..) {
            grid.set(slot, degree);
        }
        let before: Vec<_> = grid.slots()[1..].to_vec();
        grid.shuffle_tail(&mut rng);
        assert_eq!(grid.get(0), Some(9));

        let mut after: Vec<_> = grid.slots()[1..].to_vec();
        let mut sorted_before = before;
        sorted_before.sort();
        after.sort();
        assert_eq!(after, sorted_before);
    }

    #[test]
    fn normalize_repins_slot_zero() {
        let grid = NoteGrid::from([None, Some(40), None, None, None, None, None, Some(2)]);
        assert_eq!(grid.get(0), Some(0));
        assert_eq!(grid.get(1), Some(DEGREE_SPAN - 1));
        assert_eq!(grid.get(7), Some(2));
    }
}
