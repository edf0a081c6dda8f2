use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::MAX_PLANES;

/// Transposition offsets a randomized plane may take, in scale degrees:
/// diatonic third, fourth, fifth, and octave. Anything drawn from this
/// set stays consonant against the plane-1 reference notes.
pub const CONSONANT_OFFSETS: [u8; 4] = [2, 3, 4, 7];

/// Per-plane transposition table.
///
/// Plane 1 is the identity plane and always sounds the grid verbatim.
/// Planes 2-8 each carry a degree offset; `active` bounds how many planes
/// the step generator expands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaneTable {
    /// Offsets for planes 2..=MAX_PLANES, indexed by plane - 2.
    offsets: [u8; (MAX_PLANES - 1) as usize],
    active: u8,
}

impl Default for PlaneTable {
    fn default() -> Self {
        Self {
            // Octaves until the first randomize
            offsets: [7; (MAX_PLANES - 1) as usize],
            active: 1,
        }
    }
}

impl PlaneTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted parts, re-establishing invariants.
    pub fn from_parts(offsets: [u8; (MAX_PLANES - 1) as usize], active: u8) -> Self {
        let mut table = Self { offsets, active };
        table.normalize();
        table
    }

    /// Degree offset for a plane. Plane 1 (and anything out of range)
    /// is the identity.
    pub fn offset(&self, plane: u8) -> u8 {
        if (2..=MAX_PLANES).contains(&plane) {
            self.offsets[(plane - 2) as usize]
        } else {
            0
        }
    }

    pub fn offsets(&self) -> &[u8; (MAX_PLANES - 1) as usize] {
        &self.offsets
    }

    /// Number of planes the sequence expands over, 1..=MAX_PLANES.
    pub fn active(&self) -> u8 {
        self.active
    }

    pub fn set_active(&mut self, planes: u8) {
        self.active = planes.clamp(1, MAX_PLANES);
    }

    /// Re-draw every non-base plane from the consonant set.
    pub fn randomize(&mut self, rng: &mut impl Rng) {
        for offset in &mut self.offsets {
            // Non-empty constant set, choose cannot fail
            *offset = *CONSONANT_OFFSETS.choose(rng).unwrap_or(&CONSONANT_OFFSETS[0]);
        }
    }

    /// Restore invariants after deserializing.
    pub fn normalize(&mut self) {
        self.active = self.active.clamp(1, MAX_PLANES);
        for offset in &mut self.offsets {
            if !CONSONANT_OFFSETS.contains(offset) {
                *offset = CONSONANT_OFFSETS[CONSONANT_OFFSETS.len() - 1];
            }
        }
    }
}
