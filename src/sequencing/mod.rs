pub mod grid;
pub mod planes;
pub mod steps;

pub use grid::NoteGrid;
pub use planes::{PlaneTable, CONSONANT_OFFSETS};
pub use steps::{expand, Step, StepRing};
