pub mod engine;
pub mod io;
pub mod lfo; // Control-rate modulation
pub mod patch;
pub mod pitch; // Scales, root tracking, 1 V/oct mapping
pub mod sequencing; // Note grid, planes, step expansion

/// Number of slots in the note grid.
pub const GRID_SLOTS: usize = 8;

/// Highest plane number; plane 1 is the identity plane.
pub const MAX_PLANES: u8 = 8;

/// Scale degrees per table: degrees 0..=15.
pub const DEGREE_SPAN: u8 = 16;
