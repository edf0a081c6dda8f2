pub mod root;
pub mod scale;
pub mod voltage;

pub use root::{RootMode, RootTracker, ROOT_HYSTERESIS_VOLTS};
pub use scale::Scale;
pub use voltage::{fold_to_window, midi_to_volts, MIDI_CEIL, MIDI_FLOOR, REFERENCE_MIDI};
