/// MIDI note that maps to 0.0 V on every output (C2).
pub const REFERENCE_MIDI: u8 = 36;

/// Lowest note an output will ever be asked to play.
pub const MIDI_FLOOR: u8 = 36;

/// Highest note an output will ever be asked to play.
/// At 1 V/oct this is 7.0 V, comfortably inside a 0-10 V output stage.
pub const MIDI_CEIL: u8 = 120;

/// Fold an unclamped MIDI value into the playable window by octave
/// shifting. The window spans several octaves, so shifting by whole
/// octaves always terminates and preserves pitch class.
pub fn fold_to_window(midi: i32) -> u8 {
    let mut m = midi;
    while m < MIDI_FLOOR as i32 {
        m += 12;
    }
    while m > MIDI_CEIL as i32 {
        m -= 12;
    }
    m as u8
}

/// Convert a MIDI note inside the playable window to 1 V/oct volts
/// relative to [`REFERENCE_MIDI`].
pub fn midi_to_volts(midi: u8) -> f32 {
    (midi as f32 - REFERENCE_MIDI as f32) / 12.0
}
