use serde::{Deserialize, Serialize};

use super::scale::Scale;
use super::voltage::{fold_to_window, REFERENCE_MIDI};

/// Minimum movement on the pitch input before the root recomputes.
/// Half a semitone at 1 V/oct is ~0.042 V; staying just under that keeps
/// the root stable against ADC noise without feeling sluggish.
pub const ROOT_HYSTERESIS_VOLTS: f32 = 0.04;

/// How the sampled control voltage is interpreted as a tonal center.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootMode {
    /// Direct 1 V/oct chromatic mapping ("ROOT" on the panel).
    #[default]
    Chromatic,
    /// Snap to the nearest major-scale degree ("DIATONIC").
    Diatonic,
}

impl RootMode {
    pub fn label(&self) -> &'static str {
        match self {
            RootMode::Chromatic => "ROOT",
            RootMode::Diatonic => "DIATONIC",
        }
    }
}

/// Tracks the root note sampled from the pitch CV input.
///
/// The input is re-read every poll cycle, so raw conversion would make the
/// root flutter between adjacent notes at semitone boundaries. The tracker
/// only recomputes when the voltage has moved more than
/// [`ROOT_HYSTERESIS_VOLTS`] from the last accepted reading.
#[derive(Debug, Clone)]
pub struct RootTracker {
    mode: RootMode,
    tracked_volts: f32,
    root: u8,
}

impl RootTracker {
    pub fn new(mode: RootMode) -> Self {
        Self {
            mode,
            tracked_volts: 0.0,
            root: Self::map(mode, 0.0),
        }
    }

    /// Feed one analog reading. Returns the (possibly unchanged) root.
    pub fn sample(&mut self, volts: f32) -> u8 {
        if (volts - self.tracked_volts).abs() > ROOT_HYSTERESIS_VOLTS {
            self.tracked_volts = volts;
            self.root = Self::map(self.mode, volts);
        }
        self.root
    }

    /// Current root as a MIDI note.
    pub fn root(&self) -> u8 {
        self.root
    }

    pub fn mode(&self) -> RootMode {
        self.mode
    }

    /// Switch interpretation mode and reinterpret the held voltage.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            RootMode::Chromatic => RootMode::Diatonic,
            RootMode::Diatonic => RootMode::Chromatic,
        };
        self.root = Self::map(self.mode, self.tracked_volts);
    }

    pub fn set_mode(&mut self, mode: RootMode) {
        self.mode = mode;
        self.root = Self::map(self.mode, self.tracked_volts);
    }

    fn map(mode: RootMode, volts: f32) -> u8 {
        let semis = (volts * 12.0).round() as i32;
        match mode {
            RootMode::Chromatic => fold_to_window(REFERENCE_MIDI as i32 + semis),
            RootMode::Diatonic => {
                let octave = semis.div_euclid(12);
                let within = semis.rem_euclid(12);
                let snapped = nearest_major_step(within);
                fold_to_window(REFERENCE_MIDI as i32 + octave * 12 + snapped)
            }
        }
    }
}

impl Default for RootTracker {
    fn default() -> Self {
        Self::new(RootMode::default())
    }
}

/// Nearest major-scale semitone to `within` (0-11). Ties snap downward.
fn nearest_major_step(within: i32) -> i32 {
    let steps = &Scale::Major.intervals()[..7];
    let mut best = 0i32;
    let mut best_distance = i32::MAX;
    for &s in steps {
        let distance = (within - s as i32).abs();
        if distance < best_distance {
            best_distance = distance;
            best = s as i32;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_volts_is_the_reference_note() {
        let tracker = RootTracker::new(RootMode::Chromatic);
        assert_eq!(tracker.root(), REFERENCE_MIDI);
    }

    #[test]
    fn chromatic_tracks_one_volt_per_octave() {
        let mut tracker = RootTracker::new(RootMode::Chromatic);
        tracker.sample(1.0);
        assert_eq!(tracker.root(), REFERENCE_MIDI + 12);
        tracker.sample(2.5);
        assert_eq!(tracker.root(), REFERENCE_MIDI + 30);
    }

    #[test]
    fn hysteresis_ignores_small_wobble() {
        let mut tracker = RootTracker::new(RootMode::Chromatic);
        tracker.sample(1.0);
        let root = tracker.root();

        // Two readings inside the dead band: root must not move
        tracker.sample(1.0 + ROOT_HYSTERESIS_VOLTS * 0.5);
        assert_eq!(tracker.root(), root);
        tracker.sample(1.0 - ROOT_HYSTERESIS_VOLTS * 0.9);
        assert_eq!(tracker.root(), root);

        // One reading beyond it: root recomputes
        tracker.sample(1.5);
        assert_ne!(tracker.root(), root);
    }

    #[test]
    fn diatonic_snaps_to_major_degrees() {
        let mut tracker = RootTracker::new(RootMode::Diatonic);
        // 1 semitone above the reference snaps down to the root
        tracker.sample(1.0 / 12.0);
        assert_eq!(tracker.root(), REFERENCE_MIDI);
        // 3 semitones snaps to the nearest major step (2 or 4; tie -> 2)
        tracker.sample(3.0 / 12.0);
        assert_eq!(tracker.root(), REFERENCE_MIDI + 2);
        // 6 semitones snaps down to the fourth (5)
        tracker.sample(6.0 / 12.0);
        assert_eq!(tracker.root(), REFERENCE_MIDI + 5);
    }

    #[test]
    fn toggle_reinterprets_the_held_voltage() {
        let mut tracker = RootTracker::new(RootMode::Chromatic);
        tracker.sample(6.0 / 12.0);
        assert_eq!(tracker.root(), REFERENCE_MIDI + 6);

        tracker.toggle_mode();
        assert_eq!(tracker.mode(), RootMode::Diatonic);
        assert_eq!(tracker.root(), REFERENCE_MIDI + 5);

        tracker.toggle_mode();
        assert_eq!(tracker.root(), REFERENCE_MIDI + 6);
    }

    #[test]
    fn negative_volts_fold_into_the_window() {
        let mut tracker = RootTracker::new(RootMode::Chromatic);
        let root = tracker.sample(-1.25);
        assert!(root >= crate::pitch::MIDI_FLOOR);
    }
}
