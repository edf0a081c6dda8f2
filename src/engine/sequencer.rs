//! The planar sequencer core: grid x plane scheduling plus the voltage
//! mapper that turns steps into per-jack 1 V/oct CV.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::io::{CvSink, OutputChannel};
use crate::patch::Bank;
use crate::pitch::{fold_to_window, midi_to_volts, RootTracker, Scale};
use crate::sequencing::{NoteGrid, PlaneTable, Step, StepRing};
use crate::DEGREE_SPAN;

/// Fixed per-jack quantization assignment: scale table plus octave shift.
#[derive(Debug, Clone, Copy)]
pub struct ChannelAssign {
    pub channel: OutputChannel,
    pub scale: Scale,
    pub octave_shift: i8,
}

/// Every jack quantizes the same step through its own scale, so one
/// sequence fans out into six harmonically related voices.
pub const CHANNEL_SCALES: [ChannelAssign; 6] = [
    ChannelAssign { channel: OutputChannel::Cv1, scale: Scale::Major, octave_shift: 0 },
    ChannelAssign { channel: OutputChannel::Cv2, scale: Scale::MajorPentatonic, octave_shift: 0 },
    ChannelAssign { channel: OutputChannel::Cv3, scale: Scale::NaturalMinor, octave_shift: 0 },
    ChannelAssign { channel: OutputChannel::Cv4, scale: Scale::MinorPentatonic, octave_shift: -1 },
    ChannelAssign { channel: OutputChannel::Cv5, scale: Scale::HarmonicMinor, octave_shift: -1 },
    ChannelAssign { channel: OutputChannel::Cv6, scale: Scale::Chromatic, octave_shift: 1 },
];

/// All sequencer state in one place, mutated only through its methods.
#[derive(Debug)]
pub struct PlanarSequencer {
    grid: NoteGrid,
    planes: PlaneTable,
    ring: StepRing,
    shuffle: bool,
    /// Slot-0 degree captured at patch init; the drift against it
    /// transposes the rest of the grid consistently.
    base_at_init: u8,
    /// Last emitted degree, sustained over legato rests.
    held: Option<u8>,
    root: RootTracker,
    rng: SmallRng,
}

impl PlanarSequencer {
    pub fn new(seed: u64) -> Self {
        let grid = NoteGrid::default();
        let planes = PlaneTable::default();
        let ring = StepRing::new(&grid, &planes);
        Self {
            base_at_init: grid.get(0).unwrap_or(0),
            grid,
            planes,
            ring,
            shuffle: false,
            held: None,
            root: RootTracker::default(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn grid(&self) -> &NoteGrid {
        &self.grid
    }

    pub fn planes(&self) -> &PlaneTable {
        &self.planes
    }

    pub fn steps(&self) -> &[Step] {
        self.ring.steps()
    }

    pub fn cursor(&self) -> usize {
        self.ring.cursor()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn held(&self) -> Option<u8> {
        self.held
    }

    pub fn root(&self) -> &RootTracker {
        &self.root
    }

    pub fn set_note(&mut self, slot: usize, degree: u8) {
        self.grid.set(slot, degree);
        self.rebuild();
    }

    pub fn clear_note(&mut self, slot: usize) {
        self.grid.clear(slot);
        self.rebuild();
    }

    pub fn set_active_planes(&mut self, planes: u8) {
        self.planes.set_active(planes);
        self.rebuild();
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
        self.rebuild();
    }

    /// Re-draw every non-base plane from the consonant set, reshuffle the
    /// grid tail, and regenerate the step list.
    pub fn randomize_planes(&mut self) {
        self.planes.randomize(&mut self.rng);
        self.grid.shuffle_tail(&mut self.rng);
        self.rebuild();
    }

    /// Feed one reading from the root-pitch input.
    pub fn sample_root(&mut self, volts: f32) {
        self.root.sample(volts);
    }

    pub fn toggle_root_mode(&mut self) {
        self.root.toggle_mode();
    }

    /// Wipe the patch back to the default grid and plane table. The root
    /// tracker keeps its mode and held voltage.
    pub fn reset(&mut self) {
        log::debug!("patch reset");
        self.grid = NoteGrid::default();
        self.planes = PlaneTable::default();
        self.shuffle = false;
        self.base_at_init = self.grid.get(0).unwrap_or(0);
        self.held = None;
        self.ring = StepRing::new(&self.grid, &self.planes);
    }

    /// The transposition rule. Slot 0 plays verbatim; every other slot
    /// follows slot 0's drift since patch init, then its plane's offset,
    /// wrapped into the degree range.
    pub fn adjusted_degree(&self, slot: usize, degree: u8, plane: u8) -> u8 {
        if slot == 0 {
            return degree;
        }
        let drift = self.grid.get(0).unwrap_or(0) as i32 - self.base_at_init as i32;
        let adjusted = degree as i32 + drift + self.planes.offset(plane) as i32;
        adjusted.rem_euclid(DEGREE_SPAN as i32) as u8
    }

    /// Clock pulse: move the cursor and emit the new step.
    pub fn advance(&mut self, sink: &mut impl CvSink) {
        self.ring.advance();
        self.emit(sink);
    }

    /// Write the current step to the outputs.
    ///
    /// Notes emit a fresh voltage per jack. Rests sustain the held degree
    /// when a note exists later in the grid; otherwise everything goes
    /// silent and the hold memory clears.
    pub fn emit(&mut self, sink: &mut impl CvSink) {
        let step = self.ring.current();
        match self.grid.get(step.slot) {
            Some(degree) => {
                let adjusted = self.adjusted_degree(step.slot, degree, step.plane);
                self.held = Some(adjusted);
                self.write_channels(adjusted, sink);
            }
            None => match self.held {
                Some(held) if self.grid.has_note_after(step.slot) => {
                    // Legato hold: same degree, same voltages, gates stay up
                    self.write_channels(held, sink);
                }
                _ => {
                    self.held = None;
                    for channel in OutputChannel::ALL {
                        sink.off(channel);
                    }
                }
            },
        }
    }

    fn write_channels(&self, degree: u8, sink: &mut impl CvSink) {
        let root = self.root.root();
        for assign in CHANNEL_SCALES {
            let semitones = assign.scale.semitones(degree);
            let midi = root as i32 + semitones as i32 + 12 * assign.octave_shift as i32;
            sink.voltage(assign.channel, midi_to_volts(fold_to_window(midi)));
            sink.on(assign.channel);
        }
    }

    /// Snapshot the persisted part of the patch.
    pub fn to_bank(&self) -> Bank {
        Bank {
            version: crate::patch::BANK_VERSION,
            grid: *self.grid.slots(),
            plane_offsets: *self.planes.offsets(),
            active_planes: self.planes.active(),
            shuffle: self.shuffle,
            root_mode: self.root.mode(),
        }
    }

    /// Restore a persisted patch. Invariants are re-established on the
    /// way in, so a hand-edited or stale bank can not wedge the engine.
    pub fn apply_bank(&mut self, bank: &Bank) {
        self.grid = NoteGrid::from(bank.grid);
        self.planes = PlaneTable::from_parts(bank.plane_offsets, bank.active_planes);
        self.shuffle = bank.shuffle;
        self.root.set_mode(bank.root_mode);
        self.base_at_init = self.grid.get(0).unwrap_or(0);
        self.held = None;
        self.ring = StepRing::new(&self.grid, &self.planes);
        if self.shuffle {
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        self.ring
            .rebuild(&self.grid, &self.planes, self.shuffle, &mut self.rng);
    }
}
