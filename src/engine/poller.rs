//! Input dispatch for the cooperative polling loop.
//!
//! One [`Controller::tick`] per loop iteration: read the frame, mutate
//! the sequencer, emit on clock edges. The controller never touches
//! hardware or the filesystem directly, so the whole control surface is
//! drivable from tests.

use crate::io::{ButtonEvent, CvSink, InputFrame, KnobLatch};
use crate::pitch::RootMode;
use crate::sequencing::Step;
use crate::{GRID_SLOTS, MAX_PLANES};

use super::sequencer::PlanarSequencer;

/// How far a knob must travel before its reading is applied.
const KNOB_PICKUP: f32 = 0.01;

/// Positions on the note knob: one rest position at the bottom of the
/// sweep plus the sixteen degrees.
const NOTE_KNOB_POSITIONS: f32 = 17.0;

/// Read-only snapshot of everything a front end renders.
#[derive(Debug, Clone)]
pub struct PanelView {
    pub grid: [Option<u8>; GRID_SLOTS],
    pub selected_slot: usize,
    pub cursor: usize,
    pub steps: Vec<Step>,
    pub active_planes: u8,
    pub plane_offsets: [u8; (MAX_PLANES - 1) as usize],
    pub shuffle: bool,
    pub root_midi: u8,
    pub root_mode: RootMode,
    pub held: Option<u8>,
}

/// Owns the sequencer plus the per-knob/per-slot edit state, and maps
/// input frames onto sequencer operations:
///
/// - button A short: select the next note slot
/// - button A long:  toggle step shuffle
/// - button B short: randomize planes
/// - button B long:  toggle root mode and reset the patch
/// - note knob:      edit the selected slot (bottom of sweep = rest)
/// - plane knob:     active plane count
/// - clock edge:     advance and emit
#[derive(Debug)]
pub struct Controller {
    seq: PlanarSequencer,
    selected_slot: usize,
    note_knob: KnobLatch,
    plane_knob: KnobLatch,
    patch_epoch: u64,
}

impl Controller {
    pub fn new(seed: u64) -> Self {
        Self {
            seq: PlanarSequencer::new(seed),
            selected_slot: 0,
            note_knob: KnobLatch::new(KNOB_PICKUP),
            plane_knob: KnobLatch::new(KNOB_PICKUP),
            patch_epoch: 0,
        }
    }

    pub fn sequencer(&self) -> &PlanarSequencer {
        &self.seq
    }

    pub fn sequencer_mut(&mut self) -> &mut PlanarSequencer {
        &mut self.seq
    }

    pub fn selected_slot(&self) -> usize {
        self.selected_slot
    }

    /// Bumped on every patch mutation; persistence layers compare this
    /// against their last saved epoch.
    pub fn patch_epoch(&self) -> u64 {
        self.patch_epoch
    }

    /// One iteration of the polling loop.
    pub fn tick(&mut self, frame: &InputFrame, sink: &mut impl CvSink) {
        self.seq.sample_root(frame.root_volts);

        if let Some(value) = self.note_knob.take(frame.knob_note) {
            self.edit_selected_note(value);
        }
        if let Some(value) = self.plane_knob.take(frame.knob_planes) {
            let planes = 1 + (value.clamp(0.0, 1.0) * (MAX_PLANES - 1) as f32).round() as u8;
            if planes != self.seq.planes().active() {
                self.seq.set_active_planes(planes);
                self.patch_epoch += 1;
            }
        }

        match frame.button_a {
            ButtonEvent::Short => {
                self.selected_slot = (self.selected_slot + 1) % GRID_SLOTS;
                // Pick up the knob fresh for the new slot
                self.note_knob.rearm(frame.knob_note);
            }
            ButtonEvent::Long => {
                self.seq.set_shuffle(!self.seq.shuffle());
                self.patch_epoch += 1;
            }
            ButtonEvent::Idle => {}
        }

        match frame.button_b {
            ButtonEvent::Short => {
                self.seq.randomize_planes();
                self.patch_epoch += 1;
            }
            ButtonEvent::Long => {
                self.seq.toggle_root_mode();
                self.seq.reset();
                self.selected_slot = 0;
                self.note_knob.rearm(frame.knob_note);
                self.patch_epoch += 1;
            }
            ButtonEvent::Idle => {}
        }

        if frame.clock_rising {
            self.seq.advance(sink);
        }
    }

    fn edit_selected_note(&mut self, value: f32) {
        let position = ((value.clamp(0.0, 1.0) * NOTE_KNOB_POSITIONS) as usize).min(16);
        if position == 0 {
            self.seq.clear_note(self.selected_slot);
        } else {
            self.seq.set_note(self.selected_slot, (position - 1) as u8);
        }
        self.patch_epoch += 1;
    }

    pub fn view(&self) -> PanelView {
        PanelView {
            grid: *self.seq.grid().slots(),
            selected_slot: self.selected_slot,
            cursor: self.seq.cursor(),
            steps: self.seq.steps().to_vec(),
            active_planes: self.seq.planes().active(),
            plane_offsets: *self.seq.planes().offsets(),
            shuffle: self.seq.shuffle(),
            root_midi: self.seq.root().root(),
            root_mode: self.seq.root().mode(),
            held: self.seq.held(),
        }
    }
}
