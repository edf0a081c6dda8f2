//! End-to-end checks of the sequencer's contract, driven through the
//! controller with scripted input frames the way the hardware would.

use planar_cv::engine::{Controller, PlanarSequencer};
use planar_cv::io::sim::{ScriptedInput, SimCv};
use planar_cv::io::{ButtonEvent, InputFrame, InputSource, OutputChannel};
use planar_cv::pitch::{RootMode, ROOT_HYSTERESIS_VOLTS};
use planar_cv::sequencing::CONSONANT_OFFSETS;
use planar_cv::{GRID_SLOTS, MAX_PLANES};

#[test]
fn step_count_is_slots_times_planes_for_all_grids() {
    // Sweep a family of grids: every prefix length, alternating rests
    for highest in 0..GRID_SLOTS {
        for planes in 1..=MAX_PLANES {
            let mut seq = PlanarSequencer::new(1);
            for slot in (0..=highest).step_by(2) {
                seq.set_note(slot, 3);
            }
            seq.set_note(highest, 5);
            seq.set_active_planes(planes);

            let expected = (seq.grid().highest_active() + 1) * planes as usize;
            assert_eq!(seq.steps().len(), expected);
        }
    }
}

#[test]
fn slot_zero_survives_any_operation_sequence() {
    let mut seq = PlanarSequencer::new(2);
    seq.set_note(0, 9);
    seq.clear_note(0);
    seq.set_note(4, 2);
    seq.clear_note(4);
    seq.randomize_planes();
    seq.set_shuffle(true);
    seq.randomize_planes();
    seq.reset();
    assert!(seq.grid().get(0).is_some());
}

#[test]
fn randomized_offsets_stay_consonant() {
    let mut seq = PlanarSequencer::new(3);
    for _ in 0..50 {
        seq.randomize_planes();
        for plane in 2..=MAX_PLANES {
            assert!(CONSONANT_OFFSETS.contains(&seq.planes().offset(plane)));
        }
    }
}

#[test]
fn minimal_patch_wraps_after_one_pulse() {
    // Grid [0, -, -, -, -, -, -, -], one plane: a single step
    let mut seq = PlanarSequencer::new(4);
    let mut cv = SimCv::new();
    assert_eq!(seq.steps().len(), 1);
    seq.advance(&mut cv);
    assert_eq!(seq.cursor(), 0);
}

#[test]
fn two_notes_two_planes_order_is_note_major() {
    let mut seq = PlanarSequencer::new(5);
    seq.set_note(1, 3);
    seq.set_active_planes(2);

    let pairs: Vec<(usize, u8)> = seq.steps().iter().map(|s| (s.slot, s.plane)).collect();
    assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 1), (1, 2)]);
}

#[test]
fn root_hysteresis_through_the_controller() {
    let mut controller = Controller::new(6);
    let mut cv = SimCv::new();

    let sample = |volts: f32| InputFrame {
        root_volts: volts,
        ..Default::default()
    };

    controller.tick(&sample(2.0), &mut cv);
    let root = controller.sequencer().root().root();

    // Two wobbles inside the dead band
    controller.tick(&sample(2.0 + ROOT_HYSTERESIS_VOLTS * 0.6), &mut cv);
    assert_eq!(controller.sequencer().root().root(), root);
    controller.tick(&sample(2.0 - ROOT_HYSTERESIS_VOLTS * 0.6), &mut cv);
    assert_eq!(controller.sequencer().root().root(), root);

    // One real move
    controller.tick(&sample(3.0), &mut cv);
    assert_ne!(controller.sequencer().root().root(), root);
}

#[test]
fn scripted_performance_emits_on_every_pulse() {
    let mut controller = Controller::new(7);
    let mut cv = SimCv::new();

    let mut input = ScriptedInput::default();
    // Put a note in slot 1 (select, then sweep the knob), then clock twice
    input.push(InputFrame {
        button_a: ButtonEvent::Short,
        ..Default::default()
    });
    input.push(InputFrame {
        knob_note: 0.3,
        ..Default::default()
    });
    input.push(InputFrame {
        knob_note: 0.6,
        ..Default::default()
    });
    input.push(InputFrame {
        clock_rising: true,
        knob_note: 0.6,
        ..Default::default()
    });
    input.push(InputFrame {
        clock_rising: true,
        knob_note: 0.6,
        ..Default::default()
    });

    for _ in 0..5 {
        let frame = input.poll();
        controller.tick(&frame, &mut cv);
    }

    assert_eq!(controller.sequencer().steps().len(), 2);
    // Two pulses over a two-step ring land back on step 0
    assert_eq!(controller.sequencer().cursor(), 0);
    // Both steps were notes: every jack saw writes and is gated on
    assert_eq!(cv.writes, 12);
    for channel in OutputChannel::ALL {
        assert!(cv.is_on(channel));
    }
}

#[test]
fn long_press_toggles_mode_and_resets_through_the_stack() {
    let mut controller = Controller::new(8);
    let mut cv = SimCv::new();

    controller.tick(
        &InputFrame {
            button_b: ButtonEvent::Long,
            ..Default::default()
        },
        &mut cv,
    );
    assert_eq!(controller.sequencer().root().mode(), RootMode::Diatonic);
    assert_eq!(controller.sequencer().steps().len(), 1);

    controller.tick(
        &InputFrame {
            button_b: ButtonEvent::Long,
            ..Default::default()
        },
        &mut cv,
    );
    assert_eq!(controller.sequencer().root().mode(), RootMode::Chromatic);
}

#[test]
fn legato_rest_keeps_voltages_between_notes() {
    let mut seq = PlanarSequencer::new(9);
    seq.set_note(0, 4);
    seq.set_note(2, 8);
    let mut cv = SimCv::new();

    seq.emit(&mut cv);
    let voltages = cv.voltages;

    seq.advance(&mut cv); // slot 1 is a rest with slot 2 ahead
    assert_eq!(cv.voltages, voltages);
    assert!(OutputChannel::ALL.iter().all(|&c| cv.is_on(c)));

    seq.advance(&mut cv); // slot 2 plays
    assert_ne!(cv.voltages, voltages);
}
