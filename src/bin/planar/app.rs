//! Planar - simulator state and the polling loop.

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;

use planar_cv::engine::Controller;
use planar_cv::io::sim::SimCv;
use planar_cv::io::{ButtonEvent, InputFrame};
use planar_cv::patch::{load_or_default, save_bank, DebouncedSaver};

use crate::ui;

/// Loop ticks of knob silence before a dirty patch is written out.
/// At ~60 ticks/s this is about two seconds.
const SAVE_DEBOUNCE_TICKS: u64 = 120;

/// One knob detent on the note knob (17 positions: rest + 16 degrees).
const NOTE_KNOB_STEP: f32 = 1.0 / 17.0;

/// One knob detent on the plane knob (8 positions).
const PLANE_KNOB_STEP: f32 = 1.0 / 7.0;

/// Simulator application: the controller plus virtual panel state.
pub struct Planar {
    controller: Controller,
    cv: SimCv,
    knob_note: f32,
    knob_planes: f32,
    root_volts: f32,
    bpm: f64,
    last_pulse: Instant,
    bank_path: Option<PathBuf>,
    saver: DebouncedSaver,
    tick: u64,
    status: String,
    should_quit: bool,
}

impl Planar {
    pub fn new(bank_path: Option<PathBuf>) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let mut controller = Controller::new(seed);

        let mut status = String::from("fresh patch");
        if let Some(path) = &bank_path {
            let bank = load_or_default(path);
            controller.sequencer_mut().apply_bank(&bank);
            status = format!("bank: {}", path.display());
        }

        Self {
            controller,
            cv: SimCv::new(),
            // Park the note knob inside the degree-0 band so the first
            // detent moves within the scale instead of into the rest zone
            knob_note: NOTE_KNOB_STEP * 1.5,
            knob_planes: 0.0,
            root_volts: 0.0,
            bpm: 120.0,
            last_pulse: Instant::now(),
            bank_path,
            saver: DebouncedSaver::new(SAVE_DEBOUNCE_TICKS),
            tick: 0,
            status,
            should_quit: false,
        }
    }

    /// Run the polling loop until quit.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            let mut frame = InputFrame {
                knob_note: self.knob_note,
                knob_planes: self.knob_planes,
                root_volts: self.root_volts,
                ..Default::default()
            };

            // Keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, &mut frame);
                    }
                }
            }

            // Internal clock
            if self.last_pulse.elapsed() >= self.pulse_interval() {
                frame.clock_rising = true;
                self.last_pulse = Instant::now();
            }

            let epoch_before = self.controller.patch_epoch();
            self.controller.tick(&frame, &mut self.cv);
            self.tick += 1;

            if self.controller.patch_epoch() != epoch_before {
                self.saver.touch(self.tick);
            }
            if self.saver.due(self.tick) {
                self.write_bank()?;
            }

            let view = self.controller.view();
            terminal.draw(|f| {
                ui::draw(f, &view, &self.cv, self.bpm, self.root_volts, &self.status)
            })?;
        }
        Ok(())
    }

    fn pulse_interval(&self) -> Duration {
        // One pulse per eighth note
        Duration::from_secs_f64(30.0 / self.bpm)
    }

    fn handle_key(&mut self, key: KeyCode, frame: &mut InputFrame) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => frame.button_a = ButtonEvent::Short,
            KeyCode::Char('s') => frame.button_a = ButtonEvent::Long,
            KeyCode::Char('r') => frame.button_b = ButtonEvent::Short,
            KeyCode::Char('m') => frame.button_b = ButtonEvent::Long,
            KeyCode::Left => {
                self.knob_note = (self.knob_note - NOTE_KNOB_STEP).max(0.0);
                frame.knob_note = self.knob_note;
            }
            KeyCode::Right => {
                self.knob_note = (self.knob_note + NOTE_KNOB_STEP).min(1.0);
                frame.knob_note = self.knob_note;
            }
            KeyCode::Down => {
                self.knob_planes = (self.knob_planes - PLANE_KNOB_STEP).max(0.0);
                frame.knob_planes = self.knob_planes;
            }
            KeyCode::Up => {
                self.knob_planes = (self.knob_planes + PLANE_KNOB_STEP).min(1.0);
                frame.knob_planes = self.knob_planes;
            }
            KeyCode::Char('[') => {
                self.root_volts -= 1.0 / 12.0;
                frame.root_volts = self.root_volts;
            }
            KeyCode::Char(']') => {
                self.root_volts += 1.0 / 12.0;
                frame.root_volts = self.root_volts;
            }
            KeyCode::Char(' ') => frame.clock_rising = true,
            KeyCode::Char('-') => self.bpm = (self.bpm - 5.0).max(20.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.bpm = (self.bpm + 5.0).min(300.0),
            _ => {}
        }
    }

    fn write_bank(&mut self) -> EyreResult<()> {
        if let Some(path) = &self.bank_path {
            let bank = self.controller.sequencer().to_bank();
            save_bank(path, &bank)
                .wrap_err_with(|| format!("saving bank to {}", path.display()))?;
            self.status = format!("saved {}", path.display());
        }
        Ok(())
    }
}
