//! Free-running control-rate LFO for modulation CV.
//!
//! Tick-driven with an explicit `dt` so the polling loop, not a sample
//! clock, sets the rate. Output is bipolar -1.0..=1.0; scale with
//! [`Lfo::volts`] or shift with [`bipolar_to_unipolar`] as the target
//! input expects.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LfoShape {
    Sine,
    Triangle,
    /// Rising ramp with an instant reset.
    Saw,
    Square,
    /// New random level each cycle, held until the next wrap.
    SampleHold,
}

#[derive(Debug, Clone)]
pub struct Lfo {
    shape: LfoShape,
    frequency_hz: f32,
    phase: f32,
    held: f32,
    rng: SmallRng,
}

impl Lfo {
    pub fn new(shape: LfoShape, frequency_hz: f32, seed: u64) -> Self {
        Self {
            shape,
            frequency_hz: frequency_hz.max(0.0),
            phase: 0.0,
            held: 0.0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn shape(&self) -> LfoShape {
        self.shape
    }

    pub fn set_shape(&mut self, shape: LfoShape) {
        self.shape = shape;
    }

    pub fn set_frequency(&mut self, frequency_hz: f32) {
        self.frequency_hz = frequency_hz.max(0.0);
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Advance by `dt` seconds and return the bipolar level.
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.phase += self.frequency_hz * dt.max(0.0);
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
            self.held = self.rng.gen_range(-1.0..=1.0);
        }
        match self.shape {
            LfoShape::Sine => (self.phase * std::f32::consts::TAU).sin(),
            LfoShape::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
            LfoShape::Saw => 2.0 * self.phase - 1.0,
            LfoShape::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            LfoShape::SampleHold => self.held,
        }
    }

    /// Advance and scale to plus/minus `amplitude_volts`.
    pub fn volts(&mut self, dt: f32, amplitude_volts: f32) -> f32 {
        self.tick(dt) * amplitude_volts
    }
}

/// Map -1.0..=1.0 onto 0.0..=1.0 for unipolar destinations.
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Map 0.0..=1.0 back onto -1.0..=1.0.
#[inline]
pub fn unipolar_to_bipolar(unipolar: f32) -> f32 {
    (unipolar * 2.0) - 1.0
}
