//! In-memory stand-ins for the module hardware, used by the tests and
//! the terminal simulator.

use std::collections::VecDeque;

use super::{CvSink, InputFrame, InputSource, OutputChannel};

/// Replays a queue of prepared input frames, then idles.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn push(&mut self, frame: InputFrame) {
        self.frames.push_back(frame);
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputFrame {
        self.frames.pop_front().unwrap_or_default()
    }
}

/// Records the last written voltage and gate state per jack.
#[derive(Debug, Clone, Default)]
pub struct SimCv {
    pub voltages: [f32; 6],
    pub gates: [bool; 6],
    /// Count of voltage writes, for asserting emission behavior.
    pub writes: u64,
}

impl SimCv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn voltage_of(&self, channel: OutputChannel) -> f32 {
        self.voltages[channel.index()]
    }

    pub fn is_on(&self, channel: OutputChannel) -> bool {
        self.gates[channel.index()]
    }

    pub fn all_off(&self) -> bool {
        self.gates.iter().all(|g| !g)
    }
}

impl CvSink for SimCv {
    fn voltage(&mut self, channel: OutputChannel, volts: f32) {
        self.voltages[channel.index()] = volts;
        self.writes += 1;
    }

    fn on(&mut self, channel: OutputChannel) {
        self.gates[channel.index()] = true;
    }

    fn off(&mut self, channel: OutputChannel) {
        self.gates[channel.index()] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_input_drains_then_idles() {
        let mut input = ScriptedInput::new([InputFrame {
            clock_rising: true,
            ..Default::default()
        }]);
        assert!(input.poll().clock_rising);
        assert!(!input.poll().clock_rising);
    }

    #[test]
    fn sim_cv_records_writes() {
        let mut cv = SimCv::new();
        cv.voltage(OutputChannel::Cv3, 2.5);
        cv.on(OutputChannel::Cv3);
        assert_eq!(cv.voltage_of(OutputChannel::Cv3), 2.5);
        assert!(cv.is_on(OutputChannel::Cv3));
        assert_eq!(cv.writes, 1);
        cv.off(OutputChannel::Cv3);
        assert!(cv.all_off());
    }
}
