// Purpose - the seam between the engine and whatever hardware (or
// simulator) drives it. The engine only ever sees an InputFrame snapshot
// per tick and writes through a CvSink.

pub mod sim;

/// Press duration above which a press counts as long, in milliseconds.
pub const LONG_PRESS_MS: u64 = 600;

/// One of the six CV output jacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChannel {
    Cv1,
    Cv2,
    Cv3,
    Cv4,
    Cv5,
    Cv6,
}

impl OutputChannel {
    pub const ALL: [OutputChannel; 6] = [
        OutputChannel::Cv1,
        OutputChannel::Cv2,
        OutputChannel::Cv3,
        OutputChannel::Cv4,
        OutputChannel::Cv5,
        OutputChannel::Cv6,
    ];

    pub fn index(self) -> usize {
        match self {
            OutputChannel::Cv1 => 0,
            OutputChannel::Cv2 => 1,
            OutputChannel::Cv3 => 2,
            OutputChannel::Cv4 => 3,
            OutputChannel::Cv5 => 4,
            OutputChannel::Cv6 => 5,
        }
    }
}

/// What a button did since the last poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonEvent {
    #[default]
    Idle,
    Short,
    Long,
}

/// Everything the engine reads in one poll cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputFrame {
    /// Rising edge seen on the clock input since the last poll.
    pub clock_rising: bool,
    /// Select / shuffle button.
    pub button_a: ButtonEvent,
    /// Randomize / mode button.
    pub button_b: ButtonEvent,
    /// Note knob, normalized 0.0..=1.0.
    pub knob_note: f32,
    /// Plane-count knob, normalized 0.0..=1.0.
    pub knob_planes: f32,
    /// Root-pitch analog input, volts.
    pub root_volts: f32,
}

/// Produces one input snapshot per poll cycle.
pub trait InputSource {
    fn poll(&mut self) -> InputFrame;
}

/// Where the engine writes pitch CV. Mirrors the hardware jack API:
/// a voltage per jack plus an on/off state for silencing.
pub trait CvSink {
    fn voltage(&mut self, channel: OutputChannel, volts: f32);
    fn on(&mut self, channel: OutputChannel);
    fn off(&mut self, channel: OutputChannel);
}

/// Turns a raw pressed/released level plus a millisecond clock into
/// [`ButtonEvent`]s. Long fires once while the button is still held;
/// the following release is swallowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonTracker {
    pressed_at: Option<u64>,
    long_fired: bool,
}

impl ButtonTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, pressed: bool, now_ms: u64) -> ButtonEvent {
        match (self.pressed_at, pressed) {
            (None, true) => {
                self.pressed_at = Some(now_ms);
                self.long_fired = false;
                ButtonEvent::Idle
            }
            (Some(since), true) => {
                if !self.long_fired && now_ms.saturating_sub(since) >= LONG_PRESS_MS {
                    self.long_fired = true;
                    ButtonEvent::Long
                } else {
                    ButtonEvent::Idle
                }
            }
            (Some(_), false) => {
                let fired = self.long_fired;
                self.pressed_at = None;
                self.long_fired = false;
                if fired {
                    ButtonEvent::Idle
                } else {
                    ButtonEvent::Short
                }
            }
            (None, false) => ButtonEvent::Idle,
        }
    }
}

/// Knob pickup latch. A knob reading is only applied once the knob has
/// moved past a threshold from the last applied position, so switching
/// the edit target does not stomp the new target with a stale position.
#[derive(Debug, Clone, Copy)]
pub struct KnobLatch {
    last: Option<f32>,
    threshold: f32,
}

impl KnobLatch {
    pub fn new(threshold: f32) -> Self {
        Self {
            last: None,
            threshold,
        }
    }

    /// Returns the reading when the knob has actually moved. The first
    /// reading only arms the latch.
    pub fn take(&mut self, value: f32) -> Option<f32> {
        match self.last {
            None => {
                self.last = Some(value);
                None
            }
            Some(last) if (value - last).abs() > self.threshold => {
                self.last = Some(value);
                Some(value)
            }
            Some(_) => None,
        }
    }

    /// Re-arm at the given position without firing.
    pub fn rearm(&mut self, value: f32) {
        self.last = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_press_fires_on_release() {
        let mut b = ButtonTracker::new();
        assert_eq!(b.update(true, 0), ButtonEvent::Idle);
        assert_eq!(b.update(true, 100), ButtonEvent::Idle);
        assert_eq!(b.update(false, 200), ButtonEvent::Short);
    }

    #[test]
    fn long_press_fires_while_held() {
        let mut b = ButtonTracker::new();
        b.update(true, 0);
        assert_eq!(b.update(true, LONG_PRESS_MS - 1), ButtonEvent::Idle);
        assert_eq!(b.update(true, LONG_PRESS_MS), ButtonEvent::Long);
        // Only once per press, and the release is swallowed
        assert_eq!(b.update(true, LONG_PRESS_MS + 500), ButtonEvent::Idle);
        assert_eq!(b.update(false, LONG_PRESS_MS + 600), ButtonEvent::Idle);
    }

    #[test]
    fn idle_stays_idle() {
        let mut b = ButtonTracker::new();
        assert_eq!(b.update(false, 0), ButtonEvent::Idle);
        assert_eq!(b.update(false, 10_000), ButtonEvent::Idle);
    }

    #[test]
    fn knob_latch_arms_silently() {
        let mut k = KnobLatch::new(0.01);
        assert_eq!(k.take(0.7), None);
        assert_eq!(k.take(0.7005), None);
        assert_eq!(k.take(0.75), Some(0.75));
        assert_eq!(k.take(0.75), None);
    }

    #[test]
    fn rearm_requires_fresh_movement() {
        let mut k = KnobLatch::new(0.01);
        k.take(0.2);
        assert_eq!(k.take(0.5), Some(0.5));
        k.rearm(0.9);
        assert_eq!(k.take(0.9), None);
        assert_eq!(k.take(0.5), Some(0.5));
    }
}
