//! The chord decoder: decides when a chord is complete and layers double-tap and hold-to-repeat
//! on top.
//!
//! Chord codes grow as more keys are held, so a rising code is a chord being built and a falling
//! code is a chord being released. The action fires once, on the first falling edge, for the
//! peak code reached. Re-pressing the same chord within [`DOUBLE_TAP_MS`] of its firing arms
//! hold-to-repeat: after [`HOLD_REPEAT_MS`] of holding, every further delivery of the unchanged
//! code fires again.
//!
//! There is no timer. Hold-to-repeat only progresses when the device keeps re-sending the held
//! chord, so the repeat rate is the device's message rate.

use web_time::{Duration, Instant};

/// A second press of the fired chord within this window is a double tap.
pub const DOUBLE_TAP_MS: u128 = 300;
/// After a double tap, holding for longer than this starts repeating.
pub const HOLD_REPEAT_MS: u128 = 500;

/// What the caller should do after feeding one chord code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Chord code whose action should be dispatched now, if any.
    pub fire: Option<u8>,
    /// Whether the decoder is in a double-tap/hold state.
    pub repeating: bool,
}

impl Step {
    fn idle() -> Self {
        Step {
            fire: None,
            repeating: false,
        }
    }
}

/// Per-device decoder state. Create one per device stream.
#[derive(Debug, Clone)]
pub struct DecoderState {
    /// Code seen on the previous call.
    last: u8,
    /// Set once a release has fired; suppresses firing again while the release keeps descending.
    marked: bool,
    /// Code of the most recent firing.
    fired_at: u8,
    /// 1 after a single firing, 2 once a double tap is detected.
    nclick: u8,
    t1: Instant,
    t2: Instant,
}

impl DecoderState {
    pub fn new(now: Instant) -> Self {
        Self {
            last: 0,
            marked: false,
            fired_at: 0,
            nclick: 0,
            t1: now,
            t2: now,
        }
    }

    pub fn nclick(&self) -> u8 {
        self.nclick
    }

    /// Feed the chord code of one device message received at `now`.
    pub fn step(&mut self, code: u8, now: Instant) -> Step {
        let mut fire = None;

        if code < self.last && !self.marked {
            // First falling edge: the chord peaked at `last`.
            fire = Some(self.last);
            self.marked = true;
            if self.fired_at != self.last {
                self.nclick = 1;
                self.t1 = now;
            }
            self.fired_at = self.last;
        }

        if code < self.last {
            self.last = code;
            return Step {
                fire,
                repeating: false,
            };
        }

        if code != self.fired_at {
            self.marked = false;
            self.last = code;
            return Step::idle();
        }

        if code > self.last {
            // The chord that fired last is being pressed again.
            self.marked = false;
            self.t2 = now;
            let elapsed = ms_between(self.t1, self.t2);
            self.nclick = if elapsed < DOUBLE_TAP_MS { 2 } else { 1 };
            self.last = code;
            if self.nclick == 1 {
                self.t1 = now;
            }
            log::trace!("re-press of {code:#04x} after {elapsed}ms, nclick {}", self.nclick);
            return Step {
                fire: None,
                repeating: true,
            };
        }

        if self.nclick == 2 {
            // Held since the second tap.
            self.t1 = now;
            let fire = (ms_between(self.t2, self.t1) > HOLD_REPEAT_MS).then_some(code);
            return Step {
                fire,
                repeating: true,
            };
        }

        Step::idle()
    }
}

fn ms_between(earlier: Instant, later: Instant) -> u128 {
    later
        .checked_duration_since(earlier)
        .unwrap_or(Duration::ZERO)
        .as_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Clock {
        start: Instant,
        ms: u64,
    }

    impl Clock {
        fn new() -> Self {
            Self {
                start: Instant::now(),
                ms: 0,
            }
        }
        fn at(&mut self, advance_ms: u64) -> Instant {
            self.ms += advance_ms;
            self.start + Duration::from_millis(self.ms)
        }
    }

    fn fired(steps: &[Step]) -> Vec<u8> {
        steps.iter().filter_map(|s| s.fire).collect()
    }

    #[test]
    fn release_fires_peak_once() {
        let mut clk = Clock::new();
        let mut st = DecoderState::new(clk.at(0));
        let steps: Vec<Step> = [0x01, 0x03, 0x07, 0x0f, 0x07, 0x03, 0x01, 0x00]
            .into_iter()
            .map(|c| st.step(c, clk.at(10)))
            .collect();
        assert_eq!(fired(&steps), vec![0x0f]);
        assert!(steps.iter().all(|s| !s.repeating));
    }

    #[test]
    fn every_falling_pair_fires_the_higher_code() {
        for a in 1..=255u8 {
            for b in [0, a / 2, a - 1] {
                let mut clk = Clock::new();
                let mut st = DecoderState::new(clk.at(0));
                assert_eq!(st.step(a, clk.at(5)).fire, None);
                assert_eq!(st.step(b, clk.at(5)).fire, Some(a), "a={a:#x} b={b:#x}");
            }
        }
    }

    #[test]
    fn quick_repress_is_a_double_tap() {
        let mut clk = Clock::new();
        let mut st = DecoderState::new(clk.at(0));
        st.step(0x01, clk.at(10));
        st.step(0x03, clk.at(10));
        assert_eq!(st.step(0x01, clk.at(10)).fire, Some(0x03));
        assert_eq!(st.nclick(), 1);

        assert_eq!(st.step(0x01, clk.at(50)), Step::idle());
        let s = st.step(0x03, clk.at(50));
        assert_eq!(s, Step { fire: None, repeating: true });
        assert_eq!(st.nclick(), 2);
    }

    #[test]
    fn slow_repress_is_not_a_double_tap() {
        let mut clk = Clock::new();
        let mut st = DecoderState::new(clk.at(0));
        st.step(0x03, clk.at(10));
        assert_eq!(st.step(0x00, clk.at(10)).fire, Some(0x03));
        let s = st.step(0x03, clk.at(400));
        assert!(s.repeating);
        assert_eq!(s.fire, None);
        assert_eq!(st.nclick(), 1);
        // Holding without a double tap never repeats.
        let s = st.step(0x03, clk.at(1000));
        assert_eq!(s, Step::idle());
    }

    #[test]
    fn hold_after_double_tap_repeats_past_threshold() {
        let mut clk = Clock::new();
        let mut st = DecoderState::new(clk.at(0));
        st.step(0x03, clk.at(10));
        st.step(0x00, clk.at(10));
        st.step(0x03, clk.at(100));
        assert_eq!(st.nclick(), 2);

        // Under the threshold: armed, but silent.
        let s = st.step(0x03, clk.at(200));
        assert_eq!(s, Step { fire: None, repeating: true });
        // Exactly 500ms is not past the threshold.
        let s = st.step(0x03, clk.at(300));
        assert_eq!(s, Step { fire: None, repeating: true });
        // From 501ms after the second tap, each delivery fires.
        let s = st.step(0x03, clk.at(1));
        assert_eq!(s, Step { fire: Some(0x03), repeating: true });
        let s = st.step(0x03, clk.at(20));
        assert_eq!(s, Step { fire: Some(0x03), repeating: true });
        // Releasing fires once more and leaves the repeat state.
        let s = st.step(0x00, clk.at(20));
        assert_eq!(s, Step { fire: Some(0x03), repeating: false });
    }

    #[test]
    fn different_chord_resets_click_count() {
        let mut clk = Clock::new();
        let mut st = DecoderState::new(clk.at(0));
        st.step(0x03, clk.at(10));
        st.step(0x00, clk.at(10));
        st.step(0x05, clk.at(10));
        assert_eq!(st.step(0x00, clk.at(10)).fire, Some(0x05));
        assert_eq!(st.nclick(), 1);
        // Re-pressing 0x03 is now just a new chord.
        assert_eq!(st.step(0x03, clk.at(10)), Step::idle());
    }

    #[test]
    fn steady_idle_code_does_nothing() {
        let mut clk = Clock::new();
        let mut st = DecoderState::new(clk.at(0));
        for _ in 0..5 {
            assert_eq!(st.step(0x00, clk.at(100)), Step::idle());
        }
    }
}
