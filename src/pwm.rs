//! Counter based complementary PWM with deadtime insertion.
//!
//! A free running counter ticks once per sample and compares against the
//! on-time derived from the duty command. The raw high side command is
//! complemented for the low side, and every edge of the raw command blanks
//! both switches for `dead_counts` ticks:
//!
//! ```text
//!   cnt        0   1   2   3   4   5   6   7   8   9   0   1
//!   raw_high   1   1   1   1   0   0   0   0   0   0   1   1
//!   high       0   1   1   1   0   0   0   0   0   0   0   1
//!   low        0   0   0   0   0   1   1   1   1   1   0   0
//!              |<>|            |<>|                    |<>|
//!              dead            dead                    dead
//! ```
use crate::util::{floor_to_count, round_to_count};

/// Used when the switching frequency or sample time is unusable
pub const DEFAULT_PERIOD_COUNTS: u32 = 100;
/// The shortest period that can hold both an on and an off tick
pub const MIN_PERIOD_COUNTS: u32 = 2;

/// Period and deadtime expressed in sample ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    period_counts: u32,
    dead_counts: u32,
    // Derivation substituted a default or clamped a value
    adjusted: bool,
}

impl Timing {
    /// Converts the switching frequency (Hz), sample time (s) and deadtime (s)
    /// into tick counts. Never fails, degenerate inputs fall back to safe
    /// values and set [`Timing::adjusted`].
    pub fn derive(ts: f32, fsw: f32, deadtime_s: f32) -> Self {
        let mut adjusted = false;

        let period_counts = if ts > 0. && fsw > 0. {
            let counts = round_to_count(1. / (fsw * ts));
            if counts < MIN_PERIOD_COUNTS {
                log::warn!(
                    "Period of {} counts too short, using {}",
                    counts,
                    MIN_PERIOD_COUNTS
                );
                adjusted = true;
                MIN_PERIOD_COUNTS
            } else {
                counts
            }
        } else {
            log::warn!(
                "Unusable timing, fsw: {}, ts: {}, using {} period counts",
                fsw,
                ts,
                DEFAULT_PERIOD_COUNTS
            );
            adjusted = true;
            DEFAULT_PERIOD_COUNTS
        };

        let dead_counts = if deadtime_s > 0. && ts > 0. {
            let counts = round_to_count(deadtime_s / ts);
            let limit = period_counts / 2;
            if counts > limit {
                log::warn!("Deadtime of {} counts capped at {}", counts, limit);
                adjusted = true;
                limit
            } else {
                counts
            }
        } else {
            if deadtime_s != 0. {
                log::warn!("Unusable deadtime: {}, deadtime disabled", deadtime_s);
                adjusted = true;
            }
            0
        };

        log::debug!(
            "Derived period counts: {}, dead counts: {}",
            period_counts,
            dead_counts
        );

        Timing {
            period_counts,
            dead_counts,
            adjusted,
        }
    }

    pub fn period_counts(&self) -> u32 {
        self.period_counts
    }

    pub fn dead_counts(&self) -> u32 {
        self.dead_counts
    }

    pub fn adjusted(&self) -> bool {
        self.adjusted
    }
}

/// Gate drive levels, 1.0 is on and 0.0 is off
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateSignals {
    pub high: f32,
    pub low: f32,
}

impl GateSignals {
    const OFF: GateSignals = GateSignals { high: 0., low: 0. };

    fn complementary(high: bool) -> Self {
        if high {
            GateSignals { high: 1., low: 0. }
        } else {
            GateSignals { high: 0., low: 1. }
        }
    }
}

impl From<GateSignals> for [f32; 2] {
    fn from(gates: GateSignals) -> Self {
        [gates.high, gates.low]
    }
}

#[derive(Debug, Clone)]
pub struct Pwm {
    timing: Timing,
    cnt: u32,
    // Un-blanked high side command from the previous tick
    last_raw_high: bool,
    // Ticks of blanking left
    dt_counter: u32,
}

impl Pwm {
    pub fn new(timing: Timing) -> Self {
        Pwm {
            timing,
            cnt: 0,
            last_raw_high: false,
            dt_counter: 0,
        }
    }

    /// Advances the carrier by one tick and returns the gate levels for it.
    pub fn update(&mut self, duty: f32) -> GateSignals {
        if self.timing.period_counts < MIN_PERIOD_COUNTS {
            self.timing.period_counts = MIN_PERIOD_COUNTS;
        }
        let period = self.timing.period_counts;

        let on_counts = floor_to_count(duty * period as f32).min(period);
        let raw_high = self.cnt < on_counts;

        let gates = if self.timing.dead_counts > 0 {
            if raw_high != self.last_raw_high {
                log::trace!("Edge at count {}, blanking", self.cnt);
                self.dt_counter = self.timing.dead_counts;
            }
            self.last_raw_high = raw_high;

            if self.dt_counter > 0 {
                self.dt_counter -= 1;
                GateSignals::OFF
            } else {
                GateSignals::complementary(raw_high)
            }
        } else {
            GateSignals::complementary(raw_high)
        };

        self.cnt += 1;
        if self.cnt >= period {
            self.cnt = 0;
        }

        gates
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Count the next update will compare against
    pub fn counter(&self) -> u32 {
        self.cnt
    }

    pub fn blanking_remaining(&self) -> u32 {
        self.dt_counter
    }

    pub fn last_raw_high(&self) -> bool {
        self.last_raw_high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pwm(period_counts: u32, dead_counts: u32) -> Pwm {
        Pwm::new(Timing {
            period_counts,
            dead_counts,
            adjusted: false,
        })
    }

    fn levels(gates: GateSignals) -> (u8, u8) {
        (gates.high as u8, gates.low as u8)
    }

    #[test]
    fn period_from_frequency() {
        let timing = Timing::derive(1E-5, 10E3, 0.);
        assert_eq!(timing.period_counts(), 10);
        assert_eq!(timing.dead_counts(), 0);
        assert!(!timing.adjusted());
    }

    #[test]
    fn period_floor_and_fallback() {
        // 1 / (1E5 * 1E-5) = 1 count
        let timing = Timing::derive(1E-5, 1E5, 0.);
        assert_eq!(timing.period_counts(), MIN_PERIOD_COUNTS);
        assert!(timing.adjusted());

        for (ts, fsw) in [(0., 10E3), (1E-5, 0.), (-1E-5, 10E3), (f32::NAN, 10E3)] {
            let timing = Timing::derive(ts, fsw, 100E-9);
            assert_eq!(timing.period_counts(), DEFAULT_PERIOD_COUNTS);
            assert!(timing.adjusted());
        }
    }

    #[test]
    fn deadtime_rounding() {
        // 100ns is a hundredth of a tick at 10us
        assert_eq!(Timing::derive(1E-5, 10E3, 100E-9).dead_counts(), 0);
        // One tick at 100ns
        let timing = Timing::derive(1E-7, 10E3, 100E-9);
        assert_eq!(timing.period_counts(), 1000);
        assert_eq!(timing.dead_counts(), 1);
        assert_eq!(Timing::derive(1E-7, 10E3, 300E-9).dead_counts(), 3);
    }

    #[test]
    fn deadtime_capped_at_half_period() {
        let timing = Timing::derive(1E-5, 10E3, 1E-3);
        assert_eq!(timing.period_counts(), 10);
        assert_eq!(timing.dead_counts(), 5);
        assert!(timing.adjusted());

        // Odd period rounds the cap down
        let timing = Timing::derive(1E-5, 1E5 / 7., 1E-3);
        assert_eq!(timing.period_counts(), 7);
        assert_eq!(timing.dead_counts(), 3);
    }

    #[test]
    fn deadtime_disabled() {
        assert_eq!(Timing::derive(0., 10E3, 100E-9).dead_counts(), 0);
        let timing = Timing::derive(1E-5, 10E3, -1E-6);
        assert_eq!(timing.dead_counts(), 0);
        assert!(timing.adjusted());
    }

    #[test]
    fn raw_gating_without_deadtime() {
        let mut pwm = pwm(10, 0);
        let gates: Vec<_> = (0..20).map(|_| levels(pwm.update(0.3))).collect();
        for (tick, gate) in gates.iter().enumerate() {
            if tick % 10 < 3 {
                assert_eq!(*gate, (1, 0), "tick {}", tick);
            } else {
                assert_eq!(*gate, (0, 1), "tick {}", tick);
            }
        }
        assert_eq!(pwm.blanking_remaining(), 0);
    }

    #[test]
    fn blanking_on_both_edges() {
        let mut pwm = pwm(10, 1);
        let expected = [
            (0, 0), // rising edge at count 0
            (1, 0),
            (1, 0),
            (1, 0),
            (0, 0), // falling edge at count 4
            (0, 1),
            (0, 1),
            (0, 1),
            (0, 1),
            (0, 1),
            (0, 0), // rising edge after wrap
            (1, 0),
        ];
        for (tick, want) in expected.iter().enumerate() {
            assert_eq!(levels(pwm.update(0.4)), *want, "tick {}", tick);
        }
    }

    #[test]
    fn blanking_spans_dead_counts() {
        let mut pwm = pwm(20, 3);
        let gates: Vec<_> = (0..20).map(|_| levels(pwm.update(0.5))).collect();
        assert_eq!(&gates[0..3], &[(0, 0); 3]);
        assert_eq!(&gates[3..10], &[(1, 0); 7]);
        assert_eq!(&gates[10..13], &[(0, 0); 3]);
        assert_eq!(&gates[13..20], &[(0, 1); 7]);
    }

    #[test]
    fn new_edge_rearms_blanking() {
        let mut pwm = pwm(10, 5);
        // Rising edge at 0 then falling at 2 while still blanked
        for _ in 0..2 {
            assert_eq!(levels(pwm.update(0.2)), (0, 0));
        }
        assert_eq!(pwm.blanking_remaining(), 3);
        assert_eq!(levels(pwm.update(0.2)), (0, 0));
        assert_eq!(pwm.blanking_remaining(), 4);
        assert!(!pwm.last_raw_high());
    }

    #[test]
    fn counter_wraps_at_period() {
        let mut pwm = pwm(7, 0);
        for tick in 0..30 {
            assert_eq!(pwm.counter(), tick % 7);
            pwm.update(0.5);
        }
    }

    #[test]
    fn on_counts_clamped() {
        let mut pwm = pwm(4, 0);
        for _ in 0..8 {
            assert_eq!(levels(pwm.update(1.5)), (1, 0));
        }
        for _ in 0..8 {
            assert_eq!(levels(pwm.update(-0.5)), (0, 1));
        }
        for _ in 0..8 {
            assert_eq!(levels(pwm.update(f32::NAN)), (0, 1));
        }
    }

    #[test]
    fn degenerate_period_refloored() {
        let mut pwm = pwm(0, 0);
        pwm.update(0.5);
        assert_eq!(pwm.timing().period_counts(), MIN_PERIOD_COUNTS);
        assert_eq!(pwm.counter(), 1);
        pwm.update(0.5);
        assert_eq!(pwm.counter(), 0);
    }

    #[test]
    fn gate_vector() {
        let gates: [f32; 2] = GateSignals::complementary(true).into();
        assert_eq!(gates, [1., 0.]);
    }
}
