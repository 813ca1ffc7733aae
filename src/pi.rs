//! Voltage-mode PI law producing a duty command.
use crate::util::{clamp, clamp_f64};

/// Bounds of the integrator, used for anti-windup
pub const INTEGRAL_MIN: f64 = 0.;
pub const INTEGRAL_MAX: f64 = 1.;
/// Duty is never allowed to reach 0 or 1
pub const DUTY_MIN: f32 = 0.02;
pub const DUTY_MAX: f32 = 0.98;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constants {
    pub kp: f32,
    pub ki: f32,
}

impl Constants {
    pub fn new(kp: f32, ki: f32) -> Self {
        Constants { kp, ki }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Status {
    /// The integrator was clamped during the last update
    pub integral_limited: bool,
    /// The duty command was clamped during the last update
    pub duty_limited: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct Pi {
    constants: Constants,
    // Increments of Ki * Ts * err are far below f32 resolution near 0.5
    integral: f64,
    // The duty calculated from the last update
    output: f32,
    status: Status,
}

impl Pi {
    pub fn new(constants: Constants) -> Self {
        Pi {
            constants,
            integral: 0.,
            output: DUTY_MIN,
            status: Status::default(),
        }
    }

    /// Runs one sample of the control law and returns the duty, always in
    /// `[DUTY_MIN, DUTY_MAX]`. `dt` is the fixed sample period. Non-finite
    /// measurements go through the same clamps, a NaN collapses both the
    /// integrator and the duty to their lower bounds.
    pub fn update(&mut self, val: f32, setpoint: f32, dt: f32) -> f32 {
        let Constants { kp, ki } = self.constants;

        let err = f64::from(setpoint) - f64::from(val);

        let integral = self.integral + f64::from(ki) * f64::from(dt) * err;
        self.integral = clamp_f64(integral, INTEGRAL_MIN, INTEGRAL_MAX);
        self.status.integral_limited = self.integral != integral;
        if self.status.integral_limited {
            log::trace!("Integral limiter triggered");
        }

        let duty = (f64::from(kp) * err + self.integral) as f32;
        self.output = clamp(duty, DUTY_MIN, DUTY_MAX);
        self.status.duty_limited = self.output != duty;
        if self.status.duty_limited {
            log::trace!("Duty limiter triggered, raw duty was: {}", duty);
        }

        self.output
    }

    pub fn reset(&mut self) {
        self.integral = 0.;
        self.output = DUTY_MIN;
        self.status = Status::default();
    }

    pub fn output(&self) -> f32 {
        self.output
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn status(&self) -> Status {
        self.status
    }
}
