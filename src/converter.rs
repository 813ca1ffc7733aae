//! One controller and PWM generator pair, driven at a fixed rate by an
//! external scheduler.
use crate::params::Parameters;
use crate::pi::{self, Pi};
use crate::pwm::{GateSignals, Pwm};

/// Volts and amps sampled at the start of a step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
    pub vin: f32,
    pub iin: f32,
    pub vout: f32,
    pub iout: f32,
}

/// Host ordering is `[vin, iin, vout, iout]`
impl From<[f32; 4]> for Measurements {
    fn from(u: [f32; 4]) -> Self {
        Measurements {
            vin: u[0],
            iin: u[1],
            vout: u[2],
            iout: u[3],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    pub integral_limited: bool,
    pub duty_limited: bool,
    /// Both gates were held off this step
    pub blanking: bool,
}

/// Lifecycle a fixed-step simulation or code generation host drives.
///
/// `initialize` is called once before the first `step`, `step` exactly once
/// per sample period, and `terminate` once at shutdown.
pub trait Lifecycle {
    fn initialize(&mut self);
    /// `u` is `[vin, iin, vout, iout]`, the result is `[gate_high, gate_low]`
    fn step(&mut self, u: &[f32; 4]) -> [f32; 2];
    fn terminate(&mut self);
}

#[derive(Debug, Clone)]
pub struct Converter {
    params: Parameters,
    pi: Pi,
    pwm: Pwm,
    status: Status,
}

impl Converter {
    pub fn new(params: Parameters) -> Self {
        Converter {
            params,
            pi: Pi::new(params.constants()),
            pwm: Pwm::new(params.timing()),
            status: Status::default(),
        }
    }

    /// Runs the voltage loop and the PWM carrier for one sample.
    pub fn update(&mut self, measurements: Measurements) -> GateSignals {
        log::trace!("Regulating for: {:?}", measurements);
        let duty = self
            .pi
            .update(measurements.vout, self.params.vref, self.params.ts);
        let gates = self.pwm.update(duty);

        let pi::Status {
            integral_limited,
            duty_limited,
        } = self.pi.status();
        self.status = Status {
            integral_limited,
            duty_limited,
            blanking: gates.high == 0. && gates.low == 0.,
        };

        gates
    }

    /// Derives the PWM counts again and zeroes all state.
    pub fn reset(&mut self) {
        self.pi.reset();
        self.pwm = Pwm::new(self.params.timing());
        self.status = Status::default();
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }
    pub fn controller(&self) -> &Pi {
        &self.pi
    }
    pub fn pwm(&self) -> &Pwm {
        &self.pwm
    }
    /// Duty command of the last step
    pub fn duty(&self) -> f32 {
        self.pi.output()
    }
    pub fn status(&self) -> Status {
        self.status
    }
}

impl Lifecycle for Converter {
    fn initialize(&mut self) {
        log::debug!("Initializing with: {:?}", self.params);
        self.reset();
    }

    fn step(&mut self, u: &[f32; 4]) -> [f32; 2] {
        self.update(Measurements::from(*u)).into()
    }

    fn terminate(&mut self) {}
}
