//! Fixed parameter set of one converter instance.
use crate::converter::Converter;
use crate::pi;
use crate::pwm::Timing;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    /// Proportional gain, duty per volt
    #[cfg_attr(feature = "serde", serde(rename = "Kp"))]
    pub kp: f32,
    /// Integral gain, duty per volt-second
    #[cfg_attr(feature = "serde", serde(rename = "Ki"))]
    pub ki: f32,
    /// Seconds between steps
    #[cfg_attr(feature = "serde", serde(rename = "Ts"))]
    pub ts: f32,
    /// Hertz
    pub fsw: f32,
    /// Volts
    #[cfg_attr(feature = "serde", serde(rename = "Vref"))]
    pub vref: f32,
    /// Seconds, zero disables deadtime insertion
    pub deadtime_s: f32,
}

impl Parameters {
    pub fn new(kp: f32, ki: f32, ts: f32, fsw: f32, vref: f32, deadtime_s: f32) -> Self {
        Parameters {
            kp,
            ki,
            ts,
            fsw,
            vref,
            deadtime_s,
        }
    }

    pub fn constants(&self) -> pi::Constants {
        pi::Constants::new(self.kp, self.ki)
    }

    pub fn timing(&self) -> Timing {
        Timing::derive(self.ts, self.fsw, self.deadtime_s)
    }

    /// Realize an initialized `Converter` from the parameters
    pub fn realize(&self) -> Converter {
        Converter::new(*self)
    }

    pub fn set_gains(&mut self, kp: f32, ki: f32) -> &mut Self {
        self.kp = kp;
        self.ki = ki;
        self
    }
    pub fn set_sample_time(&mut self, ts: f32) -> &mut Self {
        self.ts = ts;
        self
    }
    pub fn set_switching_frequency(&mut self, fsw: f32) -> &mut Self {
        self.fsw = fsw;
        self
    }
    pub fn set_reference(&mut self, vref: f32) -> &mut Self {
        self.vref = vref;
        self
    }
    pub fn set_deadtime(&mut self, deadtime_s: f32) -> &mut Self {
        self.deadtime_s = deadtime_s;
        self
    }
}

impl Default for Parameters {
    fn default() -> Self {
        // 10 kHz carrier sampled at 100 kHz, 100 ns deadtime
        Parameters::new(0.1, 1., 1E-5, 10E3, 50., 100E-9)
    }
}
