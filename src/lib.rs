//! Fixed-rate PI voltage-mode control of a half-bridge converter, with a
//! counter based complementary PWM and deadtime insertion.
#![cfg_attr(not(test), no_std)]
pub mod converter;
pub mod params;
pub mod pi;
pub mod pwm;
mod util;

pub use converter::{Converter, Lifecycle, Measurements};
pub use params::Parameters;
pub use pwm::GateSignals;
