use buckpwm::{GateSignals, Measurements};

#[derive(Debug, Clone, Copy)]
pub struct BuckProperties {
    /// Volts
    pub supply_voltage: f32,
    /// Henries
    pub inductance: f32,
    /// Farads
    pub capacitance: f32,
    /// Ohms
    pub load_resistance: f32,
}

/// Switched model of a synchronous buck. The switch node follows the gates
/// every sample, and the body diodes carry the inductor current while both
/// gates are off.
pub struct BuckSimulator {
    buck: BuckProperties,
    gates: GateSignals,
    inductor_current: f32,
    output_voltage: f32,
}

impl BuckSimulator {
    pub fn new(buck: BuckProperties) -> Self {
        BuckSimulator {
            buck,
            gates: GateSignals { high: 0., low: 0. },
            inductor_current: 0.,
            output_voltage: 0.,
        }
    }

    pub fn step(&mut self, dt: f32) {
        let switch_node = if self.gates.high == 1. {
            self.buck.supply_voltage
        } else if self.gates.low == 1. || self.inductor_current >= 0. {
            // Low side channel or its body diode
            0.
        } else {
            // Reverse current freewheels through the high side diode
            self.buck.supply_voltage
        };

        // Forward Euler on the LC filter
        let load_current = self.output_voltage / self.buck.load_resistance;
        self.inductor_current += (switch_node - self.output_voltage) / self.buck.inductance * dt;
        self.output_voltage +=
            (self.inductor_current - load_current) / self.buck.capacitance * dt;
    }

    pub fn set_gates(&mut self, gates: GateSignals) {
        self.gates = gates;
    }

    pub fn set_load_resistance(&mut self, load_resistance: f32) {
        self.buck.load_resistance = load_resistance;
    }

    pub fn measurements(&self) -> Measurements {
        Measurements {
            vin: self.buck.supply_voltage,
            iin: if self.gates.high == 1. {
                self.inductor_current
            } else {
                0.
            },
            vout: self.output_voltage,
            iout: self.output_voltage / self.buck.load_resistance,
        }
    }
}
