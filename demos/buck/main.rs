//! Drives the controller the way a fixed-step simulation host would, closing
//! the loop around a simulated buck converter.
//!
//! Run with `RUST_LOG=info cargo run --example buck`.
mod physics;

use buckpwm::{Lifecycle, Parameters};
use physics::{BuckProperties, BuckSimulator};

const SIMULATED_SECONDS: f32 = 2.;
const REPORT_EVERY_SECONDS: f32 = 0.1;

fn main() {
    env_logger::init();

    let params = Parameters::default();
    let mut converter = params.realize();
    let mut buck = BuckSimulator::new(BuckProperties {
        supply_voltage: 100.,
        inductance: 1E-3,
        capacitance: 470E-6,
        load_resistance: 10.,
    });

    let steps = (SIMULATED_SECONDS / params.ts) as u32;
    let report_every = (REPORT_EVERY_SECONDS / params.ts) as u32;

    converter.initialize();
    for step in 0..steps {
        // Halve the load half way through
        if step == steps / 2 {
            log::info!("Load step");
            buck.set_load_resistance(5.);
        }

        let u: [f32; 4] = {
            let m = buck.measurements();
            [m.vin, m.iin, m.vout, m.iout]
        };
        let [high, low] = converter.step(&u);
        buck.set_gates(buckpwm::GateSignals { high, low });
        buck.step(params.ts);

        if step % report_every == 0 {
            log::info!(
                "t: {:.3}s, vout: {:.2}V, duty: {:.3}, status: {:?}",
                step as f32 * params.ts,
                u[2],
                converter.duty(),
                converter.status()
            );
        }
    }
    converter.terminate();
}
