mod config;
mod error;
mod grid;
mod simulation;
mod visualisation;
mod wavefield;

use anyhow::Result;
use config::Config;
use grid::Grid1D;
use simulation::{GaussianPulse, Simulation, SimulationParams};
use std::env;

fn main() -> Result<()> {
    // Optional first argument: path to a TOML config. Without one, run
    // the built-in reference parameter set.
    let config = match env::args().nth(1) {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };
    config.print_summary();

    let grid = Grid1D::new(config.grid.nx, config.grid.dx);
    let pulse = GaussianPulse::new(
        config.pulse.center.unwrap_or_else(|| grid.center()),
        config.pulse.width,
        config.pulse.amplitude,
    );
    let params = SimulationParams {
        c: config.simulation.c,
        dt: config.simulation.dt,
        nt: config.simulation.nt,
        report_period: config.simulation.report_period,
    };

    println!("Courant number: {:.2}", params.courant_number(grid.dx));

    let mut sim = Simulation::new(grid, pulse, params)?;
    sim.run_with_visualisation(&config.visualization);

    Ok(())
}
