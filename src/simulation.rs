use crate::config::VisualizationConfig;
use crate::error::{SimResult, SimulationError};
use crate::grid::Grid1D;
use crate::visualisation::WaveVisualiser;
use crate::wavefield::Wavefield;
use ndarray::Array1;
use std::thread;
use std::time::Duration;

/// Gaussian displacement pulse sampled onto the grid as the initial
/// condition. Initial velocity is zero.
#[derive(Clone, Debug)]
pub struct GaussianPulse {
    pub center: f64,    // Peak position (m)
    pub width: f64,     // Width parameter (m)
    pub amplitude: f64, // Peak displacement
}

impl GaussianPulse {
    pub fn new(center: f64, width: f64, amplitude: f64) -> Self {
        Self {
            center,
            width,
            amplitude,
        }
    }

    pub fn sample(&self, x: f64) -> f64 {
        // A * exp(-0.5 * ((x - center) / width)^2)
        let arg = (x - self.center) / self.width;
        self.amplitude * (-0.5 * arg * arg).exp()
    }
}

#[derive(Clone, Debug)]
pub struct SimulationParams {
    pub c: f64,               // Wave speed (m/s)
    pub dt: f64,              // Time step (seconds)
    pub nt: usize,            // Number of time steps
    pub report_period: usize, // How many times to report progress
}

impl SimulationParams {
    pub fn new(c: f64, dt: f64, nt: usize) -> Self {
        Self {
            c,
            dt,
            nt,
            report_period: 100,
        }
    }

    /// Courant number `C = c * dt / dx`. The scheme is stable only for
    /// `C <= 1`.
    pub fn courant_number(&self, dx: f64) -> f64 {
        self.c * self.dt / dx
    }

    pub fn total_time(&self) -> f64 {
        // nt * dt
        self.nt as f64 * self.dt
    }
}

/// The full field at one time step, emitted through the pull interface.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub step: usize,
    pub time: f64,
    pub u: Array1<f64>,
}

pub struct Simulation {
    pub grid: Grid1D,
    pub params: SimulationParams,
    pub wavefield: Wavefield,
    courant: f64,
    courant_sq: f64,
    current_timestep: usize,
}

impl Simulation {
    /// Validates the parameters, checks the stability precondition and
    /// samples the initial pulse. Fails before any buffer is stepped.
    pub fn new(grid: Grid1D, pulse: GaussianPulse, params: SimulationParams) -> SimResult<Self> {
        if grid.nx < 3 {
            return Err(SimulationError::InvalidParameter(format!(
                "grid needs at least 3 points, got nx={}",
                grid.nx
            )));
        }
        if grid.dx <= 0.0 {
            return Err(SimulationError::InvalidParameter(format!(
                "grid spacing must be positive, got dx={}",
                grid.dx
            )));
        }
        if params.c <= 0.0 {
            return Err(SimulationError::InvalidParameter(format!(
                "wave speed must be positive, got c={}",
                params.c
            )));
        }
        if params.dt <= 0.0 {
            return Err(SimulationError::InvalidParameter(format!(
                "time step must be positive, got dt={}",
                params.dt
            )));
        }

        let courant = params.courant_number(grid.dx);
        if courant > 1.0 {
            return Err(SimulationError::UnstableConfiguration { courant });
        }

        let mut wavefield = Wavefield::new(grid.nx);
        for i in 0..grid.nx {
            wavefield.u[i] = pulse.sample(grid.x_coord(i));
        }
        // Zero initial velocity: the t-1 buffer starts as a copy of u,
        // never an alias.
        wavefield.u_prev.assign(&wavefield.u);

        Ok(Self {
            grid,
            params,
            wavefield,
            courant,
            // C^2 is constant for the whole run, compute it once.
            courant_sq: courant * courant,
            current_timestep: 0,
        })
    }

    pub fn courant_number(&self) -> f64 {
        self.courant
    }

    pub fn current_time(&self) -> f64 {
        // Return current time based on timestep
        self.current_timestep as f64 * self.params.dt
    }

    pub fn current_step(&self) -> usize {
        self.current_timestep
    }

    pub fn is_finished(&self) -> bool {
        // current_timestep >= nt
        self.current_timestep >= self.params.nt
    }

    /// One leapfrog step. Pure arithmetic, cannot fail.
    pub fn step(&mut self) {
        let nx = self.grid.nx;
        let c2 = self.courant_sq;
        let w = &mut self.wavefield;

        // u_next[i] = 2*u[i] - u_prev[i] + C^2 * (u[i+1] - 2*u[i] + u[i-1])
        for i in 1..nx - 1 {
            w.u_next[i] =
                2.0 * w.u[i] - w.u_prev[i] + c2 * (w.u[i + 1] - 2.0 * w.u[i] + w.u[i - 1]);
        }

        // Fixed ends (reflective): boundaries stay pinned at zero.
        w.u_next[0] = 0.0;
        w.u_next[nx - 1] = 0.0;

        w.rotate();
        self.current_timestep += 1;
    }

    /// Copy of the current field, tagged with step and time.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            step: self.current_timestep,
            time: self.current_time(),
            u: self.wavefield.u.clone(),
        }
    }

    /// Lazy pull sequence over the run: the current state first, then
    /// one snapshot per remaining step (`nt + 1` in total from a fresh
    /// simulation). The consumer picks its own cadence and may stop
    /// early by dropping the iterator.
    pub fn snapshots(&mut self) -> Snapshots<'_> {
        Snapshots {
            sim: self,
            initial_emitted: false,
        }
    }

    /// Headless drive of the time loop with progress reporting.
    pub fn run(&mut self) {
        println!("Starting simulation...");
        println!("Grid: {} points, dx = {} m", self.grid.nx, self.grid.dx);
        println!("Time step: {:.6} s", self.params.dt);
        println!("Total time: {:.3} s", self.params.total_time());
        println!("Number of steps: {}", self.params.nt);

        let report_every = (self.params.nt / self.params.report_period).max(1);
        while !self.is_finished() {
            self.step();

            if self.current_timestep % report_every == 0 {
                println!("Step {}/{}", self.current_timestep, self.params.nt);
            }
        }

        println!("Simulation complete!");
        println!("Final peak |u|: {:.4}", self.wavefield.peak_amplitude());
    }

    /// Drive the time loop, handing every `render_interval`-th snapshot
    /// (including the initial state) to the frame renderer.
    pub fn run_with_visualisation(&mut self, cfg: &VisualizationConfig) {
        println!("Starting simulation with visualisation...");
        println!("Grid: {} points, dx = {} m", self.grid.nx, self.grid.dx);
        println!("Time step: {:.6} s", self.params.dt);
        println!("Total time: {:.3} s", self.params.total_time());
        println!("Rendering every {} steps", cfg.render_interval);

        let visualiser = WaveVisualiser::new(&cfg.output_dir, cfg.image_width, cfg.image_height);
        let x = self.grid.coordinates();
        let domain_width = self.grid.width();
        let nt = self.params.nt;
        let pause = Duration::from_millis(cfg.frame_pause_ms);

        for snapshot in self.snapshots() {
            if snapshot.step % cfg.render_interval == 0 {
                if let Err(e) =
                    visualiser.plot_snapshot(&x, &snapshot.u, domain_width, snapshot.step, snapshot.time)
                {
                    eprintln!("Warning: Failed to visualise: {}", e);
                }
                // Playback pacing between rendered frames.
                thread::sleep(pause);
            }

            if snapshot.step > 0 && snapshot.step % 100 == 0 {
                println!("Step {}/{} (t={:.4}s)", snapshot.step, nt, snapshot.time);
            }
        }

        println!("Simulation complete!");
        println!("Frames saved to {}/", cfg.output_dir);
    }
}

pub struct Snapshots<'a> {
    sim: &'a mut Simulation,
    initial_emitted: bool,
}

impl Iterator for Snapshots<'_> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        if !self.initial_emitted {
            self.initial_emitted = true;
            return Some(self.sim.snapshot());
        }
        if self.sim.is_finished() {
            return None;
        }
        self.sim.step();
        Some(self.sim.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_setup() -> (Grid1D, GaussianPulse, SimulationParams) {
        let grid = Grid1D::new(200, 1.0);
        let pulse = GaussianPulse::new(grid.center(), 5.0, 1.0);
        let params = SimulationParams::new(300.0, 0.002, 500);
        (grid, pulse, params)
    }

    #[test]
    fn reference_courant_number_reports_as_0_60() {
        let (grid, _, params) = reference_setup();
        let courant = params.courant_number(grid.dx);
        assert_relative_eq!(courant, 0.6, epsilon = 1e-12);
        assert_eq!(format!("{:.2}", courant), "0.60");
    }

    #[test]
    fn stable_configuration_is_accepted() {
        let (grid, pulse, params) = reference_setup();
        let sim = Simulation::new(grid, pulse, params).unwrap();
        assert_relative_eq!(sim.courant_number(), 0.6, epsilon = 1e-12);
        assert_eq!(sim.current_step(), 0);
    }

    #[test]
    fn unstable_configuration_is_rejected_before_stepping() {
        let (grid, pulse, mut params) = reference_setup();
        params.dt = 0.01; // C = 3.0
        match Simulation::new(grid, pulse, params) {
            Err(SimulationError::UnstableConfiguration { courant }) => {
                assert_relative_eq!(courant, 3.0, epsilon = 1e-12);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected unstable configuration to be rejected"),
        }
    }

    #[test]
    fn malformed_parameters_are_rejected() {
        let (grid, pulse, params) = reference_setup();

        let undersized = Simulation::new(Grid1D::new(2, 1.0), pulse.clone(), params.clone());
        assert!(matches!(
            undersized,
            Err(SimulationError::InvalidParameter(_))
        ));

        let bad_spacing = Simulation::new(Grid1D::new(200, 0.0), pulse.clone(), params.clone());
        assert!(matches!(
            bad_spacing,
            Err(SimulationError::InvalidParameter(_))
        ));

        let mut bad_speed = params.clone();
        bad_speed.c = -1.0;
        assert!(matches!(
            Simulation::new(grid, pulse.clone(), bad_speed),
            Err(SimulationError::InvalidParameter(_))
        ));

        let mut bad_dt = params;
        bad_dt.dt = 0.0;
        assert!(matches!(
            Simulation::new(grid, pulse, bad_dt),
            Err(SimulationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn initial_state_samples_the_pulse_with_zero_velocity() {
        let (grid, pulse, params) = reference_setup();
        let sim = Simulation::new(grid, pulse.clone(), params).unwrap();

        assert_eq!(sim.wavefield.u.len(), 200);
        assert_relative_eq!(sim.wavefield.u[100], 1.0, epsilon = 1e-12);
        for i in 0..grid.nx {
            assert_eq!(sim.wavefield.u[i], pulse.sample(grid.x_coord(i)));
            // u_prev is a copy of u, so the initial velocity is zero.
            assert_eq!(sim.wavefield.u_prev[i], sim.wavefield.u[i]);
        }
    }

    #[test]
    fn first_step_matches_the_closed_form_update() {
        let (grid, pulse, params) = reference_setup();
        let c2 = params.courant_number(grid.dx).powi(2);
        let u0: Vec<f64> = (0..grid.nx).map(|i| pulse.sample(grid.x_coord(i))).collect();

        let mut sim = Simulation::new(grid, pulse, params).unwrap();
        sim.step();

        // With u_prev == u initially, the update at the pulse center is
        // u[100] + C^2 * (u[101] - 2*u[100] + u[99]).
        let expected = 2.0 * u0[100] - u0[100] + c2 * (u0[101] - 2.0 * u0[100] + u0[99]);
        assert_relative_eq!(sim.wavefield.u[100], expected, epsilon = 1e-9);
        assert!((sim.wavefield.u[100] - u0[100]).abs() > 1e-3);
    }

    #[test]
    fn boundaries_stay_pinned_at_zero() {
        let (grid, pulse, params) = reference_setup();
        let nt = params.nt;
        let mut sim = Simulation::new(grid, pulse, params).unwrap();
        for _ in 0..nt {
            sim.step();
            assert_eq!(sim.wavefield.u[0], 0.0);
            assert_eq!(sim.wavefield.u[grid.nx - 1], 0.0);
        }
    }

    #[test]
    fn amplitude_stays_bounded_over_500_steps() {
        let (grid, pulse, params) = reference_setup();
        let mut sim = Simulation::new(grid, pulse, params).unwrap();
        let initial_peak = sim.wavefield.peak_amplitude();
        let mut max_peak = initial_peak;
        for _ in 0..500 {
            sim.step();
            max_peak = max_peak.max(sim.wavefield.peak_amplitude());
        }
        assert!(
            max_peak <= 2.0 * initial_peak,
            "field grew to {} from initial peak {}",
            max_peak,
            initial_peak
        );
    }

    #[test]
    fn pulse_centered_on_the_middle_point_stays_symmetric() {
        let grid = Grid1D::new(201, 1.0);
        // Center exactly on the middle grid point so the profile mirrors.
        let pulse = GaussianPulse::new(100.0, 5.0, 1.0);
        let params = SimulationParams::new(1.0, 0.5, 120); // C = 0.5
        let mut sim = Simulation::new(grid, pulse, params).unwrap();
        for _ in 0..120 {
            sim.step();
            for i in 0..grid.nx {
                assert_relative_eq!(
                    sim.wavefield.u[i],
                    sim.wavefield.u[grid.nx - 1 - i],
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn identical_runs_are_bit_identical() {
        let (grid, pulse, params) = reference_setup();
        let collect_run = |pulse: GaussianPulse, params: SimulationParams| {
            let mut sim = Simulation::new(grid, pulse, params).unwrap();
            sim.snapshots().map(|s| s.u).collect::<Vec<_>>()
        };

        let a = collect_run(pulse.clone(), params.clone());
        let b = collect_run(pulse, params);

        assert_eq!(a.len(), b.len());
        for (ua, ub) in a.iter().zip(b.iter()) {
            assert_eq!(ua, ub);
        }
    }

    #[test]
    fn snapshot_sequence_is_initial_state_plus_one_per_step() {
        let (grid, pulse, mut params) = reference_setup();
        params.nt = 25;
        let mut sim = Simulation::new(grid, pulse, params).unwrap();

        let mut snapshots = sim.snapshots();
        let first = snapshots.next().unwrap();
        assert_eq!(first.step, 0);
        assert_relative_eq!(first.time, 0.0);
        assert_eq!(first.u.len(), 200);

        assert_eq!(snapshots.by_ref().count(), 25);
        assert!(snapshots.next().is_none());
    }

    #[test]
    fn zero_steps_yields_only_the_initial_snapshot() {
        let (grid, pulse, mut params) = reference_setup();
        params.nt = 0;
        let mut sim = Simulation::new(grid, pulse, params).unwrap();
        assert_eq!(sim.snapshots().count(), 1);
        assert!(sim.is_finished());
    }

    #[test]
    fn consumer_may_stop_consuming_early() {
        let (grid, pulse, params) = reference_setup();
        let mut sim = Simulation::new(grid, pulse, params).unwrap();
        let consumed: Vec<Snapshot> = sim.snapshots().take(5).collect();
        assert_eq!(consumed.last().unwrap().step, 4);
        assert_eq!(sim.current_step(), 4);
        assert!(!sim.is_finished());
    }

    #[test]
    fn headless_run_completes_all_steps() {
        let (grid, pulse, mut params) = reference_setup();
        params.nt = 50;
        let mut sim = Simulation::new(grid, pulse, params).unwrap();
        sim.run();
        assert!(sim.is_finished());
        assert_eq!(sim.current_step(), 50);
        assert_relative_eq!(sim.current_time(), 50.0 * 0.002, epsilon = 1e-12);
    }
}
