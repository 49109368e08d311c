use crate::error::SimulationError;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// Grid configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub nx: usize,
    pub dx: f64,
}

impl GridConfig {
    fn validate(&self) -> Result<(), SimulationError> {
        if self.nx < 3 {
            return Err(SimulationError::InvalidParameter(format!(
                "grid needs at least 3 points, got nx={}",
                self.nx
            )));
        }
        if self.dx <= 0.0 {
            return Err(SimulationError::InvalidParameter(format!(
                "grid spacing must be positive, got dx={}",
                self.dx
            )));
        }
        Ok(())
    }
}

/// Initial condition: a Gaussian displacement pulse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseConfig {
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    #[serde(default = "default_width")]
    pub width: f64,
    /// Peak position in metres; defaults to the domain midpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<f64>,
}

fn default_amplitude() -> f64 {
    1.0
}

fn default_width() -> f64 {
    5.0
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            amplitude: default_amplitude(),
            width: default_width(),
            center: None,
        }
    }
}

impl PulseConfig {
    fn validate(&self) -> Result<(), SimulationError> {
        if self.amplitude <= 0.0 {
            return Err(SimulationError::InvalidParameter(format!(
                "pulse amplitude must be positive, got {}",
                self.amplitude
            )));
        }
        if self.width <= 0.0 {
            return Err(SimulationError::InvalidParameter(format!(
                "pulse width must be positive, got {}",
                self.width
            )));
        }
        Ok(())
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub c: f64,
    pub dt: f64,
    pub nt: usize,
    #[serde(default = "default_report_period")]
    pub report_period: usize,
}

fn default_report_period() -> usize {
    100
}

impl SimulationConfig {
    fn validate(&self) -> Result<(), SimulationError> {
        if self.c <= 0.0 {
            return Err(SimulationError::InvalidParameter(format!(
                "wave speed must be positive, got c={}",
                self.c
            )));
        }
        if self.dt <= 0.0 {
            return Err(SimulationError::InvalidParameter(format!(
                "time step must be positive, got dt={}",
                self.dt
            )));
        }
        if self.report_period == 0 {
            return Err(SimulationError::InvalidParameter(
                "report_period must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Visualization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationConfig {
    #[serde(default = "default_render_interval")]
    pub render_interval: usize,
    #[serde(default = "default_frame_pause_ms")]
    pub frame_pause_ms: u64,
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_render_interval() -> usize {
    10
}

fn default_frame_pause_ms() -> u64 {
    10
}

fn default_image_width() -> u32 {
    800
}

fn default_image_height() -> u32 {
    600
}

fn default_output_dir() -> String {
    "output".to_string()
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            render_interval: default_render_interval(),
            frame_pause_ms: default_frame_pause_ms(),
            image_width: default_image_width(),
            image_height: default_image_height(),
            output_dir: default_output_dir(),
        }
    }
}

impl VisualizationConfig {
    fn validate(&self) -> Result<(), SimulationError> {
        if self.render_interval == 0 {
            return Err(SimulationError::InvalidParameter(
                "render_interval must be at least 1".to_string(),
            ));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(SimulationError::InvalidParameter(format!(
                "image dimensions must be positive, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        Ok(())
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub grid: GridConfig,
    #[serde(default)]
    pub pulse: PulseConfig,
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub visualization: VisualizationConfig,
}

impl Default for Config {
    /// The reference parameter set: a 200 m string, 300 m/s waves,
    /// 500 steps of 2 ms.
    fn default() -> Self {
        Self {
            grid: GridConfig { nx: 200, dx: 1.0 },
            pulse: PulseConfig::default(),
            simulation: SimulationConfig {
                c: 300.0,
                dt: 0.002,
                nt: 500,
                report_period: default_report_period(),
            },
            visualization: VisualizationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path, e))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| anyhow!("Failed to parse TOML config: {}", e))?;

        // Validate before returning
        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), SimulationError> {
        self.grid.validate()?;
        self.pulse.validate()?;
        self.simulation.validate()?;
        self.visualization.validate()?;
        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("=== Simulation Configuration ===");
        println!(
            "Grid: {} points, dx = {} m ({} m domain)",
            self.grid.nx,
            self.grid.dx,
            self.grid.nx as f64 * self.grid.dx
        );
        println!(
            "Simulation: c = {} m/s, dt = {} s, nt = {} ({} s total)",
            self.simulation.c,
            self.simulation.dt,
            self.simulation.nt,
            self.simulation.nt as f64 * self.simulation.dt
        );
        match self.pulse.center {
            Some(center) => println!(
                "Pulse: amplitude {}, width {} m, centered at {} m",
                self.pulse.amplitude, self.pulse.width, center
            ),
            None => println!(
                "Pulse: amplitude {}, width {} m, centered on the domain midpoint",
                self.pulse.amplitude, self.pulse.width
            ),
        }
        println!(
            "Visualization: {}x{} frames to {}/ every {} steps",
            self.visualization.image_width,
            self.visualization.image_height,
            self.visualization.output_dir,
            self.visualization.render_interval
        );
        println!("================================");
    }
}
