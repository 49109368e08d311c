use ndarray::Array1;
use plotters::prelude::*;

// Fixed vertical range so every frame shares one scale.
const Y_MIN: f64 = -1.5;
const Y_MAX: f64 = 1.5;

pub struct WaveVisualiser {
    output_dir: String,
    width: u32,
    height: u32,
}

impl WaveVisualiser {
    pub fn new(output_dir: &str, width: u32, height: u32) -> Self {
        std::fs::create_dir_all(output_dir).unwrap();

        Self {
            output_dir: output_dir.to_string(),
            width,
            height,
        }
    }

    pub fn plot_snapshot(
        &self,
        x: &Array1<f64>,
        u: &Array1<f64>,
        domain_width: f64,
        timestep: usize,
        time: f64,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let filename = format!("{}/u_{:06}.png", self.output_dir, timestep);
        let root = BitMapBackend::new(&filename, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let title = format!("u at t={:.4}s (step {})", time, timestep);
        let mut chart = ChartBuilder::on(&root)
            .caption(&title, ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d(0.0..domain_width, Y_MIN..Y_MAX)?;

        chart
            .configure_mesh()
            .x_desc("x (m)")
            .y_desc("displacement")
            .draw()?;

        chart.draw_series(LineSeries::new(
            x.iter().zip(u.iter()).map(|(&xi, &ui)| (xi, ui)),
            &BLUE,
        ))?;

        root.present()?;
        println!("Saved frame: {}", filename);
        Ok(())
    }
}
