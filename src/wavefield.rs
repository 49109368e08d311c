use ndarray::Array1;
use std::mem;

/// The field at times `t-1`, `t` and `t+1`. All three buffers are
/// allocated once and cycle by ownership, never by copying.
pub struct Wavefield {
    pub u_prev: Array1<f64>,
    pub u: Array1<f64>,
    pub u_next: Array1<f64>,
}

impl Wavefield {
    pub fn new(nx: usize) -> Self {
        Wavefield {
            u_prev: Array1::zeros(nx),
            u: Array1::zeros(nx),
            u_next: Array1::zeros(nx),
        }
    }

    /// Advance the triple: `u` becomes `u_prev`, the freshly computed
    /// `u_next` becomes `u`, and the old `u_prev` buffer is recycled as
    /// the next step's scratch `u_next`.
    pub fn rotate(&mut self) {
        mem::swap(&mut self.u_prev, &mut self.u);
        mem::swap(&mut self.u, &mut self.u_next);
    }

    /// Largest absolute displacement in the current buffer.
    pub fn peak_amplitude(&self) -> f64 {
        self.u.iter().fold(0.0_f64, |m, &v| m.max(v.abs()))
    }
}
