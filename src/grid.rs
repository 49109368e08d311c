use ndarray::Array1;

/// Uniform 1D grid of `nx` points spaced `dx` metres apart.
#[derive(Debug, Clone, Copy)]
pub struct Grid1D {
    pub nx: usize, // Number of grid points
    pub dx: f64,   // Distance between points (meters)
}

impl Grid1D {
    pub fn new(nx: usize, dx: f64) -> Self {
        Grid1D { nx, dx }
    }

    pub fn x_coord(&self, i: usize) -> f64 {
        // Convert grid index i to physical x coordinate
        self.dx * (i as f64)
    }

    /// The full coordinate sequence, `x_i = i * dx` for `i in [0, nx)`.
    pub fn coordinates(&self) -> Array1<f64> {
        Array1::from_iter((0..self.nx).map(|i| self.x_coord(i)))
    }

    pub fn width(&self) -> f64 {
        // Total width of domain in x direction
        (self.nx - 1) as f64 * self.dx
    }

    /// Pulse centering coordinate, half the nominal domain length.
    pub fn center(&self) -> f64 {
        self.nx as f64 * self.dx / 2.0
    }
}
