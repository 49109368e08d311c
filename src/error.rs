use thiserror::Error;

/// Result type alias for simulation setup.
pub type SimResult<T> = Result<T, SimulationError>;

/// Everything that can go wrong before the time loop starts. Stepping
/// itself is pure arithmetic over fixed-size buffers and cannot fail.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// The explicit scheme diverges when the Courant number exceeds 1.
    #[error("unstable configuration: Courant number {courant:.2} exceeds 1; reduce dt or increase dx")]
    UnstableConfiguration { courant: f64 },

    /// Malformed scalar parameter (non-positive spacing, speed or time
    /// step, undersized grid).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstable_message_names_the_courant_value() {
        let err = SimulationError::UnstableConfiguration { courant: 3.0 };
        let msg = err.to_string();
        assert!(msg.contains("3.00"));
        assert!(msg.contains("reduce dt or increase dx"));
    }
}
