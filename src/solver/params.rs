/// Relaxation sweeps per linear solve.
pub const DEFAULT_ITERATIONS: usize = 20;

/// Solver parameters for the fluid simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverParams {
    /// Density diffusion rate.
    pub diff: f64,
    /// Kinematic viscosity applied to both velocity components.
    pub visc: f64,
    /// Gauss-Seidel sweeps per diffusion or pressure solve.
    pub iterations: usize,
    /// Time step the host uses when it has no wall-clock measurement.
    pub dt: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            diff: 0.0,
            visc: 0.0005,
            iterations: DEFAULT_ITERATIONS,
            dt: 0.01,
        }
    }
}

impl SolverParams {
    /// Parameters with the given rates and the default iteration count.
    pub fn with_rates(diff: f64, visc: f64) -> Self {
        Self {
            diff,
            visc,
            ..Self::default()
        }
    }
}
