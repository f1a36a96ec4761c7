pub mod boundary;
mod core;
pub mod diagnostics;
mod params;

// Re-export public API
pub use boundary::Boundary;
pub use self::core::{advect, backtrace, diffuse, lin_solve, project, sample_bilinear};
pub use params::{SolverParams, DEFAULT_ITERATIONS};

use log::{debug, trace};

use crate::error::InjectError;
use crate::field::Field;
use crate::renderer::ColorMap;

/// Stable-fluids simulation context.
///
/// Owns the three current fields and their "previous" counterparts. The
/// previous fields collect external sources between steps and double as
/// scratch buffers inside a step; [`Solver::step`] zeroes them on return.
pub struct Solver {
    n: usize,
    params: SolverParams,
    u: Field,
    v: Field,
    density: Field,
    u_prev: Field,
    v_prev: Field,
    density_prev: Field,
}

impl Solver {
    /// `n` interior cells per side, default iteration count.
    pub fn new(n: usize, diff: f64, visc: f64) -> Self {
        Self::with_params(n, SolverParams::with_rates(diff, visc))
    }

    pub fn with_params(n: usize, params: SolverParams) -> Self {
        assert!(params.iterations > 0, "solver needs at least one relaxation sweep");
        Self {
            n,
            params,
            u: Field::new(n),
            v: Field::new(n),
            density: Field::new(n),
            u_prev: Field::new(n),
            v_prev: Field::new(n),
            density_prev: Field::new(n),
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Replace rates and iteration count. Grid size is fixed.
    pub fn set_params(&mut self, params: SolverParams) {
        assert!(params.iterations > 0, "solver needs at least one relaxation sweep");
        self.params = params;
    }

    pub fn u(&self) -> &Field {
        &self.u
    }

    pub fn v(&self) -> &Field {
        &self.v
    }

    pub fn density(&self) -> &Field {
        &self.density
    }

    /// Direct access for hosts that paint initial conditions.
    pub fn density_mut(&mut self) -> &mut Field {
        &mut self.density
    }

    pub fn u_prev(&self) -> &Field {
        &self.u_prev
    }

    pub fn v_prev(&self) -> &Field {
        &self.v_prev
    }

    pub fn density_prev(&self) -> &Field {
        &self.density_prev
    }

    /// Zero all six fields.
    pub fn reset(&mut self) {
        for f in self.fields_mut() {
            f.clear();
        }
        debug!("solver reset (n={})", self.n);
    }

    /// Write a source at cell `(x, y)` for the next step.
    ///
    /// Overwrites (does not accumulate) the pending velocity source
    /// `force * (dir_x, dir_y)` and density source at that cell.
    /// Non-finite input and cells outside `[0, n + 1]^2` are rejected
    /// without touching the solver.
    pub fn inject(
        &mut self,
        x: usize,
        y: usize,
        density: f64,
        force: f64,
        dir_x: f64,
        dir_y: f64,
    ) -> Result<(), InjectError> {
        if x > self.n + 1 || y > self.n + 1 {
            return Err(InjectError::OutOfRange { x, y, n: self.n });
        }
        for (what, value) in [("density", density), ("force", force), ("dir_x", dir_x), ("dir_y", dir_y)] {
            if !value.is_finite() {
                return Err(InjectError::NonFinite { what, value });
            }
        }

        self.u_prev.set(x, y, force * dir_x);
        self.v_prev.set(x, y, force * dir_y);
        self.density_prev.set(x, y, density);
        Ok(())
    }

    /// Reset, then fill density with a vertical gradient taken from the
    /// red channel of `map` (top of the grid samples 1.0, bottom 0.0).
    pub fn seed_gradient(&mut self, map: &ColorMap) {
        self.reset();
        let n = self.n as f64;
        for j in 0..self.n + 2 {
            let value = map.sample(1.0 - j as f64 / n)[0];
            for i in 0..self.n + 2 {
                self.density.set(i, j, value);
            }
        }
        debug!("seeded density gradient, total={:.4}", self.density.sum());
    }

    /// Advance one frame: velocity first, then density through the new
    /// velocity, then drop the consumed sources.
    pub fn step(&mut self, dt: f64) {
        self.velocity_step(dt);
        self.density_step(dt);

        self.u_prev.clear();
        self.v_prev.clear();
        self.density_prev.clear();
        trace!("step dt={dt:.4} density={:.4}", self.density.sum());
    }

    fn velocity_step(&mut self, dt: f64) {
        let visc = self.params.visc;
        let iter = self.params.iterations;

        self.u.add_source(&self.u_prev, dt);
        self.v.add_source(&self.v_prev, dt);

        // Diffuse velocity
        self.u_prev.swap(&mut self.u);
        diffuse(Boundary::ReflectX, &mut self.u, &self.u_prev, visc, dt, iter);
        self.v_prev.swap(&mut self.v);
        diffuse(Boundary::ReflectY, &mut self.v, &self.v_prev, visc, dt, iter);

        // Project so self-advection transports a divergence-free field
        project(&mut self.u, &mut self.v, &mut self.u_prev, &mut self.v_prev, iter);

        // Advect velocity through itself
        self.u_prev.swap(&mut self.u);
        self.v_prev.swap(&mut self.v);
        advect(Boundary::ReflectX, &mut self.u, &self.u_prev, &self.u_prev, &self.v_prev, dt);
        advect(Boundary::ReflectY, &mut self.v, &self.v_prev, &self.u_prev, &self.v_prev, dt);

        // Advection reintroduces divergence
        project(&mut self.u, &mut self.v, &mut self.u_prev, &mut self.v_prev, iter);
    }

    fn density_step(&mut self, dt: f64) {
        let diff = self.params.diff;
        let iter = self.params.iterations;

        self.density.add_source(&self.density_prev, dt);
        self.density_prev.swap(&mut self.density);
        diffuse(Boundary::None, &mut self.density, &self.density_prev, diff, dt, iter);
        self.density_prev.swap(&mut self.density);
        advect(Boundary::None, &mut self.density, &self.density_prev, &self.u, &self.v, dt);
    }

    fn fields_mut(&mut self) -> [&mut Field; 6] {
        [
            &mut self.u,
            &mut self.v,
            &mut self.density,
            &mut self.u_prev,
            &mut self.v_prev,
            &mut self.density_prev,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_zero(f: &Field) -> bool {
        f.as_slice().iter().all(|&v| v == 0.0)
    }

    fn all_fields(s: &Solver) -> [&Field; 6] {
        [s.u(), s.v(), s.density(), s.u_prev(), s.v_prev(), s.density_prev()]
    }

    #[test]
    fn test_new_allocates_zeroed_padded_fields() {
        let s = Solver::new(8, 0.0, 0.0);
        assert_eq!(s.n(), 8);
        for f in all_fields(&s) {
            assert_eq!(f.as_slice().len(), 100);
            assert!(all_zero(f));
        }
        assert_eq!(s.params().iterations, DEFAULT_ITERATIONS);
    }

    #[test]
    fn test_zero_input_is_fixed_point() {
        let mut s = Solver::new(6, 0.01, 0.001);
        for dt in [0.0, 0.01, 0.1, 5.0, 1e6, -0.3] {
            s.step(dt);
            for f in all_fields(&s) {
                assert!(all_zero(f), "fields must stay exactly zero for dt={dt}");
            }
        }
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut s = Solver::new(5, 0.001, 0.001);
        s.seed_gradient(&ColorMap::initial_density());
        s.inject(2, 3, 1.0, 10.0, 1.0, -1.0).unwrap();
        s.step(0.05);
        s.inject(1, 1, 1.0, 10.0, 0.5, 0.5).unwrap();

        s.reset();

        for f in all_fields(&s) {
            assert!(all_zero(f), "reset must zero interior and halo");
        }
    }

    #[test]
    fn test_inject_overwrites_pending_sources() {
        let mut s = Solver::new(4, 0.0, 0.0);
        s.inject(2, 2, 1.0, 4.0, 0.5, -0.25).unwrap();
        s.inject(2, 2, 0.5, 2.0, 1.0, 0.0).unwrap();
        assert_eq!(s.u_prev().get(2, 2), 2.0);
        assert_eq!(s.v_prev().get(2, 2), 0.0);
        assert_eq!(s.density_prev().get(2, 2), 0.5);
    }

    #[test]
    fn test_inject_accepts_halo_cells() {
        let mut s = Solver::new(4, 0.0, 0.0);
        assert!(s.inject(0, 0, 1.0, 1.0, 1.0, 1.0).is_ok());
        assert!(s.inject(5, 5, 1.0, 1.0, 1.0, 1.0).is_ok());
        assert_eq!(s.density_prev().get(5, 5), 1.0);
    }

    #[test]
    fn test_inject_rejects_out_of_range() {
        let mut s = Solver::new(4, 0.0, 0.0);
        let err = s.inject(6, 1, 1.0, 1.0, 1.0, 0.0).unwrap_err();
        assert_eq!(err, InjectError::OutOfRange { x: 6, y: 1, n: 4 });
        assert!(s.inject(1, 6, 1.0, 1.0, 1.0, 0.0).is_err());
        for f in all_fields(&s) {
            assert!(all_zero(f));
        }
    }

    #[test]
    fn test_inject_rejects_non_finite() {
        let mut s = Solver::new(4, 0.0, 0.0);
        let err = s.inject(2, 2, f64::NAN, 1.0, 1.0, 0.0).unwrap_err();
        assert!(matches!(err, InjectError::NonFinite { what: "density", .. }));
        let err = s.inject(2, 2, 1.0, 1.0, f64::INFINITY, 0.0).unwrap_err();
        assert!(matches!(err, InjectError::NonFinite { what: "dir_x", .. }));
        for f in all_fields(&s) {
            assert!(all_zero(f), "rejected injection must not write anything");
        }
    }

    #[test]
    fn test_single_cell_scenario() {
        let mut s = Solver::new(4, 0.0, 0.0);
        s.inject(2, 2, 1.0, 1.0, 1.0, 0.0).unwrap();

        s.step(0.05);

        assert!(s.u().get(2, 2) > 0.0, "rightward force must give positive u, got {}", s.u().get(2, 2));
        let neighbors = [(1, 2), (3, 2), (2, 1), (2, 3)];
        assert!(
            neighbors.iter().any(|&(i, j)| s.density().get(i, j) > 0.0),
            "density should reach a neighbour of the source"
        );
        assert!(s.density().get(2, 2) > 0.0);
        assert!(all_zero(s.u_prev()));
        assert!(all_zero(s.v_prev()));
        assert!(all_zero(s.density_prev()));
    }

    #[test]
    fn test_forced_band_carries_density_downstream() {
        let n = 16;
        let mut s = Solver::new(n, 0.0, 0.0);
        let centroid_x = |s: &Solver| {
            let d = s.density();
            let mass = d.sum();
            d.interior().map(|(i, _, v)| i as f64 * v).sum::<f64>() / mass
        };

        for j in 6..=10 {
            for i in 4..=8 {
                let density = if (i, j) == (6, 8) { 1.0 } else { 0.0 };
                s.inject(i, j, density, 5.0, 1.0, 0.0).unwrap();
            }
        }
        s.step(0.1);
        let first = centroid_x(&s);
        assert!(first > 6.0, "centroid should move right of the source, got {first}");

        for _ in 0..3 {
            for j in 6..=10 {
                for i in 4..=8 {
                    s.inject(i, j, 0.0, 5.0, 1.0, 0.0).unwrap();
                }
            }
            s.step(0.1);
        }
        let later = centroid_x(&s);
        assert!(later > first + 1.0, "centroid should keep moving right: {first} -> {later}");
    }

    #[test]
    fn test_step_output_stays_finite_for_large_dt() {
        let mut s = Solver::new(8, 0.01, 0.01);
        s.inject(4, 4, 10.0, 100.0, 1.0, 1.0).unwrap();
        for _ in 0..5 {
            s.step(10.0);
        }
        for f in all_fields(&s) {
            assert!(f.as_slice().iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_seed_gradient_uses_red_channel() {
        let mut s = Solver::new(10, 0.0, 0.0);
        let map = ColorMap::initial_density();
        s.seed_gradient(&map);
        // j = 0 samples t = 1.0 -> last stop (white)
        assert_eq!(s.density().get(3, 0), 1.0);
        // j = 10 samples t = 0.0 -> black
        assert_eq!(s.density().get(3, 10), 0.0);
        // j = 5 samples t = 0.5 -> grey ramp 0.5 * 0.5 / 0.8
        let expected = 0.5 * 0.5 / 0.8;
        assert!((s.density().get(7, 5) - expected).abs() < 1e-12);
        assert!(all_zero(s.u()));
    }

    #[test]
    fn test_density_conserved_without_flow() {
        let mut s = Solver::new(8, 0.001, 0.0);
        s.inject(4, 4, 10.0, 0.0, 0.0, 0.0).unwrap();
        s.step(0.1);
        let total = diagnostics::total_density(s.density());
        assert!((total - 1.0).abs() < 1e-3, "injected dt * 10 = 1.0, got {total}");
    }
}
