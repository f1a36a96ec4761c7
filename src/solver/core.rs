use super::boundary::Boundary;
use crate::field::Field;

/// Gauss-Seidel relaxation for `c * x[i,j] - a * (4 neighbours) = x0[i,j]`.
///
/// Sweeps in place, row by row, so later cells see neighbours updated
/// earlier in the same sweep. Halos are refreshed after every sweep.
/// No convergence test: `iter` is the only accuracy knob.
pub fn lin_solve(kind: Boundary, x: &mut Field, x0: &Field, a: f64, c: f64, iter: usize) {
    let n = x.n();
    let c_inv = 1.0 / c;
    for _ in 0..iter {
        for j in 1..=n {
            for i in 1..=n {
                let neighbors = x.get(i - 1, j) + x.get(i + 1, j) + x.get(i, j - 1) + x.get(i, j + 1);
                x.set(i, j, (x0.get(i, j) + a * neighbors) * c_inv);
            }
        }
        x.apply_boundary(kind);
    }
}

/// Implicit (backward Euler) diffusion of `x0` into `x`.
/// a = dt * rate * N^2, c = 1 + 4a
pub fn diffuse(kind: Boundary, x: &mut Field, x0: &Field, rate: f64, dt: f64, iter: usize) {
    let n = x.n() as f64;
    let a = dt * rate * n * n;
    lin_solve(kind, x, x0, a, 1.0 + 4.0 * a, iter);
}

/// Departure point of a backward trace from cell `(i, j)`, clamped to
/// `[0.5, N + 0.5]` so the bilinear stencil stays inside the padded grid.
#[inline]
pub fn backtrace(i: usize, j: usize, vx: f64, vy: f64, dt0: f64, n: usize) -> (f64, f64) {
    let hi = n as f64 + 0.5;
    let x = (i as f64 - dt0 * vx).clamp(0.5, hi);
    let y = (j as f64 - dt0 * vy).clamp(0.5, hi);
    (x, y)
}

/// Bilinear sample of `f` at fractional position `(x, y)`.
/// Caller guarantees `0 <= floor(x), floor(y)` and `floor + 1 <= N + 1`.
#[inline]
pub fn sample_bilinear(f: &Field, x: f64, y: f64) -> f64 {
    let i0 = x.floor() as usize;
    let j0 = y.floor() as usize;
    let i1 = i0 + 1;
    let j1 = j0 + 1;

    let s1 = x - i0 as f64;
    let s0 = 1.0 - s1;
    let t1 = y - j0 as f64;
    let t0 = 1.0 - t1;

    s0 * (t0 * f.get(i0, j0) + t1 * f.get(i0, j1)) + s1 * (t0 * f.get(i1, j0) + t1 * f.get(i1, j1))
}

/// Semi-Lagrangian advection: traces particles backwards through velocity field.
pub fn advect(kind: Boundary, d: &mut Field, d0: &Field, vx: &Field, vy: &Field, dt: f64) {
    let n = d.n();
    let dt0 = dt * n as f64;

    for j in 1..=n {
        for i in 1..=n {
            let (x, y) = backtrace(i, j, vx.get(i, j), vy.get(i, j), dt0, n);
            d.set(i, j, sample_bilinear(d0, x, y));
        }
    }
    d.apply_boundary(kind);
}

/// Pressure projection: removes the gradient part of `(vx, vy)`.
/// `p` and `div` are scratch fields; their previous contents are discarded.
pub fn project(vx: &mut Field, vy: &mut Field, p: &mut Field, div: &mut Field, iter: usize) {
    let n = vx.n();
    let h = 1.0 / n as f64;

    for j in 1..=n {
        for i in 1..=n {
            let d = vx.get(i + 1, j) - vx.get(i - 1, j) + vy.get(i, j + 1) - vy.get(i, j - 1);
            div.set(i, j, -0.5 * h * d);
            p.set(i, j, 0.0);
        }
    }
    div.apply_boundary(Boundary::None);
    p.apply_boundary(Boundary::None);

    lin_solve(Boundary::None, p, div, 1.0, 4.0, iter);

    for j in 1..=n {
        for i in 1..=n {
            let gx = 0.5 * (p.get(i + 1, j) - p.get(i - 1, j)) / h;
            let gy = 0.5 * (p.get(i, j + 1) - p.get(i, j - 1)) / h;
            vx[(i, j)] -= gx;
            vy[(i, j)] -= gy;
        }
    }
    vx.apply_boundary(Boundary::ReflectX);
    vy.apply_boundary(Boundary::ReflectY);
}
