use crate::field::Field;

/// Central-difference divergence at interior cell `(i, j)`, in grid units.
#[inline]
pub fn divergence_at(vx: &Field, vy: &Field, i: usize, j: usize) -> f64 {
    0.5 * (vx.get(i + 1, j) - vx.get(i - 1, j) + vy.get(i, j + 1) - vy.get(i, j - 1))
}

/// L1 norm of the discrete divergence over interior cells.
pub fn divergence_norm(vx: &Field, vy: &Field) -> f64 {
    let n = vx.n();
    let mut sum = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            sum += divergence_at(vx, vy, i, j).abs();
        }
    }
    sum
}

/// Total density over interior cells.
pub fn total_density(density: &Field) -> f64 {
    density.sum()
}

/// Volume-averaged kinetic energy: KE = 0.5 * <vx² + vy²>.
pub fn kinetic_energy(vx: &Field, vy: &Field) -> f64 {
    let n = vx.n();
    let mut sum = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            let (u, v) = (vx.get(i, j), vy.get(i, j));
            sum += u * u + v * v;
        }
    }
    0.5 * sum / (n * n) as f64
}

/// Largest interior speed.
pub fn max_speed(vx: &Field, vy: &Field) -> f64 {
    vx.interior()
        .map(|(i, j, u)| {
            let v = vy.get(i, j);
            (u * u + v * v).sqrt()
        })
        .fold(0.0_f64, f64::max)
}
