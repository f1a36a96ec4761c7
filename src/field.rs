use std::ops::{Index, IndexMut};

use crate::solver::boundary::{self, Boundary};

/// Square scalar grid with a one-cell halo on every side.
///
/// Interior cells live at `[1..=n] x [1..=n]`; row/column `0` and `n + 1`
/// hold boundary values derived from the interior by [`Field::apply_boundary`].
/// Storage is a flat `(n + 2)^2` buffer, x varying fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    n: usize,
    data: Vec<f64>,
}

impl Field {
    /// Allocate a zeroed field with `n` interior cells per side.
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "field needs at least one interior cell");
        let stride = n + 2;
        Self {
            n,
            data: vec![0.0; stride * stride],
        }
    }

    /// Interior side length.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Side length including the halo (`n + 2`).
    #[inline(always)]
    pub fn stride(&self) -> usize {
        self.n + 2
    }

    /// Flat index of cell `(i, j)`. Range is only checked in debug builds.
    #[inline(always)]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(
            i <= self.n + 1 && j <= self.n + 1,
            "cell ({i}, {j}) outside padded grid of side {}",
            self.n + 2
        );
        j * self.stride() + i
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.idx(i, j)]
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        let k = self.idx(i, j);
        self.data[k] = v;
    }

    /// Zero every cell, halo included.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    /// `self += dt * src` over every cell, halo included.
    pub fn add_source(&mut self, src: &Field, dt: f64) {
        assert_eq!(self.n, src.n, "shape mismatch in add_source");
        for (d, s) in self.data.iter_mut().zip(src.data.iter()) {
            *d += dt * s;
        }
    }

    /// Exchange backing buffers with `other` in O(1). No elements are copied.
    pub fn swap(&mut self, other: &mut Field) {
        assert_eq!(self.n, other.n, "shape mismatch in swap");
        std::mem::swap(&mut self.data, &mut other.data);
    }

    /// Recompute every halo cell from the adjacent interior cells.
    /// Edges are written first, then the corners from the fresh edges.
    pub fn apply_boundary(&mut self, kind: Boundary) {
        boundary::set_bnd(self, kind);
    }

    /// Sum over interior cells.
    pub fn sum(&self) -> f64 {
        let mut total = 0.0;
        for j in 1..=self.n {
            for i in 1..=self.n {
                total += self.get(i, j);
            }
        }
        total
    }

    /// Iterate interior cells as `(i, j, value)`, row by row.
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n = self.n;
        (1..=n).flat_map(move |j| (1..=n).map(move |i| (i, j, self.get(i, j))))
    }

    /// Raw padded storage, row-major with x fastest.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl Index<(usize, usize)> for Field {
    type Output = f64;

    #[inline(always)]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[self.idx(i, j)]
    }
}

impl IndexMut<(usize, usize)> for Field {
    #[inline(always)]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        let k = self.idx(i, j);
        &mut self.data[k]
    }
}
