/// A source produced by pointer motion, ready for `Solver::inject`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Injection {
    pub x: usize,
    pub y: usize,
    pub density: f64,
    pub force: f64,
    pub dir_x: f64,
    pub dir_y: f64,
}

/// Horizontal remap from window coordinates into the simulated region.
///
/// Pointer x is clamped to `[start, end]` and rescaled to `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Remap {
    pub start: f64,
    pub end: f64,
    pub lo: f64,
    pub hi: f64,
}

impl Remap {
    /// Middle third of the window onto the cup opening.
    pub const CUP: Remap = Remap { start: 0.33, end: 0.66, lo: 0.22, hi: 0.52 };

    pub fn apply(&self, x: f64) -> f64 {
        let t = (x.clamp(self.start, self.end) - self.start) / (self.end - self.start);
        (1.0 - t) * self.lo + t * self.hi
    }
}

/// Tracks the last pointer position and turns motion into injections.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    last: Option<(f64, f64)>,
    remap: Option<Remap>,
    pub force: f64,
    pub density: f64,
}

impl PointerTracker {
    pub fn new(force: f64, density: f64, remap: Option<Remap>) -> Self {
        Self { last: None, remap, force, density }
    }

    /// Forget the last position (pointer left the window).
    pub fn release(&mut self) {
        self.last = None;
    }

    /// Feed a pointer position in unit window coordinates.
    ///
    /// Direction is the motion since the previous event scaled by `n`
    /// (zero on the first event). The target cell is clamped into the
    /// padded grid `[0, n + 1]`.
    pub fn on_move(&mut self, ux: f64, uy: f64, n: usize) -> Option<Injection> {
        if !ux.is_finite() || !uy.is_finite() {
            return None;
        }
        let x = match self.remap {
            Some(r) => r.apply(ux),
            None => ux,
        };
        let y = uy;
        let (px, py) = self.last.unwrap_or((x, y));
        self.last = Some((x, y));

        let nf = n as f64;
        let dx = (x - px) * nf;
        let dy = (y - py) * nf;

        Some(Injection {
            x: to_cell(x, n),
            y: to_cell(y, n),
            density: self.density,
            force: self.force,
            dir_x: dx,
            dir_y: dy,
        })
    }
}

#[inline]
fn to_cell(u: f64, n: usize) -> usize {
    ((u * n as f64).floor().max(0.0) as usize).min(n + 1)
}

/// Convert a pixel position to unit window coordinates.
pub fn window_to_unit(px: f32, py: f32, width: usize, height: usize) -> (f64, f64) {
    let w = width.max(1) as f64;
    let h = height.max(1) as f64;
    (px as f64 / w, py as f64 / h)
}
