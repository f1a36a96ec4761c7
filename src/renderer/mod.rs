mod color;

// Re-export public API
pub use color::{ColorMap, ColorStop};

use crate::field::Field;
use crate::solver::diagnostics::max_speed;

/// Which quantity is mapped through the color ramp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VizMode {
    /// Density, used directly as the ramp coordinate.
    #[default]
    Density,
    /// Speed normalised by the frame's maximum speed.
    Speed,
}

impl VizMode {
    /// Cycle to the next visualization mode.
    pub fn next(self) -> Self {
        match self {
            VizMode::Density => VizMode::Speed,
            VizMode::Speed => VizMode::Density,
        }
    }

    /// Short label for the window title.
    pub fn label(self) -> &'static str {
        match self {
            VizMode::Density => "density",
            VizMode::Speed => "speed",
        }
    }
}

/// Map interior density cells through `map` into an N×N RGB texture.
///
/// Layout is row-major, three floats per texel, no alpha:
/// texel `(x, y)` starts at `(x + N * y) * 3` with `x = i - 1`, `y = j - 1`.
pub fn density_texture(density: &Field, map: &ColorMap, out: &mut Vec<f32>) {
    let n = density.n();
    out.resize(n * n * 3, 0.0);
    for (i, j, value) in density.interior() {
        write_texel(out, n, i - 1, j - 1, map.sample(value));
    }
}

/// Speed magnitude texture; the fastest cell of the frame maps to 1.0.
pub fn speed_texture(vx: &Field, vy: &Field, map: &ColorMap, out: &mut Vec<f32>) {
    let n = vx.n();
    out.resize(n * n * 3, 0.0);
    let peak = max_speed(vx, vy);
    let scale = if peak > 0.0 { 1.0 / peak } else { 0.0 };
    for (i, j, u) in vx.interior() {
        let v = vy.get(i, j);
        let speed = (u * u + v * v).sqrt();
        write_texel(out, n, i - 1, j - 1, map.sample(speed * scale));
    }
}

#[inline]
fn write_texel(out: &mut [f32], n: usize, x: usize, y: usize, rgb: [f64; 3]) {
    let off = (x + n * y) * 3;
    out[off] = rgb[0] as f32;
    out[off + 1] = rgb[1] as f32;
    out[off + 2] = rgb[2] as f32;
}

/// Nearest-neighbour upscale of an N×N RGB float texture into a 0RGB
/// framebuffer of `width × height` (the layout minifb expects).
pub fn texture_to_argb(tex: &[f32], n: usize, width: usize, height: usize, out: &mut [u32]) {
    debug_assert_eq!(tex.len(), n * n * 3);
    debug_assert!(out.len() >= width * height);
    if n == 0 || width == 0 || height == 0 {
        return;
    }

    for py in 0..height {
        let y = (py * n / height).min(n - 1);
        let row = &mut out[py * width..(py + 1) * width];
        for (px, pixel) in row.iter_mut().enumerate() {
            let x = (px * n / width).min(n - 1);
            let off = (x + n * y) * 3;
            *pixel = pack_rgb(tex[off], tex[off + 1], tex[off + 2]);
        }
    }
}

#[inline]
fn to_byte(c: f32) -> u32 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u32
}

#[inline]
fn pack_rgb(r: f32, g: f32, b: f32) -> u32 {
    to_byte(r) << 16 | to_byte(g) << 8 | to_byte(b)
}
