/// One color stop: position in [0, 1] and an RGB triple in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub pos: f64,
    pub rgb: [f64; 3],
}

/// Piecewise-linear color ramp over [0, 1].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorMap {
    stops: Vec<ColorStop>,
}

/// Milk-into-tea stops: black below 0.3, then a hard step to blue fading to white.
const MILK_TEA_STOPS: [(f64, [f64; 3]); 4] = [
    (0.3, [0.0, 0.0, 0.0]),
    (0.3, [0.0, 0.0, 238.0 / 255.0]),
    (0.3, [0.0, 0.0, 1.0]),
    (1.0, [1.0, 1.0, 1.0]),
];

/// Initial density profile: dark ramp to mid grey, then a sharp white cap.
const INITIAL_DENSITY_STOPS: [(f64, [f64; 3]); 3] = [
    (0.0, [0.0, 0.0, 0.0]),
    (0.8, [0.5, 0.5, 0.5]),
    (0.803, [1.0, 1.0, 1.0]),
];

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_stops(stops: &[(f64, [f64; 3])]) -> Self {
        let mut map = Self::new();
        for &(pos, [r, g, b]) in stops {
            map.add_color_stop(pos, r, g, b);
        }
        map
    }

    /// Visualization map used for the density texture.
    pub fn milk_tea() -> Self {
        Self::from_stops(&MILK_TEA_STOPS)
    }

    /// Map whose red channel seeds the starting density gradient.
    pub fn initial_density() -> Self {
        Self::from_stops(&INITIAL_DENSITY_STOPS)
    }

    /// Insert a stop keeping positions sorted. Equal positions keep
    /// insertion order, so repeated positions form a hard step.
    pub fn add_color_stop(&mut self, pos: f64, r: f64, g: f64, b: f64) {
        let at = self.stops.partition_point(|s| s.pos <= pos);
        self.stops.insert(at, ColorStop { pos, rgb: [r, g, b] });
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at `t`, clamped to [0, 1]. Below the first stop returns the
    /// first color, at or above the last stop returns the last color.
    /// An empty map is black.
    pub fn sample(&self, t: f64) -> [f64; 3] {
        let t = t.clamp(0.0, 1.0);
        let Some(last) = self.stops.last() else {
            return [0.0; 3];
        };

        // first stop strictly above t
        let b = self.stops.partition_point(|s| s.pos <= t);
        if b == self.stops.len() {
            return last.rgb;
        }
        if b == 0 {
            return self.stops[0].rgb;
        }

        let lo = &self.stops[b - 1];
        let hi = &self.stops[b];
        let s = (t - lo.pos) / (hi.pos - lo.pos);
        [
            lerp(lo.rgb[0], hi.rgb[0], s),
            lerp(lo.rgb[1], hi.rgb[1], s),
            lerp(lo.rgb[2], hi.rgb[2], s),
        ]
    }
}
