use crate::field::Field;

/// Wall behaviour used when refreshing a field's halo.
///
/// Velocity components reflect (negate) across the walls they would
/// otherwise penetrate; scalars copy the adjacent interior value (zero
/// normal gradient).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    /// Neumann on every wall: density, pressure, divergence.
    #[default]
    None,
    /// Negate across the left/right walls: horizontal velocity.
    ReflectX,
    /// Negate across the top/bottom walls: vertical velocity.
    ReflectY,
    /// Negate across all four walls.
    ReflectBoth,
}

impl Boundary {
    /// Whether the left/right halo columns take the negated interior value.
    pub fn flips_x(self) -> bool {
        matches!(self, Boundary::ReflectX | Boundary::ReflectBoth)
    }

    /// Whether the top/bottom halo rows take the negated interior value.
    pub fn flips_y(self) -> bool {
        matches!(self, Boundary::ReflectY | Boundary::ReflectBoth)
    }
}

/// Halo refresh: edges, then corners.
pub fn set_bnd(field: &mut Field, kind: Boundary) {
    fill_edges(field, kind).fill_corners();
}

/// Proof that the four halo edges of a field are current.
/// Corners can only be filled through this token.
pub struct EdgesFilled<'a> {
    field: &'a mut Field,
}

/// Phase one: copy (or negate) the interior row/column next to each wall.
pub fn fill_edges(field: &mut Field, kind: Boundary) -> EdgesFilled<'_> {
    let n = field.n();
    let sx = if kind.flips_x() { -1.0 } else { 1.0 };
    let sy = if kind.flips_y() { -1.0 } else { 1.0 };

    for k in 1..=n {
        // left/right walls
        let left = field.get(1, k);
        let right = field.get(n, k);
        field.set(0, k, sx * left);
        field.set(n + 1, k, sx * right);

        // top/bottom walls
        let top = field.get(k, 1);
        let bottom = field.get(k, n);
        field.set(k, 0, sy * top);
        field.set(k, n + 1, sy * bottom);
    }

    EdgesFilled { field }
}

impl EdgesFilled<'_> {
    /// Phase two: each corner is the mean of its two neighbouring halo cells.
    pub fn fill_corners(self) {
        let f = self.field;
        let m = f.n() + 1;

        let c00 = 0.5 * (f.get(1, 0) + f.get(0, 1));
        let c0m = 0.5 * (f.get(1, m) + f.get(0, m - 1));
        let cm0 = 0.5 * (f.get(m - 1, 0) + f.get(m, 1));
        let cmm = 0.5 * (f.get(m - 1, m) + f.get(m, m - 1));

        f.set(0, 0, c00);
        f.set(0, m, c0m);
        f.set(m, 0, cm0);
        f.set(m, m, cmm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KINDS: [Boundary; 4] = [
        Boundary::None,
        Boundary::ReflectX,
        Boundary::ReflectY,
        Boundary::ReflectBoth,
    ];

    fn interior_only(n: usize, values: &[f64]) -> Field {
        let mut f = Field::new(n);
        let mut it = values.iter().cycle();
        for j in 1..=n {
            for i in 1..=n {
                f.set(i, j, *it.next().unwrap_or(&0.0));
            }
        }
        f
    }

    fn assert_consistent(f: &Field, kind: Boundary) {
        let n = f.n();
        let m = n + 1;
        let sx = if kind.flips_x() { -1.0 } else { 1.0 };
        let sy = if kind.flips_y() { -1.0 } else { 1.0 };
        for k in 1..=n {
            assert_eq!(f.get(0, k), sx * f.get(1, k), "left halo at row {k} ({kind:?})");
            assert_eq!(f.get(m, k), sx * f.get(n, k), "right halo at row {k} ({kind:?})");
            assert_eq!(f.get(k, 0), sy * f.get(k, 1), "top halo at col {k} ({kind:?})");
            assert_eq!(f.get(k, m), sy * f.get(k, n), "bottom halo at col {k} ({kind:?})");
        }
        assert_eq!(f.get(0, 0), 0.5 * (f.get(1, 0) + f.get(0, 1)));
        assert_eq!(f.get(0, m), 0.5 * (f.get(1, m) + f.get(0, n)));
        assert_eq!(f.get(m, 0), 0.5 * (f.get(n, 0) + f.get(m, 1)));
        assert_eq!(f.get(m, m), 0.5 * (f.get(n, m) + f.get(m, n)));
    }

    #[test]
    fn test_flip_table() {
        assert!(!Boundary::None.flips_x() && !Boundary::None.flips_y());
        assert!(Boundary::ReflectX.flips_x() && !Boundary::ReflectX.flips_y());
        assert!(!Boundary::ReflectY.flips_x() && Boundary::ReflectY.flips_y());
        assert!(Boundary::ReflectBoth.flips_x() && Boundary::ReflectBoth.flips_y());
    }

    #[test]
    fn test_scalar_walls_copy_interior() {
        let mut f = interior_only(3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        f.apply_boundary(Boundary::None);
        // row 1 is [1, 2, 3]
        assert_eq!(f.get(0, 1), 1.0);
        assert_eq!(f.get(4, 1), 3.0);
        // column 2 is [2, 5, 8]
        assert_eq!(f.get(2, 0), 2.0);
        assert_eq!(f.get(2, 4), 8.0);
        // corner (0,0) averages (1,0)=1 and (0,1)=1
        assert_eq!(f.get(0, 0), 1.0);
        // corner (4,4) averages (3,4)=9 and (4,3)=9
        assert_eq!(f.get(4, 4), 9.0);
    }

    #[test]
    fn test_reflect_x_negates_side_walls_only() {
        let mut f = interior_only(2, &[1.0, 2.0, 3.0, 4.0]);
        f.apply_boundary(Boundary::ReflectX);
        assert_eq!(f.get(0, 1), -1.0);
        assert_eq!(f.get(3, 2), -4.0);
        assert_eq!(f.get(1, 0), 1.0);
        assert_eq!(f.get(2, 3), 4.0);
        // (1,0)=1 and (0,1)=-1 cancel
        assert_eq!(f.get(0, 0), 0.0);
    }

    #[test]
    fn test_reflect_y_negates_top_bottom_only() {
        let mut f = interior_only(2, &[1.0, 2.0, 3.0, 4.0]);
        f.apply_boundary(Boundary::ReflectY);
        assert_eq!(f.get(0, 1), 1.0);
        assert_eq!(f.get(1, 0), -1.0);
        assert_eq!(f.get(2, 3), -4.0);
    }

    #[test]
    fn test_corners_use_halo_not_interior() {
        let mut f = interior_only(3, &[10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        // stale halo garbage must not leak into the corners
        f.set(0, 0, 99.0);
        f.set(1, 0, 42.0);
        f.apply_boundary(Boundary::ReflectBoth);
        assert_eq!(f.get(1, 0), -10.0);
        assert_eq!(f.get(0, 1), -10.0);
        assert_eq!(f.get(0, 0), -10.0);
    }

    #[test]
    fn test_two_phase_matches_set_bnd() {
        let mut a = interior_only(4, &[0.5, -1.5, 2.0, 3.25, -0.75]);
        let mut b = a.clone();
        set_bnd(&mut a, Boundary::ReflectY);
        fill_edges(&mut b, Boundary::ReflectY).fill_corners();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn halo_is_consistent_for_every_kind(
            n in 1usize..10,
            values in prop::collection::vec(-100.0f64..100.0, 1..64),
        ) {
            for kind in KINDS {
                let mut f = interior_only(n, &values);
                f.apply_boundary(kind);
                assert_consistent(&f, kind);
            }
        }
    }
}
