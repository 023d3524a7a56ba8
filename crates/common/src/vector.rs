//! Vector helpers used by the flight model and the wall test.
//!
//! Thin wrappers over `glam::Vec3` that pin down the conventions the
//! simulation relies on: angles are in degrees and rotation about the vertical
//! axis follows the horizontal-plane rotation used by the heading math.

use glam::Vec3;

/// Euclidean norm.
pub fn magnitude(v: Vec3) -> f32 {
    v.length()
}

/// Divide `v` by its magnitude.
///
/// The result is undefined (NaN components) for the zero vector. Callers only
/// normalise headings whose x component is at least 1, so the guard lives at
/// the call site rather than here.
pub fn normalize(v: Vec3) -> Vec3 {
    v / v.length()
}

pub fn scale(v: Vec3, k: f32) -> Vec3 {
    v * k
}

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    a + b
}

pub fn negate(v: Vec3) -> Vec3 {
    -v
}

/// Rotate `v` about the world Y axis by `degrees`.
///
/// Positive angles turn +X toward -Z.
pub fn rotate_about_y(v: Vec3, degrees: f32) -> Vec3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec3::new(cos * v.x + sin * v.z, v.y, -sin * v.x + cos * v.z)
}

/// Signed volume of the parallelepiped spanned by three column vectors,
/// i.e. the 3x3 determinant `|u v w|`.
pub fn det3(u: Vec3, v: Vec3, w: Vec3) -> f32 {
    u.dot(v.cross(w))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn normalized_vectors_have_unit_length() {
        let samples = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(-2.5, 7.0, 1e-3),
            Vec3::new(1e4, -3e3, 2e2),
            Vec3::new(1e-3, 1e-3, -1e-3),
        ];
        for v in samples {
            assert!((magnitude(normalize(v)) - 1.0).abs() < EPS, "{v:?}");
        }
    }

    #[test]
    fn magnitude_of_pythagorean_triple() {
        assert!((magnitude(Vec3::new(3.0, 4.0, 12.0)) - 13.0).abs() < EPS);
    }

    #[test]
    fn arithmetic_helpers() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-1.0, 0.5, 2.0);
        assert_eq!(add(a, b), Vec3::new(0.0, 2.5, 5.0));
        assert_eq!(negate(a), Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(scale(a, 2.0), Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn rotate_quarter_turn() {
        let r = rotate_about_y(Vec3::X, 90.0);
        assert!(r.x.abs() < EPS);
        assert!((r.z + 1.0).abs() < EPS);
        assert_eq!(r.y, 0.0);
    }

    #[test]
    fn rotation_preserves_length() {
        let v = Vec3::new(1.0, 0.3, -0.7);
        for deg in [-45.0, 0.0, 12.5, 180.0, 359.0] {
            assert!((magnitude(rotate_about_y(v, deg)) - magnitude(v)).abs() < EPS);
        }
    }

    #[test]
    fn det3_of_identity_and_swapped_columns() {
        assert!((det3(Vec3::X, Vec3::Y, Vec3::Z) - 1.0).abs() < EPS);
        assert!((det3(Vec3::Y, Vec3::X, Vec3::Z) + 1.0).abs() < EPS);
        assert_eq!(det3(Vec3::X, Vec3::X, Vec3::Z), 0.0);
    }
}
