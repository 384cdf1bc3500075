//! Coordinate correction between the authoring convention and the renderer's.
//!
//! The authoring tool is Z up; the renderer is Y up with -Z pointing into the
//! screen. Swapping Y and Z and negating the new Z maps one onto the other, and
//! the same mapping is applied to positions and normals alike.

use std::fmt::Write;

use cgmath::Vector3;

use super::config::SourceAxes;

/// Decimal places for positions, normals and UVs
pub const VECTOR_DECIMALS: usize = 4;
/// Decimal places for color channels
pub const COLOR_DECIMALS: usize = 3;

/// Maps a vector from the source convention into the renderer convention.
pub fn correct(v: Vector3<f32>, axes: SourceAxes) -> Vector3<f32> {
    match axes {
        SourceAxes::ZUp => Vector3::new(v.x, v.z, -v.y),
        SourceAxes::YUp => v,
    }
}

/// Corrects a Z-up vector and formats it as `"x z -y "`.
///
/// Each component has exactly four decimals and is followed by a single space,
/// trailing one included; callers trim the finished array.
pub fn vertex_correction(v: [f32; 3]) -> String {
    let mut out = String::new();
    push_corrected(&mut out, v, SourceAxes::ZUp);
    out
}

/// Appends the corrected, formatted vector plus a trailing space to `out`.
pub fn push_corrected(out: &mut String, v: [f32; 3], axes: SourceAxes) {
    let c = correct(Vector3::from(v), axes);
    for component in [c.x, c.y, c.z] {
        push_number(out, component, VECTOR_DECIMALS);
    }
}

/// Appends one number with `decimals` places and a trailing space.
pub(crate) fn push_number(out: &mut String, value: f32, decimals: usize) {
    out.push_str(&format_number(value, decimals));
    out.push(' ');
}

/// Formats a number with a fixed number of decimals.
///
/// Values that round to zero are written without a sign, so a negated zero
/// axis never shows up as `-0.0000`.
pub fn format_number(value: f32, decimals: usize) -> String {
    let mut text = String::new();
    // Writing into a String cannot fail
    let _ = write!(text, "{:.*}", decimals, value);
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text.remove(0);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn parse_triple(text: &str) -> [f32; 3] {
        let values: Vec<f32> = text
            .split_whitespace()
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(values.len(), 3, "expected three components in {:?}", text);
        [values[0], values[1], values[2]]
    }

    #[test]
    fn test_swaps_y_and_z_and_negates() {
        assert_eq!(vertex_correction([1.0, 2.0, 3.0]), "1.0000 3.0000 -2.0000 ");
        assert_eq!(
            vertex_correction([-0.25, -1.5, 0.125]),
            "-0.2500 0.1250 1.5000 "
        );
    }

    #[test]
    fn test_negated_zero_has_no_sign() {
        assert_eq!(vertex_correction([0.0, 0.0, 0.0]), "0.0000 0.0000 0.0000 ");
        assert_eq!(vertex_correction([-0.00001, 0.0, 1.0]), "0.0000 1.0000 0.0000 ");
        assert_eq!(format_number(-0.0004, 3), "0.000");
        assert_eq!(format_number(-0.0006, 3), "-0.001");
    }

    #[test]
    fn test_y_up_passes_through() {
        let mut out = String::new();
        push_corrected(&mut out, [1.0, 2.0, 3.0], SourceAxes::YUp);
        assert_eq!(out, "1.0000 2.0000 3.0000 ");
    }

    #[test]
    fn test_random_vectors_match_within_rounding() {
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let v: [f32; 3] = [
                rng.random_range(-1000.0..1000.0),
                rng.random_range(-1000.0..1000.0),
                rng.random_range(-1000.0..1000.0),
            ];
            let text = vertex_correction(v);
            assert!(text.ends_with(' ') && !text.ends_with("  "));

            let [x, y, z] = parse_triple(&text);
            assert!((x - v[0]).abs() <= 1e-4 + v[0].abs() * 1e-6);
            assert!((y - v[2]).abs() <= 1e-4 + v[2].abs() * 1e-6);
            assert!((z + v[1]).abs() <= 1e-4 + v[1].abs() * 1e-6);
        }
    }
}
