//! Float helpers for NaN-as-undefined arithmetic.
//!
//! Layout math uses `f32::NAN` to mean "no constraint". NaN never compares
//! equal to anything, so every comparison that may see an undefined operand
//! must go through these helpers instead of `==`, `<` or `f32::max`.

/// The canonical undefined value.
pub const UNDEFINED: f32 = f32::NAN;

/// Tolerance used when comparing layout floats.
pub const FLOAT_EPSILON: f32 = 0.0001;

#[inline]
pub fn is_undefined(value: f32) -> bool {
    value.is_nan()
}

/// Equal within [`FLOAT_EPSILON`]. Two undefined values are equal; an
/// undefined value never equals a defined one.
pub fn floats_equal(a: f32, b: f32) -> bool {
    if !is_undefined(a) && !is_undefined(b) {
        return (a - b).abs() < FLOAT_EPSILON;
    }
    is_undefined(a) && is_undefined(b)
}

/// Same as [`floats_equal`] for the double-precision rounding path.
pub fn doubles_equal(a: f64, b: f64) -> bool {
    if !a.is_nan() && !b.is_nan() {
        return (a - b).abs() < f64::from(FLOAT_EPSILON);
    }
    a.is_nan() && b.is_nan()
}

/// Larger of two values, preferring whichever side is defined.
pub fn float_max(a: f32, b: f32) -> f32 {
    if !is_undefined(a) && !is_undefined(b) {
        return a.max(b);
    }
    if is_undefined(a) { b } else { a }
}

/// Smaller of two values, preferring whichever side is defined.
pub fn float_min(a: f32, b: f32) -> f32 {
    if !is_undefined(a) && !is_undefined(b) {
        return a.min(b);
    }
    if is_undefined(a) { b } else { a }
}

/// Undefined becomes `fallback`.
#[inline]
pub fn or_default(value: f32, fallback: f32) -> f32 {
    if is_undefined(value) { fallback } else { value }
}

/// Snaps `value` to the grid of `1 / point_scale_factor`.
///
/// The arithmetic runs in double precision so that values which are already
/// on the grid survive the scale round trip. `force_ceil` and `force_floor`
/// only apply when the scaled value has a real fractional part.
pub fn round_value_to_pixel_grid(
    value: f32,
    point_scale_factor: f32,
    force_ceil: bool,
    force_floor: bool,
) -> f32 {
    let mut scaled = f64::from(value) * f64::from(point_scale_factor);
    let mut fraction = scaled % 1.0;
    // `%` keeps the sign of the dividend.
    if fraction < 0.0 {
        fraction += 1.0;
    }
    if doubles_equal(fraction, 0.0) {
        scaled -= fraction;
    } else if doubles_equal(fraction, 1.0) {
        scaled = scaled - fraction + 1.0;
    } else if force_ceil {
        scaled = scaled - fraction + 1.0;
    } else if force_floor {
        scaled -= fraction;
    } else {
        let round_up = !fraction.is_nan() && (fraction > 0.5 || doubles_equal(fraction, 0.5));
        scaled = scaled - fraction + if round_up { 1.0 } else { 0.0 };
    }
    if scaled.is_nan() || is_undefined(point_scale_factor) {
        return UNDEFINED;
    }
    (scaled / f64::from(point_scale_factor)) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_nan_aware() {
        assert!(floats_equal(UNDEFINED, UNDEFINED));
        assert!(!floats_equal(UNDEFINED, 0.0));
        assert!(!floats_equal(0.0, UNDEFINED));
        assert!(floats_equal(1.0, 1.00005));
        assert!(!floats_equal(1.0, 1.001));
    }

    #[test]
    fn max_and_min_prefer_defined_side() {
        assert_eq!(float_max(UNDEFINED, 3.0), 3.0);
        assert_eq!(float_max(3.0, UNDEFINED), 3.0);
        assert_eq!(float_max(2.0, 3.0), 3.0);
        assert_eq!(float_min(UNDEFINED, 3.0), 3.0);
        assert_eq!(float_min(2.0, 3.0), 2.0);
        assert!(is_undefined(float_max(UNDEFINED, UNDEFINED)));
    }

    #[test]
    fn doubles_equal_matches_float_semantics() {
        assert!(doubles_equal(0.5, 0.50001));
        assert!(doubles_equal(f64::NAN, f64::NAN));
        assert!(!doubles_equal(f64::NAN, 0.5));
    }

    #[test]
    fn pixel_grid_rounding() {
        assert_eq!(round_value_to_pixel_grid(10.4, 1.0, false, false), 10.0);
        assert_eq!(round_value_to_pixel_grid(10.5, 1.0, false, false), 11.0);
        assert_eq!(round_value_to_pixel_grid(10.2, 1.0, true, false), 11.0);
        assert_eq!(round_value_to_pixel_grid(10.8, 1.0, false, true), 10.0);
        assert_eq!(round_value_to_pixel_grid(10.0, 1.0, true, false), 10.0);
        assert_eq!(round_value_to_pixel_grid(1.26, 2.0, false, false), 1.5);
        assert!(is_undefined(round_value_to_pixel_grid(UNDEFINED, 1.0, false, false)));
    }

    #[test]
    fn pixel_grid_rounding_below_zero() {
        assert_eq!(round_value_to_pixel_grid(-10.6, 1.0, false, false), -11.0);
        assert_eq!(round_value_to_pixel_grid(-10.4, 1.0, false, false), -10.0);
        assert_eq!(round_value_to_pixel_grid(-10.5, 1.0, false, false), -10.0);
        assert_eq!(round_value_to_pixel_grid(-10.2, 1.0, false, true), -11.0);
        assert_eq!(round_value_to_pixel_grid(-10.8, 1.0, true, false), -10.0);
        assert_eq!(round_value_to_pixel_grid(-3.0, 1.0, true, false), -3.0);
    }
}
