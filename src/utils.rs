use once_cell::sync::Lazy;
use regex::Regex;

// Longest numeric prefix of a string, `parseFloat` style: optional sign,
// decimal digits with an optional fraction, optional exponent.
static NUMBER_PREFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap());

/// Parse the leading numeric prefix of `input`, ignoring leading whitespace.
///
/// Returns `None` when the string does not start with a number, so `"42px"`
/// parses to `Some(42.0)` while `"px42"` parses to `None`.
pub fn parse_number_prefix(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let matched = NUMBER_PREFIX_REGEX.find(trimmed)?;
    matched.as_str().parse::<f64>().ok()
}

/// Count the decimal places in the shortest decimal representation of `value`.
pub fn decimal_places(value: f64) -> usize {
    let text = value.to_string();
    match text.split_once('.') {
        Some((_, fraction)) => fraction.len(),
        None => 0,
    }
}

/// Round `value` to `digits` decimal places through fixed-point formatting.
fn round_to(value: f64, digits: usize) -> f64 {
    format!("{value:.digits$}").parse::<f64>().unwrap_or(value)
}

/// Round-trip `num` through fixed-point formatting at 20 fractional digits,
/// flushing binary representation noise (`0.1 + 0.2` style) before further
/// comparisons.
pub fn to_fixed(num: f64) -> f64 {
    format!("{num:.20}").parse::<f64>().unwrap_or(num)
}

/// Convert a percentage along the track into a real value in `[min, max]`,
/// honoring the decimal precision of `step`.
///
/// # Arguments
/// * `min` - Lower bound of the range
/// * `max` - Upper bound of the range
/// * `step` - Step size; a fractional step fixes the result's precision,
///   an integer step snaps to whole numbers
/// * `percent` - Position along the track, 0 to 100
///
/// 0% and 100% return `min` and `max` exactly, bypassing the arithmetic so
/// the extremes never drift.
pub fn convert_to_value(min: f64, max: f64, step: f64, percent: f64) -> f64 {
    if percent == 0.0 {
        return min;
    }
    if percent == 100.0 {
        return max;
    }

    let min_decimals = decimal_places(min);
    let max_decimals = decimal_places(max);
    let avg_decimals = match (min_decimals, max_decimals) {
        (0, 0) => 0,
        (m, 0) => m,
        (0, n) => n,
        (m, n) => m.max(n),
    };

    // Shift a negative range up so the interpolation runs on non-negative
    // numbers, then undo the shift afterwards.
    let mut shift = 0.0;
    let mut low = min;
    let mut high = max;
    if min < 0.0 {
        shift = min.abs();
        low = round_to(min + shift, avg_decimals);
        high = round_to(max + shift, avg_decimals);
    }

    let mut number = (high - low) / 100.0 * percent + low;

    let step_decimals = decimal_places(step);
    if step_decimals > 0 {
        number = round_to(number, step_decimals);
    } else {
        number = round_to(number / step * step, 0);
    }

    if shift != 0.0 {
        number -= shift;
    }

    let result = if step_decimals > 0 {
        round_to(number, step_decimals)
    } else {
        to_fixed(number)
    };

    // Rounding can overshoot at the edges; clamp against the original,
    // pre-shift bounds.
    if result < min {
        min
    } else if result > max {
        max
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_extremes_return_bounds_exactly() {
        assert_eq!(convert_to_value(10.0, 100.0, 1.0, 0.0), 10.0);
        assert_eq!(convert_to_value(10.0, 100.0, 1.0, 100.0), 100.0);
        assert_eq!(convert_to_value(0.25, 9.75, 0.5, 0.0), 0.25);
        assert_eq!(convert_to_value(0.25, 9.75, 0.5, 100.0), 9.75);
    }

    #[test]
    fn integer_step_snaps_to_whole_numbers() {
        assert_eq!(convert_to_value(10.0, 100.0, 1.0, 50.0), 55.0);
        assert_eq!(convert_to_value(0.0, 10.0, 1.0, 33.0), 3.0);
    }

    #[test]
    fn fractional_step_rounds_to_step_precision() {
        let value = convert_to_value(0.0, 10.0, 0.1, 33.0);
        assert_eq!(value, 3.3);

        let value = convert_to_value(0.0, 10.0, 0.1, 50.0);
        assert!((0.0..=10.0).contains(&value));
        assert_eq!(value, 5.0);

        let value = convert_to_value(0.0, 1.0, 0.01, 12.0);
        assert_eq!(value, 0.12);
    }

    #[test]
    fn negative_range_midpoint_is_zero() {
        assert_eq!(convert_to_value(-50.0, 50.0, 1.0, 50.0), 0.0);
    }

    #[test]
    fn negative_range_keeps_values_below_zero() {
        assert_eq!(convert_to_value(-50.0, 50.0, 1.0, 25.0), -25.0);
        assert_eq!(convert_to_value(-50.0, 50.0, 1.0, 1.0), -49.0);
    }

    #[test]
    fn fractional_bounds_share_precision() {
        let value = convert_to_value(-0.5, 0.5, 0.1, 70.0);
        assert_eq!(value, 0.2);
    }

    #[test]
    fn to_fixed_flushes_float_noise() {
        let noisy = 0.1 + 0.2;
        assert_eq!(to_fixed(noisy), noisy);
        assert_eq!(to_fixed(5.0), 5.0);
    }

    #[test]
    fn decimal_places_counts_fraction_digits() {
        assert_eq!(decimal_places(5.0), 0);
        assert_eq!(decimal_places(0.1), 1);
        assert_eq!(decimal_places(3.25), 2);
    }

    #[test]
    fn number_prefix_parses_like_parse_float() {
        assert_eq!(parse_number_prefix("15"), Some(15.0));
        assert_eq!(parse_number_prefix("  -3.5rem"), Some(-3.5));
        assert_eq!(parse_number_prefix(".5"), Some(0.5));
        assert_eq!(parse_number_prefix("1e3"), Some(1000.0));
        assert_eq!(parse_number_prefix("abc"), None);
        assert_eq!(parse_number_prefix(""), None);
    }
}
