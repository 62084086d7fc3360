//! Number formatting for the literal form.

/// Formats a decimal the way scripts write it: whole numbers without a
/// fractional part, everything else in the shortest form that parses back.
///
/// # Examples
///
/// ```
/// use mechanist_domain::common::format_decimal;
///
/// assert_eq!(format_decimal(1.0), "1");
/// assert_eq!(format_decimal(0.3), "0.3");
/// assert_eq!(format_decimal(-2.0), "-2");
/// ```
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Formats an `f32` without widening artifacts (`0.1f32` prints as `0.1`).
pub fn format_f32(value: f32) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e7 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_drop_fraction() {
        assert_eq!(format_decimal(5.0), "5");
        assert_eq!(format_f32(1.0), "1");
    }

    #[test]
    fn f32_keeps_short_form() {
        assert_eq!(format_f32(0.1), "0.1");
        assert_eq!(format_f32(1.6), "1.6");
    }

    #[test]
    fn non_finite_is_passed_through() {
        assert_eq!(format_decimal(f64::INFINITY), "inf");
    }
}
