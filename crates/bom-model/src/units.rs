//! Unit constants and rounding
//!
//! Rounding is half-to-even at every step, matching the numbers the BOM
//! template has always been fed.

/// Feet in a statute mile
pub const FEET_PER_MILE: f64 = 5280.0;

/// Round to `places` decimals, ties to even
#[inline]
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}

/// Round to 2 decimals, ties to even
#[inline]
#[must_use]
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Feet to miles, rounded to 2 decimals
#[inline]
#[must_use]
pub fn feet_to_miles(feet: f64) -> f64 {
    round2(feet / FEET_PER_MILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miles_are_rounded() {
        assert_eq!(feet_to_miles(1000.0), 0.19);
        assert_eq!(feet_to_miles(5280.0), 1.0);
        assert_eq!(feet_to_miles(0.0), 0.0);
    }

    #[test]
    fn ties_go_to_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(0.5, 0), 0.0);
    }
}
