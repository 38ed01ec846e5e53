//! Relative humidity from temperature and dewpoint.

/// Magnus coefficient `b` (dimensionless)
const MAGNUS_B: f64 = 17.625;
/// Magnus coefficient `c` (°C)
const MAGNUS_C: f64 = 243.04;

/// Relative humidity (%) from temperature and dewpoint in °C.
///
/// Uses the Magnus approximation of saturation vapour pressure. Returns NaN
/// if either input is NaN.
pub fn relative_humidity(t: f64, td: f64) -> f64 {
    let gamma = |x: f64| MAGNUS_B * x / (MAGNUS_C + x);
    100.0 * (gamma(td) - gamma(t)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturated_air() {
        assert!((relative_humidity(20.0, 20.0) - 100.0).abs() < 1e-9);
        assert!((relative_humidity(-15.0, -15.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_known_value() {
        // 25 °C with a 15 °C dewpoint is roughly 54 %
        let rh = relative_humidity(25.0, 15.0);
        assert!((rh - 54.0).abs() < 1.0, "rh = {}", rh);
    }

    #[test]
    fn test_missing_inputs() {
        assert!(relative_humidity(f64::NAN, 10.0).is_nan());
        assert!(relative_humidity(10.0, f64::NAN).is_nan());
    }
}
