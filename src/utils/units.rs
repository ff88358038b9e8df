use crate::utils::constants::INCHES_TO_CM;

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn inches_to_centimeters(inches: f64) -> f64 {
    inches * INCHES_TO_CM
}

/// Round to a fixed number of decimal places. Applied exactly once, at
/// output time; accumulation always happens on unrounded native values.
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fahrenheit_to_celsius() {
        assert!((fahrenheit_to_celsius(32.0) - 0.0).abs() < 1e-9);
        assert!((fahrenheit_to_celsius(212.0) - 100.0).abs() < 1e-9);
        assert!((fahrenheit_to_celsius(50.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_inches_to_centimeters() {
        assert!((inches_to_centimeters(1.0) - 2.54).abs() < 1e-9);
        assert!((inches_to_centimeters(0.0)).abs() < 1e-9);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.7778, 1), 12.8);
        assert_eq!(round_to(4.4444, 1), 4.4);
        assert_eq!(round_to(2.545, 2), 2.55);
        assert_eq!(round_to(-3.14159, 2), -3.14);
    }
}
