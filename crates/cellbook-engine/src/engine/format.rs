//! Number display and parsing.

use super::eval::FormulaError;

/// Format a number for display.
///
/// Integral values print without a fraction; everything else prints in the
/// shortest form that round-trips.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        FormulaError::NotFinite.marker().to_string()
    } else if n == 0.0 {
        // Folds -0 into 0.
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Parse display or literal text as a number, if it is one.
pub fn parse_number(text: &str) -> Option<f64> {
    let n = text.trim().parse::<f64>().ok()?;
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(30.0), "30");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(f64::NAN), "#ERROR");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("#DIV0"), None);
        assert_eq!(parse_number(""), None);
    }
}
