//! Dimension string parsing and display.
//!
//! Offset tables mix several dimension notations: waterline and butt labels
//! (`WL10"`), plain decimal inches, and traditional feet-inches-eighths
//! (`1-2-3` is 1' 2 3/8"; a trailing `+` adds 1/16", a trailing digit d adds
//! d/80").

use crate::error::{ModelError, Result};

/// Parses a dimension string into decimal inches.
///
/// `-` marks a missing value and parses to `None`.
///
/// # Errors
///
/// Any string matching none of the notations is a structural error naming
/// the offending string.
pub fn parse_dimension(s: &str) -> Result<Option<f64>> {
    if s == "-" {
        return Ok(None);
    }
    for prefix in ["WL", "Butt"] {
        if let Some(inches) = s
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix('"'))
        {
            if !inches.is_empty() && inches.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(v) = inches.parse::<f64>() {
                    return Ok(Some(v));
                }
            }
        }
    }
    if let Ok(v) = s.parse::<f64>() {
        return Ok(Some(v));
    }
    if let Some(v) = parse_feet_inches_eighths(s) {
        return Ok(Some(v));
    }
    Err(ModelError::BadDimension(s.to_string()).into())
}

fn parse_feet_inches_eighths(s: &str) -> Option<f64> {
    let mut parts = s.split('-');
    let feet: u32 = parts.next()?.parse().ok()?;
    let inches: u32 = parts.next()?.parse().ok()?;
    let rest = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let mut chars = rest.chars();
    let eighths = chars.next()?.to_digit(10)?;
    let extra = match (chars.next(), chars.next()) {
        (None, _) => 0.0,
        (Some('+'), None) => 0.0625,
        (Some(c), None) => f64::from(c.to_digit(10)?) / 80.0,
        _ => return None,
    };
    Some(f64::from(feet) * 12.0 + f64::from(inches) + f64::from(eighths) / 8.0 + extra)
}

/// Formats a value in inches, dropping the fraction when it is within a
/// ten-thousandth of a whole inch.
#[must_use]
pub fn format_inches(x: f64) -> String {
    let (sign, x) = if x < 0.0 { ("-", -x) } else { ("", x) };
    let inches = x.trunc();
    if (x - inches).abs() < 1e-4 {
        format!("{sign}{inches:.0}\"")
    } else {
        format!("{sign}{x:.3}\"")
    }
}

/// Formats a value in inches as feet and inches.
#[must_use]
pub fn format_feet_inches(x: f64) -> String {
    let (sign, x) = if x < 0.0 { ("-", -x) } else { ("", x) };
    let feet = (x / 12.0).floor();
    let inches = x - 12.0 * feet;
    if (x - (feet * 12.0 + inches.trunc())).abs() < 1e-4 {
        format!("{sign}{feet:.0}'{:.0}\"", inches.trunc())
    } else {
        format!("{sign}{feet:.0}'{inches:.3}\"")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn missing_value_is_none() {
        assert!(parse_dimension("-").unwrap().is_none());
    }

    #[test]
    fn waterline_and_butt_labels() {
        assert_relative_eq!(parse_dimension("WL10\"").unwrap().unwrap(), 10.0);
        assert_relative_eq!(parse_dimension("Butt6\"").unwrap().unwrap(), 6.0);
    }

    #[test]
    fn plain_decimal_inches() {
        assert_relative_eq!(parse_dimension("3.5").unwrap().unwrap(), 3.5);
        assert_relative_eq!(parse_dimension("-2.25").unwrap().unwrap(), -2.25);
    }

    #[test]
    fn feet_inches_eighths() {
        assert_relative_eq!(parse_dimension("1-2-3").unwrap().unwrap(), 14.375);
        // Trailing + adds a sixteenth.
        assert_relative_eq!(parse_dimension("1-2-3+").unwrap().unwrap(), 14.4375);
        // A trailing digit d adds d/80.
        assert_relative_eq!(parse_dimension("1-2-34").unwrap().unwrap(), 14.425);
        assert_relative_eq!(parse_dimension("0-11-0").unwrap().unwrap(), 11.0);
    }

    #[test]
    fn malformed_strings_are_errors() {
        for bad in ["abc", "1-2", "1-2-x", "WL\"", "1-2-3++"] {
            assert!(parse_dimension(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn inches_formatting() {
        assert_eq!(format_inches(10.0), "10\"");
        assert_eq!(format_inches(3.141), "3.141\"");
        assert_eq!(format_inches(-2.0), "-2\"");
    }

    #[test]
    fn feet_inches_formatting() {
        assert_eq!(format_feet_inches(26.0), "2'2\"");
        assert_eq!(format_feet_inches(14.375), "1'2.375\"");
        assert_eq!(format_feet_inches(-13.0), "-1'1\"");
    }
}
