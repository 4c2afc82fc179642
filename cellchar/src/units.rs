use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// An integer quantity with an SI prefix, rendered in SPICE notation.
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SiValue {
    value: i64,
    prefix: SiPrefix,
}

impl SiValue {
    /// Creates a new [`SiValue`] by rounding to the given precision.
    ///
    /// For example, if [`SiPrefix::Atto`] is given, and `value` is given in Farads,
    /// `value` will be rounded to the nearest attofarad before being stored in the
    /// resulting [`SiValue`].
    pub fn with_precision(value: f64, precision: SiPrefix) -> Self {
        let value = (value / precision.multiplier()).round() as i64;
        Self {
            value,
            prefix: precision,
        }
    }
}

#[derive(
    Copy, Clone, Default, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum SiPrefix {
    Atto,
    Femto,
    Pico,
    Nano,
    Micro,
    Milli,
    #[default]
    None,
    Kilo,
    Mega,
    Giga,
    Tera,
}

impl SiPrefix {
    pub fn multiplier(&self) -> f64 {
        match self {
            SiPrefix::Atto => 1e-18,
            SiPrefix::Femto => 1e-15,
            SiPrefix::Pico => 1e-12,
            SiPrefix::Nano => 1e-9,
            SiPrefix::Micro => 1e-6,
            SiPrefix::Milli => 1e-3,
            SiPrefix::None => 1e0,
            SiPrefix::Kilo => 1e3,
            SiPrefix::Mega => 1e6,
            SiPrefix::Giga => 1e9,
            SiPrefix::Tera => 1e12,
        }
    }

    /// Parses a SPICE scale suffix. Matching is case-insensitive and
    /// trailing unit letters (as in `fF`) are ignored.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let lower = suffix.to_ascii_lowercase();
        if lower.starts_with("meg") {
            return Some(Self::Mega);
        }
        let prefix = match lower.chars().next() {
            None => Self::None,
            Some('a') => Self::Atto,
            Some('f') => Self::Femto,
            Some('p') => Self::Pico,
            Some('n') => Self::Nano,
            Some('u') => Self::Micro,
            Some('m') => Self::Milli,
            Some('k') => Self::Kilo,
            Some('g') => Self::Giga,
            Some('t') => Self::Tera,
            Some(c) if c.is_ascii_alphabetic() => Self::None,
            Some(_) => return None,
        };
        Some(prefix)
    }

    /// Converts `value`, given in base units, to this prefix.
    #[inline]
    pub fn scale(&self, value: f64) -> f64 {
        value / self.multiplier()
    }
}

/// Parses a SPICE number such as `1.5e-12`, `10f`, `3.2fF` or `2meg`.
pub fn parse_spice_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let split = s
        .char_indices()
        .find(|&(i, c)| {
            c.is_ascii_alphabetic()
                && !((c == 'e' || c == 'E') && is_exponent(&s[i + 1..]))
        })
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let (mantissa, suffix) = s.split_at(split);
    let mantissa: f64 = mantissa.parse().ok()?;
    let prefix = SiPrefix::from_suffix(suffix)?;
    Some(mantissa * prefix.multiplier())
}

fn is_exponent(rest: &str) -> bool {
    let rest = rest.strip_prefix(['+', '-']).unwrap_or(rest);
    rest.chars().next().map_or(false, |c| c.is_ascii_digit())
}

impl Display for SiValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value, self.prefix)
    }
}

impl Display for SiPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match *self {
            Self::Atto => "a",
            Self::Femto => "f",
            Self::Pico => "p",
            Self::Nano => "n",
            Self::Micro => "u",
            Self::Milli => "m",
            Self::None => "",
            Self::Kilo => "K",
            Self::Mega => "MEG",
            Self::Giga => "G",
            Self::Tera => "T",
        };

        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;

    #[test]
    fn spice_numbers() {
        assert_float_eq!(parse_spice_number("1.5e-12").unwrap(), 1.5e-12, rmax <= 1e-12);
        assert_float_eq!(parse_spice_number("10f").unwrap(), 1e-14, rmax <= 1e-12);
        assert_float_eq!(parse_spice_number("3.2fF").unwrap(), 3.2e-15, rmax <= 1e-12);
        assert_float_eq!(parse_spice_number("2meg").unwrap(), 2e6, rmax <= 1e-12);
        assert_float_eq!(parse_spice_number("4.0E+01").unwrap(), 40.0, rmax <= 1e-12);
        assert!(parse_spice_number("failed").is_none());
        assert!(parse_spice_number("").is_none());
    }

    #[test]
    fn si_value_display() {
        let load = SiValue::with_precision(0.01e-15, SiPrefix::Atto);
        assert_eq!(load.to_string(), "10a");
        let load = SiValue::with_precision(50e-15, SiPrefix::Atto);
        assert_eq!(load.to_string(), "50000a");
    }
}
