//! Unsigned quantities written with an optional unit suffix.
//!
//! A [`Size`] is a plain `u64` count. Its text form is a decimal mantissa
//! followed by an optional unit:
//!
//! | Unit | Multiplier | Unit | Multiplier |
//! |------|------------|------|------------|
//! | `K`  | 10^3       | `Ki` | 2^10       |
//! | `M`  | 10^6       | `Mi` | 2^20       |
//! | `G`  | 10^9       | `Gi` | 2^30       |
//! | `P`  | 10^15      | `Pi` | 2^50       |
//!
//! Units are case-insensitive. The mantissa is multiplied by the unit first
//! and only the product is rounded, to the nearest integer away from zero, so
//! `1.5K` is 1500 while a bare `1.5` is 2. Any positive product below one
//! becomes one.
//!
//! ```rust
//! use mlc::Size;
//!
//! assert_eq!("2Ki".parse::<Size>().unwrap().count(), 2048);
//! assert_eq!("1.5".parse::<Size>().unwrap().count(), 2);
//! assert_eq!("1.5K".parse::<Size>().unwrap().count(), 1500);
//! assert_eq!("0.2k".parse::<Size>().unwrap().count(), 200);
//! assert_eq!(Size::new(3072).to_string(), "3Ki");
//! ```

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static SIZE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+))\s*([A-Za-z]*)$")
        .expect("size pattern is valid")
});

const BINARY_UNITS: [(&str, u64); 4] = [
    ("Pi", 1 << 50),
    ("Gi", 1 << 30),
    ("Mi", 1 << 20),
    ("Ki", 1 << 10),
];

const DECIMAL_UNITS: [(&str, u64); 4] = [
    ("P", 1_000_000_000_000_000),
    ("G", 1_000_000_000),
    ("M", 1_000_000),
    ("K", 1_000),
];

/// An unsigned count with a unit-aware text form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Size(u64);

impl Size {
    #[must_use]
    pub const fn new(count: u64) -> Self {
        Size(count)
    }

    /// Returns the number of units.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u64 {
        self.0
    }

    /// Parses the text form, returning `None` for negative values,
    /// unknown units, and values beyond `u64::MAX`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Size> {
        let captures = SIZE_PATTERN.captures(text.trim())?;
        let mantissa = captures.get(1)?.as_str();
        let unit = captures.get(2).map_or("", |m| m.as_str());
        let multiplier = unit_multiplier(unit)?;

        // Exact path for plain integers, which f64 cannot hold above 2^53.
        if let Ok(count) = mantissa.trim_start_matches('+').parse::<u64>() {
            return count.checked_mul(multiplier).map(Size);
        }

        let product = mantissa.parse::<f64>().ok()? * multiplier as f64;
        if !product.is_finite() || product < 0.0 {
            return None;
        }
        if product == 0.0 {
            return Some(Size(0));
        }
        if product < 1.0 {
            return Some(Size(1));
        }
        let rounded = product.round();
        if rounded >= u64::MAX as f64 {
            return None;
        }
        Some(Size(rounded as u64))
    }
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    if unit.is_empty() {
        return Some(1);
    }
    BINARY_UNITS
        .iter()
        .chain(DECIMAL_UNITS.iter())
        .find(|(name, _)| name.eq_ignore_ascii_case(unit))
        .map(|(_, multiplier)| *multiplier)
}

impl fmt::Display for Size {
    /// Writes the count with the largest unit that divides it exactly,
    /// preferring binary units.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "0");
        }
        for (unit, multiplier) in BINARY_UNITS.iter().chain(DECIMAL_UNITS.iter()) {
            if self.0 % multiplier == 0 {
                return write!(f, "{}{}", self.0 / multiplier, unit);
            }
        }
        write!(f, "{}", self.0)
    }
}

impl FromStr for Size {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Size::parse(s).ok_or_else(|| Error::invalid_value("size", s))
    }
}

impl From<u64> for Size {
    fn from(value: u64) -> Self {
        Size(value)
    }
}

impl From<Size> for u64 {
    fn from(value: Size) -> Self {
        value.0
    }
}
