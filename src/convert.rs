//! The conversion matrix between value kinds.
//!
//! Every `as_*` method is total: it returns `None` when the source kind
//! cannot represent the target, and never panics. The rules are:
//!
//! - **Numeric to numeric**: range checked. Floats convert to integers only
//!   when they hold an integral value. Nothing wraps or truncates.
//! - **Numeric and boolean**: nonzero is `true`; `true` is 1.
//! - **Numeric and string**: invariant base-10 text. Integer targets also
//!   accept a `0x` hexadecimal form.
//! - **Binary and numeric**: big-endian, selected by length. Lengths 1, 2, 4
//!   and 8 map to the 8, 16, 32 and 64 bit integers; lengths 4 and 8 map to
//!   `f32` and `f64`. Any other length fails.
//! - **Binary and IP address**: 4 bytes are IPv4, 16 bytes are IPv6.
//! - **Dates and times**: a fixed list of formats is tried in order. Date-times
//!   convert to and from Unix-epoch seconds.
//! - **Size**: see [`Size`].
//! - **Fields**: only convert to themselves.

use crate::{FieldCollection, Size, Value, ValueKind};
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeDelta,
    TimeZone,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Date-time formats that carry an explicit offset.
const OFFSET_DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y%m%dT%H%M%S%z",
];

/// Date-time formats without offset; they are read as UTC.
const NAIVE_DATE_TIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S",
    "%Y%m%dT%H%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

const TIME_FORMATS: [&str; 4] = ["%H:%M:%S%.f", "%H:%M", "%H%M%S", "%H%M"];

static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-)?(?:([0-9]{1,8})\.)?([0-9]{1,2}):([0-9]{2})(?::([0-9]{2})(?:\.([0-9]{1,9}))?)?$")
        .expect("duration pattern is valid")
});

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

macro_rules! integer_conversions {
    ($($name:ident, $or_name:ident, $ty:ty, $signed:expr;)*) => {
        $(
            #[doc = concat!("Converts to `", stringify!($ty), "`, range checked.")]
            #[must_use]
            pub fn $name(&self) -> Option<$ty> {
                self.integer($signed).and_then(|v| <$ty>::try_from(v).ok())
            }

            #[doc = concat!("Converts to `", stringify!($ty), "` or returns `default`.")]
            #[must_use]
            pub fn $or_name(&self, default: $ty) -> $ty {
                self.$name().unwrap_or(default)
            }
        )*
    };
}

macro_rules! or_default {
    ($($name:ident, $or_name:ident, $ty:ty;)*) => {
        $(
            #[doc = concat!("Like [`Value::", stringify!($name), "`] but returns `default` on failure.")]
            #[must_use]
            pub fn $or_name(&self, default: $ty) -> $ty {
                self.$name().unwrap_or(default)
            }
        )*
    };
}

impl Value {
    integer_conversions! {
        as_i8, as_i8_or, i8, true;
        as_i16, as_i16_or, i16, true;
        as_i32, as_i32_or, i32, true;
        as_i64, as_i64_or, i64, true;
        as_u8, as_u8_or, u8, false;
        as_u16, as_u16_or, u16, false;
        as_u32, as_u32_or, u32, false;
        as_u64, as_u64_or, u64, false;
    }

    or_default! {
        as_bool, as_bool_or, bool;
        as_f32, as_f32_or, f32;
        as_f64, as_f64_or, f64;
        as_string, as_string_or, String;
        as_binary, as_binary_or, Vec<u8>;
        as_date_time, as_date_time_or, DateTime<FixedOffset>;
        as_date, as_date_or, NaiveDate;
        as_time, as_time_or, NaiveTime;
        as_duration, as_duration_or, TimeDelta;
        as_ip_address, as_ip_address_or, IpAddr;
        as_ipv4, as_ipv4_or, Ipv4Addr;
        as_ipv6, as_ipv6_or, Ipv6Addr;
        as_size, as_size_or, Size;
    }

    /// Converts to a value of `kind`, or `None` if the conversion fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mlc::{Value, ValueKind};
    ///
    /// let value = Value::from(vec![0u8, 0, 1, 0]);
    /// assert_eq!(value.convert(ValueKind::UInt32), Some(Value::UInt32(256)));
    /// assert_eq!(value.convert(ValueKind::Ipv4).map(|v| v.to_string()), Some("0.0.1.0".to_string()));
    /// assert_eq!(value.convert(ValueKind::UInt16), None);
    /// ```
    #[must_use]
    pub fn convert(&self, kind: ValueKind) -> Option<Value> {
        match kind {
            ValueKind::Null => self.is_null().then_some(Value::Null),
            ValueKind::Boolean => self.as_bool().map(Value::Boolean),
            ValueKind::Int8 => self.as_i8().map(Value::Int8),
            ValueKind::Int16 => self.as_i16().map(Value::Int16),
            ValueKind::Int32 => self.as_i32().map(Value::Int32),
            ValueKind::Int64 => self.as_i64().map(Value::Int64),
            ValueKind::UInt8 => self.as_u8().map(Value::UInt8),
            ValueKind::UInt16 => self.as_u16().map(Value::UInt16),
            ValueKind::UInt32 => self.as_u32().map(Value::UInt32),
            ValueKind::UInt64 => self.as_u64().map(Value::UInt64),
            ValueKind::Float32 => self.as_f32().map(Value::Float32),
            ValueKind::Float64 => self.as_f64().map(Value::Float64),
            ValueKind::String => self.as_string().map(Value::String),
            ValueKind::Binary => self.as_binary().map(Value::Binary),
            ValueKind::DateTime => self.as_date_time().map(Value::DateTime),
            ValueKind::Date => self.as_date().map(Value::Date),
            ValueKind::Time => self.as_time().map(Value::Time),
            ValueKind::Duration => self.as_duration().map(Value::Duration),
            ValueKind::IpAddress => self.as_ip_address().map(Value::IpAddress),
            ValueKind::Ipv4 => self.as_ipv4().map(|a| Value::IpAddress(IpAddr::V4(a))),
            ValueKind::Ipv6 => self.as_ipv6().map(|a| Value::IpAddress(IpAddr::V6(a))),
            ValueKind::Size => self.as_size().map(Value::Size),
            ValueKind::Fields => self.as_fields().map(Value::Fields),
        }
    }

    /// Converts to `bool`: numbers are `true` when nonzero, strings accept
    /// `true`/`false` in any case or a number.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Float32(v) => Some(*v != 0.0),
            Value::Float64(v) => Some(*v != 0.0),
            Value::String(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    parse_integer(s).map(|v| v != 0)
                }
            }
            Value::Binary(bytes) => decode_integer(bytes, false).map(|v| v != 0),
            Value::Size(size) => Some(size.count() != 0),
            other => other.integer(true).map(|v| v != 0),
        }
    }

    /// Converts to `f32`; `f64` sources outside the `f32` range fail.
    #[must_use]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float32(v) => Some(*v),
            Value::Binary(bytes) if bytes.len() == 4 => {
                Some(f32::from_be_bytes(bytes.as_slice().try_into().ok()?))
            }
            other => {
                let v = other.as_f64()?;
                if v.is_finite() && v.abs() > f32::MAX as f64 {
                    None
                } else {
                    Some(v as f32)
                }
            }
        }
    }

    /// Converts to `f64`. Date-times yield Unix-epoch seconds and durations
    /// their length in seconds.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(v) => Some(f64::from(*v)),
            Value::Float64(v) => Some(*v),
            Value::String(s) => {
                let s = s.trim();
                parse_integer(s)
                    .map(|v| v as f64)
                    .or_else(|| s.parse::<f64>().ok())
            }
            Value::Binary(bytes) => match bytes.len() {
                4 => Some(f64::from(f32::from_be_bytes(bytes.as_slice().try_into().ok()?))),
                8 => Some(f64::from_be_bytes(bytes.as_slice().try_into().ok()?)),
                _ => None,
            },
            Value::DateTime(dt) => {
                Some(dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / NANOS_PER_SECOND)
            }
            Value::Duration(d) => {
                Some(d.num_seconds() as f64 + f64::from(d.subsec_nanos()) / NANOS_PER_SECOND)
            }
            Value::Size(size) => Some(size.count() as f64),
            other => other.integer(true).map(|v| v as f64),
        }
    }

    /// Converts to the canonical string form.
    #[must_use]
    pub fn as_string(&self) -> Option<String> {
        Some(match self {
            Value::Null | Value::Fields(_) => return None,
            Value::Boolean(b) => b.to_string(),
            Value::Int8(v) => v.to_string(),
            Value::Int16(v) => v.to_string(),
            Value::Int32(v) => v.to_string(),
            Value::Int64(v) => v.to_string(),
            Value::UInt8(v) => v.to_string(),
            Value::UInt16(v) => v.to_string(),
            Value::UInt32(v) => v.to_string(),
            Value::UInt64(v) => v.to_string(),
            Value::Float32(v) => v.to_string(),
            Value::Float64(v) => v.to_string(),
            Value::String(s) => s.clone(),
            Value::Binary(bytes) => encode_hex(bytes),
            Value::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, false),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Time(t) => t.format("%H:%M:%S%.f").to_string(),
            Value::Duration(d) => format_duration(d),
            Value::IpAddress(addr) => addr.to_string(),
            Value::Size(size) => size.to_string(),
        })
    }

    /// Converts to bytes. Numbers use their big-endian representation at
    /// their own width; strings are read as hexadecimal.
    #[must_use]
    pub fn as_binary(&self) -> Option<Vec<u8>> {
        Some(match self {
            Value::Binary(bytes) => bytes.clone(),
            Value::Boolean(b) => vec![u8::from(*b)],
            Value::Int8(v) => v.to_be_bytes().to_vec(),
            Value::Int16(v) => v.to_be_bytes().to_vec(),
            Value::Int32(v) => v.to_be_bytes().to_vec(),
            Value::Int64(v) => v.to_be_bytes().to_vec(),
            Value::UInt8(v) => v.to_be_bytes().to_vec(),
            Value::UInt16(v) => v.to_be_bytes().to_vec(),
            Value::UInt32(v) => v.to_be_bytes().to_vec(),
            Value::UInt64(v) => v.to_be_bytes().to_vec(),
            Value::Float32(v) => v.to_be_bytes().to_vec(),
            Value::Float64(v) => v.to_be_bytes().to_vec(),
            Value::String(s) => decode_hex(s)?,
            Value::IpAddress(IpAddr::V4(addr)) => addr.octets().to_vec(),
            Value::IpAddress(IpAddr::V6(addr)) => addr.octets().to_vec(),
            Value::Size(size) => size.count().to_be_bytes().to_vec(),
            _ => return None,
        })
    }

    /// Converts to a date-time. Numbers are Unix-epoch seconds in UTC.
    #[must_use]
    pub fn as_date_time(&self) -> Option<DateTime<FixedOffset>> {
        let utc = FixedOffset::east_opt(0)?;
        match self {
            Value::DateTime(dt) => Some(*dt),
            Value::Date(d) => Some(utc.from_utc_datetime(&d.and_time(NaiveTime::MIN))),
            Value::String(s) => parse_date_time(s),
            Value::Float32(_) | Value::Float64(_) => {
                let seconds = self.as_f64()?;
                if !seconds.is_finite() {
                    return None;
                }
                let whole = seconds.floor();
                let nanos = ((seconds - whole) * NANOS_PER_SECOND).round().min(999_999_999.0);
                if whole.abs() >= i64::MAX as f64 {
                    return None;
                }
                DateTime::from_timestamp(whole as i64, nanos as u32).map(|dt| dt.fixed_offset())
            }
            Value::Boolean(_)
            | Value::Binary(_)
            | Value::Size(_)
            | Value::Duration(_)
            | Value::IpAddress(_) => None,
            other => {
                let seconds = i64::try_from(other.integer(true)?).ok()?;
                DateTime::from_timestamp(seconds, 0).map(|dt| dt.fixed_offset())
            }
        }
    }

    /// Converts to a date, truncating date-times.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::String(s) => {
                let s = s.trim();
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                    .or_else(|| parse_date_time(s).map(|dt| dt.date_naive()))
            }
            Value::Time(_) | Value::Duration(_) => None,
            other => other.as_date_time().map(|dt| dt.date_naive()),
        }
    }

    /// Converts to a time of day, truncating date-times.
    #[must_use]
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Value::Time(t) => Some(*t),
            Value::DateTime(dt) => Some(dt.time()),
            Value::String(s) => {
                let s = s.trim();
                TIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
                    .or_else(|| parse_date_time(s).map(|dt| dt.time()))
            }
            _ => None,
        }
    }

    /// Converts to a duration. Numbers are seconds; times of day become the
    /// time elapsed since midnight.
    #[must_use]
    pub fn as_duration(&self) -> Option<TimeDelta> {
        match self {
            Value::Duration(d) => Some(*d),
            Value::String(s) => parse_duration(s),
            Value::Time(t) => Some(t.signed_duration_since(NaiveTime::MIN)),
            Value::Float32(_) | Value::Float64(_) => {
                let seconds = self.as_f64()?;
                if !seconds.is_finite() || seconds.abs() >= (i64::MAX / 1000) as f64 {
                    return None;
                }
                let whole = seconds.trunc();
                let nanos = ((seconds - whole) * NANOS_PER_SECOND).round() as i64;
                TimeDelta::try_seconds(whole as i64)?.checked_add(&TimeDelta::nanoseconds(nanos))
            }
            Value::Boolean(_)
            | Value::Binary(_)
            | Value::Size(_)
            | Value::DateTime(_)
            | Value::Date(_) => None,
            other => TimeDelta::try_seconds(i64::try_from(other.integer(true)?).ok()?),
        }
    }

    /// Converts to an IP address. Integers fitting in 32 bits become IPv4.
    #[must_use]
    pub fn as_ip_address(&self) -> Option<IpAddr> {
        match self {
            Value::IpAddress(addr) => Some(*addr),
            Value::String(s) => s.trim().parse().ok(),
            Value::Binary(bytes) => match bytes.len() {
                4 => Some(IpAddr::V4(Ipv4Addr::from(
                    <[u8; 4]>::try_from(bytes.as_slice()).ok()?,
                ))),
                16 => Some(IpAddr::V6(Ipv6Addr::from(
                    <[u8; 16]>::try_from(bytes.as_slice()).ok()?,
                ))),
                _ => None,
            },
            Value::Int8(_)
            | Value::Int16(_)
            | Value::Int32(_)
            | Value::Int64(_)
            | Value::UInt8(_)
            | Value::UInt16(_)
            | Value::UInt32(_)
            | Value::UInt64(_) => self.as_u32().map(|v| IpAddr::V4(Ipv4Addr::from(v))),
            _ => None,
        }
    }

    /// Narrows to an IPv4 address.
    #[must_use]
    pub fn as_ipv4(&self) -> Option<Ipv4Addr> {
        match self.as_ip_address()? {
            IpAddr::V4(addr) => Some(addr),
            IpAddr::V6(_) => None,
        }
    }

    /// Narrows to an IPv6 address.
    #[must_use]
    pub fn as_ipv6(&self) -> Option<Ipv6Addr> {
        match self.as_ip_address()? {
            IpAddr::V6(addr) => Some(addr),
            IpAddr::V4(_) => None,
        }
    }

    /// Converts to a [`Size`]. Floats follow the same rounding as the text
    /// form: away from zero, positive fractions below one become one.
    #[must_use]
    pub fn as_size(&self) -> Option<Size> {
        match self {
            Value::Size(size) => Some(*size),
            Value::String(s) => Size::parse(s),
            Value::Float32(_) | Value::Float64(_) => Size::parse(&self.as_f64()?.to_string()),
            Value::Boolean(_)
            | Value::Int8(_)
            | Value::Int16(_)
            | Value::Int32(_)
            | Value::Int64(_)
            | Value::UInt8(_)
            | Value::UInt16(_)
            | Value::UInt32(_)
            | Value::UInt64(_)
            | Value::Binary(_) => self.as_u64().map(Size::new),
            _ => None,
        }
    }

    /// Returns the nested collection; every other kind fails.
    #[must_use]
    pub fn as_fields(&self) -> Option<FieldCollection> {
        match self {
            Value::Fields(fields) => Some(fields.clone()),
            _ => None,
        }
    }

    /// The integer view shared by every integer target.
    fn integer(&self, signed: bool) -> Option<i128> {
        match self {
            Value::Boolean(b) => Some(i128::from(*b)),
            Value::Int8(v) => Some(i128::from(*v)),
            Value::Int16(v) => Some(i128::from(*v)),
            Value::Int32(v) => Some(i128::from(*v)),
            Value::Int64(v) => Some(i128::from(*v)),
            Value::UInt8(v) => Some(i128::from(*v)),
            Value::UInt16(v) => Some(i128::from(*v)),
            Value::UInt32(v) => Some(i128::from(*v)),
            Value::UInt64(v) => Some(i128::from(*v)),
            Value::Float32(v) => integral(f64::from(*v)),
            Value::Float64(v) => integral(*v),
            Value::String(s) => parse_integer(s.trim()),
            Value::Binary(bytes) => decode_integer(bytes, signed),
            Value::DateTime(dt) => Some(i128::from(dt.timestamp())),
            Value::Duration(d) if d.subsec_nanos() == 0 => Some(i128::from(d.num_seconds())),
            Value::Size(size) => Some(i128::from(size.count())),
            Value::IpAddress(IpAddr::V4(addr)) => Some(i128::from(u32::from(*addr))),
            _ => None,
        }
    }
}

fn integral(v: f64) -> Option<i128> {
    // 2^64 bounds every target, so anything larger is out of range anyway.
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 18_446_744_073_709_551_616.0 {
        Some(v as i128)
    } else {
        None
    }
}

/// Parses a base-10 integer or a `0x`-prefixed hexadecimal integer.
fn parse_integer(s: &str) -> Option<i128> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) if !hex.is_empty() && !hex.starts_with(['+', '-']) => {
            i128::from_str_radix(hex, 16).ok()?
        }
        Some(_) => return None,
        None => digits.parse::<i128>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}

fn decode_integer(bytes: &[u8], signed: bool) -> Option<i128> {
    Some(match (bytes.len(), signed) {
        (1, true) => i128::from(i8::from_be_bytes([bytes[0]])),
        (1, false) => i128::from(bytes[0]),
        (2, true) => i128::from(i16::from_be_bytes(bytes.try_into().ok()?)),
        (2, false) => i128::from(u16::from_be_bytes(bytes.try_into().ok()?)),
        (4, true) => i128::from(i32::from_be_bytes(bytes.try_into().ok()?)),
        (4, false) => i128::from(u32::from_be_bytes(bytes.try_into().ok()?)),
        (8, true) => i128::from(i64::from_be_bytes(bytes.try_into().ok()?)),
        (8, false) => i128::from(u64::from_be_bytes(bytes.try_into().ok()?)),
        _ => return None,
    })
}

pub(crate) fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub(crate) fn decode_hex(text: &str) -> Option<Vec<u8>> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex::decode(digits).ok()
}

/// Tries the date-time formats in order; offset-less forms are UTC and a
/// bare date is midnight.
pub(crate) fn parse_date_time(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    if let Some(dt) = OFFSET_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt);
    }
    let utc = FixedOffset::east_opt(0)?;
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .map(|naive| utc.from_utc_datetime(&naive))
}

/// Formats as `[-][d.]hh:mm:ss[.fffffffff]`.
fn format_duration(d: &TimeDelta) -> String {
    let negative = *d < TimeDelta::zero();
    let magnitude = if negative { -*d } else { *d };
    let total = magnitude.num_seconds();
    let nanos = magnitude.subsec_nanos();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        let _ = write!(out, "{}.", days);
    }
    let _ = write!(out, "{:02}:{:02}:{:02}", hours, minutes, seconds);
    if nanos > 0 {
        let fraction = format!("{:09}", nanos);
        let _ = write!(out, ".{}", fraction.trim_end_matches('0'));
    }
    out
}

fn parse_duration(text: &str) -> Option<TimeDelta> {
    let captures = DURATION_PATTERN.captures(text.trim())?;
    let number = |i: usize| -> Option<i64> {
        captures
            .get(i)
            .map_or(Some(0), |m| m.as_str().parse::<i64>().ok())
    };
    let hours = number(3)?;
    let minutes = number(4)?;
    let seconds = number(5)?;
    if hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }
    let nanos = match captures.get(6) {
        Some(m) => format!("{:0<9}", m.as_str()).parse::<i64>().ok()?,
        None => 0,
    };
    let total = TimeDelta::try_days(number(2)?)?
        .checked_add(&TimeDelta::try_hours(hours)?)?
        .checked_add(&TimeDelta::try_minutes(minutes)?)?
        .checked_add(&TimeDelta::try_seconds(seconds)?)?
        .checked_add(&TimeDelta::nanoseconds(nanos))?;
    Some(if captures.get(1).is_some() { -total } else { total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_numeric_narrowing() {
        assert_eq!(Value::from(127i64).as_i8(), Some(127));
        assert_eq!(Value::from(128i64).as_i8(), None);
        assert_eq!(Value::from(-1i32).as_u64(), None);
        assert_eq!(Value::from(u64::MAX).as_i64(), None);
        assert_eq!(Value::from(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(Value::from(255u8).as_i16(), Some(255));
        assert_eq!(Value::from(3.0f64).as_i32(), Some(3));
        assert_eq!(Value::from(3.5f64).as_i32(), None);
        assert_eq!(Value::from(f64::NAN).as_i64(), None);
        assert_eq!(Value::from(1e300f64).as_f32(), None);
        assert_eq!(Value::from(1.5f64).as_f32(), Some(1.5));
        assert_eq!(Value::from(7i16).as_f64(), Some(7.0));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Value::from(300i32).as_u8_or(9), 9);
        assert!(Value::from("x").as_bool_or(true));
        assert_eq!(Value::Null.as_string_or("none".to_string()), "none");
    }

    #[test]
    fn test_boolean() {
        assert_eq!(Value::from(0i32).as_bool(), Some(false));
        assert_eq!(Value::from(-4i64).as_bool(), Some(true));
        assert_eq!(Value::from(0.0f64).as_bool(), Some(false));
        assert_eq!(Value::from("TRUE").as_bool(), Some(true));
        assert_eq!(Value::from("0").as_bool(), Some(false));
        assert_eq!(Value::from("maybe").as_bool(), None);
        assert_eq!(Value::from(true).as_u8(), Some(1));
        assert_eq!(Value::from(false).as_f64(), Some(0.0));
    }

    #[test]
    fn test_string_numbers() {
        assert_eq!(Value::from(" 42 ").as_i32(), Some(42));
        assert_eq!(Value::from("-42").as_i32(), Some(-42));
        assert_eq!(Value::from("+7").as_u8(), Some(7));
        assert_eq!(Value::from("0xff").as_u8(), Some(255));
        assert_eq!(Value::from("0xFF").as_i8(), None);
        assert_eq!(Value::from("-0x10").as_i32(), Some(-16));
        assert_eq!(Value::from("0x").as_i32(), None);
        assert_eq!(Value::from("--1").as_i32(), None);
        assert_eq!(Value::from("1.5").as_i32(), None);
        assert_eq!(Value::from("1.5").as_f64(), Some(1.5));
        assert_eq!(Value::from("0x10").as_f64(), Some(16.0));
        assert_eq!(Value::from(-17i8).as_string().as_deref(), Some("-17"));
        assert_eq!(Value::from(2.5f32).as_string().as_deref(), Some("2.5"));
    }

    #[test]
    fn test_binary_numbers() {
        assert_eq!(Value::from(vec![0xFFu8]).as_i8(), Some(-1));
        assert_eq!(Value::from(vec![0xFFu8]).as_u8(), Some(255));
        assert_eq!(Value::from(vec![0x01u8, 0x00]).as_u16(), Some(256));
        assert_eq!(Value::from(vec![0xFFu8, 0xFE]).as_i64(), Some(-2));
        assert_eq!(Value::from(vec![0x01u8, 0x00]).as_i8(), None);
        assert_eq!(Value::from(vec![1u8, 2, 3]).as_i32(), None);
        assert_eq!(Value::from(vec![1u8, 2, 3]).as_bool(), None);
        assert_eq!(
            Value::from(1.25f32.to_be_bytes().to_vec()).as_f32(),
            Some(1.25)
        );
        assert_eq!(
            Value::from((-8.5f64).to_be_bytes().to_vec()).as_f64(),
            Some(-8.5)
        );
        assert_eq!(Value::from(vec![0u8, 1]).as_f64(), None);

        assert_eq!(Value::from(258u16).as_binary(), Some(vec![1, 2]));
        assert_eq!(Value::from(-2i32).as_binary(), Some(vec![0xFF, 0xFF, 0xFF, 0xFE]));
        let bytes = Value::from(-2i32).as_binary().unwrap();
        assert_eq!(Value::from(bytes).as_i32(), Some(-2));
    }

    #[test]
    fn test_binary_strings() {
        assert_eq!(Value::from(vec![0xDEu8, 0xAD]).as_string().as_deref(), Some("dead"));
        assert_eq!(Value::from("DEAD").as_binary(), Some(vec![0xDE, 0xAD]));
        assert_eq!(Value::from("0x00ff").as_binary(), Some(vec![0x00, 0xFF]));
        assert_eq!(Value::from("abc").as_binary(), None);
        assert_eq!(Value::from("zz").as_binary(), None);
        assert_eq!(Value::from("").as_binary(), Some(vec![]));
        assert_eq!(Value::from(" 0XBeEf ").as_binary(), Some(vec![0xBE, 0xEF]));
        assert_eq!(Value::from("0x").as_binary(), Some(vec![]));
        assert_eq!(Value::from("éa").as_binary(), None);
    }

    #[test]
    fn test_ip_addresses() {
        let v4 = Value::from(vec![192u8, 168, 0, 1]);
        assert_eq!(v4.as_ipv4(), Some(Ipv4Addr::new(192, 168, 0, 1)));
        assert_eq!(v4.as_ipv6(), None);

        let v6 = Value::from(Ipv6Addr::LOCALHOST.octets().to_vec());
        assert_eq!(v6.as_ipv6(), Some(Ipv6Addr::LOCALHOST));
        assert_eq!(Value::from(vec![1u8; 5]).as_ip_address(), None);

        let parsed = Value::from("10.1.2.3");
        assert_eq!(parsed.as_binary(), None);
        assert_eq!(
            parsed.convert(ValueKind::IpAddress).and_then(|v| v.as_binary()),
            Some(vec![10, 1, 2, 3])
        );
        assert_eq!(Value::from(Ipv4Addr::new(0, 0, 1, 0)).as_u32(), Some(256));
        assert_eq!(Value::from(256u32).as_ipv4(), Some(Ipv4Addr::new(0, 0, 1, 0)));
        assert_eq!(Value::from(-1i32).as_ip_address(), None);
    }

    #[test]
    fn test_date_times() {
        let dt = Value::from("2024-01-15T10:30:00.5+02:00").as_date_time().unwrap();
        assert_eq!(dt.timestamp(), 1_705_307_400);
        assert_eq!(dt.offset().local_minus_utc(), 7200);

        let compact = Value::from("20240115T1030").as_date_time().unwrap();
        assert_eq!(compact.to_rfc3339(), "2024-01-15T10:30:00+00:00");

        let date_only = Value::from("2024-02-29").as_date_time().unwrap();
        assert_eq!(date_only.time(), NaiveTime::MIN);

        assert_eq!(Value::from("2024-13-01").as_date_time(), None);
        assert_eq!(Value::from("not a date").as_date(), None);

        let epoch = Value::from(86_400i64).as_date_time().unwrap();
        assert_eq!(epoch.date_naive(), NaiveDate::from_ymd_opt(1970, 1, 2).unwrap());
        assert_eq!(Value::from(epoch).as_i64(), Some(86_400));
        assert_eq!(Value::from(1.5f64).as_date_time().map(|d| d.timestamp_subsec_millis()), Some(500));

        let text = Value::DateTime(dt).as_string().unwrap();
        assert_eq!(Value::from(text.as_str()).as_date_time(), Some(dt));
    }

    #[test]
    fn test_dates_and_times() {
        let value = Value::from("2024-01-15T10:30:45+00:00");
        assert_eq!(value.as_date().map(|d| d.day()), Some(15));
        assert_eq!(value.as_time().map(|t| t.num_seconds_from_midnight()), Some(37_845));

        assert_eq!(Value::from("20240115").as_date(), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(Value::from("07:05").as_time(), NaiveTime::from_hms_opt(7, 5, 0));
        assert_eq!(
            Value::from("070509").as_time(),
            NaiveTime::from_hms_opt(7, 5, 9)
        );
        let time = NaiveTime::from_hms_milli_opt(1, 2, 3, 250).unwrap();
        assert_eq!(Value::from(time).as_string().as_deref(), Some("01:02:03.250"));
        assert_eq!(Value::from(time).as_date(), None);
    }

    #[test]
    fn test_durations() {
        let d = TimeDelta::try_seconds(93_784).unwrap() + TimeDelta::milliseconds(500);
        let text = Value::from(d).as_string().unwrap();
        assert_eq!(text, "1.02:03:04.5");
        assert_eq!(Value::from(text.as_str()).as_duration(), Some(d));
        assert_eq!(Value::from("-00:00:30").as_duration(), TimeDelta::try_seconds(-30));
        assert_eq!(Value::from("12:30").as_duration(), TimeDelta::try_minutes(750));
        assert_eq!(Value::from("25:00").as_duration(), None);
        assert_eq!(Value::from(90i32).as_duration(), TimeDelta::try_seconds(90));
        assert_eq!(Value::from(TimeDelta::try_seconds(90).unwrap()).as_i64(), Some(90));
        assert_eq!(Value::from(d).as_i64(), None);
        assert_eq!(Value::from(d).as_f64(), Some(93_784.5));
        assert_eq!(Value::from(0.25f64).as_duration(), Some(TimeDelta::milliseconds(250)));
    }

    #[test]
    fn test_sizes() {
        assert_eq!(Value::from("2Ki").as_size(), Some(Size::new(2048)));
        assert_eq!(Value::from("2Ki").as_u64(), None);
        assert_eq!(Value::from(Size::new(2048)).as_u16(), Some(2048));
        assert_eq!(Value::from(Size::new(70_000)).as_u16(), None);
        assert_eq!(Value::from(1.5f64).as_size(), Some(Size::new(2)));
        assert_eq!(Value::from(0.2f64).as_size(), Some(Size::new(1)));
        assert_eq!(Value::from(-1.0f64).as_size(), None);
        assert_eq!(Value::from(-1i32).as_size(), None);
        assert_eq!(Value::from(12u8).as_size(), Some(Size::new(12)));
    }

    #[test]
    fn test_fields_only_convert_to_themselves() {
        let fields = FieldCollection::new();
        let value = Value::from(fields.clone());
        for kind in ValueKind::ALL {
            let converted = value.convert(kind);
            if kind == ValueKind::Fields {
                assert_eq!(converted, Some(Value::Fields(fields.clone())));
            } else {
                assert_eq!(converted, None, "{} should not convert", kind);
            }
        }
    }

    #[test]
    fn test_null_converts_to_nothing_else() {
        for kind in ValueKind::ALL {
            let converted = Value::Null.convert(kind);
            assert_eq!(converted.is_some(), kind == ValueKind::Null, "{}", kind);
        }
    }

    #[test]
    fn test_matrix_is_total() {
        let samples = vec![
            Value::from(true),
            Value::from(i8::MIN),
            Value::from(u64::MAX),
            Value::from(f32::INFINITY),
            Value::from(f64::NAN),
            Value::from(""),
            Value::from("  \u{1F600} "),
            Value::from(vec![0u8; 8]),
            Value::from(TimeDelta::try_days(100_000_000).unwrap()),
            Value::from(-TimeDelta::try_days(100_000_000).unwrap()),
            Value::from(NaiveDate::MAX),
            Value::from(NaiveTime::MIN),
            Value::from(Size::new(u64::MAX)),
            Value::from(Ipv6Addr::UNSPECIFIED),
            Value::from(1e19f64),
        ];
        for value in &samples {
            for kind in ValueKind::ALL {
                let _ = value.convert(kind);
            }
        }
    }
}
