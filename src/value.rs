//! Scalar values carried by fields.
//!
//! This module provides the [`Value`] enum, a closed set of scalar kinds plus
//! a nested [`FieldCollection`]. Every kind can be asked for every other kind
//! through the conversion methods in [`crate::convert`]; a conversion that
//! does not make sense simply yields `None`.
//!
//! ## Core Types
//!
//! - [`Value`]: null, boolean, signed and unsigned integers of 8 to 64 bits,
//!   32 and 64 bit floats, string, binary, date-time, date, time, duration,
//!   IP address, size and nested fields
//! - [`ValueKind`]: the discriminant, used to request a conversion by kind
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use mlc::{Size, Value};
//!
//! let flag = Value::from(true);
//! let port = Value::from(8080u16);
//! let text = Value::from("hello");
//! let size = Value::from(Size::new(2048));
//! let addr = Value::parse_ip_address("10.0.0.1").unwrap();
//! ```
//!
//! ### Converting Between Kinds
//!
//! ```rust
//! use mlc::{Value, ValueKind};
//!
//! let value = Value::from("0x1F");
//! assert_eq!(value.as_u8(), Some(31));
//! assert_eq!(value.as_i8_or(-1), 31);
//!
//! // Out of range conversions are empty, never truncated
//! assert_eq!(Value::from(300i32).as_u8(), None);
//!
//! // Narrowing to a kind yields a new value of that kind
//! assert_eq!(Value::from("42").convert(ValueKind::Int64), Some(Value::Int64(42)));
//! ```

use crate::{Error, FieldCollection, Result, Size};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// A dynamically-typed scalar, or a nested collection of fields.
///
/// Equality is structural: two `Fields` values are equal when their
/// collections hold equal fields in the same order.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Binary(Vec<u8>),
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
    Time(NaiveTime),
    Duration(TimeDelta),
    IpAddress(IpAddr),
    Size(Size),
    Fields(FieldCollection),
}

/// The kind of a [`Value`].
///
/// `Ipv4` and `Ipv6` are narrowing targets only; [`Value::kind`] reports
/// every address as `IpAddress`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    Binary,
    DateTime,
    Date,
    Time,
    Duration,
    IpAddress,
    Ipv4,
    Ipv6,
    Size,
    Fields,
}

impl ValueKind {
    /// Every kind, in declaration order.
    pub const ALL: [ValueKind; 23] = [
        ValueKind::Null,
        ValueKind::Boolean,
        ValueKind::Int8,
        ValueKind::Int16,
        ValueKind::Int32,
        ValueKind::Int64,
        ValueKind::UInt8,
        ValueKind::UInt16,
        ValueKind::UInt32,
        ValueKind::UInt64,
        ValueKind::Float32,
        ValueKind::Float64,
        ValueKind::String,
        ValueKind::Binary,
        ValueKind::DateTime,
        ValueKind::Date,
        ValueKind::Time,
        ValueKind::Duration,
        ValueKind::IpAddress,
        ValueKind::Ipv4,
        ValueKind::Ipv6,
        ValueKind::Size,
        ValueKind::Fields,
    ];

    /// Returns `true` for the integer and floating point kinds.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            ValueKind::Int8
                | ValueKind::Int16
                | ValueKind::Int32
                | ValueKind::Int64
                | ValueKind::UInt8
                | ValueKind::UInt16
                | ValueKind::UInt32
                | ValueKind::UInt64
                | ValueKind::Float32
                | ValueKind::Float64
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Int8(_) => ValueKind::Int8,
            Value::Int16(_) => ValueKind::Int16,
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::UInt8(_) => ValueKind::UInt8,
            Value::UInt16(_) => ValueKind::UInt16,
            Value::UInt32(_) => ValueKind::UInt32,
            Value::UInt64(_) => ValueKind::UInt64,
            Value::Float32(_) => ValueKind::Float32,
            Value::Float64(_) => ValueKind::Float64,
            Value::String(_) => ValueKind::String,
            Value::Binary(_) => ValueKind::Binary,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Date(_) => ValueKind::Date,
            Value::Time(_) => ValueKind::Time,
            Value::Duration(_) => ValueKind::Duration,
            Value::IpAddress(_) => ValueKind::IpAddress,
            Value::Size(_) => ValueKind::Size,
            Value::Fields(_) => ValueKind::Fields,
        }
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a nested collection.
    #[inline]
    #[must_use]
    pub const fn is_fields(&self) -> bool {
        matches!(self, Value::Fields(_))
    }

    /// Returns `true` if the value is one of the integer or float kinds.
    #[inline]
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.kind().is_numeric()
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Parses an IP address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if `text` is not an IPv4 or IPv6 address.
    pub fn parse_ip_address(text: &str) -> Result<Value> {
        text.trim()
            .parse::<IpAddr>()
            .map(Value::IpAddress)
            .map_err(|_| Error::invalid_value("IP address", text))
    }

    /// Parses a hexadecimal binary string (an optional `0x` prefix is allowed).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] on odd length or non-hex characters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mlc::Value;
    ///
    /// assert_eq!(Value::parse_binary("0x0102").unwrap(), Value::Binary(vec![1, 2]));
    /// assert!(Value::parse_binary("xyz").is_err());
    /// ```
    pub fn parse_binary(text: &str) -> Result<Value> {
        crate::convert::decode_hex(text)
            .map(Value::Binary)
            .ok_or_else(|| Error::invalid_value("binary", text))
    }

    /// Parses a size with an optional unit suffix (see [`Size`]).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] for negative values or unknown units.
    pub fn parse_size(text: &str) -> Result<Value> {
        text.parse::<Size>().map(Value::Size)
    }

    /// Parses a date-time using the accepted formats, in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] when no format matches.
    pub fn parse_date_time(text: &str) -> Result<Value> {
        crate::convert::parse_date_time(text)
            .map(Value::DateTime)
            .ok_or_else(|| Error::invalid_value("date-time", text))
    }
}

impl fmt::Display for Value {
    /// Writes the canonical string form. Null writes nothing and nested
    /// fields write their notation text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Fields(fields) => write!(f, "{}", crate::to_string(fields)),
            other => write!(f, "{}", other.as_string().unwrap_or_default()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Int8(v) => serializer.serialize_i8(*v),
            Value::Int16(v) => serializer.serialize_i16(*v),
            Value::Int32(v) => serializer.serialize_i32(*v),
            Value::Int64(v) => serializer.serialize_i64(*v),
            Value::UInt8(v) => serializer.serialize_u8(*v),
            Value::UInt16(v) => serializer.serialize_u16(*v),
            Value::UInt32(v) => serializer.serialize_u32(*v),
            Value::UInt64(v) => serializer.serialize_u64(*v),
            Value::Float32(v) => serializer.serialize_f32(*v),
            Value::Float64(v) => serializer.serialize_f64(*v),
            Value::String(s) => serializer.serialize_str(s),
            Value::Binary(bytes) => serializer.serialize_bytes(bytes),
            Value::Fields(fields) => fields.serialize(serializer),
            other => serializer.serialize_str(&other.as_string().unwrap_or_default()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a scalar value or a map of fields")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Value, E> {
                Ok(Value::Boolean(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Value, E> {
                Ok(Value::Int64(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Value, E> {
                Ok(Value::UInt64(value))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Value, E> {
                Ok(Value::Float64(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<Value, E> {
                Ok(Value::Binary(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> std::result::Result<Value, E> {
                Ok(Value::Binary(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_map<A>(self, map: A) -> std::result::Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                FieldCollection::from_map_access(map).map(Value::Fields)
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    bool => Boolean,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Vec<u8> => Binary,
    DateTime<FixedOffset> => DateTime,
    NaiveDate => Date,
    NaiveTime => Time,
    TimeDelta => Duration,
    IpAddr => IpAddress,
    Size => Size,
    FieldCollection => Fields,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Binary(value.to_vec())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value.fixed_offset())
    }
}

impl From<Ipv4Addr> for Value {
    fn from(value: Ipv4Addr) -> Self {
        Value::IpAddress(IpAddr::V4(value))
    }
}

impl From<Ipv6Addr> for Value {
    fn from(value: Ipv6Addr) -> Self {
        Value::IpAddress(IpAddr::V6(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
