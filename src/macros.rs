/// Builds a [`FieldCollection`](crate::FieldCollection) from a literal
/// description.
///
/// Each entry is `"name" => value`, where `value` is anything convertible
/// into a [`Value`](crate::Value) or a braced block of nested entries.
/// Names may repeat.
///
/// # Panics
///
/// Panics if a name is invalid or a value is [`Value::Null`](crate::Value::Null).
///
/// # Examples
///
/// ```rust
/// use mlc::{fields, Value};
///
/// let config = fields! {
///     ".Version" => "2",
///     "Server" => {
///         "Host" => "example.org",
///         "Port" => 8080u16,
///     },
///     "Empty" => {},
/// };
///
/// assert_eq!(config.len(), 3);
/// assert_eq!(config.get_path("Server/Port"), Some(Value::UInt16(8080)));
/// assert!(config.find_first("Empty").unwrap().has_subfields());
/// ```
#[macro_export]
macro_rules! fields {
    (@add $collection:ident; ) => {};

    // Nested block
    (@add $collection:ident; $name:literal => { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $collection
            .add(
                $crate::Field::with_value($name, $crate::Value::Fields($crate::fields!($($inner)*)))
                    .expect("fields!: invalid field name"),
            )
            .expect("fields!: field already owned");
        $crate::fields!(@add $collection; $($($rest)*)?);
    };

    // Scalar
    (@add $collection:ident; $name:literal => $value:expr $(, $($rest:tt)*)?) => {
        $collection
            .add(
                $crate::Field::with_value($name, $value)
                    .expect("fields!: invalid field name or null value"),
            )
            .expect("fields!: field already owned");
        $crate::fields!(@add $collection; $($($rest)*)?);
    };

    ($($body:tt)*) => {{
        let collection = $crate::FieldCollection::new();
        $crate::fields!(@add collection; $($body)*);
        collection
    }};
}
