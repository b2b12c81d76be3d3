//! Property-based tests for the codec guarantees: written values parse back
//! unchanged and parse/write reaches a fixed point.

use mlc::{from_str, to_string, Field, FieldCollection, Size, Value};
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    "\\.?[A-Za-z0-9][A-Za-z0-9-]{0,8}"
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[ a-zA-Z0-9\\[\\]\\\\:=\t\r\n_!-]{0,24}"
}

fn tag_line_strategy() -> impl Strategy<Value = (String, String, Vec<String>, String)> {
    (
        name_strategy(),
        "[a-zA-Z0-9:=_-]{0,12}",
        prop::collection::vec("[!+]?[A-Za-z][A-Za-z0-9]{0,6}", 1..4),
        prop::sample::select(vec![" ", ",", ";", ", ", "; "]),
    )
        .prop_map(|(name, value, tags, separator)| (name, value, tags, separator.to_string()))
}

/// A small random tree: up to three levels, up to four fields each.
fn tree_strategy() -> impl Strategy<Value = Vec<(String, Option<String>, Vec<(String, String)>)>> {
    prop::collection::vec(
        (
            name_strategy(),
            prop::option::of(text_strategy()),
            prop::collection::vec((name_strategy(), text_strategy()), 0..4),
        ),
        0..5,
    )
}

fn build(tree: &[(String, Option<String>, Vec<(String, String)>)]) -> FieldCollection {
    let fields = FieldCollection::new();
    for (name, value, children) in tree {
        let field = Field::new(name).unwrap();
        match value {
            Some(value) => field.set_value(value.as_str()).unwrap(),
            None => {
                for (child, text) in children {
                    field
                        .subfields()
                        .add(Field::with_value(child, text.as_str()).unwrap())
                        .unwrap();
                }
            }
        }
        fields.add(field).unwrap();
    }
    fields
}

proptest! {
    #[test]
    fn prop_value_round_trip(text in text_strategy()) {
        let fields = FieldCollection::new();
        fields.add(Field::with_value("V", text.as_str()).unwrap()).unwrap();
        let parsed = from_str(&to_string(&fields)).unwrap();
        prop_assert_eq!(parsed.get_path("V"), Some(Value::from(text)));
    }

    #[test]
    fn prop_write_parse_fixed_point(tree in tree_strategy()) {
        // The first parse moves header fields first; after that the text is stable.
        let written = to_string(&build(&tree));
        let once = to_string(&from_str(&written).unwrap());
        let twice = to_string(&from_str(&once).unwrap());
        prop_assert_eq!(&once, &twice);
    }

    #[test]
    fn prop_size_display_parses_back(count in any::<u64>()) {
        let size = Size::new(count);
        prop_assert_eq!(Size::parse(&size.to_string()), Some(size));
    }

    #[test]
    fn prop_integer_strings_convert(n in any::<i64>()) {
        let value = Value::from(n.to_string());
        prop_assert_eq!(value.as_i64(), Some(n));
    }

    #[test]
    fn prop_trailing_tags_reach_fixed_point((name, value, tags, separator) in tag_line_strategy()) {
        let line = format!("{}: {} [{}]\n", name, value, tags.join(&separator));
        let parsed = from_str(&line).unwrap();
        let field = parsed.find_first(&name).unwrap();
        prop_assert_eq!(field.value(), Some(Value::from(value)));
        prop_assert!(field.has_tags());

        let once = to_string(&parsed);
        prop_assert_eq!(&from_str(&once).unwrap(), &parsed);
        prop_assert_eq!(to_string(&from_str(&once).unwrap()), once);
    }
}
