use mlc::{
    fields, from_str, to_string, Error, Field, FieldCollection, Size, Tag, Value, ValueKind,
};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_field_names() {
    for name in ["Name", ".Header", "a-b-c", "Ünïcödé", "42"] {
        assert!(Field::is_name_valid(name), "{} should be valid", name);
        assert!(Field::new(name).is_ok());
    }
    for name in ["", "-lead", "with space", "dot.inside", "slash/name", "tab\tname"] {
        assert!(!Field::is_name_valid(name), "{:?} should be invalid", name);
        assert!(matches!(Field::new(name), Err(Error::InvalidName { .. })));
    }
}

#[test]
fn test_tag_names() {
    for name in ["Test", "@Meta", "Ab12"] {
        assert!(Tag::is_name_valid(name), "{}", name);
    }
    for name in ["", "1st", "a-b", "@", "a b"] {
        assert!(!Tag::is_name_valid(name), "{:?}", name);
    }
}

#[test]
fn test_ownership_is_exclusive() {
    let first = FieldCollection::new();
    let second = FieldCollection::new();
    let field = Field::with_value("Shared", "x").unwrap();

    first.add(field.clone()).unwrap();
    let err = second.add(field.clone()).unwrap_err();
    assert_eq!(err, Error::DuplicateOwnership("Shared".to_string()));
    assert!(second.is_empty());

    let err = second.insert(0, field.clone()).unwrap_err();
    assert!(matches!(err, Error::DuplicateOwnership(_)));

    assert!(first.remove(&field).unwrap());
    second.add(field.clone()).unwrap();
    assert!(field.owner().unwrap().ptr_eq(&second));
}

#[test]
fn test_value_and_subfields_complement() {
    let field = Field::new("F").unwrap();
    let check = |f: &Field| assert_eq!(f.has_value(), !f.has_subfields());

    check(&field);
    field.set_value(1u8).unwrap();
    check(&field);
    field.subfields().add(Field::new("G").unwrap()).unwrap();
    check(&field);
    assert!(!field.has_value());
    field.set_value("back").unwrap();
    check(&field);
    assert!(field.subfields().is_empty());
}

#[test]
fn test_find_order_with_duplicates() {
    let data = fields! {
        "Item" => "first",
        "Other" => "-",
        "item" => "second",
        "ITEM" => "third",
    };
    let values: Vec<Value> = data
        .find_all("Item")
        .iter()
        .filter_map(Field::value)
        .collect();
    assert_eq!(values, [Value::from("first"), Value::from("second"), Value::from("third")]);
    assert_eq!(data.find_first("ITEM").unwrap().value(), Some(Value::from("first")));
    assert_eq!(data.find_last("item").unwrap().value(), Some(Value::from("third")));
}

#[test]
fn test_path_write_creates_and_read_never_mutates() {
    let data = FieldCollection::new();
    data.set_path("B/C", "3").unwrap();
    assert_eq!(data.get_path("B/C"), Some(Value::from("3")));
    assert_eq!(data.get_path("B"), None);

    let before = to_string(&data);
    assert_eq!(data.get_path("X/Y/Z"), None);
    assert!(data.find_first("B/missing/deeper").is_none());
    assert_eq!(to_string(&data), before);
}

#[test]
fn test_path_separators_and_case() {
    let data = FieldCollection::new();
    data.set_path(r"Root\Child", 5i64).unwrap();
    assert_eq!(data.get_path("root/CHILD"), Some(Value::Int64(5)));
    assert_eq!(data.find_first("Root").unwrap().subfields().len(), 1);
}

#[test]
fn test_read_only_snapshot() {
    let data = from_str("A:\n    B: 1\nC: 2\n").unwrap();
    let snapshot = data.as_read_only();
    assert_eq!(snapshot, data);

    data.set_path("A/B", "changed").unwrap();
    data.add_path("D", "new").unwrap();
    assert_eq!(snapshot.get_path("A/B"), Some(Value::from("1")));
    assert!(snapshot.find_first("D").is_none());
    assert_ne!(snapshot, data);

    assert_eq!(snapshot.set_path("A/B", "x"), Err(Error::ReadOnly));
    let c = snapshot.find_first("C").unwrap();
    assert_eq!(c.set_value("x"), Err(Error::ReadOnly));
    assert_eq!(c.edit_tags(|tags| tags.set("T", true)), Err(Error::ReadOnly));

    let copy = snapshot.deep_clone();
    assert!(!copy.is_read_only());
    copy.set_path("A/B", "writable").unwrap();
}

#[test]
fn test_change_handlers_see_each_mutation() {
    let data = FieldCollection::new();
    let log: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&log);
    let view = data.clone();
    data.on_changed(move || sink.borrow_mut().push(view.all_paths().count()));

    let server = Field::new("Server").unwrap();
    data.add(server.clone()).unwrap();
    server.subfields().add(Field::with_value("Port", 80u16).unwrap()).unwrap();
    server.subfields().remove_at(0).unwrap();

    assert_eq!(*log.borrow(), [1, 2, 1]);
}

#[test]
fn test_all_paths_is_lazy_preorder() {
    let data = from_str("A:\n  B: 1\n  C:\n    D: 2\nE: 3\n").unwrap();
    let mut paths = data.all_paths();
    assert_eq!(paths.next().map(|(p, _)| p), Some("A".to_string()));
    assert_eq!(paths.next().map(|(p, _)| p), Some("A/B".to_string()));

    let valued: Vec<(String, Value)> = data
        .paths_with_value()
        .filter_map(|(p, f)| f.value().map(|v| (p, v)))
        .collect();
    assert_eq!(
        valued,
        [
            ("A/B".to_string(), Value::from("1")),
            ("A/C/D".to_string(), Value::from("2")),
            ("E".to_string(), Value::from("3")),
        ]
    );
}

#[test]
fn test_typed_access_of_parsed_values() {
    let data = from_str(
        "Count: 0x1F\nRatio: 0.25\nEnabled: true\nMemory: 2Ki\nHost: 10.0.0.1\nWhen: 2024-01-15T10:30:00Z\nTimeout: 00:01:30\n",
    )
    .unwrap();

    let get = |path: &str| data.get_path(path).unwrap();
    assert_eq!(get("Count").as_u8(), Some(31));
    assert_eq!(get("Ratio").as_f64(), Some(0.25));
    assert_eq!(get("Enabled").as_bool(), Some(true));
    assert_eq!(get("Memory").as_size(), Some(Size::new(2048)));
    assert_eq!(get("Host").convert(ValueKind::Ipv4).map(|v| v.kind()), Some(ValueKind::IpAddress));
    assert_eq!(get("When").as_date_time().map(|d| d.timestamp()), Some(1_705_314_600));
    assert_eq!(get("Timeout").as_duration().map(|d| d.num_seconds()), Some(90));
    assert_eq!(get("Host").as_date(), None);
}

#[test]
fn test_serde_json_interop() {
    let data = fields! { "A" => 1u32, "B" => { "C" => "x" } };
    let json = serde_json::to_string(&data).unwrap();
    assert_eq!(json, r#"{"A":1,"B":{"C":"x"}}"#);

    let back: FieldCollection = serde_json::from_str(&json).unwrap();
    assert_eq!(back.get_path("B/C"), Some(Value::from("x")));
    assert_eq!(back.get_path("A"), Some(Value::UInt64(1)));

    let empty: FieldCollection = serde_json::from_str(r#"{"E": null}"#).unwrap();
    assert!(empty.find_first("E").unwrap().has_subfields());
}

#[test]
fn test_field_value_from_collection_copies() {
    let source = fields! { "X" => 1 };
    let holder = Field::with_value("Holder", source.clone()).unwrap();
    source.set_path("X", 2).unwrap();
    assert_eq!(holder.subfields().get_path("X"), Some(Value::Int32(1)));
    assert!(!source.find_first("X").unwrap().owner().unwrap().ptr_eq(&holder.subfields()));
}
