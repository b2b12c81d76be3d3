//! Ordered, owning lists of fields with path addressing.
//!
//! A [`FieldCollection`] keeps its fields in insertion order and allows
//! repeated names. Every field belongs to at most one collection at a time;
//! adding a field that is already owned fails with
//! [`Error::DuplicateOwnership`], and adding a field to its own subtree
//! fails with [`Error::CyclicOwnership`].
//!
//! ## Paths
//!
//! Names are matched case-insensitively. A name containing `/` or `\` is a
//! path: each intermediate segment descends into the first matching field,
//! and the last segment is resolved in the collection reached.
//!
//! ```rust
//! use mlc::{FieldCollection, Value};
//!
//! let fields = FieldCollection::new();
//! fields.set_path("Server/Port", 8080u16).unwrap();
//! fields.add_path("Server/Alias", "www").unwrap();
//! fields.add_path("Server/Alias", "api").unwrap();
//!
//! assert_eq!(fields.get_path("server/port"), Some(Value::UInt16(8080)));
//! assert_eq!(fields.find_all("Server/Alias").len(), 2);
//!
//! let paths: Vec<String> = fields.all_paths().map(|(path, _)| path).collect();
//! assert_eq!(paths, ["Server", "Server/Port", "Server/Alias", "Server/Alias"]);
//! ```

use crate::field::{ChangeHandler, FieldInner};
use crate::{Error, Field, Result, Value};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

pub(crate) struct CollectionInner {
    pub(crate) items: Vec<Field>,
    pub(crate) owner: Weak<RefCell<FieldInner>>,
    pub(crate) read_only: bool,
    pub(crate) handlers: Vec<ChangeHandler>,
}

/// An ordered list of fields owned as a unit.
///
/// Like [`Field`], this is a shared handle; `clone` returns another
/// reference to the same list.
#[derive(Clone)]
pub struct FieldCollection {
    pub(crate) inner: Rc<RefCell<CollectionInner>>,
}

impl FieldCollection {
    /// Creates an empty, writable root collection.
    #[must_use]
    pub fn new() -> Self {
        FieldCollection::owned_by(Weak::new(), false)
    }

    pub(crate) fn owned_by(owner: Weak<RefCell<FieldInner>>, read_only: bool) -> Self {
        FieldCollection {
            inner: Rc::new(RefCell::new(CollectionInner {
                items: Vec::new(),
                owner,
                read_only,
                handlers: Vec::new(),
            })),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Field> {
        self.inner.borrow().items.get(index).cloned()
    }

    /// Returns a snapshot of the fields in order.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        self.inner.borrow().items.clone()
    }

    /// Iterates over a snapshot of the fields.
    pub fn iter(&self) -> std::vec::IntoIter<Field> {
        self.fields().into_iter()
    }

    /// The field whose subfields this collection is.
    #[must_use]
    pub fn owner(&self) -> Option<Field> {
        self.inner
            .borrow()
            .owner
            .upgrade()
            .map(|inner| Field { inner })
    }

    #[must_use]
    pub fn position(&self, field: &Field) -> Option<usize> {
        self.inner
            .borrow()
            .items
            .iter()
            .position(|item| item.ptr_eq(field))
    }

    #[must_use]
    pub fn contains(&self, field: &Field) -> bool {
        self.position(field).is_some()
    }

    /// Appends a field and takes ownership of it.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnly`], [`Error::DuplicateOwnership`] if the field is
    /// owned elsewhere, or [`Error::CyclicOwnership`] if it is an ancestor of
    /// this collection. Nothing changes on error.
    pub fn add(&self, field: Field) -> Result<()> {
        let len = self.len();
        self.insert(len, field)
    }

    /// Inserts a field at `index`, shifting later fields.
    pub fn insert(&self, index: usize, field: Field) -> Result<()> {
        self.ensure_writable()?;
        let len = self.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        self.check_adoptable(&field)?;
        field.inner.borrow_mut().owner = Rc::downgrade(&self.inner);
        self.inner.borrow_mut().items.insert(index, field);
        self.notify();
        Ok(())
    }

    /// Replaces the field at `index` and returns the detached previous one.
    pub fn set(&self, index: usize, field: Field) -> Result<Field> {
        self.ensure_writable()?;
        let previous = self.checked_get(index)?;
        if previous.ptr_eq(&field) {
            return Ok(previous);
        }
        self.check_adoptable(&field)?;
        field.inner.borrow_mut().owner = Rc::downgrade(&self.inner);
        self.inner.borrow_mut().items[index] = field;
        previous.inner.borrow_mut().owner = Weak::new();
        self.notify();
        Ok(previous)
    }

    /// Removes `field` if this collection holds it.
    pub fn remove(&self, field: &Field) -> Result<bool> {
        self.ensure_writable()?;
        match self.position(field) {
            Some(index) => self.remove_at(index).map(|_| true),
            None => Ok(false),
        }
    }

    /// Removes and returns the field at `index`, leaving it detached.
    pub fn remove_at(&self, index: usize) -> Result<Field> {
        self.ensure_writable()?;
        self.checked_get(index)?;
        let field = self.inner.borrow_mut().items.remove(index);
        field.inner.borrow_mut().owner = Weak::new();
        self.notify();
        Ok(field)
    }

    pub fn clear(&self) -> Result<()> {
        self.ensure_writable()?;
        if self.detach_all() {
            self.notify();
        }
        Ok(())
    }

    /// Moves the field at `from` so that it ends up at `to`.
    pub fn move_item(&self, from: usize, to: usize) -> Result<()> {
        self.ensure_writable()?;
        self.checked_get(from)?;
        self.checked_get(to)?;
        if from != to {
            let mut inner = self.inner.borrow_mut();
            let field = inner.items.remove(from);
            inner.items.insert(to, field);
        }
        self.notify();
        Ok(())
    }

    /// Finds the first field matching a name or path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mlc::{FieldCollection, Value};
    ///
    /// let fields = FieldCollection::new();
    /// fields.add_path("a", "1").unwrap();
    /// fields.add_path("A", "2").unwrap();
    ///
    /// assert_eq!(fields.find_first("a").unwrap().value(), Some(Value::from("1")));
    /// assert_eq!(fields.find_last("a").unwrap().value(), Some(Value::from("2")));
    /// assert!(fields.find_first("b").is_none());
    /// ```
    #[must_use]
    pub fn find_first(&self, name_or_path: &str) -> Option<Field> {
        let (parent, last) = self.resolve_parent(name_or_path)?;
        parent.first_named(last)
    }

    #[must_use]
    pub fn find_last(&self, name_or_path: &str) -> Option<Field> {
        let (parent, last) = self.resolve_parent(name_or_path)?;
        parent.fields().into_iter().rev().find(|f| f.has_name(last))
    }

    /// All fields matching the last segment, in order.
    #[must_use]
    pub fn find_all(&self, name_or_path: &str) -> Vec<Field> {
        match self.resolve_parent(name_or_path) {
            Some((parent, last)) => parent
                .fields()
                .into_iter()
                .filter(|f| f.has_name(last))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Returns the value of the first field at `path`.
    ///
    /// Container fields and missing paths yield `None`. Never modifies the
    /// collection.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<Value> {
        self.find_first(path)?.value()
    }

    /// Sets the value at `path`, creating missing fields along the way.
    ///
    /// An intermediate field that holds a scalar becomes an empty container.
    /// If the last segment already exists its first match is updated.
    pub fn set_path<V: Into<Value>>(&self, path: &str, value: V) -> Result<()> {
        self.write_path(path, value.into(), false).map(|_| ())
    }

    /// Like [`FieldCollection::set_path`] but always appends a new field for
    /// the last segment. Returns the new field.
    pub fn add_path<V: Into<Value>>(&self, path: &str, value: V) -> Result<Field> {
        self.write_path(path, value.into(), true)
    }

    fn write_path(&self, path: &str, value: Value, append: bool) -> Result<Field> {
        self.ensure_writable()?;
        if value.is_null() {
            return Err(Error::NullArgument("value"));
        }
        let segments = split_path(path);
        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::invalid_field_name(path));
        };
        if let Some(bad) = segments.iter().find(|s| !Field::is_name_valid(s)) {
            return Err(Error::invalid_field_name(*bad));
        }

        self.check_path_writable(parents, last, append)?;

        let mut collection = self.clone();
        for segment in parents {
            let field = match collection.first_named(segment) {
                Some(field) => field,
                None => {
                    let field = Field::new(segment)?;
                    collection.add(field.clone())?;
                    field
                }
            };
            field.clear_value()?;
            collection = field.subfields();
        }

        if !append {
            if let Some(existing) = collection.first_named(last) {
                existing.set_value(value)?;
                return Ok(existing);
            }
        }
        let field = Field::with_value(last, value)?;
        collection.add(field.clone())?;
        Ok(field)
    }

    /// Walks the existing part of a path and fails before anything is
    /// created if a field or collection on it is frozen.
    fn check_path_writable(&self, parents: &[&str], last: &str, append: bool) -> Result<()> {
        let mut collection = self.clone();
        for segment in parents {
            collection.ensure_writable()?;
            let Some(field) = collection.first_named(segment) else {
                return Ok(());
            };
            if field.is_read_only() {
                return Err(Error::ReadOnly);
            }
            match field.existing_subfields() {
                Some(subfields) => collection = subfields,
                None => return Ok(()),
            }
        }
        collection.ensure_writable()?;
        if !append && collection.first_named(last).is_some_and(|f| f.is_read_only()) {
            return Err(Error::ReadOnly);
        }
        Ok(())
    }

    /// Depth-first, pre-order walk yielding every field with its
    /// `/`-joined path.
    pub fn all_paths(&self) -> Paths {
        Paths {
            stack: vec![(String::new(), self.fields().into_iter())],
        }
    }

    /// Like [`FieldCollection::all_paths`], restricted to fields holding a
    /// value.
    pub fn paths_with_value(&self) -> impl Iterator<Item = (String, Field)> {
        self.all_paths().filter(|(_, field)| field.has_value())
    }

    /// Returns an independent, writable copy of every field.
    #[must_use]
    pub fn deep_clone(&self) -> FieldCollection {
        let copy = FieldCollection::new();
        for field in self.fields() {
            copy.push_detached(field.deep_clone());
        }
        copy
    }

    /// Returns a frozen deep copy.
    #[must_use]
    pub fn as_read_only(&self) -> FieldCollection {
        let copy = self.deep_clone();
        copy.freeze();
        copy
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.inner.borrow().read_only
    }

    /// Registers a handler called after every change to this collection or
    /// any field below it.
    pub fn on_changed(&self, handler: impl Fn() + 'static) {
        self.inner.borrow_mut().handlers.push(Rc::new(handler));
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &FieldCollection) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn notify(&self) {
        let (handlers, owner) = {
            let inner = self.inner.borrow();
            (inner.handlers.clone(), inner.owner.upgrade())
        };
        for handler in handlers {
            handler();
        }
        if let Some(owner) = owner {
            Field { inner: owner }.subfields_changed();
        }
    }

    /// Detaches every field without notifying. Returns whether anything was
    /// removed.
    pub(crate) fn detach_all(&self) -> bool {
        let items = std::mem::take(&mut self.inner.borrow_mut().items);
        for field in &items {
            field.inner.borrow_mut().owner = Weak::new();
        }
        !items.is_empty()
    }

    /// Appends a freshly built, unowned field without checks or
    /// notification.
    pub(crate) fn push_detached(&self, field: Field) {
        field.inner.borrow_mut().owner = Rc::downgrade(&self.inner);
        self.inner.borrow_mut().items.push(field);
    }

    pub(crate) fn freeze(&self) {
        self.inner.borrow_mut().read_only = true;
        for field in self.fields() {
            field.freeze();
        }
    }

    /// Builds a collection from a serde map. Nested maps become subfields
    /// and null entries become empty containers.
    pub(crate) fn from_map_access<'de, A>(mut map: A) -> std::result::Result<Self, A::Error>
    where
        A: MapAccess<'de>,
    {
        let collection = FieldCollection::new();
        while let Some((name, value)) = map.next_entry::<String, Value>()? {
            let field = Field::new(&name).map_err(de::Error::custom)?;
            if !value.is_null() {
                field.set_value(value).map_err(de::Error::custom)?;
            }
            collection.push_detached(field);
        }
        Ok(collection)
    }

    fn first_named(&self, name: &str) -> Option<Field> {
        self.inner
            .borrow()
            .items
            .iter()
            .find(|f| f.has_name(name))
            .cloned()
    }

    /// Walks all but the last path segment without creating anything.
    fn resolve_parent<'p>(&self, path: &'p str) -> Option<(FieldCollection, &'p str)> {
        let segments = split_path(path);
        let (last, parents) = segments.split_last()?;
        let mut collection = self.clone();
        for segment in parents {
            let field = collection.first_named(segment)?;
            if field.has_value() {
                return None;
            }
            collection = field.existing_subfields()?;
        }
        Some((collection, *last))
    }

    fn checked_get(&self, index: usize) -> Result<Field> {
        let inner = self.inner.borrow();
        inner.items.get(index).cloned().ok_or(Error::IndexOutOfRange {
            index,
            len: inner.items.len(),
        })
    }

    fn check_adoptable(&self, field: &Field) -> Result<()> {
        if field.is_owned() {
            return Err(Error::DuplicateOwnership(field.name()));
        }
        let mut ancestor = self.inner.borrow().owner.upgrade();
        while let Some(current) = ancestor {
            if Rc::ptr_eq(&current, &field.inner) {
                return Err(Error::CyclicOwnership(field.name()));
            }
            let collection = current.borrow().owner.upgrade();
            ancestor = collection.and_then(|c| c.borrow().owner.upgrade());
        }
        Ok(())
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.inner.borrow().read_only {
            Err(Error::ReadOnly)
        } else {
            Ok(())
        }
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split(|c| c == '/' || c == '\\').filter(|s| !s.is_empty()).collect()
}

/// Iterator returned by [`FieldCollection::all_paths`].
pub struct Paths {
    stack: Vec<(String, std::vec::IntoIter<Field>)>,
}

impl Iterator for Paths {
    type Item = (String, Field);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (prefix, fields) = self.stack.last_mut()?;
            match fields.next() {
                Some(field) => {
                    let path = if prefix.is_empty() {
                        field.name()
                    } else {
                        format!("{}/{}", prefix, field.name())
                    };
                    if let Some(children) = field.existing_subfields() {
                        if !children.is_empty() {
                            self.stack.push((path.clone(), children.iter()));
                        }
                    }
                    return Some((path, field));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl Default for FieldCollection {
    fn default() -> Self {
        FieldCollection::new()
    }
}

impl PartialEq for FieldCollection {
    /// Structural equality of the fields, in order.
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let a = self.fields();
        let b = other.fields();
        a == b
    }
}

impl fmt::Debug for FieldCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.fields()).finish()
    }
}

impl<'a> IntoIterator for &'a FieldCollection {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for FieldCollection {
    /// Serializes as a map; repeated names become repeated keys.
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let fields = self.fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for field in &fields {
            match field.value() {
                Some(value) => map.serialize_entry(&field.name(), &value)?,
                None => map.serialize_entry(
                    &field.name(),
                    &field.existing_subfields().unwrap_or_default(),
                )?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldCollection {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CollectionVisitor;

        impl<'de> Visitor<'de> for CollectionVisitor {
            type Value = FieldCollection;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field names to values")
            }

            fn visit_map<A>(self, map: A) -> std::result::Result<FieldCollection, A::Error>
            where
                A: MapAccess<'de>,
            {
                FieldCollection::from_map_access(map)
            }
        }

        deserializer.deserialize_map(CollectionVisitor)
    }
}
