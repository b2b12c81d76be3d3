//! Named nodes of the content tree.
//!
//! A [`Field`] holds either a scalar [`Value`] or a nested
//! [`FieldCollection`] of subfields, never both, plus an optional set of
//! [`Tag`]s.
//!
//! `Field` is a shared handle: cloning it yields another reference to the
//! same node, so a field found through a collection can be edited in place.
//! Use [`Field::deep_clone`] for an independent copy.
//!
//! ## Examples
//!
//! ```rust
//! use mlc::{Field, Value};
//!
//! let field = Field::with_value("Port", 8080u16).unwrap();
//! assert!(field.has_value());
//!
//! // Adding a subfield drops the scalar
//! field.subfields().add(Field::with_value("Tls", true).unwrap()).unwrap();
//! assert!(field.has_subfields());
//! assert_eq!(field.value(), None);
//!
//! // Setting a scalar drops the subfields
//! field.set_value("8443").unwrap();
//! assert!(field.subfields().is_empty());
//! ```

use crate::collection::CollectionInner;
use crate::{Error, FieldCollection, Result, Tag, TagCollection, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

static FIELD_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\.?[\p{L}\p{Nd}][\p{L}\p{Nd}-]*$").expect("field name pattern is valid")
});

pub(crate) type ChangeHandler = Rc<dyn Fn()>;

pub(crate) struct FieldInner {
    pub(crate) name: String,
    pub(crate) value: Option<Value>,
    pub(crate) subfields: Option<FieldCollection>,
    pub(crate) tags: Option<TagCollection>,
    pub(crate) owner: Weak<RefCell<CollectionInner>>,
    pub(crate) read_only: bool,
    pub(crate) handlers: Vec<ChangeHandler>,
}

/// A named node holding a value or subfields, plus tags.
#[derive(Clone)]
pub struct Field {
    pub(crate) inner: Rc<RefCell<FieldInner>>,
}

impl Field {
    /// Creates a detached field without a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if `name` does not match
    /// `^\.?[Letter|Digit][Letter|Digit|-]*$`.
    pub fn new(name: &str) -> Result<Field> {
        validate_name(name)?;
        Ok(Field::unchecked(name.to_string()))
    }

    /// Creates a detached field holding `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] for a bad name and
    /// [`Error::NullArgument`] for [`Value::Null`].
    pub fn with_value<V: Into<Value>>(name: &str, value: V) -> Result<Field> {
        let field = Field::new(name)?;
        field.set_value(value)?;
        Ok(field)
    }

    fn unchecked(name: String) -> Field {
        Field {
            inner: Rc::new(RefCell::new(FieldInner {
                name,
                value: None,
                subfields: None,
                tags: None,
                owner: Weak::new(),
                read_only: false,
                handlers: Vec::new(),
            })),
        }
    }

    /// Returns `true` if `name` is a valid field name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mlc::Field;
    ///
    /// assert!(Field::is_name_valid("Content-Type"));
    /// assert!(Field::is_name_valid(".Header"));
    /// assert!(Field::is_name_valid("2nd"));
    /// assert!(!Field::is_name_valid("-x"));
    /// assert!(!Field::is_name_valid("a b"));
    /// ```
    #[must_use]
    pub fn is_name_valid(name: &str) -> bool {
        FIELD_NAME.is_match(name)
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    /// Renames the field.
    pub fn set_name(&self, name: &str) -> Result<()> {
        self.ensure_writable()?;
        validate_name(name)?;
        self.inner.borrow_mut().name = name.to_string();
        self.notify();
        Ok(())
    }

    /// Header fields have a name starting with `.`.
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.inner.borrow().name.starts_with('.')
    }

    #[must_use]
    pub fn value(&self) -> Option<Value> {
        self.inner.borrow().value.clone()
    }

    /// Sets the scalar value and clears the subfields.
    ///
    /// A [`Value::Fields`] value is not stored as a scalar; a copy of its
    /// fields replaces the subfields instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullArgument`] for [`Value::Null`] and
    /// [`Error::ReadOnly`] on frozen fields.
    pub fn set_value<V: Into<Value>>(&self, value: V) -> Result<()> {
        let value = value.into();
        self.ensure_writable()?;
        match value {
            Value::Null => Err(Error::NullArgument("value")),
            Value::Fields(fields) => {
                self.replace_subfields(&fields);
                Ok(())
            }
            scalar => {
                let subfields = {
                    let mut inner = self.inner.borrow_mut();
                    inner.value = Some(scalar);
                    inner.subfields.clone()
                };
                if let Some(subfields) = subfields {
                    subfields.detach_all();
                }
                self.notify();
                Ok(())
            }
        }
    }

    /// Drops the scalar value, turning the field into an empty container.
    pub fn clear_value(&self) -> Result<()> {
        self.ensure_writable()?;
        let had_value = self.inner.borrow_mut().value.take().is_some();
        if had_value {
            self.notify();
        }
        Ok(())
    }

    fn replace_subfields(&self, fields: &FieldCollection) {
        let copies: Vec<Field> = fields.fields().iter().map(Field::deep_clone).collect();
        let subfields = self.subfields();
        subfields.detach_all();
        self.inner.borrow_mut().value = None;
        for copy in copies {
            subfields.push_detached(copy);
        }
        self.notify();
    }

    /// Returns the subfield collection, creating it on first access.
    ///
    /// Any mutation of the returned collection clears this field's value.
    #[must_use]
    pub fn subfields(&self) -> FieldCollection {
        let mut inner = self.inner.borrow_mut();
        if let Some(subfields) = &inner.subfields {
            return subfields.clone();
        }
        let subfields = FieldCollection::owned_by(Rc::downgrade(&self.inner), inner.read_only);
        inner.subfields = Some(subfields.clone());
        subfields
    }

    /// The subfield collection if it was ever created.
    pub(crate) fn existing_subfields(&self) -> Option<FieldCollection> {
        self.inner.borrow().subfields.clone()
    }

    #[must_use]
    pub fn has_value(&self) -> bool {
        self.inner.borrow().value.is_some()
    }

    /// Always the opposite of [`Field::has_value`].
    #[must_use]
    pub fn has_subfields(&self) -> bool {
        !self.has_value()
    }

    #[must_use]
    pub fn has_tags(&self) -> bool {
        self.inner
            .borrow()
            .tags
            .as_ref()
            .is_some_and(|tags| !tags.is_empty())
    }

    /// Returns a copy of the tags.
    #[must_use]
    pub fn tags(&self) -> TagCollection {
        let inner = self.inner.borrow();
        match &inner.tags {
            Some(tags) => tags.clone(),
            None if inner.read_only => TagCollection::new().as_read_only(),
            None => TagCollection::new(),
        }
    }

    /// Edits the tags in place.
    ///
    /// While `edit` runs the tags are detached from the field, so reading
    /// them through the field from inside the closure sees an empty set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mlc::Field;
    ///
    /// let field = Field::new("Name").unwrap();
    /// field.edit_tags(|tags| tags.set("Required", true)).unwrap();
    /// assert!(field.has_tag("required"));
    /// ```
    pub fn edit_tags<R>(&self, edit: impl FnOnce(&mut TagCollection) -> Result<R>) -> Result<R> {
        self.ensure_writable()?;
        let mut tags = self.inner.borrow_mut().tags.take().unwrap_or_default();
        let result = edit(&mut tags);
        self.inner.borrow_mut().tags = Some(tags);
        if result.is_ok() {
            self.notify();
        }
        result
    }

    pub fn add_tag(&self, tag: Tag) -> Result<()> {
        self.edit_tags(|tags| tags.add(tag))
    }

    /// Replaces all tags with a copy of `tags`.
    pub fn set_tags(&self, tags: &TagCollection) -> Result<()> {
        self.edit_tags(|current| {
            *current = tags.deep_clone();
            Ok(())
        })
    }

    /// Returns `true` if the tag exists and is set.
    #[must_use]
    pub fn has_tag(&self, name: &str) -> bool {
        self.inner
            .borrow()
            .tags
            .as_ref()
            .is_some_and(|tags| tags.is_set(name))
    }

    /// The collection that currently owns this field.
    #[must_use]
    pub fn owner(&self) -> Option<FieldCollection> {
        self.inner
            .borrow()
            .owner
            .upgrade()
            .map(|inner| FieldCollection { inner })
    }

    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.inner.borrow().owner.upgrade().is_some()
    }

    /// Returns `true` if both handles refer to the same field.
    #[must_use]
    pub fn ptr_eq(&self, other: &Field) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns an independent, writable, detached copy of the whole subtree.
    #[must_use]
    pub fn deep_clone(&self) -> Field {
        let inner = self.inner.borrow();
        let copy = Field::unchecked(inner.name.clone());
        {
            let mut target = copy.inner.borrow_mut();
            target.value = inner.value.clone();
            target.tags = inner.tags.as_ref().map(TagCollection::deep_clone);
        }
        if let Some(subfields) = &inner.subfields {
            let target = copy.subfields();
            for child in subfields.fields() {
                target.push_detached(child.deep_clone());
            }
        }
        copy
    }

    /// Returns a frozen deep copy; every mutator on it fails with
    /// [`Error::ReadOnly`].
    #[must_use]
    pub fn as_read_only(&self) -> Field {
        let copy = self.deep_clone();
        copy.freeze();
        copy
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.inner.borrow().read_only
    }

    pub(crate) fn freeze(&self) {
        let subfields = {
            let mut inner = self.inner.borrow_mut();
            inner.read_only = true;
            if let Some(tags) = inner.tags.as_mut() {
                tags.freeze();
            }
            inner.subfields.clone()
        };
        if let Some(subfields) = subfields {
            subfields.freeze();
        }
    }

    /// Registers a handler called after every change to this field or
    /// anything below it.
    pub fn on_changed(&self, handler: impl Fn() + 'static) {
        self.inner.borrow_mut().handlers.push(Rc::new(handler));
    }

    /// Runs this field's handlers, then bubbles to the owning collection.
    pub(crate) fn notify(&self) {
        let (handlers, owner) = {
            let inner = self.inner.borrow();
            (inner.handlers.clone(), inner.owner.upgrade())
        };
        for handler in handlers {
            handler();
        }
        if let Some(owner) = owner {
            FieldCollection { inner: owner }.notify();
        }
    }

    /// Called by the subfield collection after it changed.
    pub(crate) fn subfields_changed(&self) {
        self.inner.borrow_mut().value = None;
        self.notify();
    }

    pub(crate) fn has_name(&self, name: &str) -> bool {
        names_match(&self.inner.borrow().name, name)
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.inner.borrow().read_only {
            Err(Error::ReadOnly)
        } else {
            Ok(())
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if Field::is_name_valid(name) {
        Ok(())
    } else {
        Err(Error::invalid_field_name(name))
    }
}

/// Case-insensitive name comparison.
pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl PartialEq for Field {
    /// Structural equality: name, value, tags and subfields.
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let a = self.inner.borrow();
        let b = other.inner.borrow();
        let tags_equal = match (&a.tags, &b.tags) {
            (Some(x), Some(y)) => x == y,
            (Some(t), None) | (None, Some(t)) => t.is_empty(),
            (None, None) => true,
        };
        let subfields_equal = match (&a.subfields, &b.subfields) {
            (Some(x), Some(y)) => x == y,
            (Some(s), None) | (None, Some(s)) => s.is_empty(),
            (None, None) => true,
        };
        a.name == b.name && a.value == b.value && tags_equal && subfields_equal
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let mut out = f.debug_struct("Field");
        out.field("name", &inner.name);
        if let Some(value) = &inner.value {
            out.field("value", value);
        }
        if let Some(tags) = inner.tags.as_ref().filter(|t| !t.is_empty()) {
            out.field("tags", tags);
        }
        if let Some(subfields) = inner.subfields.as_ref().filter(|s| !s.is_empty()) {
            out.field("subfields", subfields);
        }
        out.finish()
    }
}
