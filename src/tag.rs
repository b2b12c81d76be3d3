//! Named boolean flags attached to fields.
//!
//! A [`Tag`] is a name plus a state. Tags whose name is written with a
//! leading `.` are *modifier* tags; they live in the same [`TagCollection`]
//! but are kept apart when a tag list is normalized.
//!
//! In notation text tags appear in brackets, with shorthand for the state:
//!
//! ```text
//! Name [on !off off- on+ .modifier]: value
//! ```

use crate::{Error, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static TAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@?\p{L}[\p{L}\p{Nd}]*$").expect("tag name pattern is valid"));

/// A named boolean flag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    name: String,
    state: bool,
    modifier: bool,
}

impl Tag {
    /// Creates an ordinary tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if `name` does not match
    /// `^@?Letter[Letter|Digit]*$`.
    pub fn new(name: &str, state: bool) -> Result<Tag> {
        Self::build(name, state, false)
    }

    /// Creates a modifier tag. `name` is given without the leading `.`.
    pub fn modifier(name: &str, state: bool) -> Result<Tag> {
        Self::build(name, state, true)
    }

    fn build(name: &str, state: bool, modifier: bool) -> Result<Tag> {
        if !Self::is_name_valid(name) {
            return Err(Error::invalid_tag_name(name));
        }
        Ok(Tag {
            name: name.to_string(),
            state,
            modifier,
        })
    }

    /// Returns `true` if `name` is a valid tag name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mlc::Tag;
    ///
    /// assert!(Tag::is_name_valid("Test1"));
    /// assert!(Tag::is_name_valid("@internal"));
    /// assert!(!Tag::is_name_valid("1st"));
    /// assert!(!Tag::is_name_valid("a-b"));
    /// ```
    #[must_use]
    pub fn is_name_valid(name: &str) -> bool {
        TAG_NAME.is_match(name)
    }

    /// Parses a tag token with state shorthand.
    ///
    /// A leading `!` or a leading or trailing `-` clears the state, a leading
    /// or trailing `+` sets it, and a leading `.` marks a modifier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mlc::Tag;
    ///
    /// let tag = Tag::parse("!hidden").unwrap();
    /// assert_eq!((tag.name(), tag.state()), ("hidden", false));
    ///
    /// let tag = Tag::parse(".sorted+").unwrap();
    /// assert!(tag.is_modifier() && tag.state());
    /// ```
    pub fn parse(token: &str) -> Result<Tag> {
        let mut rest = token.trim();
        let mut state = true;

        loop {
            if let Some(stripped) = rest.strip_prefix('!').or_else(|| rest.strip_prefix('-')) {
                state = false;
                rest = stripped;
            } else if let Some(stripped) = rest.strip_prefix('+') {
                state = true;
                rest = stripped;
            } else {
                break;
            }
        }
        loop {
            if let Some(stripped) = rest.strip_suffix('-') {
                state = false;
                rest = stripped;
            } else if let Some(stripped) = rest.strip_suffix('+') {
                state = true;
                rest = stripped;
            } else {
                break;
            }
        }

        match rest.strip_prefix('.') {
            Some(name) => Tag::modifier(name, state),
            None => Tag::new(rest, state),
        }
        .map_err(|_| Error::invalid_tag_name(token))
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> bool {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_modifier(&self) -> bool {
        self.modifier
    }

    /// Returns the name as written in notation, with the `.` of modifiers.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.modifier {
            format!(".{}", self.name)
        } else {
            self.name.clone()
        }
    }

    fn key(&self) -> String {
        self.qualified_name().to_lowercase()
    }
}

impl fmt::Display for Tag {
    /// Writes the token form: `name`, `!name`, `.name` or `!.name`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.state {
            write!(f, "!")?;
        }
        if self.modifier {
            write!(f, ".")?;
        }
        write!(f, "{}", self.name)
    }
}

/// An ordered set of tags, unique by case-insensitive name.
///
/// Adding a tag whose name is already present replaces it in place.
#[derive(Clone, Debug, Default)]
pub struct TagCollection {
    tags: IndexMap<String, Tag>,
    read_only: bool,
}

impl TagCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tag`, replacing a tag with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadOnly`] for frozen collections.
    pub fn add(&mut self, tag: Tag) -> Result<()> {
        self.ensure_writable()?;
        self.tags.insert(tag.key(), tag);
        Ok(())
    }

    /// Sets the state of the ordinary tag `name`, adding it if missing.
    pub fn set(&mut self, name: &str, state: bool) -> Result<()> {
        self.add(Tag::new(name, state)?)
    }

    /// Removes and returns the tag with the given qualified name.
    pub fn remove(&mut self, name: &str) -> Result<Option<Tag>> {
        self.ensure_writable()?;
        Ok(self.tags.shift_remove(&name.to_lowercase()))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.ensure_writable()?;
        self.tags.clear();
        Ok(())
    }

    /// Orders modifiers first, each group ordinally by name.
    pub fn sort(&mut self) -> Result<()> {
        self.ensure_writable()?;
        self.tags.sort_by(|_, a, _, b| {
            b.modifier
                .cmp(&a.modifier)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(())
    }

    /// Looks a tag up by qualified name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.get(&name.to_lowercase())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns `true` if the tag exists and its state is set.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(Tag::state)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Values<'_, String, Tag> {
        self.tags.values()
    }

    /// Iterates the modifier tags only.
    pub fn modifiers(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values().filter(|t| t.modifier)
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Returns a frozen copy.
    #[must_use]
    pub fn as_read_only(&self) -> TagCollection {
        TagCollection {
            tags: self.tags.clone(),
            read_only: true,
        }
    }

    /// Returns a writable copy.
    #[must_use]
    pub fn deep_clone(&self) -> TagCollection {
        TagCollection {
            tags: self.tags.clone(),
            read_only: false,
        }
    }

    pub(crate) fn freeze(&mut self) {
        self.read_only = true;
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.read_only {
            Err(Error::ReadOnly)
        } else {
            Ok(())
        }
    }
}

impl PartialEq for TagCollection {
    fn eq(&self, other: &Self) -> bool {
        self.tags.len() == other.tags.len() && self.iter().eq(other.iter())
    }
}

impl fmt::Display for TagCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", tag)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TagCollection {
    type Item = &'a Tag;
    type IntoIter = indexmap::map::Values<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.values()
    }
}

impl FromIterator<Tag> for TagCollection {
    fn from_iter<T: IntoIterator<Item = Tag>>(iter: T) -> Self {
        TagCollection {
            tags: iter.into_iter().map(|t| (t.key(), t)).collect(),
            read_only: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_validation() {
        for name in ["a", "Test", "Test1", "@x", "Ärger", "x9y"] {
            assert!(Tag::is_name_valid(name), "{}", name);
        }
        for name in ["", "1a", "@", "@1", "a-b", "a b", "a.b", ".a", "@@a"] {
            assert!(!Tag::is_name_valid(name), "{}", name);
        }
        assert!(matches!(
            Tag::new("1a", true),
            Err(Error::InvalidName { .. })
        ));
    }

    #[test]
    fn test_parse_shorthand() {
        let cases = [
            ("on", "on", true, false),
            ("!off", "off", false, false),
            ("-off", "off", false, false),
            ("off-", "off", false, false),
            ("+on", "on", true, false),
            ("on+", "on", true, false),
            (".mod", "mod", true, true),
            ("!.mod", "mod", false, true),
            (".mod-", "mod", false, true),
        ];
        for (token, name, state, modifier) in cases {
            let tag = Tag::parse(token).unwrap();
            assert_eq!(tag.name(), name, "{}", token);
            assert_eq!(tag.state(), state, "{}", token);
            assert_eq!(tag.is_modifier(), modifier, "{}", token);
        }
        assert!(Tag::parse("!").is_err());
        assert!(Tag::parse("a.b").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for token in ["on", "!off", ".mod", "!.mod", "@x"] {
            assert_eq!(Tag::parse(token).unwrap().to_string(), token);
        }
    }

    #[test]
    fn test_equality() {
        assert_eq!(Tag::new("a", true).unwrap(), Tag::new("a", true).unwrap());
        assert_ne!(Tag::new("a", true).unwrap(), Tag::new("a", false).unwrap());
        assert_ne!(Tag::new("a", true).unwrap(), Tag::modifier("a", true).unwrap());
    }

    #[test]
    fn test_collection_is_name_unique() {
        let mut tags = TagCollection::new();
        tags.set("Alpha", true).unwrap();
        tags.set("beta", true).unwrap();
        tags.set("ALPHA", false).unwrap();
        assert_eq!(tags.len(), 2);
        assert!(!tags.is_set("alpha"));
        assert_eq!(tags.iter().next().map(Tag::name), Some("ALPHA"));

        tags.add(Tag::modifier("alpha", true).unwrap()).unwrap();
        assert_eq!(tags.len(), 3);
        assert!(tags.is_set(".Alpha"));

        assert!(tags.remove("BETA").unwrap().is_some());
        assert!(!tags.contains("beta"));
    }

    #[test]
    fn test_sort_puts_modifiers_first() {
        let mut tags: TagCollection = ["b", "a", ".z", ".c", "B"]
            .iter()
            .map(|t| Tag::parse(t).unwrap())
            .collect();
        tags.sort().unwrap();
        assert_eq!(tags.to_string(), ".c .z B a");
    }

    #[test]
    fn test_read_only() {
        let mut tags = TagCollection::new();
        tags.set("a", true).unwrap();
        let mut frozen = tags.as_read_only();
        assert_eq!(frozen, tags);
        assert_eq!(frozen.set("b", true), Err(Error::ReadOnly));
        assert_eq!(frozen.clear(), Err(Error::ReadOnly));
        assert_eq!(frozen.sort(), Err(Error::ReadOnly));
        assert!(!frozen.deep_clone().is_read_only());
    }
}
