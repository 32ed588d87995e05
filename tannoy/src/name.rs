//! Notification names.

use std::borrow::Cow;
use std::fmt;

/// The routing key for notifications.
///
/// Names are compared and hashed as plain strings. Well-known names can be
/// declared as constants with [`Name::from_static`] without allocating;
/// dynamically built names own their string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(Cow<'static, str>);

impl Name {
    /// Construct a name from a static string without allocating.
    #[inline]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Get the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Name {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for Name {
    #[inline]
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl AsRef<str> for Name {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[test]
fn static_and_owned_names_compare_equal() {
    // Given
    const WELL_KNOWN: Name = Name::from_static("app.did-launch");

    // When
    let owned = Name::from(String::from("app.did-launch"));

    // Then
    assert_eq!(WELL_KNOWN, owned);
    assert_eq!(owned.as_str(), "app.did-launch");
}

#[test]
fn display_shows_raw_string() {
    let name = Name::from("settings.changed");

    assert_eq!(name.to_string(), "settings.changed");
}

#[test]
fn names_hash_as_strings() {
    use std::collections::HashSet;

    let mut set = HashSet::new();
    set.insert(Name::from_static("a"));
    set.insert(Name::from(String::from("a")));
    set.insert(Name::from_static("b"));

    assert_eq!(set.len(), 2);
}
