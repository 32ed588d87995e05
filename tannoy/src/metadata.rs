//! Notification metadata: the auxiliary values that travel with a post.
//!
//! This module provides [`Metadata`], a type-erased key-value store with two
//! kinds of entries:
//!
//! - **String-keyed entries** hold arbitrary values under caller-chosen keys,
//!   the way ad-hoc user-info dictionaries do.
//! - **Payload entries** hold at most one value per concrete Rust type, keyed
//!   by the type itself. Typed posting and subscription route through these.
//!
//! # Type Identity
//!
//! Payload entries are keyed by [`TypeId`], never by a stringified type name.
//! Two types that happen to share a short name (say, two `Refresh` structs in
//! different modules) therefore occupy distinct slots and cannot shadow each
//! other.
//!
//! # Silent Miss
//!
//! Reads never fail loudly: asking for an absent key, or for a key holding a
//! value of a different type, returns `None`. Observers built on top of this
//! simply skip notifications whose metadata does not carry what they expect.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut metadata = Metadata::new();
//! metadata.insert("reason", String::from("user-request"));
//! metadata.set_payload(Refresh { full: true });
//!
//! assert_eq!(metadata.get::<String>("reason").unwrap(), "user-request");
//! assert!(metadata.payload::<Refresh>().unwrap().full);
//! assert!(metadata.get::<u32>("reason").is_none()); // wrong type
//! ```

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// A value that can travel in notification metadata.
///
/// Blanket-implemented for every `'static + Send + Sync` type; there is
/// nothing to derive or implement by hand.
pub trait Payload: Any + Send + Sync {}

impl<T: Any + Send + Sync> Payload for T {}

type Value = Box<dyn Any + Send + Sync>;

/// The key-value store carried by a notification.
///
/// A map is built by whoever posts, then shared read-only with every
/// observer of that post. Distinct posts never share a map.
#[derive(Default)]
pub struct Metadata {
    /// Caller-keyed entries.
    entries: HashMap<Cow<'static, str>, Value>,

    /// Typed payload slots, one per concrete type.
    payloads: HashMap<TypeId, Value>,
}

impl Metadata {
    /// Create an empty map.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map holding exactly one payload of type `T`.
    ///
    /// This is the map shape typed posting produces.
    pub fn with_payload<T: Payload>(value: T) -> Self {
        let mut metadata = Self::new();
        metadata.set_payload(value);
        metadata
    }

    /// Insert a value under a string key, replacing any previous value.
    pub fn insert<T: Payload>(&mut self, key: impl Into<Cow<'static, str>>, value: T) {
        self.entries.insert(key.into(), Box::new(value));
    }

    /// Get the value stored under `key`, if present and of type `T`.
    pub fn get<T: Payload>(&self, key: &str) -> Option<&T> {
        self.entries.get(key)?.downcast_ref::<T>()
    }

    /// `true` if any value is stored under `key`, whatever its type.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Fill the payload slot for type `T`, replacing any previous `T`.
    pub fn set_payload<T: Payload>(&mut self, value: T) {
        self.payloads.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get the payload of type `T`, if one was posted.
    pub fn payload<T: Payload>(&self) -> Option<&T> {
        self.payloads.get(&TypeId::of::<T>())?.downcast_ref::<T>()
    }

    /// `true` if a payload of exactly type `T` is present.
    #[inline]
    pub fn has_payload<T: Payload>(&self) -> bool {
        self.payloads.contains_key(&TypeId::of::<T>())
    }

    /// Total number of entries, string-keyed and typed together.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len() + self.payloads.len()
    }

    /// `true` if the map holds nothing at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.payloads.is_empty()
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("Metadata")
            .field("keys", &keys)
            .field("payloads", &self.payloads.len())
            .finish()
    }
}
