//! The delivered notification value and sender identity.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::metadata::{Metadata, Payload};
use crate::name::Name;

/// Identity of a posting party.
///
/// Observers registered for a specific sender only fire when a post carries
/// the same identity. Identities are minted process-wide, so two senders can
/// never be confused with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SenderId(u64);

impl SenderId {
    /// Mint a fresh identity no previous call has returned.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A single delivered notification: a name, the optional identity of whoever
/// posted it, and the metadata built for this post.
///
/// Notifications are cheap to clone; the metadata is shared, not copied.
/// Every observer of one post reads the same immutable map.
#[derive(Debug, Clone)]
pub struct Notification {
    name: Name,
    sender: Option<SenderId>,
    metadata: Arc<Metadata>,
}

impl Notification {
    pub(crate) fn new(name: Name, sender: Option<SenderId>, metadata: Arc<Metadata>) -> Self {
        Self {
            name,
            sender,
            metadata,
        }
    }

    /// The name this notification was posted under.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The identity of the posting party, if one was supplied.
    #[inline]
    pub fn sender(&self) -> Option<SenderId> {
        self.sender
    }

    /// The metadata carried by this post.
    #[inline]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// A shared handle to the metadata, for decoders that outlive the
    /// delivery callback.
    #[inline]
    pub fn shared_metadata(&self) -> Arc<Metadata> {
        Arc::clone(&self.metadata)
    }

    /// Shorthand for [`Metadata::payload`] on this notification's map.
    #[inline]
    pub fn payload<T: Payload>(&self) -> Option<&T> {
        self.metadata.payload::<T>()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.name)
    }
}
