//! The notification center: registration, matching, and delivery.
//!
//! This module provides [`NotificationCenter`], the hub observers register
//! with and posts flow through. It offers three layers of API:
//!
//! - **Typed**: [`post()`](NotificationCenter::post) /
//!   [`subscribe()`](NotificationCenter::subscribe) move one strongly typed
//!   payload per post. An observer declares the payload type it expects and
//!   never sees posts carrying anything else.
//! - **Untyped**: [`observe()`](NotificationCenter::observe) forwards the raw
//!   [`Metadata`] of every matching post, whatever it holds.
//! - **Raw**: [`add_observer()`](NotificationCenter::add_observer) registers
//!   a handler for the full [`Notification`]. The typed and untyped layers
//!   are thin wrappers over this.
//!
//! # Matching
//!
//! A post reaches an observer when the names are equal, the observer's sender
//! scope (if any) matches the post's sender, and - for typed observers - the
//! metadata carries a payload of exactly the expected type. A failed type
//! match is silence, not an error.
//!
//! # Delivery
//!
//! Matching observers are snapshotted before any handler runs, so handlers
//! may freely subscribe, post, or invalidate reentrantly; none of that can
//! deadlock, and an observer added during a delivery does not receive that
//! same delivery. Observers without a queue run inline on the posting thread
//! in registration order. Observers with a queue get each delivery submitted
//! to it, and the post does not wait.
//!
//! # Example
//!
//! ```rust,ignore
//! use tannoy::NotificationCenter;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct User { name: String, age: u32 }
//!
//! let center = NotificationCenter::new();
//!
//! let token = center.subscribe("user.updated", |user: &User| {
//!     println!("updated: {:?}", user);
//! });
//!
//! center.post("user.updated", User { name: "Beast".into(), age: 666 });
//!
//! token.invalidate();
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use log::trace;
use once_cell::sync::Lazy;

use crate::metadata::{Metadata, Payload};
use crate::name::Name;
use crate::notification::{Notification, SenderId};
use crate::queue::DispatchQueue;
use crate::token::ObservationToken;

type Handler = Arc<dyn Fn(&Notification) + Send + Sync>;

/// A raw registration handle, unique within its center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Handle(u64);

/// A single registration in the dispatch table.
struct ObserverEntry {
    handle: Handle,

    /// Sender scope. `None` matches every post.
    sender: Option<SenderId>,

    /// Where deliveries run. `None` means inline on the posting thread.
    queue: Option<Arc<dyn DispatchQueue>>,

    handler: Handler,
}

impl ObserverEntry {
    fn matches_sender(&self, posted_by: Option<SenderId>) -> bool {
        match self.sender {
            Some(expected) => posted_by == Some(expected),
            None => true,
        }
    }
}

/// Shared state behind a center. Tokens hold a weak reference to this so an
/// outstanding token never keeps a center alive, and invalidation after the
/// center is gone degrades to a no-op.
pub(crate) struct CenterState {
    /// Dispatch table: name to registrations in subscription order.
    table: DashMap<Name, Vec<ObserverEntry>>,

    /// Next observation handle.
    next_handle: AtomicU64,
}

impl CenterState {
    fn new() -> Self {
        Self {
            table: DashMap::new(),
            next_handle: AtomicU64::new(0),
        }
    }

    fn add(&self, name: Name, entry: ObserverEntry) {
        self.table.entry(name).or_default().push(entry);
    }

    /// Remove one registration. Unknown handles are tolerated, so removal
    /// stays idempotent from the token's point of view.
    pub(crate) fn remove(&self, name: &Name, handle: Handle) {
        let emptied = match self.table.get_mut(name) {
            Some(mut observers) => {
                observers.retain(|entry| entry.handle != handle);
                observers.is_empty()
            }
            None => false,
        };

        // Prune the name's slot once its last observer is gone. The predicate
        // re-checks under the shard lock, keeping any subscriber that raced in.
        if emptied {
            self.table.remove_if(name, |_, observers| observers.is_empty());
        }
    }
}

/// The hub observers register with and posts flow through.
///
/// A center is cheap to clone; clones share one dispatch table. It is fully
/// thread-safe: posting, subscribing, and invalidating may happen from any
/// thread at any time.
///
/// Most code should take a center as a parameter. The process-wide instance
/// behind [`global()`](NotificationCenter::global) exists for call sites with
/// no injection seam.
///
/// # Thread Safety
///
/// Internal synchronization is confined to the sharded dispatch table and a
/// pair of atomic counters. Observer handlers never run while any internal
/// lock is held.
#[derive(Clone)]
pub struct NotificationCenter {
    state: Arc<CenterState>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    /// Create a new, empty center.
    pub fn new() -> Self {
        Self {
            state: Arc::new(CenterState::new()),
        }
    }

    /// The process-wide shared center.
    ///
    /// Prefer passing a center explicitly where you can; the shared instance
    /// exists for code that has no injection seam.
    pub fn global() -> &'static NotificationCenter {
        static GLOBAL: Lazy<NotificationCenter> = Lazy::new(NotificationCenter::new);
        &GLOBAL
    }

    // ---- Posting ----

    /// Post `payload` under `name` with no sender identity.
    ///
    /// Equivalent to [`post_with()`](Self::post_with) with a `None` sender.
    pub fn post<T: Payload>(&self, name: impl Into<Name>, payload: T) {
        self.post_with(name, None, payload);
    }

    /// Post `payload` under `name`, carrying `sender` as the posting party.
    ///
    /// The payload lands in a fresh metadata map keyed by its runtime type.
    /// Exactly one payload travels per post; posting twice never shares
    /// state between the two posts.
    pub fn post_with<T: Payload>(
        &self,
        name: impl Into<Name>,
        sender: Option<SenderId>,
        payload: T,
    ) {
        self.post_metadata(name, sender, Metadata::with_payload(payload));
    }

    /// Post a caller-built metadata map under `name`.
    ///
    /// This is the raw-layer post: platform bridges and untyped call sites
    /// build their map by hand and submit it here. Typed observers of `name`
    /// still fire if the map carries their payload type.
    pub fn post_metadata(
        &self,
        name: impl Into<Name>,
        sender: Option<SenderId>,
        metadata: Metadata,
    ) {
        let notification = Notification::new(name.into(), sender, Arc::new(metadata));
        self.deliver(notification);
    }

    fn deliver(&self, notification: Notification) {
        // Snapshot matching observers so handlers can subscribe, post, or
        // invalidate reentrantly without the table lock being held.
        let matched: Vec<(Option<Arc<dyn DispatchQueue>>, Handler)> =
            match self.state.table.get(notification.name()) {
                Some(observers) => observers
                    .iter()
                    .filter(|entry| entry.matches_sender(notification.sender()))
                    .map(|entry| (entry.queue.clone(), Arc::clone(&entry.handler)))
                    .collect(),
                None => return,
            };

        trace!("delivering {} to {} observer(s)", notification, matched.len());

        for (queue, handler) in matched {
            match queue {
                Some(queue) => {
                    let notification = notification.clone();
                    queue.execute(Box::new(move || handler(&notification)));
                }
                None => handler(&notification),
            }
        }
    }

    // ---- Typed observation ----

    /// Observe posts of `name` that carry a payload of type `T`.
    ///
    /// The callback receives a reference to the posted value, unmodified.
    /// Posts of `name` whose metadata does not hold exactly a `T` are
    /// skipped silently. Matching is by runtime type identity, so a payload
    /// only ever narrows to the concrete type it was posted as.
    ///
    /// Equivalent to [`subscribe_with()`](Self::subscribe_with) with no
    /// sender scope and inline delivery.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let token = center.subscribe("download.progress", |percent: &u8| {
    ///     println!("{percent}%");
    /// });
    /// ```
    pub fn subscribe<T, F>(&self, name: impl Into<Name>, callback: F) -> ObservationToken
    where
        T: Payload,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribe_with(name, None, None, callback)
    }

    /// Observe posts of `name` carrying a `T`, with a sender scope and an
    /// optional delivery queue.
    ///
    /// With `sender` set, only posts carrying that same identity fire the
    /// callback. With a `queue`, each delivery is submitted to it and the
    /// post does not wait; a delivery already submitted when the token is
    /// invalidated may still run, but posts after
    /// [`invalidate()`](ObservationToken::invalidate) returns never reach
    /// this observer.
    pub fn subscribe_with<T, F>(
        &self,
        name: impl Into<Name>,
        sender: Option<SenderId>,
        queue: Option<Arc<dyn DispatchQueue>>,
        callback: F,
    ) -> ObservationToken
    where
        T: Payload,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.add_observer(name, sender, queue, move |notification| {
            if let Some(payload) = notification.payload::<T>() {
                callback(payload);
            }
        })
    }

    // ---- Untyped observation ----

    /// Observe every post of `name`, receiving the raw metadata.
    ///
    /// No narrowing happens: the callback fires for typed and untyped posts
    /// alike and reads whatever the map carries.
    pub fn observe<F>(&self, name: impl Into<Name>, callback: F) -> ObservationToken
    where
        F: Fn(&Metadata) + Send + Sync + 'static,
    {
        self.observe_with(name, None, None, callback)
    }

    /// Observe every post of `name`, with a sender scope and an optional
    /// delivery queue.
    pub fn observe_with<F>(
        &self,
        name: impl Into<Name>,
        sender: Option<SenderId>,
        queue: Option<Arc<dyn DispatchQueue>>,
        callback: F,
    ) -> ObservationToken
    where
        F: Fn(&Metadata) + Send + Sync + 'static,
    {
        self.add_observer(name, sender, queue, move |notification| {
            callback(notification.metadata())
        })
    }

    // ---- Raw observation ----

    /// Register a handler for the full [`Notification`].
    ///
    /// This is the lowest layer; the typed and untyped observers are built
    /// on it. The returned token owns the registration: invalidating or
    /// dropping it removes the observer.
    pub fn add_observer<F>(
        &self,
        name: impl Into<Name>,
        sender: Option<SenderId>,
        queue: Option<Arc<dyn DispatchQueue>>,
        handler: F,
    ) -> ObservationToken
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let name = name.into();
        let handle = Handle(self.state.next_handle.fetch_add(1, Ordering::Relaxed));

        self.state.add(
            name.clone(),
            ObserverEntry {
                handle,
                sender,
                queue,
                handler: Arc::new(handler),
            },
        );

        trace!("observer {:?} added for '{}'", handle, name);
        ObservationToken::new(Arc::downgrade(&self.state), name, handle)
    }

    // ---- Diagnostics ----

    /// Number of observers currently registered for `name`.
    pub fn observer_count(&self, name: impl Into<Name>) -> usize {
        self.state
            .table
            .get(&name.into())
            .map_or(0, |observers| observers.len())
    }

    /// `true` if at least one observer is registered for `name`.
    pub fn is_observed(&self, name: impl Into<Name>) -> bool {
        self.observer_count(name) > 0
    }
}
