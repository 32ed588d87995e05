//! Observation tokens: the handle that owns a registration.
//!
//! Every subscribe-family call on a center returns an [`ObservationToken`].
//! The token is the only way a registration is removed, and removal happens
//! exactly once, whichever comes first:
//!
//! - an explicit [`invalidate()`](ObservationToken::invalidate),
//! - the token being dropped,
//! - invalidation of a [`TokenBag`](crate::bag::TokenBag) holding it.
//!
//! Dropping a token on the floor therefore silences the observer right
//! there. Keep it in a field, or move it into a bag tied to the observer's
//! lifetime.
//!
//! A token remembers which center registered it and removes itself from that
//! center, never from any other. It holds only a weak reference, so a stray
//! token cannot keep a center alive; invalidating after the center is gone
//! is a no-op.

use std::fmt;
use std::sync::Weak;
use std::sync::atomic::{AtomicBool, Ordering};

use log::trace;

use crate::bag::TokenBag;
use crate::center::{CenterState, Handle};
use crate::name::Name;

/// Owner of one observer registration.
///
/// Invalidation is idempotent and thread-safe: any number of calls from any
/// threads remove the registration once.
#[must_use = "dropping the token immediately removes the observer"]
pub struct ObservationToken {
    center: Weak<CenterState>,
    name: Name,
    handle: Handle,
    invalidated: AtomicBool,
}

impl ObservationToken {
    pub(crate) fn new(center: Weak<CenterState>, name: Name, handle: Handle) -> Self {
        Self {
            center,
            name,
            handle,
            invalidated: AtomicBool::new(false),
        }
    }

    /// Remove the registration this token owns.
    ///
    /// The first call removes the observer from the center that created the
    /// token; when it returns, no later post reaches the observer. Every
    /// further call is a no-op, as is invalidating a token whose center has
    /// already been dropped.
    pub fn invalidate(&self) {
        if self.invalidated.swap(true, Ordering::AcqRel) {
            return;
        }

        if let Some(center) = self.center.upgrade() {
            center.remove(&self.name, self.handle);
            trace!("observer {:?} removed from '{}'", self.handle, self.name);
        }
    }

    /// `true` once [`invalidate()`](Self::invalidate) has run, by any path.
    #[inline]
    pub fn is_invalidated(&self) -> bool {
        self.invalidated.load(Ordering::Acquire)
    }

    /// The name this token's observer is registered for.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Move this token into `bag`, which becomes its owner.
    ///
    /// Shorthand for [`TokenBag::add`] that reads well at the end of a
    /// subscribe call chain.
    pub fn add_to(self, bag: &mut TokenBag) {
        bag.add(self);
    }
}

impl Drop for ObservationToken {
    fn drop(&mut self) {
        self.invalidate();
    }
}

impl fmt::Debug for ObservationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservationToken")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .field("invalidated", &self.is_invalidated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    use crate::center::NotificationCenter;

    fn counting_observer(center: &NotificationCenter) -> (ObservationToken, Arc<AtomicUsize>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&fired);
        let token = center.subscribe("testing", move |_: &i32| {
            hits.fetch_add(1, Ordering::Relaxed);
        });
        (token, fired)
    }

    // ==================== Invalidation ====================

    #[test]
    fn invalidate_removes_the_registration() {
        // Given
        let center = NotificationCenter::new();
        let (token, fired) = counting_observer(&center);

        center.post("testing", 1);

        // When
        token.invalidate();
        center.post("testing", 2);

        // Then
        assert_eq!(fired.load(Ordering::Relaxed), 1);
        assert!(token.is_invalidated());
    }

    #[test]
    fn invalidate_twice_is_a_noop() {
        // Given
        let center = NotificationCenter::new();
        let (token, fired) = counting_observer(&center);

        // When
        token.invalidate();
        token.invalidate();
        center.post("testing", 1);

        // Then
        assert_eq!(fired.load(Ordering::Relaxed), 0);
        assert_eq!(center.observer_count("testing"), 0);
    }

    #[test]
    fn drop_invalidates() {
        // Given
        let center = NotificationCenter::new();
        let (token, fired) = counting_observer(&center);

        // When
        drop(token);
        center.post("testing", 1);

        // Then
        assert_eq!(fired.load(Ordering::Relaxed), 0);
        assert_eq!(center.observer_count("testing"), 0);
    }

    #[test]
    fn drop_after_invalidate_does_not_remove_twice() {
        // Given - two observers sharing the name
        let center = NotificationCenter::new();
        let (token, _fired) = counting_observer(&center);
        let (survivor, survivor_fired) = counting_observer(&center);

        // When - invalidate then drop the first token
        token.invalidate();
        drop(token);

        // Then - the second registration is untouched
        center.post("testing", 1);
        assert_eq!(survivor_fired.load(Ordering::Relaxed), 1);
        assert_eq!(center.observer_count("testing"), 1);
        drop(survivor);
    }

    #[test]
    fn invalidate_after_center_dropped_is_a_noop() {
        // Given
        let center = NotificationCenter::new();
        let (token, _fired) = counting_observer(&center);

        // When - every handle to the center is gone
        drop(center);

        // Then - nothing to remove from, nothing to panic about
        token.invalidate();
        assert!(token.is_invalidated());
    }

    #[test]
    fn tokens_invalidate_on_their_own_center() {
        // Given - the same observer shape on two centers
        let first = NotificationCenter::new();
        let second = NotificationCenter::new();
        let (first_token, _) = counting_observer(&first);
        let (second_token, second_fired) = counting_observer(&second);

        // When - invalidating the first center's token
        first_token.invalidate();

        // Then - the second center's registration is untouched
        second.post("testing", 1);
        assert_eq!(second_fired.load(Ordering::Relaxed), 1);
        assert_eq!(first.observer_count("testing"), 0);
        assert_eq!(second.observer_count("testing"), 1);
        drop(second_token);
    }

    // ==================== Concurrent Invalidation ====================

    #[test]
    fn concurrent_invalidate_removes_once() {
        // Given
        let center = NotificationCenter::new();
        let (token, _fired) = counting_observer(&center);
        let (anchor, anchor_fired) = counting_observer(&center);
        let token = Arc::new(token);

        // When - many threads race to invalidate one token
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let token = Arc::clone(&token);
                thread::spawn(move || token.invalidate())
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Then - exactly the anchor registration remains
        assert_eq!(center.observer_count("testing"), 1);
        center.post("testing", 1);
        assert_eq!(anchor_fired.load(Ordering::Relaxed), 1);
        drop(anchor);
    }
}
