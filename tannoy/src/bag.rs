//! Batch ownership of observation tokens.

use crate::token::ObservationToken;

/// A bag that owns any number of tokens and invalidates them together.
///
/// The usual shape: a component keeps one bag as a field, moves every token
/// it creates into it, and lets the bag go down with the component. All of
/// its observations are removed at that moment, with no bookkeeping per
/// token.
///
/// A bag is reusable: after [`invalidate()`](TokenBag::invalidate) it is
/// empty and accepts new tokens.
///
/// # Example
///
/// ```rust,ignore
/// let mut bag = TokenBag::new();
///
/// center.subscribe("user.updated", on_update).add_to(&mut bag);
/// center.subscribe("user.deleted", on_delete).add_to(&mut bag);
///
/// bag.invalidate(); // both observers are gone
/// ```
#[derive(Debug, Default)]
pub struct TokenBag {
    tokens: Vec<ObservationToken>,
}

impl TokenBag {
    /// Create an empty bag.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `token`. Insertion order is kept.
    pub fn add(&mut self, token: ObservationToken) {
        self.tokens.push(token);
    }

    /// Invalidate every contained token and empty the bag.
    ///
    /// Safe on an empty bag. Dropping the bag does the same for whatever
    /// it still holds.
    pub fn invalidate(&mut self) {
        // Dropping a token invalidates its registration.
        self.tokens.clear();
    }

    /// Number of tokens currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// `true` if the bag holds no tokens.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
