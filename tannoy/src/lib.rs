//! Typed notifications over an in-process notification center.
//!
//! This crate provides a small publish/subscribe layer where the payload of
//! a post is a strongly typed Rust value. An observer states the type it
//! expects; posts carrying anything else pass it by silently. On top of that
//! sit RAII observation tokens, batch token ownership, pluggable delivery
//! queues, and a keyboard notification decoder for UI hosts.
//!
//! # Overview
//!
//! - [`NotificationCenter`]: the hub posts flow through. Typed, untyped, and
//!   raw observation layers; sender scoping; a process-wide
//!   [`global()`](NotificationCenter::global) instance next to freely
//!   constructible ones.
//! - [`ObservationToken`]: owns one registration; invalidation is idempotent
//!   and dropping the token invalidates it.
//! - [`TokenBag`]: owns many tokens and takes them all down together.
//! - [`DispatchQueue`] / [`WorkerQueue`]: where deliveries run when they
//!   should not run inline on the posting thread.
//! - [`keyboard`]: decoder and subscribe helpers for keyboard transitions
//!   (behind the default-on `keyboard` feature).
//!
//! # Example
//!
//! ```rust,ignore
//! use tannoy::{NotificationCenter, TokenBag};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct User { name: String, age: u32 }
//!
//! let center = NotificationCenter::new();
//! let mut bag = TokenBag::new();
//!
//! center
//!     .subscribe("user.updated", |user: &User| println!("{user:?}"))
//!     .add_to(&mut bag);
//!
//! center.post("user.updated", User { name: "Beast".into(), age: 666 });
//!
//! bag.invalidate();
//! ```

pub mod bag;
pub mod center;
pub mod metadata;
pub mod name;
pub mod notification;
pub mod queue;
pub mod token;

#[cfg(feature = "keyboard")]
pub mod keyboard;

pub use bag::TokenBag;
pub use center::NotificationCenter;
pub use metadata::{Metadata, Payload};
pub use name::Name;
pub use notification::{Notification, SenderId};
pub use queue::{DispatchQueue, WorkerQueue};
pub use token::ObservationToken;

#[cfg(feature = "keyboard")]
pub use keyboard::KeyboardNotification;
