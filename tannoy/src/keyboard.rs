//! Keyboard notification decoding for UI hosts.
//!
//! A platform bridge watches the host toolkit's keyboard transitions and
//! posts them to a center under the well-known names in this module, filling
//! the metadata keys in [`keys`]. Application code subscribes through the
//! helpers on [`NotificationCenter`] and receives a [`KeyboardNotification`],
//! a read-only view that decodes the interesting fields.
//!
//! # Defaults
//!
//! Decoding never fails. A field that is absent, or present with an
//! unexpected type, reads as its documented default:
//!
//! - frames default to [`Rect::ZERO`],
//! - the animation duration defaults to [`DEFAULT_ANIMATION_DURATION`]
//!   (0.25 seconds),
//! - the curve defaults to [`AnimationCurve::EaseInOut`].
//!
//! # Coordinate Spaces
//!
//! Keyboard frames arrive in screen coordinates. Pass anything implementing
//! [`CoordinateSpace`] to the `*_converted` accessors to map a frame into a
//! view's local space; the conversion itself belongs to the UI toolkit.

use std::sync::Arc;

use kurbo::Rect;

use crate::center::NotificationCenter;
use crate::metadata::Metadata;
use crate::name::Name;
use crate::notification::Notification;
use crate::queue::DispatchQueue;
use crate::token::ObservationToken;

/// Posted just before the keyboard becomes visible.
pub const KEYBOARD_WILL_SHOW: Name = Name::from_static("keyboard.will-show");

/// Posted once the keyboard is fully visible.
pub const KEYBOARD_DID_SHOW: Name = Name::from_static("keyboard.did-show");

/// Posted just before the keyboard starts hiding.
pub const KEYBOARD_WILL_HIDE: Name = Name::from_static("keyboard.will-hide");

/// Posted once the keyboard is fully hidden.
pub const KEYBOARD_DID_HIDE: Name = Name::from_static("keyboard.did-hide");

/// Posted just before the keyboard frame changes for any reason.
pub const KEYBOARD_WILL_CHANGE_FRAME: Name = Name::from_static("keyboard.will-change-frame");

/// Animation duration used when the bridge did not supply one, in seconds.
pub const DEFAULT_ANIMATION_DURATION: f64 = 0.25;

/// Metadata keys a platform bridge fills in when posting keyboard
/// notifications. The decoder only ever reads them.
pub mod keys {
    /// The keyboard frame before the transition, as a [`kurbo::Rect`] in
    /// screen coordinates.
    pub const FRAME_BEGIN: &str = "keyboard.frame-begin";

    /// The keyboard frame after the transition, as a [`kurbo::Rect`] in
    /// screen coordinates.
    pub const FRAME_END: &str = "keyboard.frame-end";

    /// Transition duration in seconds, as an `f64`.
    pub const ANIMATION_DURATION: &str = "keyboard.animation-duration";

    /// Animation curve, as an [`AnimationCurve`](super::AnimationCurve) or
    /// the platform's raw `u32` enumerant.
    pub const ANIMATION_CURVE: &str = "keyboard.animation-curve";
}

/// The timing curve of a keyboard transition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCurve {
    /// Slow start and slow end. The platform default.
    #[default]
    EaseInOut,
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
    /// Constant speed.
    Linear,
}

impl AnimationCurve {
    /// Decode a platform curve enumerant.
    ///
    /// Unknown values map to [`AnimationCurve::EaseInOut`].
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::EaseInOut,
            1 => Self::EaseIn,
            2 => Self::EaseOut,
            3 => Self::Linear,
            _ => Self::EaseInOut,
        }
    }
}

/// A coordinate space keyboard frames can be converted into.
///
/// UI toolkits implement this for their view or window types. The screen
/// space a keyboard frame starts in is whatever space the platform bridge
/// posted it in.
pub trait CoordinateSpace {
    /// Convert a rectangle from screen coordinates into this space.
    fn from_screen(&self, rect: Rect) -> Rect;
}

/// Read-only view over a keyboard notification's metadata.
///
/// Construction never fails and accessors never error; see the module
/// documentation for the defaults applied to missing fields.
#[derive(Debug, Clone)]
pub struct KeyboardNotification {
    metadata: Arc<Metadata>,
}

impl KeyboardNotification {
    /// Wrap a delivered notification.
    pub fn new(notification: &Notification) -> Self {
        Self::from_metadata(notification.shared_metadata())
    }

    /// Wrap a shared metadata map directly.
    pub fn from_metadata(metadata: Arc<Metadata>) -> Self {
        Self { metadata }
    }

    /// The keyboard frame before the transition, in screen coordinates.
    pub fn frame_begin(&self) -> Rect {
        self.rect(keys::FRAME_BEGIN)
    }

    /// The keyboard frame after the transition, in screen coordinates.
    pub fn frame_end(&self) -> Rect {
        self.rect(keys::FRAME_END)
    }

    /// The transition duration in seconds.
    pub fn duration(&self) -> f64 {
        self.metadata
            .get::<f64>(keys::ANIMATION_DURATION)
            .copied()
            .unwrap_or(DEFAULT_ANIMATION_DURATION)
    }

    /// The transition's timing curve.
    ///
    /// Accepts either a decoded [`AnimationCurve`] or the platform's raw
    /// enumerant in the metadata.
    pub fn curve(&self) -> AnimationCurve {
        if let Some(curve) = self.metadata.get::<AnimationCurve>(keys::ANIMATION_CURVE) {
            return *curve;
        }
        self.metadata
            .get::<u32>(keys::ANIMATION_CURVE)
            .map(|raw| AnimationCurve::from_raw(*raw))
            .unwrap_or_default()
    }

    /// [`frame_begin()`](Self::frame_begin) converted into `space`.
    pub fn frame_begin_converted(&self, space: &impl CoordinateSpace) -> Rect {
        space.from_screen(self.frame_begin())
    }

    /// [`frame_end()`](Self::frame_end) converted into `space`.
    pub fn frame_end_converted(&self, space: &impl CoordinateSpace) -> Rect {
        space.from_screen(self.frame_end())
    }

    /// The raw metadata, for fields the typed accessors do not cover.
    #[inline]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn rect(&self, key: &str) -> Rect {
        self.metadata.get::<Rect>(key).copied().unwrap_or(Rect::ZERO)
    }
}

impl NotificationCenter {
    /// Observe the keyboard about to show.
    pub fn subscribe_keyboard_will_show<F>(
        &self,
        queue: Option<Arc<dyn DispatchQueue>>,
        callback: F,
    ) -> ObservationToken
    where
        F: Fn(KeyboardNotification) + Send + Sync + 'static,
    {
        self.subscribe_keyboard(KEYBOARD_WILL_SHOW, queue, callback)
    }

    /// Observe the keyboard having shown.
    pub fn subscribe_keyboard_did_show<F>(
        &self,
        queue: Option<Arc<dyn DispatchQueue>>,
        callback: F,
    ) -> ObservationToken
    where
        F: Fn(KeyboardNotification) + Send + Sync + 'static,
    {
        self.subscribe_keyboard(KEYBOARD_DID_SHOW, queue, callback)
    }

    /// Observe the keyboard about to hide.
    pub fn subscribe_keyboard_will_hide<F>(
        &self,
        queue: Option<Arc<dyn DispatchQueue>>,
        callback: F,
    ) -> ObservationToken
    where
        F: Fn(KeyboardNotification) + Send + Sync + 'static,
    {
        self.subscribe_keyboard(KEYBOARD_WILL_HIDE, queue, callback)
    }

    /// Observe the keyboard having hidden.
    pub fn subscribe_keyboard_did_hide<F>(
        &self,
        queue: Option<Arc<dyn DispatchQueue>>,
        callback: F,
    ) -> ObservationToken
    where
        F: Fn(KeyboardNotification) + Send + Sync + 'static,
    {
        self.subscribe_keyboard(KEYBOARD_DID_HIDE, queue, callback)
    }

    /// Observe any upcoming keyboard frame change.
    pub fn subscribe_keyboard_will_change_frame<F>(
        &self,
        queue: Option<Arc<dyn DispatchQueue>>,
        callback: F,
    ) -> ObservationToken
    where
        F: Fn(KeyboardNotification) + Send + Sync + 'static,
    {
        self.subscribe_keyboard(KEYBOARD_WILL_CHANGE_FRAME, queue, callback)
    }

    fn subscribe_keyboard<F>(
        &self,
        name: Name,
        queue: Option<Arc<dyn DispatchQueue>>,
        callback: F,
    ) -> ObservationToken
    where
        F: Fn(KeyboardNotification) + Send + Sync + 'static,
    {
        self.add_observer(name, None, queue, move |notification| {
            callback(KeyboardNotification::new(notification))
        })
    }
}
