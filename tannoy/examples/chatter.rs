//! Tour of the notification center.
//!
//! This example shows:
//! - Typed posting and observing
//! - Exact-type narrowing (mismatches pass silently)
//! - Untyped observation of raw metadata
//! - Sender scoping
//! - Token bags
//! - Deferred delivery on a worker queue
//! - Keyboard notification decoding

use std::sync::Arc;
use std::time::Duration;

use tannoy::keyboard::{self, AnimationCurve, KEYBOARD_WILL_SHOW};
use tannoy::{DispatchQueue, Metadata, NotificationCenter, SenderId, TokenBag, WorkerQueue};

use kurbo::Rect;

#[derive(Debug, Clone, PartialEq)]
struct User {
    name: String,
    age: u32,
}

fn main() {
    let center = NotificationCenter::new();
    let mut bag = TokenBag::new();

    // ========================================================================
    // Typed observation
    // ========================================================================

    println!("=== Typed observation ===");

    center
        .subscribe("user.updated", |user: &User| {
            println!("  user observer: {:?}", user);
        })
        .add_to(&mut bag);

    center
        .subscribe("user.updated", |count: &i32| {
            println!("  count observer: {}", count);
        })
        .add_to(&mut bag);

    // Only the User observer fires for this one.
    center.post(
        "user.updated",
        User {
            name: String::from("Beast"),
            age: 666,
        },
    );

    // And only the i32 observer for this one. Same name, different payload.
    center.post("user.updated", 10);

    // ========================================================================
    // Untyped observation
    // ========================================================================

    println!("\n=== Untyped observation ===");

    center
        .observe("session.ended", |metadata| {
            println!(
                "  reason: {:?}, code: {:?}",
                metadata.get::<String>("reason"),
                metadata.get::<i32>("code"),
            );
        })
        .add_to(&mut bag);

    let mut metadata = Metadata::new();
    metadata.insert("reason", String::from("timeout"));
    metadata.insert("code", 408);
    center.post_metadata("session.ended", None, metadata);

    // ========================================================================
    // Sender scoping
    // ========================================================================

    println!("\n=== Sender scoping ===");

    let uploader = SenderId::next();
    let downloader = SenderId::next();

    center
        .subscribe_with("transfer.progress", Some(uploader), None, |pct: &u8| {
            println!("  upload progress: {}%", pct);
        })
        .add_to(&mut bag);

    center.post_with("transfer.progress", Some(uploader), 40u8);
    center.post_with("transfer.progress", Some(downloader), 90u8); // not ours

    // ========================================================================
    // Deferred delivery
    // ========================================================================

    println!("\n=== Deferred delivery ===");

    let queue: Arc<dyn DispatchQueue> = Arc::new(WorkerQueue::new(2));

    center
        .subscribe_with("render.finished", None, Some(queue), |frame: &u64| {
            println!(
                "  frame {} handled on {:?}",
                frame,
                std::thread::current().id()
            );
        })
        .add_to(&mut bag);

    center.post("render.finished", 1u64);
    center.post("render.finished", 2u64);

    // Give the workers a moment before the demo moves on.
    std::thread::sleep(Duration::from_millis(50));

    // ========================================================================
    // Keyboard notifications
    // ========================================================================

    println!("\n=== Keyboard notifications ===");

    center
        .subscribe_keyboard_will_show(None, |keyboard| {
            println!(
                "  keyboard rising to {:?} over {}s ({:?})",
                keyboard.frame_end(),
                keyboard.duration(),
                keyboard.curve(),
            );
        })
        .add_to(&mut bag);

    // What a platform bridge would post.
    let mut transition = Metadata::new();
    transition.insert(keyboard::keys::FRAME_BEGIN, Rect::new(0.0, 800.0, 400.0, 800.0));
    transition.insert(keyboard::keys::FRAME_END, Rect::new(0.0, 520.0, 400.0, 800.0));
    transition.insert(keyboard::keys::ANIMATION_DURATION, 0.3);
    transition.insert(keyboard::keys::ANIMATION_CURVE, AnimationCurve::EaseOut);
    center.post_metadata(KEYBOARD_WILL_SHOW, None, transition);

    // ========================================================================
    // Teardown
    // ========================================================================

    println!("\n=== Teardown ===");
    println!("  observers before: {}", center.observer_count("user.updated"));

    bag.invalidate();

    println!("  observers after:  {}", center.observer_count("user.updated"));

    // Silence: nothing listens anymore.
    center.post(
        "user.updated",
        User {
            name: String::from("Shy"),
            age: 1,
        },
    );

    println!("\ndemo complete");
}
