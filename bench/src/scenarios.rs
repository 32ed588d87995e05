//! Reusable scenario builders for the benchmarks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tannoy::{Name, NotificationCenter, TokenBag};

use crate::payloads::ChatLine;

/// Deterministic RNG so scenario runs are comparable across machines.
pub fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(0x5EED)
}

/// Room names for the chat fan-out scenario.
pub fn room_names(rooms: usize) -> Vec<Name> {
    (0..rooms)
        .map(|i| Name::from(format!("bench.room.{i}")))
        .collect()
}

/// Subscribe `per_room` counting observers to every room.
///
/// Returns the bag keeping the observers alive and the shared delivery
/// counter they bump.
pub fn subscribe_rooms(
    center: &NotificationCenter,
    names: &[Name],
    per_room: usize,
) -> (TokenBag, Arc<AtomicU64>) {
    let delivered = Arc::new(AtomicU64::new(0));
    let mut bag = TokenBag::new();

    for name in names {
        for _ in 0..per_room {
            let delivered = Arc::clone(&delivered);
            center
                .subscribe(name.clone(), move |_: &ChatLine| {
                    delivered.fetch_add(1, Ordering::Relaxed);
                })
                .add_to(&mut bag);
        }
    }

    (bag, delivered)
}

/// A random chat line for `room`.
pub fn chat_line(rng: &mut ChaCha8Rng, room: u32) -> ChatLine {
    ChatLine {
        room,
        author: format!("user-{}", rng.gen_range(0..512)),
        body: String::from("the quick brown fox jumps over the lazy dog"),
    }
}
