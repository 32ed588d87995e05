//! Payload types used across the benchmarks.

/// Minimal payload: a frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub frame: u64,
}

/// Mid-sized payload resembling a chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatLine {
    pub room: u32,
    pub author: String,
    pub body: String,
}

/// Large payload for measuring clone-free delivery.
#[derive(Debug, Clone)]
pub struct Blob {
    pub bytes: [u8; 256],
}

impl Default for Blob {
    fn default() -> Self {
        Self { bytes: [0xAB; 256] }
    }
}
