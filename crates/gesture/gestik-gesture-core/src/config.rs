//! Player configuration.

use serde::{Deserialize, Serialize};

/// What to do when a gesture is queued while the pending queue is full.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Evict the oldest pending gesture to make room. A reaction queue
    /// usually wants the newest reaction, not the oldest backlog.
    DropOldest,
    /// Refuse the new gesture with [`GestureError::QueueFull`].
    ///
    /// [`GestureError::QueueFull`]: crate::error::GestureError::QueueFull
    Reject,
}

/// Configuration for a [`GesturePlayer`].
///
/// [`GesturePlayer`]: crate::player::GesturePlayer
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Maximum number of pending gestures.
    pub queue_capacity: usize,
    /// Backpressure policy applied at the capacity limit.
    pub overflow: OverflowPolicy,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 8,
            overflow: OverflowPolicy::DropOldest,
        }
    }
}
