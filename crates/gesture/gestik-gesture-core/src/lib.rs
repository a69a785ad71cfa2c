//! Gestik Gesture Core (hardware-agnostic)
//!
//! Turns sparse, declarative keyframe descriptions of expressive gestures
//! into smooth per-tick target values for every channel of a robot:
//! kinematic joints, cosmetic actuators, scalar emotion levels, and
//! locomotion velocity. The crate owns the retiming math, multi-channel
//! synchronization, playback scheduling, and gesture-file loading; SDK
//! sessions, sensors, and actuator publishing live with the caller, which
//! drives [`player::GesturePlayer::tick`] from its fixed-rate loop.

pub mod channels;
pub mod config;
pub mod error;
pub mod gesture;
pub mod library;
pub mod player;
pub mod track;
pub mod trajectory;

// Re-exports for consumers (robot adapters)
pub use channels::{ChannelGroup, ChannelRef};
pub use config::{OverflowPolicy, PlayerConfig};
pub use error::GestureError;
pub use gesture::{CommandFrame, Gesture, GestureRun, LivePose};
pub use library::GestureLibrary;
pub use player::{GesturePlayer, TickOutcome};
pub use track::{ChannelTrack, EmotionTrack, LocomotionTrack};
pub use trajectory::{SpeedLimits, Trajectory, TrajectoryRun};
