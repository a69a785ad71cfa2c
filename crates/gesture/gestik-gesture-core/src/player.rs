//! Tick-driven gesture playback.
//!
//! The player holds a bounded FIFO of pending gestures and at most one
//! active run. An external fixed-rate source calls [`GesturePlayer::tick`]
//! once per period; everything here is synchronous and bounded by the total
//! keyframe count of the active gesture. The player is `Send`; callers that
//! enqueue from another thread wrap it in a mutex held only around
//! `play`/`tick`/accessor calls.

use std::collections::VecDeque;
use std::sync::Arc;

use log::{debug, warn};

use crate::channels::{COSMETIC_COUNT, EMOTION_COUNT, KINEMATIC_COUNT, LOCOMOTION_COUNT};
use crate::config::{OverflowPolicy, PlayerConfig};
use crate::error::GestureError;
use crate::gesture::{CommandFrame, Gesture, GestureRun, LivePose};

/// What a single tick did.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// No active gesture and nothing pending.
    Idle,
    /// A pending gesture was activated and seeded from the live pose; its
    /// first frame arrives next tick.
    Started { gesture: String },
    /// The active gesture produced a command frame.
    Frame(CommandFrame),
    /// The active gesture finished this tick; ambient emotion was restored
    /// and locomotion zeroed.
    Finished { gesture: String },
}

/// Per-tick scheduler owning the pending queue and the active gesture run.
#[derive(Debug, Default)]
pub struct GesturePlayer {
    cfg: PlayerConfig,
    pending: VecDeque<Arc<Gesture>>,
    active: Option<GestureRun>,
    config: [f32; KINEMATIC_COUNT],
    cosmetic: [f32; COSMETIC_COUNT],
    emotion: [f32; EMOTION_COUNT],
    cmd_vel: [f32; LOCOMOTION_COUNT],
    animation_running: bool,
    vocalize: bool,
}

impl GesturePlayer {
    pub fn new(cfg: PlayerConfig) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    /// Enqueue a gesture for playback. Never blocks; at capacity the
    /// configured [`OverflowPolicy`] decides between eviction and refusal.
    pub fn play(&mut self, gesture: Arc<Gesture>) -> Result<(), GestureError> {
        if self.pending.len() >= self.cfg.queue_capacity {
            match self.cfg.overflow {
                OverflowPolicy::Reject => {
                    return Err(GestureError::QueueFull {
                        capacity: self.cfg.queue_capacity,
                    });
                }
                OverflowPolicy::DropOldest => {
                    if let Some(dropped) = self.pending.pop_front() {
                        warn!(
                            "gesture queue full, dropping oldest pending gesture '{}'",
                            dropped.name()
                        );
                    }
                }
            }
        }
        self.pending.push_back(gesture);
        Ok(())
    }

    /// The single per-period entry point.
    ///
    /// Idle with an empty queue is a no-op. Activating a gesture seeds its
    /// run state from `live`; a start failure (degenerate timing discovered
    /// against the live pose) drops that gesture, leaves the player Idle
    /// with the rest of the queue intact, and surfaces the error to the
    /// caller.
    pub fn tick(&mut self, dt: f32, live: &LivePose) -> Result<TickOutcome, GestureError> {
        let Some(mut run) = self.active.take() else {
            let Some(next) = self.pending.pop_front() else {
                return Ok(TickOutcome::Idle);
            };
            let run = next.start(live)?;
            debug!("starting gesture '{}'", run.name());
            self.config = live.kinematic;
            self.cosmetic = live.cosmetic;
            self.emotion = live.emotion;
            let gesture = run.name().to_string();
            self.active = Some(run);
            return Ok(TickOutcome::Started { gesture });
        };

        run.advance(dt);
        match run.sample() {
            Some(frame) => {
                self.animation_running = true;
                self.vocalize = true;
                self.config = frame.kinematic;
                self.cosmetic = frame.cosmetic;
                self.emotion = frame.emotion;
                self.cmd_vel = frame.locomotion;
                self.active = Some(run);
                Ok(TickOutcome::Frame(frame))
            }
            None => {
                debug!("finished gesture '{}'", run.name());
                self.retire(&run);
                Ok(TickOutcome::Finished {
                    gesture: run.name().to_string(),
                })
            }
        }
    }

    /// Drop the in-flight gesture with the same cleanup as natural
    /// completion. Pending gestures are unaffected.
    pub fn cancel(&mut self) {
        if let Some(run) = self.active.take() {
            debug!("cancelling gesture '{}'", run.name());
            self.retire(&run);
        }
    }

    /// Discard all pending gestures.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    fn retire(&mut self, run: &GestureRun) {
        self.emotion = run.initial_emotion();
        self.cmd_vel = [0.0; LOCOMOTION_COUNT];
        self.animation_running = false;
        self.vocalize = false;
    }

    /// Latest kinematic joint configuration.
    pub fn config(&self) -> [f32; KINEMATIC_COUNT] {
        self.config
    }

    /// Latest cosmetic joint values.
    pub fn cosmetic_joints(&self) -> [f32; COSMETIC_COUNT] {
        self.cosmetic
    }

    /// Latest emotion levels (restored to baseline after playback).
    pub fn emotion(&self) -> [f32; EMOTION_COUNT] {
        self.emotion
    }

    /// Latest locomotion velocity command.
    pub fn cmd_vel(&self) -> [f32; LOCOMOTION_COUNT] {
        self.cmd_vel
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn animation_running(&self) -> bool {
        self.animation_running
    }

    pub fn vocalize(&self) -> bool {
        self.vocalize
    }
}
