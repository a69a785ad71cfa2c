//! Degenerate channel kinds and the per-channel run-state dispatch.
//!
//! Not every channel a gesture touches is a keyframed motion: emotion
//! channels carry a single target level, locomotion channels a
//! piecewise-constant command list, and channels the gesture leaves alone
//! simply hold their live value.

use serde::{Deserialize, Serialize};

use crate::error::GestureError;
use crate::trajectory::{Trajectory, TrajectoryRun};

/// Template for a scalar emotion channel: a bare target level, no time
/// profile.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionTrack {
    target: f32,
}

impl EmotionTrack {
    pub fn new(target: f32) -> Self {
        Self { target }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Capture the channel's pre-gesture level so it can be restored when
    /// playback ends.
    pub fn start(&self, current_level: f32) -> EmotionRun {
        EmotionRun {
            target: self.target,
            baseline: current_level,
        }
    }
}

/// Run state of an emotion channel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EmotionRun {
    target: f32,
    baseline: f32,
}

impl EmotionRun {
    /// A level that holds at `level` (used for channels the gesture does
    /// not touch; restoring the baseline is then the identity).
    pub fn hold(level: f32) -> Self {
        Self {
            target: level,
            baseline: level,
        }
    }

    pub fn sample(&self) -> (f32, bool) {
        (self.target, true)
    }

    /// The pre-gesture ambient level.
    pub fn baseline(&self) -> f32 {
        self.baseline
    }
}

/// Template for a locomotion channel: an ordered command schedule with no
/// interpolation between entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocomotionTrack {
    channel: String,
    values: Vec<f32>,
    times: Vec<f32>,
}

impl LocomotionTrack {
    pub fn new(
        channel: impl Into<String>,
        values: Vec<f32>,
        times: Vec<f32>,
    ) -> Result<Self, GestureError> {
        let channel = channel.into();
        if values.is_empty() {
            return Err(GestureError::EmptyKeyframes { channel });
        }
        if values.len() != times.len() {
            return Err(GestureError::MismatchedLengths {
                channel,
                positions: values.len(),
                times: times.len(),
            });
        }
        if values.iter().chain(times.iter()).any(|v| !v.is_finite()) {
            return Err(GestureError::NonFinite { channel });
        }
        if times[0] < 0.0 || times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(GestureError::NonMonotonicTimes { channel });
        }
        Ok(Self {
            channel,
            values,
            times,
        })
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Build the run state: the schedule gains an implicit leading
    /// `(0.0, t=0)` command, so the robot stays still until the first entry
    /// comes due.
    pub fn start(&self) -> LocomotionRun {
        let mut values = Vec::with_capacity(self.values.len() + 1);
        let mut times = Vec::with_capacity(self.times.len() + 1);
        values.push(0.0);
        times.push(0.0);
        values.extend_from_slice(&self.values);
        times.extend_from_slice(&self.times);
        LocomotionRun { values, times }
    }
}

/// Run state of a locomotion channel.
#[derive(Clone, Debug, PartialEq)]
pub struct LocomotionRun {
    values: Vec<f32>,
    times: Vec<f32>,
}

impl LocomotionRun {
    /// The command active at elapsed time `t`; once `t` passes the
    /// schedule, the last command with `done = true`.
    pub fn sample(&self, t: f32) -> (f32, bool) {
        for i in 0..self.values.len() - 1 {
            if self.times[i + 1] > t {
                return (self.values[i], false);
            }
        }
        (self.values[self.values.len() - 1], true)
    }
}

/// A channel entry of a gesture template, tagged by kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ChannelTrack {
    Motion(Trajectory),
    Emotion(EmotionTrack),
    Locomotion(LocomotionTrack),
}

/// Run state of one motion or locomotion slot.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackRun {
    /// Keep the slot at a fixed value; always done.
    Hold(f32),
    Motion(TrajectoryRun),
    Commands(LocomotionRun),
}

impl TrackRun {
    pub fn sample(&self, t: f32) -> (f32, bool) {
        match self {
            TrackRun::Hold(value) => (*value, true),
            TrackRun::Motion(run) => run.sample(t),
            TrackRun::Commands(run) => run.sample(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locomotion_steps_through_commands_without_interpolating() {
        let track = LocomotionTrack::new("x_vel", vec![0.5, 0.2], vec![1.0, 2.0]).unwrap();
        let run = track.start();
        assert_eq!(run.sample(0.5), (0.0, false));
        assert_eq!(run.sample(1.5), (0.5, false));
        assert_eq!(run.sample(2.5), (0.2, true));
    }

    #[test]
    fn emotion_reports_target_and_remembers_baseline() {
        let run = EmotionTrack::new(0.9).start(0.4);
        assert_eq!(run.sample(), (0.9, true));
        assert_eq!(run.baseline(), 0.4);
    }

    #[test]
    fn hold_is_always_done() {
        let run = TrackRun::Hold(0.25);
        assert_eq!(run.sample(0.0), (0.25, true));
        assert_eq!(run.sample(100.0), (0.25, true));
    }
}
