//! Single-channel keyframe trajectories with speed-bounded retiming.
//!
//! A [`Trajectory`] is immutable template data describing where one channel
//! should be at which relative time. Playing a gesture turns each template
//! into a [`TrajectoryRun`]: the channel's live value is prepended as the
//! t=0 keyframe, an optional return-to-start keyframe is appended, and the
//! schedule is retimed so no segment violates the channel's speed limits.

use serde::{Deserialize, Serialize};

use crate::error::GestureError;

/// Optional absolute rate limits for one channel.
///
/// `min` exists so a motion never crawls slowly enough to look broken;
/// `max` keeps segments within actuator capability.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimits {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl SpeedLimits {
    pub fn new(min: Option<f32>, max: Option<f32>) -> Self {
        Self { min, max }
    }

    /// Combine two limit sets, keeping the tighter bound on each side.
    ///
    /// The effective minimum is the larger of the two minimums, the
    /// effective maximum the smaller of the two maximums; a side specified
    /// by only one set carries over unchanged.
    pub fn merge_tighter(self, other: SpeedLimits) -> SpeedLimits {
        SpeedLimits {
            min: match (self.min, other.min) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            },
            max: match (self.max, other.max) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
        }
    }
}

/// Immutable keyframe description for one channel.
///
/// Positions are absolute targets in the channel's native unit; times are
/// offsets relative to gesture start, strictly increasing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    channel: String,
    positions: Vec<f32>,
    times: Vec<f32>,
    limits: SpeedLimits,
    return_to_initial: bool,
}

impl Trajectory {
    /// Validate and build a trajectory template.
    pub fn new(
        channel: impl Into<String>,
        positions: Vec<f32>,
        times: Vec<f32>,
        limits: SpeedLimits,
        return_to_initial: bool,
    ) -> Result<Self, GestureError> {
        let channel = channel.into();
        if positions.is_empty() {
            return Err(GestureError::EmptyKeyframes { channel });
        }
        if positions.len() != times.len() {
            return Err(GestureError::MismatchedLengths {
                channel,
                positions: positions.len(),
                times: times.len(),
            });
        }
        if positions.iter().chain(times.iter()).any(|v| !v.is_finite()) {
            return Err(GestureError::NonFinite { channel });
        }
        if times[0] < 0.0 || times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(GestureError::NonMonotonicTimes { channel });
        }
        if [limits.min, limits.max]
            .iter()
            .flatten()
            .any(|b| !b.is_finite() || *b <= 0.0)
        {
            return Err(GestureError::InvalidSpeedBound { channel });
        }
        Ok(Self {
            channel,
            positions,
            times,
            limits,
            return_to_initial,
        })
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn limits(&self) -> SpeedLimits {
        self.limits
    }

    pub fn return_to_initial(&self) -> bool {
        self.return_to_initial
    }

    /// Bind the template to the channel's live value and retime it.
    ///
    /// Prepends `(current_pose, 0)`, appends a synthetic keyframe back to
    /// `current_pose` when `return_to_initial` is set and a maximum speed
    /// is configured (sized so the return leg runs at that maximum), then
    /// runs the retiming pass.
    pub fn start(&self, current_pose: f32) -> Result<TrajectoryRun, GestureError> {
        let mut positions = Vec::with_capacity(self.positions.len() + 2);
        let mut times = Vec::with_capacity(self.times.len() + 2);
        positions.push(current_pose);
        times.push(0.0);
        positions.extend_from_slice(&self.positions);
        times.extend_from_slice(&self.times);

        if self.return_to_initial {
            if let Some(max) = self.limits.max {
                let last = positions[positions.len() - 1];
                let end = times[times.len() - 1];
                positions.push(current_pose);
                times.push(end + (last - current_pose).abs() / max);
            }
        }

        self.retime(positions, times)
    }

    /// The retiming pass: a single forward sweep over segments.
    ///
    /// Each segment's raw speed is `dx/dt`, with the zero-over-zero case
    /// folded to zero velocity. A segment whose |speed| violates a limit is
    /// clamped to the bound (sign preserved) and its duration recomputed;
    /// the timestamp vector is rebuilt as a running sum of segment
    /// durations, so the delta shifts every later keyframe while relative
    /// spacing downstream stays intact. Earlier segments are never
    /// revisited.
    fn retime(&self, positions: Vec<f32>, times: Vec<f32>) -> Result<TrajectoryRun, GestureError> {
        let mut velocities = Vec::with_capacity(positions.len() - 1);
        let mut retimed = Vec::with_capacity(times.len());
        retimed.push(times[0]);

        for i in 1..positions.len() {
            let dx = positions[i] - positions[i - 1];
            let dt = times[i] - times[i - 1];
            let mut speed = if dt > 0.0 {
                dx / dt
            } else if dx == 0.0 {
                0.0
            } else {
                return Err(GestureError::ZeroDurationSegment {
                    channel: self.channel.clone(),
                    index: i,
                    displacement: dx,
                });
            };

            let mut duration = dt;
            // A zero-speed segment is a deliberate hold; the minimum bound
            // applies to motion only.
            if let Some(min) = self.limits.min {
                if speed != 0.0 && speed.abs() < min {
                    speed = min.copysign(speed);
                    duration = dx.abs() / min;
                }
            }
            if let Some(max) = self.limits.max {
                if speed.abs() > max {
                    speed = max.copysign(speed);
                    duration = dx.abs() / max;
                }
            }

            velocities.push(speed);
            retimed.push(retimed[i - 1] + duration);
        }

        Ok(TrajectoryRun {
            positions,
            times: retimed,
            velocities,
        })
    }
}

/// Per-play run state of one channel: retimed keyframes plus the constant
/// velocity of each segment.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryRun {
    positions: Vec<f32>,
    times: Vec<f32>,
    velocities: Vec<f32>,
}

impl TrajectoryRun {
    /// Target value at elapsed time `t`.
    ///
    /// Scans segments in time order and interpolates within the first one
    /// whose end time exceeds `t`; past the last keyframe the final value
    /// is returned with `done = true`.
    pub fn sample(&self, t: f32) -> (f32, bool) {
        for (i, vel) in self.velocities.iter().enumerate() {
            if self.times[i + 1] > t {
                return (self.positions[i] + vel * (t - self.times[i]), false);
            }
        }
        (self.positions[self.velocities.len()], true)
    }

    /// Total retimed duration.
    pub fn duration(&self) -> f32 {
        self.times[self.times.len() - 1]
    }

    /// Per-segment constant velocities after retiming.
    pub fn velocities(&self) -> &[f32] {
        &self.velocities
    }
}
