//! Gesture templates and their per-play run state.
//!
//! A [`Gesture`] bundles channel tracks across the four groups. Templates
//! are immutable and shareable; playing one produces a [`GestureRun`]
//! seeded from the robot's live pose, which is sampled once per tick until
//! every channel reports done.

use serde::{Deserialize, Serialize};

use crate::channels::{
    lookup, ChannelGroup, ChannelRef, COSMETIC_COUNT, EMOTION_COUNT, KINEMATIC_COUNT,
    LOCOMOTION_COUNT,
};
use crate::error::GestureError;
use crate::track::{ChannelTrack, EmotionRun, EmotionTrack, LocomotionTrack, TrackRun};
use crate::trajectory::Trajectory;

/// The robot's live channel state, read once per gesture start so motion
/// begins from wherever the robot currently is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LivePose {
    pub kinematic: [f32; KINEMATIC_COUNT],
    pub cosmetic: [f32; COSMETIC_COUNT],
    pub emotion: [f32; EMOTION_COUNT],
}

/// One tick's worth of output across all four channel groups. Channels the
/// gesture does not touch echo their held value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandFrame {
    pub kinematic: [f32; KINEMATIC_COUNT],
    pub cosmetic: [f32; COSMETIC_COUNT],
    pub emotion: [f32; EMOTION_COUNT],
    pub locomotion: [f32; LOCOMOTION_COUNT],
}

/// A named, immutable bundle of channel tracks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    name: String,
    kinematic: [Option<Trajectory>; KINEMATIC_COUNT],
    cosmetic: [Option<Trajectory>; COSMETIC_COUNT],
    emotion: [Option<EmotionTrack>; EMOTION_COUNT],
    locomotion: [Option<LocomotionTrack>; LOCOMOTION_COUNT],
}

impl Gesture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach a track to the named channel, checking that the track kind
    /// matches the channel's group.
    pub fn with_channel(mut self, name: &str, track: ChannelTrack) -> Result<Self, GestureError> {
        let Some(ChannelRef { group, index }) = lookup(name) else {
            return Err(GestureError::UnknownChannel {
                channel: name.to_string(),
            });
        };
        match (group, track) {
            (ChannelGroup::Kinematic, ChannelTrack::Motion(traj)) => {
                self.kinematic[index] = Some(traj);
            }
            (ChannelGroup::Cosmetic, ChannelTrack::Motion(traj)) => {
                self.cosmetic[index] = Some(traj);
            }
            (ChannelGroup::Emotion, ChannelTrack::Emotion(track)) => {
                self.emotion[index] = Some(track);
            }
            (ChannelGroup::Locomotion, ChannelTrack::Locomotion(track)) => {
                self.locomotion[index] = Some(track);
            }
            (group, _) => {
                return Err(GestureError::ChannelKindMismatch {
                    channel: name.to_string(),
                    expected: match group {
                        ChannelGroup::Emotion => "emotion",
                        ChannelGroup::Locomotion => "locomotion",
                        _ => "motion",
                    },
                });
            }
        }
        Ok(self)
    }

    /// The motion trajectory attached to a kinematic or cosmetic channel,
    /// if any. Useful for tooling and tests.
    pub fn motion(&self, channel: ChannelRef) -> Option<&Trajectory> {
        match channel.group {
            ChannelGroup::Kinematic => self.kinematic.get(channel.index)?.as_ref(),
            ChannelGroup::Cosmetic => self.cosmetic.get(channel.index)?.as_ref(),
            _ => None,
        }
    }

    /// Seed run state for every channel from the live pose and retime the
    /// motion channels. Channels this gesture does not touch become holds
    /// at their live value; untouched locomotion slots hold zero.
    pub fn start(&self, live: &LivePose) -> Result<GestureRun, GestureError> {
        let mut kinematic: [TrackRun; KINEMATIC_COUNT] =
            core::array::from_fn(|i| TrackRun::Hold(live.kinematic[i]));
        for (i, slot) in self.kinematic.iter().enumerate() {
            if let Some(traj) = slot {
                kinematic[i] = TrackRun::Motion(
                    traj.start(live.kinematic[i])
                        .map_err(|e| e.in_gesture(&self.name))?,
                );
            }
        }

        let mut cosmetic: [TrackRun; COSMETIC_COUNT] =
            core::array::from_fn(|i| TrackRun::Hold(live.cosmetic[i]));
        for (i, slot) in self.cosmetic.iter().enumerate() {
            if let Some(traj) = slot {
                cosmetic[i] = TrackRun::Motion(
                    traj.start(live.cosmetic[i])
                        .map_err(|e| e.in_gesture(&self.name))?,
                );
            }
        }

        let emotion: [EmotionRun; EMOTION_COUNT] = core::array::from_fn(|i| {
            match &self.emotion[i] {
                Some(track) => track.start(live.emotion[i]),
                None => EmotionRun::hold(live.emotion[i]),
            }
        });

        let locomotion: [TrackRun; LOCOMOTION_COUNT] =
            core::array::from_fn(|i| match &self.locomotion[i] {
                Some(track) => TrackRun::Commands(track.start()),
                None => TrackRun::Hold(0.0),
            });

        Ok(GestureRun {
            name: self.name.clone(),
            elapsed: 0.0,
            kinematic,
            cosmetic,
            emotion,
            locomotion,
        })
    }
}

/// Live playback state of one gesture: elapsed time plus each channel's run
/// state. Exclusively owned by the player while active.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureRun {
    name: String,
    elapsed: f32,
    kinematic: [TrackRun; KINEMATIC_COUNT],
    cosmetic: [TrackRun; COSMETIC_COUNT],
    emotion: [EmotionRun; EMOTION_COUNT],
    locomotion: [TrackRun; LOCOMOTION_COUNT],
}

impl GestureRun {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance the run clock. Negative deltas are treated as zero; time
    /// never runs backwards mid-gesture.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    /// Sample every channel at the current elapsed time.
    ///
    /// Returns `None` once all channels are done, so completion is gated by
    /// the slowest channel rather than the fastest.
    pub fn sample(&self) -> Option<CommandFrame> {
        let t = self.elapsed;
        let mut frame = CommandFrame::default();
        let mut finished = true;

        for (slot, run) in frame.kinematic.iter_mut().zip(self.kinematic.iter()) {
            let (value, done) = run.sample(t);
            *slot = value;
            finished &= done;
        }
        for (slot, run) in frame.cosmetic.iter_mut().zip(self.cosmetic.iter()) {
            let (value, done) = run.sample(t);
            *slot = value;
            finished &= done;
        }
        for (slot, run) in frame.emotion.iter_mut().zip(self.emotion.iter()) {
            let (value, done) = run.sample();
            *slot = value;
            finished &= done;
        }
        for (slot, run) in frame.locomotion.iter_mut().zip(self.locomotion.iter()) {
            let (value, done) = run.sample(t);
            *slot = value;
            finished &= done;
        }

        if finished {
            None
        } else {
            Some(frame)
        }
    }

    /// Pre-play baseline of each emotion channel, for restoring ambient
    /// affect after playback.
    pub fn initial_emotion(&self) -> [f32; EMOTION_COUNT] {
        core::array::from_fn(|i| self.emotion[i].baseline())
    }
}
