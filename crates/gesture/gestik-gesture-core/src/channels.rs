//! Channel vocabularies and group indexing.
//!
//! Every animated degree of freedom belongs to one of four fixed groups.
//! Group membership and slot index are resolved once, at load time; the
//! tick path only ever indexes fixed-size arrays.

use serde::{Deserialize, Serialize};

/// Cosmetic actuators (tail, eyelids, ears).
pub const COSMETIC_CHANNELS: [&str; COSMETIC_COUNT] =
    ["tail_droop", "tail_wag", "eyel", "eyer", "earl", "earr"];
/// Kinematic joints (head/neck chain).
pub const KINEMATIC_CHANNELS: [&str; KINEMATIC_COUNT] = ["tilt", "lift", "yaw", "pitch"];
/// Scalar affect dimensions.
pub const EMOTION_CHANNELS: [&str; EMOTION_COUNT] = ["valence", "arousal"];
/// Body velocity commands (forward speed, rotation rate).
pub const LOCOMOTION_CHANNELS: [&str; LOCOMOTION_COUNT] = ["x_vel", "z_rot"];

pub const COSMETIC_COUNT: usize = 6;
pub const KINEMATIC_COUNT: usize = 4;
pub const EMOTION_COUNT: usize = 2;
pub const LOCOMOTION_COUNT: usize = 2;

/// The four channel groups a gesture can drive.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ChannelGroup {
    Cosmetic,
    Kinematic,
    Emotion,
    Locomotion,
}

impl ChannelGroup {
    /// Channel names of this group, in slot order.
    pub fn channels(self) -> &'static [&'static str] {
        match self {
            ChannelGroup::Cosmetic => &COSMETIC_CHANNELS,
            ChannelGroup::Kinematic => &KINEMATIC_CHANNELS,
            ChannelGroup::Emotion => &EMOTION_CHANNELS,
            ChannelGroup::Locomotion => &LOCOMOTION_CHANNELS,
        }
    }
}

/// Resolved (group, slot) address of a named channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ChannelRef {
    pub group: ChannelGroup,
    pub index: usize,
}

/// Resolve a channel name against the fixed vocabularies.
pub fn lookup(name: &str) -> Option<ChannelRef> {
    for group in [
        ChannelGroup::Cosmetic,
        ChannelGroup::Kinematic,
        ChannelGroup::Emotion,
        ChannelGroup::Locomotion,
    ] {
        if let Some(index) = group.channels().iter().position(|c| *c == name) {
            return Some(ChannelRef { group, index });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_resolves_every_vocabulary_entry() {
        for group in [
            ChannelGroup::Cosmetic,
            ChannelGroup::Kinematic,
            ChannelGroup::Emotion,
            ChannelGroup::Locomotion,
        ] {
            for (index, name) in group.channels().iter().enumerate() {
                assert_eq!(lookup(name), Some(ChannelRef { group, index }));
            }
        }
    }

    #[test]
    fn lookup_rejects_unknown_names() {
        assert_eq!(lookup("antenna"), None);
        assert_eq!(lookup(""), None);
    }
}
