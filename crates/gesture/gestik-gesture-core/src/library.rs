//! Loading a directory of declarative gesture files.
//!
//! One JSON file per gesture, keyed by channel name:
//!
//! ```json
//! {
//!   "lift": { "positions": [0.6, 0.3], "times": [0.5, 1.2], "max_speed": 2.0 },
//!   "earl": { "positions": [1.0], "times": [0.4], "return_to_initial_pose": true,
//!             "max_speed": 4.0 },
//!   "valence": { "value": 0.9 },
//!   "x_vel": { "values": [0.4, 0.0], "times": [1.0, 2.0] }
//! }
//! ```
//!
//! Gesture names come from the file stem. Loading is fatal on the first
//! malformed file; a library is never partially usable.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashbrown::HashMap;
use log::{debug, warn};
use serde::Deserialize;

use crate::channels::{lookup, ChannelGroup, ChannelRef};
use crate::error::GestureError;
use crate::gesture::Gesture;
use crate::track::{ChannelTrack, EmotionTrack, LocomotionTrack};
use crate::trajectory::{SpeedLimits, Trajectory};

/// Raw per-channel file schema. Which fields are required depends on the
/// channel's group; validation happens after parsing so errors can name the
/// gesture and channel.
#[derive(Debug, Deserialize)]
struct RawChannel {
    #[serde(default)]
    positions: Option<Vec<f32>>,
    #[serde(default)]
    times: Option<Vec<f32>>,
    #[serde(default)]
    min_speed: Option<f32>,
    #[serde(default)]
    max_speed: Option<f32>,
    #[serde(default)]
    return_to_initial_pose: bool,
    #[serde(default)]
    value: Option<f32>,
    #[serde(default)]
    values: Option<Vec<f32>>,
}

type RawGesture = HashMap<String, RawChannel>;

/// Immutable name-to-gesture map, built once at startup.
#[derive(Debug, Default)]
pub struct GestureLibrary {
    gestures: HashMap<String, Arc<Gesture>>,
}

impl GestureLibrary {
    /// Recursively load every `*.json` under `dir`, skipping any directory
    /// whose name contains `archived`. `overrides` tightens each motion
    /// channel's speed limits globally: the stricter of file bound and
    /// override wins.
    pub fn load_dir(dir: impl AsRef<Path>, overrides: SpeedLimits) -> Result<Self, GestureError> {
        let mut files = Vec::new();
        collect_gesture_files(dir.as_ref(), &mut files)?;
        files.sort();

        let mut gestures = HashMap::with_capacity(files.len());
        for path in files {
            let name = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let text = fs::read_to_string(&path).map_err(|source| GestureError::Io {
                path: path.clone(),
                source,
            })?;
            let raw: RawGesture =
                serde_json::from_str(&text).map_err(|source| GestureError::Parse {
                    path: path.clone(),
                    source,
                })?;
            let gesture = build_gesture(&name, raw, overrides)?;
            debug!("loaded gesture '{}' from {}", name, path.display());
            if gestures.insert(name.clone(), Arc::new(gesture)).is_some() {
                warn!("duplicate gesture name '{}', keeping {}", name, path.display());
            }
        }
        Ok(Self { gestures })
    }

    pub fn get(&self, name: &str) -> Option<Arc<Gesture>> {
        self.gestures.get(name).cloned()
    }

    pub fn insert(&mut self, gesture: Gesture) {
        self.gestures
            .insert(gesture.name().to_string(), Arc::new(gesture));
    }

    /// All gesture names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.gestures.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Sorted names containing `key` as a substring (e.g. every `"happy"`
    /// variant).
    pub fn with_key(&self, key: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .gestures
            .keys()
            .filter(|name| name.contains(key))
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// Pick one matching gesture at random, for reaction dispatchers that
    /// want variety among e.g. several `"happy"` gestures.
    pub fn choose(&self, key: &str) -> Option<Arc<Gesture>> {
        let names = self.with_key(key);
        if names.is_empty() {
            return None;
        }
        self.get(names[rand::random_range(0..names.len())])
    }

    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }
}

fn collect_gesture_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), GestureError> {
    let entries = fs::read_dir(dir).map_err(|source| GestureError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| GestureError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            let name = entry.file_name();
            if name.to_string_lossy().contains("archived") {
                debug!("skipping archived subtree {}", path.display());
                continue;
            }
            collect_gesture_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(())
}

fn build_gesture(
    name: &str,
    raw: RawGesture,
    overrides: SpeedLimits,
) -> Result<Gesture, GestureError> {
    let mut entries: Vec<(String, RawChannel)> = raw.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut gesture = Gesture::new(name);
    for (channel, spec) in entries {
        let Some(ChannelRef { group, .. }) = lookup(&channel) else {
            debug!("gesture '{}': ignoring unknown channel '{}'", name, channel);
            continue;
        };
        let track = match group {
            ChannelGroup::Emotion => {
                let value = spec
                    .value
                    .ok_or_else(|| missing(name, &channel, "value"))?;
                ChannelTrack::Emotion(EmotionTrack::new(value))
            }
            ChannelGroup::Locomotion => {
                let values = spec
                    .values
                    .ok_or_else(|| missing(name, &channel, "values"))?;
                let times = spec
                    .times
                    .ok_or_else(|| missing(name, &channel, "times"))?;
                ChannelTrack::Locomotion(
                    LocomotionTrack::new(channel.as_str(), values, times)
                        .map_err(|e| e.in_gesture(name))?,
                )
            }
            ChannelGroup::Kinematic | ChannelGroup::Cosmetic => {
                let positions = spec
                    .positions
                    .ok_or_else(|| missing(name, &channel, "positions"))?;
                let times = spec
                    .times
                    .ok_or_else(|| missing(name, &channel, "times"))?;
                let limits =
                    SpeedLimits::new(spec.min_speed, spec.max_speed).merge_tighter(overrides);
                ChannelTrack::Motion(
                    Trajectory::new(
                        channel.as_str(),
                        positions,
                        times,
                        limits,
                        spec.return_to_initial_pose,
                    )
                    .map_err(|e| e.in_gesture(name))?,
                )
            }
        };
        gesture = gesture.with_channel(&channel, track)?;
    }
    Ok(gesture)
}

fn missing(gesture: &str, channel: &str, field: &'static str) -> GestureError {
    GestureError::MissingField {
        channel: channel.to_string(),
        field,
    }
    .in_gesture(gesture)
}
