//! Keyframe animation data for a [Skeleton](crate::Skeleton).
use glam::{Quat, Vec3};

use crate::error::OptimizeError;

/// A single (time, value) sample in one channel of a [JointTrack].
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Keyframe<T> {
    /// The sample time in seconds in the range `[0.0, duration]`.
    pub time: f32,
    pub value: T,
}

/// One of the independently keyed channels of a [JointTrack].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Channel {
    Translation,
    Rotation,
    Scale,
}

/// The animated channels for a single joint.
///
/// Channels are keyed independently. An empty channel means the identity
/// value for that channel over the whole animation.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct JointTrack {
    pub translations: Vec<Keyframe<Vec3>>,
    pub rotations: Vec<Keyframe<Quat>>,
    pub scales: Vec<Keyframe<Vec3>>,
}

/// A keyframe animation with one track per joint of a
/// [Skeleton](crate::Skeleton).
///
/// The same type holds the dense source animation and the decimated output
/// of [Optimizer](crate::Optimizer). The data is immutable once built and
/// can be shared by any number of concurrent sampling calls, each with its
/// own [SamplingCache](crate::SamplingCache).
#[derive(Debug, PartialEq, Clone)]
pub struct Animation {
    /// The playback length in seconds.
    pub duration: f32,
    /// One track per joint in the index order used by the skeleton.
    pub tracks: Vec<JointTrack>,
}

impl Animation {
    /// Check that the duration is positive and finite and that every channel
    /// is strictly ordered by time within `[0.0, duration]`.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if !(self.duration > 0.0 && self.duration.is_finite()) {
            return Err(OptimizeError::InvalidDuration {
                duration: self.duration,
            });
        }
        for (joint, track) in self.tracks.iter().enumerate() {
            validate_channel(&track.translations, joint, Channel::Translation, self.duration)?;
            validate_channel(&track.rotations, joint, Channel::Rotation, self.duration)?;
            validate_channel(&track.scales, joint, Channel::Scale, self.duration)?;
        }
        Ok(())
    }
}

fn validate_channel<T>(
    keys: &[Keyframe<T>],
    joint: usize,
    channel: Channel,
    duration: f32,
) -> Result<(), OptimizeError> {
    let mut previous = None;
    for key in keys {
        if !(0.0..=duration).contains(&key.time) {
            return Err(OptimizeError::KeyframeTimeOutOfRange {
                joint,
                channel,
                time: key.time,
            });
        }
        if let Some(previous) = previous
            && key.time <= previous
        {
            return Err(OptimizeError::NonIncreasingKeyframeTimes { joint, channel });
        }
        previous = Some(key.time);
    }
    Ok(())
}
