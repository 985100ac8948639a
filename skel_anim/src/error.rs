use thiserror::Error;

use crate::animation::Channel;

#[derive(Debug, Error, PartialEq)]
pub enum OptimizeError {
    #[error("animation duration {duration} is not positive and finite")]
    InvalidDuration { duration: f32 },

    #[error("keyframe times for the {channel:?} channel of joint {joint} are not strictly increasing")]
    NonIncreasingKeyframeTimes { joint: usize, channel: Channel },

    #[error("keyframe time {time} for the {channel:?} channel of joint {joint} is outside the animation duration")]
    KeyframeTimeOutOfRange {
        joint: usize,
        channel: Channel,
        time: f32,
    },

    #[error("animation has {tracks} tracks but the skeleton has {joints} joints")]
    TrackCountMismatch { tracks: usize, joints: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleError {
    #[error("cache sized for {cache_joints} joints cannot sample an animation with {animation_tracks} tracks")]
    CacheSizeMismatch {
        cache_joints: usize,
        animation_tracks: usize,
    },

    #[error("output buffer of length {len} is too small for {required} joint transforms")]
    OutputTooSmall { len: usize, required: usize },
}
