//! Runtime pose decoding from keyframe data.
use glam::{Quat, Vec3};

use crate::{
    animation::{Animation, Keyframe},
    error::SampleError,
    interp::{lerp_vec3, nlerp},
    transform::Transform,
};

/// Per joint, per channel decode cursors for sampling one [Animation].
///
/// Playback queries are usually monotonically increasing in time, so each
/// channel remembers the keyframe interval it resolved last and resumes the
/// search from there instead of scanning from the head of the sequence.
///
/// A cache is tied to the animation it last sampled. Callers must
/// [invalidate](Self::invalidate) the cache before sampling a different
/// animation with it, even one with the same joint count, or decoding will
/// silently interpolate the wrong intervals. There is no reliable way to
/// detect this automatically since a rebuilt animation can reuse the address
/// of the old one.
///
/// A cache must not be shared between concurrent sampling calls. The
/// [Animation] itself is read only and can be sampled from any number of
/// threads, each with its own cache.
#[derive(Debug, Clone)]
pub struct SamplingCache {
    cursors: Vec<TrackCursors>,
}

#[derive(Debug, Clone, Copy)]
struct TrackCursors {
    translation: ChannelCursor,
    rotation: ChannelCursor,
    scale: ChannelCursor,
}

impl TrackCursors {
    const INVALID: Self = Self {
        translation: ChannelCursor::INVALID,
        rotation: ChannelCursor::INVALID,
        scale: ChannelCursor::INVALID,
    };
}

/// The keyframe interval a channel resolved on the previous call.
#[derive(Debug, Clone, Copy)]
struct ChannelCursor {
    /// Index of the interval's left keyframe.
    index: usize,
    /// Time of the interval's left keyframe.
    start: f32,
    /// Time of the interval's right keyframe.
    end: f32,
}

impl ChannelCursor {
    // An empty interval that no query time can hit.
    const INVALID: Self = Self {
        index: 0,
        start: f32::INFINITY,
        end: f32::NEG_INFINITY,
    };
}

impl SamplingCache {
    /// Create a cache for sampling animations with exactly `joint_count`
    /// tracks.
    pub fn new(joint_count: usize) -> Self {
        Self {
            cursors: vec![TrackCursors::INVALID; joint_count],
        }
    }

    /// The number of joints this cache was sized for.
    pub fn joint_count(&self) -> usize {
        self.cursors.len()
    }

    /// Reset all cursors so the next sample resolves its intervals from
    /// scratch.
    pub fn invalidate(&mut self) {
        self.cursors.fill(TrackCursors::INVALID);
    }
}

impl Animation {
    /// Decode the local pose of every joint at `time` seconds into `out`.
    ///
    /// `time` is clamped into `[0.0, duration]`. A channel with a single
    /// keyframe holds that value for the whole animation and an empty
    /// channel produces the identity value for that channel.
    ///
    /// Nothing is written to `out` unless the cache and output sizes match
    /// the track count.
    pub fn sample_pose(
        &self,
        time: f32,
        cache: &mut SamplingCache,
        out: &mut [Transform],
    ) -> Result<(), SampleError> {
        if cache.joint_count() != self.tracks.len() {
            return Err(SampleError::CacheSizeMismatch {
                cache_joints: cache.joint_count(),
                animation_tracks: self.tracks.len(),
            });
        }
        if out.len() < self.tracks.len() {
            return Err(SampleError::OutputTooSmall {
                len: out.len(),
                required: self.tracks.len(),
            });
        }

        let time = time.clamp(0.0, self.duration);

        for ((track, cursors), transform) in self
            .tracks
            .iter()
            .zip(cache.cursors.iter_mut())
            .zip(out.iter_mut())
        {
            *transform = Transform {
                translation: sample_channel(
                    &track.translations,
                    time,
                    &mut cursors.translation,
                    Vec3::ZERO,
                    lerp_vec3,
                ),
                rotation: sample_channel(
                    &track.rotations,
                    time,
                    &mut cursors.rotation,
                    Quat::IDENTITY,
                    nlerp,
                ),
                scale: sample_channel(
                    &track.scales,
                    time,
                    &mut cursors.scale,
                    Vec3::ONE,
                    lerp_vec3,
                ),
            };
        }
        Ok(())
    }
}

fn sample_channel<T: Copy>(
    keys: &[Keyframe<T>],
    time: f32,
    cursor: &mut ChannelCursor,
    default: T,
    interpolate: impl Fn(T, T, f32) -> T,
) -> T {
    match keys {
        [] => default,
        [key] => key.value,
        _ => {
            // A cursor left behind by a longer animation may index past this
            // track, so never trust it beyond the last interval.
            let last_interval = keys.len() - 2;
            if cursor.index > last_interval || !(time >= cursor.start && time <= cursor.end) {
                // A time before the cached interval means playback looped or
                // scrubbed backwards, so restart the search from the head.
                let mut i = if time < cursor.start {
                    0
                } else {
                    cursor.index.min(last_interval)
                };
                while i < last_interval && keys[i + 1].time <= time {
                    i += 1;
                }
                cursor.index = i;
                cursor.start = keys[i].time;
                cursor.end = keys[i + 1].time;
            }

            // Times before the first key or past the last hold the boundary
            // value.
            let alpha = ((time - cursor.start) / (cursor.end - cursor.start)).clamp(0.0, 1.0);
            interpolate(keys[cursor.index].value, keys[cursor.index + 1].value, alpha)
        }
    }
}
