//! # skel_anim
//! skel_anim compresses keyframe animations for skeletal hierarchies and
//! decodes dense per-joint poses from the reduced keyframe set at runtime.
//!
//! [Optimizer] removes keyframes that interpolation can rebuild within an
//! error tolerance. The tolerance for rotation and scale channels is
//! tightened per joint using [estimate_bone_reach], an upper bound on how
//! far a local error at a joint displaces the geometry attached below it.
//!
//! [Animation::sample_pose] reconstructs the local pose for every joint at a
//! playback time. A [SamplingCache] remembers the keyframe intervals resolved
//! by the previous call so that mostly sequential query times avoid searching
//! each channel from the start.

pub use animation::{Animation, Channel, JointTrack, Keyframe};
pub use error::{OptimizeError, SampleError};
pub use optimize::{Optimizer, estimate_bone_reach};
pub use sampling::SamplingCache;
pub use skeleton::{Joint, Skeleton};
pub use transform::Transform;

pub mod animation;
pub mod error;
mod interp;
pub mod optimize;
pub mod sampling;
pub mod skeleton;
mod transform;
