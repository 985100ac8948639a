//! Keyframe decimation for skeletal animations.
//!
//! [Optimizer] removes keyframes that sampling can rebuild within a tolerance
//! by interpolating between the retained neighbors. Rotation and scale
//! tolerances are tightened per joint based on how far a local error at that
//! joint can displace the geometry attached below it.
use glam::{Quat, Vec3};
use log::debug;

use crate::{
    animation::{Animation, JointTrack, Keyframe},
    error::OptimizeError,
    interp::{lerp_vec3, nlerp},
    skeleton::Skeleton,
};

/// Decimation tolerances for each channel of a [JointTrack].
///
/// The defaults favor quality over compression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Optimizer {
    /// Maximum translation error in meters.
    pub translation_tolerance: f32,
    /// Maximum rotation error in radians.
    pub rotation_tolerance: f32,
    /// Maximum scale error as a unitless factor.
    pub scale_tolerance: f32,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self {
            translation_tolerance: 1e-3,                  // 1 mm.
            rotation_tolerance: 0.1_f32.to_radians(),     // 0.1 degree.
            scale_tolerance: 1e-3,                        // 0.1%.
        }
    }
}

impl Optimizer {
    /// Remove keyframes from `animation` that sampling reconstructs within
    /// the configured tolerances.
    ///
    /// Fails without producing an animation if `animation` does not
    /// [validate](Animation::validate) or if its track count does not match
    /// the joint count of `skeleton`.
    #[tracing::instrument(skip_all)]
    pub fn optimize(
        &self,
        animation: &Animation,
        skeleton: &Skeleton,
    ) -> Result<Animation, OptimizeError> {
        animation.validate()?;
        if animation.tracks.len() != skeleton.len() {
            return Err(OptimizeError::TrackCountMismatch {
                tracks: animation.tracks.len(),
                joints: skeleton.len(),
            });
        }

        let reach = estimate_bone_reach(skeleton, animation);

        let tracks: Vec<_> = animation
            .tracks
            .iter()
            .zip(reach.iter())
            .map(|(track, reach)| JointTrack {
                translations: filter_keyframes(
                    &track.translations,
                    self.translation_tolerance,
                    lerp_vec3,
                    compare_vec3,
                ),
                rotations: filter_keyframes(
                    &track.rotations,
                    self.tightened(self.rotation_tolerance, *reach),
                    nlerp,
                    compare_quat,
                ),
                scales: filter_keyframes(
                    &track.scales,
                    self.tightened(self.scale_tolerance, *reach),
                    lerp_vec3,
                    compare_vec3,
                ),
            })
            .collect();

        debug!(
            "Reduced {} keyframes to {}",
            keyframe_count(&animation.tracks),
            keyframe_count(&tracks)
        );

        Ok(Animation {
            duration: animation.duration,
            tracks,
        })
    }

    /// The effective tolerance for a joint whose local error is amplified by
    /// up to `reach` in world space.
    fn tightened(&self, tolerance: f32, reach: f32) -> f32 {
        // A small local angle or scale error moves descendant geometry by
        // roughly error * reach, so bound that displacement by the
        // translation tolerance.
        if reach > 0.0 {
            tolerance.min(self.translation_tolerance / reach)
        } else {
            tolerance
        }
    }
}

/// For each joint, an upper bound on how far geometry attached below that
/// joint can move in response to a unit local error at the joint.
///
/// The bound accumulates the maximum translation lengths and scale factors
/// observed in `animation`, propagating each parent's scale into its
/// descendants. Leaf joints report `0.0` since their own channel tolerances
/// already bound the error.
///
/// # Panics
///
/// Panics if a joint not marked as a [leaf](crate::Joint::leaf) has no child,
/// which indicates a skeleton that does not match the animation.
pub fn estimate_bone_reach(skeleton: &Skeleton, animation: &Animation) -> Vec<f32> {
    debug_assert_eq!(animation.tracks.len(), skeleton.len());

    // Maximum observed translation length and scale component per joint.
    let mut specs: Vec<_> = animation
        .tracks
        .iter()
        .map(|track| {
            let length = track
                .translations
                .iter()
                .map(|key| key.value.length())
                .fold(0.0, f32::max);
            let scale = if track.scales.is_empty() {
                1.0
            } else {
                track
                    .scales
                    .iter()
                    .flat_map(|key| key.value.abs().to_array())
                    .fold(0.0, f32::max)
            };
            JointExtent { length, scale }
        })
        .collect();

    let mut reach = vec![0.0; skeleton.len()];
    for root in skeleton.roots().collect::<Vec<_>>() {
        accumulate_reach(skeleton, root, &mut specs, &mut reach);
    }
    reach
}

struct JointExtent {
    length: f32,
    scale: f32,
}

/// Returns the accumulated length for `joint` so the parent can fold it in.
fn accumulate_reach(
    skeleton: &Skeleton,
    joint: usize,
    specs: &mut [JointExtent],
    reach: &mut [f32],
) -> f32 {
    // Apply the parent's accumulated scale to this joint. Parents are always
    // entered first, so their scale is final by the time we get here.
    if let Some(parent) = skeleton.joints[joint].parent_index {
        specs[joint].length *= specs[parent].scale;
        specs[joint].scale *= specs[parent].scale;
    }

    if skeleton.joints[joint].leaf {
        // A leaf's own channel tolerances are enough, so nothing reaches
        // below it.
        reach[joint] = 0.0;
    } else {
        // Children are not required to be contiguous, only to come after
        // their parent.
        let mut found_child = false;
        for child in joint + 1..skeleton.len() {
            if skeleton.joints[child].parent_index == Some(joint) {
                found_child = true;
                let length = accumulate_reach(skeleton, child, specs, reach);
                reach[joint] = reach[joint].max(length);
            }
        }
        assert!(found_child, "non-leaf joint {joint} has no child");
    }

    reach[joint] + specs[joint].length
}

/// Copy `src` keyframes except the ones that interpolating between retained
/// neighbors rebuilds within `tolerance`.
///
/// The first and last keyframes are always retained.
fn filter_keyframes<T: Copy>(
    src: &[Keyframe<T>],
    tolerance: f32,
    interpolate: impl Fn(T, T, f32) -> T,
    compare: impl Fn(T, T, f32) -> bool,
) -> Vec<Keyframe<T>> {
    let mut dest = Vec::with_capacity(src.len());

    // Index in src of the last keyframe copied to dest.
    let mut last_kept = 0;
    for i in 0..src.len() {
        if i == 0 || i == src.len() - 1 {
            dest.push(src[i]);
            last_kept = i;
            continue;
        }

        // Drop key i only if every key in (last_kept, i] can be rebuilt by
        // interpolating between keys last_kept and i + 1.
        let left = src[last_kept];
        let right = src[i + 1];
        for test in &src[last_kept + 1..=i] {
            let alpha = (test.time - left.time) / (right.time - left.time);
            debug_assert!((0.0..=1.0).contains(&alpha));
            if !compare(
                interpolate(left.value, right.value, alpha),
                test.value,
                tolerance,
            ) {
                dest.push(src[i]);
                last_kept = i;
                break;
            }
        }
    }

    debug_assert!(dest.len() <= src.len());
    dest
}

fn compare_vec3(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    a.distance_squared(b) <= tolerance * tolerance
}

fn compare_quat(a: Quat, b: Quat, tolerance: f32) -> bool {
    // angle_between accounts for q and -q encoding the same rotation.
    a.angle_between(b) <= tolerance
}

fn keyframe_count(tracks: &[JointTrack]) -> usize {
    tracks
        .iter()
        .map(|track| track.translations.len() + track.rotations.len() + track.scales.len())
        .sum()
}
