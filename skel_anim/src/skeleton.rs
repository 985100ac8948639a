use log::warn;

use crate::Transform;

/// The hierarchy of joints in a poseable skeleton.
///
/// Joints form an arena indexed by position. Parents are expected to appear
/// before their children so a single forward pass can accumulate transforms
/// and the error estimation can resolve a parent before descending.
#[derive(Debug, PartialEq, Clone)]
pub struct Skeleton {
    pub joints: Vec<Joint>,
}

/// A single node in the joint hierarchy.
#[derive(Debug, PartialEq, Clone)]
pub struct Joint {
    /// The name used by animations and tools to identify this joint.
    pub name: String,
    /// The local bind pose transform of the joint relative to its parent.
    pub transform: Transform,
    /// The index of the parent [Joint] in [joints](struct.Skeleton.html#structfield.joints)
    /// or `None` if this is a root joint.
    pub parent_index: Option<usize>,
    /// `true` if no other joint has this joint as its parent.
    pub leaf: bool,
}

impl Skeleton {
    /// Create a skeleton and check ordering constraints that enable more
    /// efficient animation and error estimation code.
    pub fn new(joints: Vec<Joint>) -> Self {
        for (i, joint) in joints.iter().enumerate() {
            if let Some(p) = joint.parent_index
                && i <= p
            {
                warn!("Joint {i} appears before parent {p} and will not traverse properly.")
            }
        }

        let root_count = joints.iter().filter(|j| j.parent_index.is_none()).count();
        if root_count > 1 {
            warn!("Skeleton contains {root_count} root joints.")
        }

        Self { joints }
    }

    /// The number of joints in the hierarchy.
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Indices of all joints without a parent.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.joints
            .iter()
            .enumerate()
            .filter(|(_, joint)| joint.parent_index.is_none())
            .map(|(i, _)| i)
    }
}
