/// Joint names and the per-frame joint-angle set
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{CommandError, ConfigError};

/// One articulation point of the creature.
///
/// Left and right limbs share a joint; mirroring is done by the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JointName {
    Hip,
    Knee,
    Ankle,
    Shoulder,
    Elbow,
    Wrist,
    Tail,
    Jaw,
}

impl JointName {
    pub const ALL: [JointName; 8] = [
        JointName::Hip,
        JointName::Knee,
        JointName::Ankle,
        JointName::Shoulder,
        JointName::Elbow,
        JointName::Wrist,
        JointName::Tail,
        JointName::Jaw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JointName::Hip => "hip",
            JointName::Knee => "knee",
            JointName::Ankle => "ankle",
            JointName::Shoulder => "shoulder",
            JointName::Elbow => "elbow",
            JointName::Wrist => "wrist",
            JointName::Tail => "tail",
            JointName::Jaw => "jaw",
        }
    }
}

impl fmt::Display for JointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JointName {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JointName::ALL
            .into_iter()
            .find(|joint| joint.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CommandError::UnknownJoint(s.to_string()))
    }
}

/// Joint angles in degrees, keyed by joint
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JointAngleSet {
    angles: BTreeMap<JointName, f32>,
}

impl JointAngleSet {
    /// An empty set. Evaluating a pose against it fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every joint at zero degrees
    pub fn zeroed() -> Self {
        JointName::ALL.into_iter().map(|joint| (joint, 0.0)).collect()
    }

    pub fn set(&mut self, joint: JointName, degrees: f32) {
        self.angles.insert(joint, degrees);
    }

    pub fn get(&self, joint: JointName) -> Option<f32> {
        self.angles.get(&joint).copied()
    }

    /// Look up a joint the topology depends on
    pub fn require(&self, joint: JointName) -> Result<f32, ConfigError> {
        self.get(joint).ok_or(ConfigError::MissingJoint(joint))
    }

    pub fn is_complete(&self) -> bool {
        JointName::ALL.iter().all(|joint| self.angles.contains_key(joint))
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointName, f32)> + '_ {
        self.angles.iter().map(|(joint, degrees)| (*joint, *degrees))
    }
}

impl FromIterator<(JointName, f32)> for JointAngleSet {
    fn from_iter<I: IntoIterator<Item = (JointName, f32)>>(iter: I) -> Self {
        Self {
            angles: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_names_round_trip_through_strings() {
        for joint in JointName::ALL {
            assert_eq!(joint.as_str().parse::<JointName>(), Ok(joint));
        }
        assert_eq!("KNEE".parse::<JointName>(), Ok(JointName::Knee));
        assert_eq!(
            "neck".parse::<JointName>(),
            Err(CommandError::UnknownJoint("neck".to_string()))
        );
    }

    #[test]
    fn test_zeroed_set_is_complete() {
        let set = JointAngleSet::zeroed();
        assert!(set.is_complete());
        assert!(set.iter().all(|(_, degrees)| degrees == 0.0));
    }

    #[test]
    fn test_missing_joint_is_reported() {
        let mut set = JointAngleSet::new();
        set.set(JointName::Hip, 30.0);
        assert!(!set.is_complete());
        assert_eq!(set.require(JointName::Hip), Ok(30.0));
        assert_eq!(
            set.require(JointName::Jaw),
            Err(ConfigError::MissingJoint(JointName::Jaw))
        );
    }
}
