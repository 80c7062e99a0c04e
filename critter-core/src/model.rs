/// The creature's fixed topology table
///
/// The creature faces +Z with +Y up, so its right side is at -X. Every box
/// is the unit cube centered on its frame origin and sized by `scale`. Limb
/// chains are written once for the right side and mirrored across `x = 0`
/// for the left.
use std::fmt;

use crate::error::ConfigError;
use crate::geometry::DEFAULT_SEGMENTS;
use crate::pose::{Op, PartShape, PartSpec, PoseGraph, Rgba};
use crate::skeleton::JointName;

const X: [f32; 3] = [1.0, 0.0, 0.0];
const Y: [f32; 3] = [0.0, 1.0, 0.0];
const Z: [f32; 3] = [0.0, 0.0, 1.0];

const GROUND: Rgba = [0.35, 0.30, 0.22, 1.0];
const HIDE: Rgba = [0.22, 0.32, 0.20, 1.0];
const HEAD: Rgba = [0.16, 0.22, 0.13, 1.0];
const TAIL: Rgba = [0.18, 0.24, 0.14, 1.0];
const LIMB: Rgba = [0.18, 0.26, 0.16, 1.0];
const CLAW: Rgba = [0.30, 0.15, 0.02, 1.0];

/// Distance from the shin's frame to the foot's, along the shin's -Y
pub const FOOT_DROP: f32 = 0.1;

struct PartDef {
    name: &'static str,
    parent: Option<&'static str>,
    shape: PartShape,
    color: Rgba,
    ops: &'static [Op],
    scale: [f32; 3],
}

const fn hinge(joint: JointName, sign: f32, pivot: [f32; 3], axis: [f32; 3], rest: f32) -> Op {
    Op::Hinge {
        joint,
        sign,
        pivot,
        axis,
        rest,
    }
}

/// Parts on the plane of symmetry
const AXIAL: [PartDef; 8] = [
    PartDef {
        name: "ground",
        parent: None,
        shape: PartShape::Cone {
            segments: DEFAULT_SEGMENTS,
        },
        color: GROUND,
        ops: &[Op::Translate([0.0, -0.5, 0.0])],
        scale: [6.0, 1.0, 6.0],
    },
    PartDef {
        name: "body",
        parent: None,
        shape: PartShape::Box,
        color: HIDE,
        ops: &[],
        scale: [0.5, 0.3, 0.8],
    },
    PartDef {
        name: "head",
        parent: Some("body"),
        shape: PartShape::Box,
        color: HEAD,
        ops: &[Op::Translate([0.0, 0.1, 0.5])],
        scale: [0.4, 0.15, 0.2],
    },
    PartDef {
        name: "upper_jaw",
        parent: Some("head"),
        shape: PartShape::Box,
        color: HEAD,
        ops: &[
            Op::Translate([0.0, -0.02, 0.4]),
            hinge(JointName::Jaw, -1.0, [0.0, 0.0, -0.3], X, 0.0),
        ],
        scale: [0.36, 0.08, 0.6],
    },
    PartDef {
        name: "lower_jaw",
        parent: Some("head"),
        shape: PartShape::Box,
        color: HEAD,
        ops: &[
            Op::Translate([0.0, -0.11, 0.38]),
            hinge(JointName::Jaw, 1.0, [0.0, 0.0, -0.28], X, 5.0),
        ],
        scale: [0.34, 0.06, 0.56],
    },
    PartDef {
        name: "tail_1",
        parent: Some("body"),
        shape: PartShape::Box,
        color: TAIL,
        ops: &[
            Op::Translate([0.0, 0.05, -0.55]),
            hinge(JointName::Tail, 1.0, [0.0, 0.0, 0.15], Y, 0.0),
        ],
        scale: [0.3, 0.2, 0.3],
    },
    PartDef {
        name: "tail_2",
        parent: Some("tail_1"),
        shape: PartShape::Box,
        color: TAIL,
        ops: &[
            Op::Translate([0.0, -0.01, -0.275]),
            hinge(JointName::Tail, -1.0, [0.0, 0.0, 0.125], Y, 0.0),
        ],
        scale: [0.22, 0.15, 0.25],
    },
    PartDef {
        name: "tail_3",
        parent: Some("tail_2"),
        shape: PartShape::Box,
        color: TAIL,
        ops: &[
            Op::Translate([0.0, -0.01, -0.225]),
            hinge(JointName::Tail, 1.0, [0.0, 0.0, 0.1], Y, 0.0),
        ],
        scale: [0.14, 0.1, 0.2],
    },
];

/// Right-side limb chains; signs alternate down each chain
const LIMBS: [PartDef; 6] = [
    PartDef {
        name: "thigh",
        parent: Some("body"),
        shape: PartShape::Box,
        color: LIMB,
        ops: &[
            Op::Translate([-0.3, -0.1, -0.25]),
            hinge(JointName::Hip, 1.0, [0.0, 0.1, 0.0], Z, -20.0),
        ],
        scale: [0.1, 0.2, 0.1],
    },
    PartDef {
        name: "shin",
        parent: Some("thigh"),
        shape: PartShape::Box,
        color: LIMB,
        ops: &[
            Op::Translate([0.0, -0.175, 0.0]),
            hinge(JointName::Knee, -1.0, [0.0, 0.075, 0.0], Z, 20.0),
        ],
        scale: [0.08, 0.15, 0.08],
    },
    PartDef {
        name: "foot",
        parent: Some("shin"),
        shape: PartShape::Box,
        color: CLAW,
        ops: &[
            Op::Translate([0.0, -FOOT_DROP, 0.0]),
            hinge(JointName::Ankle, 1.0, [0.0, 0.025, 0.0], Z, 0.0),
        ],
        scale: [0.1, 0.05, 0.16],
    },
    PartDef {
        name: "upper_arm",
        parent: Some("body"),
        shape: PartShape::Box,
        color: LIMB,
        ops: &[
            Op::Translate([-0.3, -0.09, 0.25]),
            hinge(JointName::Shoulder, -1.0, [0.0, 0.09, 0.0], Z, -20.0),
        ],
        scale: [0.1, 0.18, 0.1],
    },
    PartDef {
        name: "forearm",
        parent: Some("upper_arm"),
        shape: PartShape::Box,
        color: LIMB,
        ops: &[
            Op::Translate([0.0, -0.155, 0.0]),
            hinge(JointName::Elbow, 1.0, [0.0, 0.065, 0.0], Z, 20.0),
        ],
        scale: [0.08, 0.13, 0.08],
    },
    PartDef {
        name: "hand",
        parent: Some("forearm"),
        shape: PartShape::Box,
        color: CLAW,
        ops: &[
            Op::Translate([0.0, -0.09, 0.0]),
            hinge(JointName::Wrist, -1.0, [0.0, 0.025, 0.0], Z, 0.0),
        ],
        scale: [0.1, 0.05, 0.14],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Right, Side::Left];

    fn suffix(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Full name of a limb part, e.g. `thigh_left`
pub fn limb_part_name(base: &str, side: Side) -> String {
    format!("{}_{}", base, side)
}

/// Base names of the mirrored limb parts, root to tip
pub fn limb_part_bases() -> impl Iterator<Item = &'static str> {
    LIMBS.iter().map(|def| def.name)
}

impl PartDef {
    fn spec(&self) -> PartSpec {
        PartSpec {
            name: self.name.to_string(),
            parent: self.parent.map(str::to_string),
            shape: self.shape,
            color: self.color,
            ops: self.ops.to_vec(),
            scale: self.scale,
        }
    }

    fn limb_spec(&self, side: Side) -> PartSpec {
        let parent = self.parent.map(|parent| {
            if LIMBS.iter().any(|def| def.name == parent) {
                limb_part_name(parent, side)
            } else {
                parent.to_string()
            }
        });
        let ops = match side {
            Side::Right => self.ops.to_vec(),
            Side::Left => self.ops.iter().map(Op::mirrored).collect(),
        };
        PartSpec {
            name: limb_part_name(self.name, side),
            parent,
            shape: self.shape,
            color: self.color,
            ops,
            scale: self.scale,
        }
    }
}

/// The creature's part table in evaluation order
pub fn creature_parts() -> Vec<PartSpec> {
    let mut parts: Vec<PartSpec> = AXIAL.iter().map(PartDef::spec).collect();
    for side in Side::ALL {
        parts.extend(LIMBS.iter().map(|def| def.limb_spec(side)));
    }
    parts
}

/// The validated creature pose graph
pub fn creature() -> Result<PoseGraph, ConfigError> {
    PoseGraph::new(creature_parts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::BodyPart;
    use crate::skeleton::JointAngleSet;
    use crate::transform::Transform;
    use nalgebra::Point3;

    fn find<'a>(parts: &'a [BodyPart], name: &str) -> &'a BodyPart {
        parts
            .iter()
            .find(|p| p.name == name)
            .unwrap_or_else(|| panic!("no part named {}", name))
    }

    fn reflection() -> Transform {
        let mut r = Transform::identity();
        r.scale(-1.0, 1.0, 1.0);
        r
    }

    #[test]
    fn test_creature_topology_is_valid() {
        let graph = creature().unwrap();
        assert_eq!(graph.len(), AXIAL.len() + 2 * LIMBS.len());
        let posed = graph.evaluate(&JointAngleSet::zeroed()).unwrap();
        assert_eq!(posed.len(), graph.len());
        assert_eq!(find(&posed, "body").frame, Transform::identity());
    }

    #[test]
    fn test_mirrored_limbs_reflect_across_sagittal_plane() {
        let graph = creature().unwrap();
        let r = reflection();
        let poses = [
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [30.0, -12.0, 7.0, -20.0, 15.0, 10.0],
            [-45.0, 60.0, -30.0, 35.0, -5.0, -10.0],
        ];
        for [hip, knee, ankle, shoulder, elbow, wrist] in poses {
            let mut angles = JointAngleSet::zeroed();
            angles.set(JointName::Hip, hip);
            angles.set(JointName::Knee, knee);
            angles.set(JointName::Ankle, ankle);
            angles.set(JointName::Shoulder, shoulder);
            angles.set(JointName::Elbow, elbow);
            angles.set(JointName::Wrist, wrist);
            let posed = graph.evaluate(&angles).unwrap();

            for base in limb_part_bases() {
                let right = find(&posed, &limb_part_name(base, Side::Right));
                let left = find(&posed, &limb_part_name(base, Side::Left));
                let mirrored = r.then(&right.transform).then(&r);
                assert!(
                    left.transform.approx_eq(&mirrored, 1e-5),
                    "{} is not mirrored",
                    base
                );
                let origin = right.frame.apply(&Point3::origin());
                let other = left.frame.apply(&Point3::origin());
                assert!((other - Point3::new(-origin.x, origin.y, origin.z)).norm() < 1e-5);
            }
        }
    }

    #[test]
    fn test_foot_hangs_below_knee_frame() {
        let graph = creature().unwrap();
        let mut angles = JointAngleSet::zeroed();
        angles.set(JointName::Hip, 30.0);
        angles.set(JointName::Knee, 0.0);
        let posed = graph.evaluate(&angles).unwrap();

        for side in Side::ALL {
            let shin = find(&posed, &limb_part_name("shin", side));
            let foot = find(&posed, &limb_part_name("foot", side));

            let mut expected = shin.frame;
            expected.translate(0.0, -FOOT_DROP, 0.0);
            assert!(foot.frame.approx_eq(&expected, 1e-6));

            // Same orientation as the knee frame, offset along its -Y
            let knee_down = shin.frame.apply(&Point3::new(0.0, -FOOT_DROP, 0.0));
            assert!((foot.frame.apply(&Point3::origin()) - knee_down).norm() < 1e-6);
        }
    }

    #[test]
    fn test_jaws_open_in_opposite_directions() {
        let graph = creature().unwrap();
        let tip = Point3::new(0.0, 0.0, 0.5);
        let closed = graph.evaluate(&JointAngleSet::zeroed()).unwrap();
        let mut angles = JointAngleSet::zeroed();
        angles.set(JointName::Jaw, 10.0);
        let open = graph.evaluate(&angles).unwrap();

        let rise = |name| {
            find(&open, name).transform.apply(&tip).y - find(&closed, name).transform.apply(&tip).y
        };
        assert!(rise("upper_jaw") > 0.0);
        assert!(rise("lower_jaw") < 0.0);
    }

    #[test]
    fn test_tail_segments_alternate() {
        let graph = creature().unwrap();
        let mut angles = JointAngleSet::zeroed();
        angles.set(JointName::Tail, 20.0);
        let posed = graph.evaluate(&angles).unwrap();

        // tail_2 undoes tail_1's swing, so its frame is parallel to the body
        let tail_2 = find(&posed, "tail_2").frame;
        let forward = tail_2.apply(&Point3::new(0.0, 0.0, 1.0)) - tail_2.apply(&Point3::origin());
        assert!((forward - nalgebra::Vector3::z()).norm() < 1e-5);

        let tail_1 = find(&posed, "tail_1").frame;
        let forward = tail_1.apply(&Point3::new(0.0, 0.0, 1.0)) - tail_1.apply(&Point3::origin());
        assert!(forward.x.abs() > 0.1);
    }

    #[test]
    fn test_every_joint_moves_some_part() {
        let graph = creature().unwrap();
        let rest = graph.evaluate(&JointAngleSet::zeroed()).unwrap();
        for joint in JointName::ALL {
            let mut angles = JointAngleSet::zeroed();
            angles.set(joint, 25.0);
            let posed = graph.evaluate(&angles).unwrap();
            let moved = posed
                .iter()
                .zip(&rest)
                .any(|(a, b)| !a.transform.approx_eq(&b.transform, 1e-6));
            assert!(moved, "{} drives nothing", joint);
        }
    }
}
