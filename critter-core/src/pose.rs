/// Articulated-model evaluation over a parent-relative part table
use std::collections::HashMap;

use log::trace;

use crate::error::ConfigError;
use crate::geometry::Shape;
use crate::skeleton::{JointAngleSet, JointName};
use crate::transform::Transform;

/// RGBA color with components in `0.0..=1.0`
pub type Rgba = [f32; 4];

/// The primitive a body part is drawn with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartShape {
    Box,
    Cone { segments: u32 },
}

impl PartShape {
    pub fn shape(self) -> Shape {
        match self {
            PartShape::Box => Shape::Box,
            PartShape::Cone { segments } => Shape::Cone {
                segments: segments as f32,
            },
        }
    }
}

/// One step in building a part's coordinate frame from its parent's
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Translate([f32; 3]),
    /// A fixed rotation, in degrees
    Rotate { degrees: f32, axis: [f32; 3] },
    /// Rotate about `pivot` by `sign * angle(joint) + rest` degrees.
    ///
    /// Expands to translate(pivot), rotate, translate(-pivot), so the pivot
    /// point stays where it was.
    Hinge {
        joint: JointName,
        sign: f32,
        pivot: [f32; 3],
        axis: [f32; 3],
        rest: f32,
    },
}

impl Op {
    fn apply(&self, frame: &mut Transform, angles: &JointAngleSet) -> Result<(), ConfigError> {
        match *self {
            Op::Translate([x, y, z]) => {
                frame.translate(x, y, z);
            }
            Op::Rotate {
                degrees,
                axis: [ax, ay, az],
            } => {
                frame.rotate(degrees, ax, ay, az);
            }
            Op::Hinge {
                joint,
                sign,
                pivot: [px, py, pz],
                axis: [ax, ay, az],
                rest,
            } => {
                let angle = angles.require(joint)?;
                frame
                    .translate(px, py, pz)
                    .rotate(sign * angle + rest, ax, ay, az)
                    .translate(-px, -py, -pz);
            }
        }
        Ok(())
    }

    /// The same step reflected across the `x = 0` plane.
    ///
    /// Conjugating by the reflection negates x in offsets and axes and flips
    /// the direction of every rotation.
    pub fn mirrored(&self) -> Op {
        let reflect = |[x, y, z]: [f32; 3]| [-x, y, z];
        match *self {
            Op::Translate(v) => Op::Translate(reflect(v)),
            Op::Rotate { degrees, axis } => Op::Rotate {
                degrees: -degrees,
                axis: reflect(axis),
            },
            Op::Hinge {
                joint,
                sign,
                pivot,
                axis,
                rest,
            } => Op::Hinge {
                joint,
                sign: -sign,
                pivot: reflect(pivot),
                axis: reflect(axis),
                rest: -rest,
            },
        }
    }
}

/// A row of the topology table
#[derive(Debug, Clone, PartialEq)]
pub struct PartSpec {
    pub name: String,
    /// `None` for parts hung off the world origin
    pub parent: Option<String>,
    pub shape: PartShape,
    pub color: Rgba,
    /// Applied to the parent's frame, in order, before the snapshot
    pub ops: Vec<Op>,
    /// Visual scale, applied after the snapshot and never inherited
    pub scale: [f32; 3],
}

/// A posed part ready for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct BodyPart {
    pub name: String,
    pub shape: PartShape,
    pub color: Rgba,
    /// Coordinate frame handed to children (no scale)
    pub frame: Transform,
    /// Model transform for drawing: `frame · scale`
    pub transform: Transform,
}

/// A validated topology that can be posed every frame
#[derive(Debug, Clone)]
pub struct PoseGraph {
    parts: Vec<PartSpec>,
    parents: Vec<Option<usize>>,
}

impl PoseGraph {
    /// Validate the table: unique names, every parent declared before its children.
    pub fn new(parts: Vec<PartSpec>) -> Result<Self, ConfigError> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(parts.len());
        let mut parents = Vec::with_capacity(parts.len());

        for (i, part) in parts.iter().enumerate() {
            if index.insert(part.name.as_str(), i).is_some() {
                return Err(ConfigError::DuplicatePart(part.name.clone()));
            }
            let parent = match &part.parent {
                None => None,
                Some(parent) => match index.get(parent.as_str()) {
                    Some(&p) if p != i => Some(p),
                    _ if parts[i..].iter().any(|later| &later.name == parent) => {
                        return Err(ConfigError::ParentAfterChild {
                            part: part.name.clone(),
                            parent: parent.clone(),
                        });
                    }
                    _ => {
                        return Err(ConfigError::UnknownParent {
                            part: part.name.clone(),
                            parent: parent.clone(),
                        });
                    }
                },
            };
            parents.push(parent);
        }

        Ok(Self { parts, parents })
    }

    pub fn parts(&self) -> &[PartSpec] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Compute every part's frame and model transform for one set of angles
    pub fn evaluate(&self, angles: &JointAngleSet) -> Result<Vec<BodyPart>, ConfigError> {
        let mut posed: Vec<BodyPart> = Vec::with_capacity(self.parts.len());

        for (spec, parent) in self.parts.iter().zip(&self.parents) {
            let mut frame = match parent {
                Some(p) => posed[*p].frame,
                None => Transform::identity(),
            };
            for op in &spec.ops {
                op.apply(&mut frame, angles)?;
            }

            let snapshot = frame;
            let [sx, sy, sz] = spec.scale;
            frame.scale(sx, sy, sz);

            posed.push(BodyPart {
                name: spec.name.clone(),
                shape: spec.shape,
                color: spec.color,
                frame: snapshot,
                transform: frame,
            });
        }

        trace!("posed {} parts", posed.len());
        Ok(posed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    const GREY: Rgba = [0.5, 0.5, 0.5, 1.0];

    fn part(name: &str, parent: Option<&str>, ops: Vec<Op>, scale: [f32; 3]) -> PartSpec {
        PartSpec {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            shape: PartShape::Box,
            color: GREY,
            ops,
            scale,
        }
    }

    fn find<'a>(parts: &'a [BodyPart], name: &str) -> &'a BodyPart {
        parts.iter().find(|p| p.name == name).unwrap()
    }

    #[test]
    fn test_child_inherits_frame_but_not_scale() {
        let graph = PoseGraph::new(vec![
            part("root", None, vec![Op::Translate([1.0, 0.0, 0.0])], [4.0, 4.0, 4.0]),
            part("child", Some("root"), vec![Op::Translate([0.0, 1.0, 0.0])], [1.0, 1.0, 1.0]),
        ])
        .unwrap();
        let posed = graph.evaluate(&JointAngleSet::zeroed()).unwrap();

        let child = find(&posed, "child");
        let p = child.transform.apply(&Point3::origin());
        assert!((p - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-6);

        // A unit step in the child's frame stays a unit step
        let q = child.transform.apply(&Point3::new(1.0, 0.0, 0.0));
        assert!(((q - p).norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_siblings_fork_independent_copies() {
        let graph = PoseGraph::new(vec![
            part("root", None, vec![], [1.0, 1.0, 1.0]),
            part(
                "a",
                Some("root"),
                vec![Op::Rotate {
                    degrees: 90.0,
                    axis: [0.0, 0.0, 1.0],
                }],
                [1.0, 1.0, 1.0],
            ),
            part("b", Some("root"), vec![Op::Translate([0.0, 0.0, 2.0])], [1.0, 1.0, 1.0]),
        ])
        .unwrap();
        let posed = graph.evaluate(&JointAngleSet::zeroed()).unwrap();

        let mut expected = Transform::identity();
        expected.translate(0.0, 0.0, 2.0);
        assert!(find(&posed, "b").frame.approx_eq(&expected, 1e-6));
        assert_eq!(find(&posed, "root").frame, Transform::identity());
    }

    #[test]
    fn test_hinge_keeps_pivot_fixed() {
        let pivot = [0.0, 0.1, 0.0];
        let graph = PoseGraph::new(vec![part(
            "thigh",
            None,
            vec![Op::Hinge {
                joint: JointName::Hip,
                sign: 1.0,
                pivot,
                axis: [0.0, 0.0, 1.0],
                rest: 10.0,
            }],
            [0.1, 0.2, 0.1],
        )])
        .unwrap();

        let mut angles = JointAngleSet::zeroed();
        for degrees in [-45.0, 0.0, 30.0, 120.0] {
            angles.set(JointName::Hip, degrees);
            let posed = graph.evaluate(&angles).unwrap();
            let p = Point3::from(pivot);
            assert!((posed[0].frame.apply(&p) - p).norm() < 1e-6);
        }
    }

    #[test]
    fn test_hinge_uses_signed_angle_plus_rest() {
        let hinge = |sign| Op::Hinge {
            joint: JointName::Knee,
            sign,
            pivot: [0.0; 3],
            axis: [0.0, 0.0, 1.0],
            rest: 5.0,
        };
        let graph = PoseGraph::new(vec![
            part("pos", None, vec![hinge(1.0)], [1.0; 3]),
            part("neg", None, vec![hinge(-1.0)], [1.0; 3]),
        ])
        .unwrap();
        let mut angles = JointAngleSet::zeroed();
        angles.set(JointName::Knee, 20.0);
        let posed = graph.evaluate(&angles).unwrap();

        let mut pos = Transform::identity();
        pos.rotate(25.0, 0.0, 0.0, 1.0);
        let mut neg = Transform::identity();
        neg.rotate(-15.0, 0.0, 0.0, 1.0);
        assert!(posed[0].frame.approx_eq(&pos, 1e-6));
        assert!(posed[1].frame.approx_eq(&neg, 1e-6));
    }

    #[test]
    fn test_missing_joint_is_fatal() {
        let graph = PoseGraph::new(vec![part(
            "jaw",
            None,
            vec![Op::Hinge {
                joint: JointName::Jaw,
                sign: 1.0,
                pivot: [0.0; 3],
                axis: [1.0, 0.0, 0.0],
                rest: 0.0,
            }],
            [1.0; 3],
        )])
        .unwrap();
        let mut angles = JointAngleSet::new();
        angles.set(JointName::Hip, 0.0);
        assert_eq!(
            graph.evaluate(&angles),
            Err(ConfigError::MissingJoint(JointName::Jaw))
        );
    }

    #[test]
    fn test_topology_validation() {
        let dup = PoseGraph::new(vec![
            part("body", None, vec![], [1.0; 3]),
            part("body", None, vec![], [1.0; 3]),
        ]);
        assert_eq!(dup.unwrap_err(), ConfigError::DuplicatePart("body".into()));

        let unknown = PoseGraph::new(vec![part("leg", Some("hip"), vec![], [1.0; 3])]);
        assert!(matches!(unknown, Err(ConfigError::UnknownParent { .. })));

        let order = PoseGraph::new(vec![
            part("shin", Some("thigh"), vec![], [1.0; 3]),
            part("thigh", None, vec![], [1.0; 3]),
        ]);
        assert!(matches!(order, Err(ConfigError::ParentAfterChild { .. })));

        let own = PoseGraph::new(vec![part("loop", Some("loop"), vec![], [1.0; 3])]);
        assert!(matches!(own, Err(ConfigError::ParentAfterChild { .. })));
    }

    #[test]
    fn test_mirrored_ops_conjugate_by_reflection() {
        let ops = [
            Op::Translate([0.3, -0.1, 0.2]),
            Op::Rotate {
                degrees: 40.0,
                axis: [0.0, 0.0, 1.0],
            },
            Op::Hinge {
                joint: JointName::Hip,
                sign: 1.0,
                pivot: [0.05, 0.1, 0.0],
                axis: [0.3, 0.2, 1.0],
                rest: -25.0,
            },
        ];
        let mut angles = JointAngleSet::zeroed();
        angles.set(JointName::Hip, 33.0);

        let mut left = Transform::identity();
        let mut right = Transform::identity();
        for op in &ops {
            op.apply(&mut left, &angles).unwrap();
            op.mirrored().apply(&mut right, &angles).unwrap();
        }

        let mut reflect = Transform::identity();
        reflect.scale(-1.0, 1.0, 1.0);
        let expected = reflect.then(&left).then(&reflect);
        assert!(right.approx_eq(&expected, 1e-5));
    }
}
