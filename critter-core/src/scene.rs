/// The per-frame façade: input in, posed parts out, parts into a pipeline
use log::{debug, trace};

use crate::animation::{AnimationDriver, AnimationState, Gait};
use crate::command::Command;
use crate::error::{GeometryError, Result};
use crate::geometry::tessellate;
use crate::input::{GlobalPose, InputState};
use crate::model;
use crate::pipeline::Pipeline;
use crate::pose::{BodyPart, PoseGraph};
use crate::skeleton::{JointAngleSet, JointName};
use crate::transform::Transform;

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub state: AnimationState,
    pub pointer_override: bool,
    pub angles: JointAngleSet,
    pub global_pose: GlobalPose,
    pub global: Transform,
    pub parts: Vec<BodyPart>,
}

impl Frame {
    pub fn part(&self, name: &str) -> Option<&BodyPart> {
        self.parts.iter().find(|part| part.name == name)
    }
}

/// The articulated creature and the input fields that drive it
#[derive(Debug, Clone)]
pub struct Creature {
    graph: PoseGraph,
    driver: AnimationDriver,
    input: InputState,
}

impl Creature {
    /// The standard creature with the standard gait
    pub fn new() -> Result<Self> {
        Ok(Self::with_parts(model::creature()?, Gait::standard()))
    }

    pub fn with_parts(graph: PoseGraph, gait: Gait) -> Self {
        Self {
            graph,
            driver: AnimationDriver::new(gait),
            input: InputState::new(),
        }
    }

    pub fn graph(&self) -> &PoseGraph {
        &self.graph
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn set_joint_angle(&mut self, joint: JointName, degrees: f32) {
        self.input.set_joint_angle(joint, degrees);
    }

    pub fn set_global_angle(&mut self, degrees: f32) {
        self.input.set_global_angle(degrees);
    }

    pub fn set_drag_rotation(&mut self, pitch: f32, yaw: f32, active: bool) {
        self.input.set_drag_rotation(pitch, yaw, active);
    }

    pub fn set_animating(&mut self, animating: bool) {
        self.input.set_animating(animating);
    }

    pub fn apply(&mut self, command: Command) {
        debug!("command {:?}", command);
        match command {
            Command::SetJoint { joint, degrees } => self.set_joint_angle(joint, degrees),
            Command::SetGlobalAngle(degrees) => self.set_global_angle(degrees),
            Command::Drag(Some(drag)) => self.set_drag_rotation(drag.pitch, drag.yaw, true),
            Command::Drag(None) => self.set_drag_rotation(0.0, 0.0, false),
            Command::Animate(on) => self.set_animating(on),
        }
    }

    /// Snapshot the input, pick the angles and pose every part
    pub fn advance_frame(&mut self, elapsed: f64) -> Result<Frame> {
        let input = self.input.snapshot(elapsed);
        let out = self.driver.drive(&input);
        let parts = self.graph.evaluate(&out.angles)?;
        trace!("frame at {:.3}s: {:?}, {} parts", elapsed, out.state, parts.len());

        Ok(Frame {
            state: out.state,
            pointer_override: out.pointer_override,
            global: out.global.transform(),
            global_pose: out.global,
            angles: out.angles,
            parts,
        })
    }
}

/// Tessellate every part and hand it to the pipeline, one draw per part.
///
/// All geometry is validated before the first uniform is set.
pub fn submit_frame<P: Pipeline>(frame: &Frame, pipeline: &mut P) -> std::result::Result<(), GeometryError> {
    let batches = frame
        .parts
        .iter()
        .map(|part| tessellate(&part.shape.shape()))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    pipeline.set_global_transform(&frame.global.cells());
    for (part, batch) in frame.parts.iter().zip(&batches) {
        let [r, g, b, a] = part.color;
        pipeline.set_uniform_color(r, g, b, a);
        pipeline.set_uniform_transform(&part.transform.cells());
        pipeline.submit_vertices(batch.primitive, &batch.vertices);
    }
    Ok(())
}
