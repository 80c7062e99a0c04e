/// Input written by the UI layer and the per-frame snapshot taken from it
use crate::skeleton::{JointAngleSet, JointName};
use crate::transform::Transform;

/// Camera rotation derived from a pointer drag, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRotation {
    /// Rotation about X
    pub pitch: f32,
    /// Rotation about Y
    pub yaw: f32,
}

impl DragRotation {
    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }

    /// Map a pointer position in clip coordinates to a rotation.
    ///
    /// The full width sweeps 360 degrees of yaw, the full height 180 of pitch.
    pub fn from_clip(x: f32, y: f32) -> Self {
        Self {
            pitch: y * 90.0,
            yaw: -x * 180.0,
        }
    }
}

/// Convert a pointer position in pixels (origin top-left) to clip coordinates
pub fn pointer_to_clip(px: f32, py: f32, width: f32, height: f32) -> (f32, f32) {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    ((px - half_w) / half_w, (half_h - py) / half_h)
}

/// World rotation applied on top of every part's model transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlobalPose {
    /// Yaw from the camera-angle slider
    Slider { yaw: f32 },
    /// Pitch and yaw from an active drag
    Drag(DragRotation),
}

impl GlobalPose {
    pub fn from_input(input: &FrameInput) -> Self {
        match input.drag {
            Some(drag) => GlobalPose::Drag(drag),
            None => GlobalPose::Slider {
                yaw: input.global_angle,
            },
        }
    }

    pub fn transform(&self) -> Transform {
        let mut t = Transform::identity();
        match *self {
            GlobalPose::Slider { yaw } => {
                t.rotate(yaw, 0.0, 1.0, 0.0);
            }
            GlobalPose::Drag(DragRotation { pitch, yaw }) => {
                t.rotate(pitch, 1.0, 0.0, 0.0).rotate(yaw, 0.0, 1.0, 0.0);
            }
        }
        t
    }
}

/// Everything the frame computation reads, frozen at the start of a frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInput {
    /// Slider-set joint angles
    pub joint_angles: JointAngleSet,
    /// Slider-set camera yaw
    pub global_angle: f32,
    /// `Some` while a drag gesture is in progress
    pub drag: Option<DragRotation>,
    pub animating: bool,
    /// Seconds since startup
    pub elapsed: f64,
}

/// Mutable input fields, written by the UI between frames
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    joint_angles: JointAngleSet,
    global_angle: f32,
    drag: Option<DragRotation>,
    animating: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            joint_angles: JointAngleSet::zeroed(),
            global_angle: 0.0,
            drag: None,
            animating: false,
        }
    }

    pub fn set_joint_angle(&mut self, joint: JointName, degrees: f32) {
        self.joint_angles.set(joint, degrees);
    }

    pub fn joint_angle(&self, joint: JointName) -> Option<f32> {
        self.joint_angles.get(joint)
    }

    pub fn set_global_angle(&mut self, degrees: f32) {
        self.global_angle = degrees;
    }

    pub fn global_angle(&self) -> f32 {
        self.global_angle
    }

    /// Start, update or end a drag. Values are dropped when `active` is false.
    pub fn set_drag_rotation(&mut self, pitch: f32, yaw: f32, active: bool) {
        self.drag = active.then(|| DragRotation::new(pitch, yaw));
    }

    pub fn drag(&self) -> Option<DragRotation> {
        self.drag
    }

    pub fn set_animating(&mut self, animating: bool) {
        self.animating = animating;
    }

    pub fn animating(&self) -> bool {
        self.animating
    }

    pub fn snapshot(&self, elapsed: f64) -> FrameInput {
        FrameInput {
            joint_angles: self.joint_angles.clone(),
            global_angle: self.global_angle,
            drag: self.drag,
            animating: self.animating,
            elapsed,
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
