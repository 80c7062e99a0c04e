/// Critter Core Library - Articulated creature posing and animation
///
/// This library computes the per-frame pose of a jointed creature from
/// slider input, drag gestures or a procedural gait, and hands tessellated
/// parts to any rendering pipeline.

pub mod animation;
pub mod command;
pub mod error;
pub mod geometry;
pub mod input;
pub mod model;
pub mod paint;
pub mod pipeline;
pub mod pose;
pub mod projection;
pub mod scene;
pub mod skeleton;
pub mod transform;

// Re-export commonly used types
pub use animation::{AnimationDriver, AnimationState, Clock, Gait};
pub use command::{parse_command, Command};
pub use error::{CommandError, ConfigError, Error, GeometryError, Result};
pub use geometry::{tessellate, Primitive, Shape, Triangle, VertexBatch};
pub use input::{pointer_to_clip, DragRotation, FrameInput, GlobalPose, InputState};
pub use paint::{Brush, BrushKind, Canvas};
pub use pipeline::{DrawCall, DrawList, Pipeline};
pub use pose::{BodyPart, PoseGraph};
pub use projection::{Camera, ProjectionMode};
pub use scene::{submit_frame, Creature, Frame};
pub use skeleton::{JointAngleSet, JointName};
pub use transform::Transform;
