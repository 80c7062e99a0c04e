/// Error types shared by the geometry, pose and command layers
use crate::skeleton::JointName;

/// Shape parameters that cannot be tessellated.
///
/// These are rejected before anything is handed to a pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("a fan needs at least 3 segments, got {segments}")]
    TooFewSegments { segments: f32 },

    #[error("a fan takes at most {max} segments, got {segments}", max = crate::geometry::MAX_SEGMENTS)]
    TooManySegments { segments: f32 },

    #[error("shape size must be finite, got {0}")]
    NonFiniteSize(f32),
}

/// Programming errors in the fixed topology or the angle set fed to it.
///
/// None of these are recoverable at runtime.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("joint angle for `{0}` is missing")]
    MissingJoint(JointName),

    #[error("part `{0}` is declared twice")]
    DuplicatePart(String),

    #[error("part `{part}` names unknown parent `{parent}`")]
    UnknownParent { part: String, parent: String },

    #[error("part `{part}` is declared before its parent `{parent}`")]
    ParentAfterChild { part: String, parent: String },
}

/// Errors produced while parsing a console command line.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown joint `{0}`")]
    UnknownJoint(String),

    #[error("could not parse command `{0}`")]
    Syntax(String),
}

/// Umbrella error for a frame computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),

    #[error("fatal configuration error: {0}")]
    FatalConfig(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
