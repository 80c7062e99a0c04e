/// 3D affine transforms composed in place
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3, Vector4};

/// A 4x4 affine matrix built up by right-multiplying elementary operations.
///
/// Each call applies its operation in the transform's *current* local frame,
/// so `t.translate(..).rotate(..)` rotates first and then translates when the
/// result is applied to a point. The value is `Copy`; forking a frame for
/// several children copies it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix4<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix4<f32>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.matrix
    }

    /// Right-multiply by a translation
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) -> &mut Self {
        self.matrix *= Matrix4::new_translation(&Vector3::new(dx, dy, dz));
        self
    }

    /// Right-multiply by a rotation of `degrees` around the given axis.
    ///
    /// A zero-length axis leaves the transform unchanged.
    pub fn rotate(&mut self, degrees: f32, ax: f32, ay: f32, az: f32) -> &mut Self {
        if let Some(rotation) = rotation_matrix(degrees, Vector3::new(ax, ay, az)) {
            self.matrix *= rotation;
        }
        self
    }

    /// Right-multiply by a non-uniform scale
    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.matrix *= Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz));
        self
    }

    /// Right-multiply by an arbitrary transform
    pub fn compose(&mut self, other: &Transform) -> &mut Self {
        self.matrix *= other.matrix;
        self
    }

    /// The product `self · other`, leaving `self` untouched
    pub fn then(&self, other: &Transform) -> Transform {
        Transform::from_matrix(self.matrix * other.matrix)
    }

    pub fn apply(&self, point: &Point3<f32>) -> Point3<f32> {
        self.matrix.transform_point(point)
    }

    pub fn apply_homogeneous(&self, v: &Vector4<f32>) -> Vector4<f32> {
        self.matrix * v
    }

    /// Translation column of the matrix
    pub fn translation(&self) -> Vector3<f32> {
        Vector3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// The 16 cells in column-major order, as a shader uniform expects them
    pub fn cells(&self) -> [f32; 16] {
        let mut cells = [0.0; 16];
        cells.copy_from_slice(self.matrix.as_slice());
        cells
    }

    pub fn approx_eq(&self, other: &Transform, epsilon: f32) -> bool {
        (self.matrix - other.matrix).amax() <= epsilon
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Homogeneous rotation matrix, or `None` for a degenerate axis
fn rotation_matrix(degrees: f32, axis: Vector3<f32>) -> Option<Matrix4<f32>> {
    let axis = Unit::try_new(axis, f32::EPSILON)?;
    Some(Rotation3::from_axis_angle(&axis, degrees.to_radians()).to_homogeneous())
}
