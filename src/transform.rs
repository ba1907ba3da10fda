//! Rotation and orthographic projection matrices.
//!
//! Only the two constructors the renderer needs live here. Both return
//! column-major [`cgmath::Matrix4<f32>`] values that are copied into uniform
//! buffers as `[[f32; 4]; 4]`.

use cgmath::{Matrix4, Vector3};

/// Remaps OpenGL clip-space depth (`-1..1`) to the wgpu range (`0..1`).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// An angle in degrees about an arbitrary axis.
///
/// The axis does not have to be normalized, but it must not be the zero
/// vector. A zero axis produces NaNs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationSpec {
    pub angle_degrees: f32,
    pub axis: Vector3<f32>,
}

impl RotationSpec {
    pub fn new(angle_degrees: f32, axis: impl Into<Vector3<f32>>) -> Self {
        Self {
            angle_degrees,
            axis: axis.into(),
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        rotation_matrix(self.angle_degrees, self.axis.x, self.axis.y, self.axis.z)
    }
}

/// The view volume of an orthographic projection.
///
/// `near` and `far` are distances along the negative Z axis of a right-handed
/// view space. All three spans must be non-zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrthoSpec {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthoSpec {
    pub fn matrix(&self) -> Matrix4<f32> {
        ortho_matrix(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }
}

/// Axis-angle rotation (Rodrigues' formula).
///
/// The axis is normalized here. Passing a zero-length axis is a contract
/// violation and yields a matrix full of NaNs.
pub fn rotation_matrix(angle_degrees: f32, axis_x: f32, axis_y: f32, axis_z: f32) -> Matrix4<f32> {
    let length = (axis_x * axis_x + axis_y * axis_y + axis_z * axis_z).sqrt();
    let (x, y, z) = (axis_x / length, axis_y / length, axis_z / length);

    let (s, c) = angle_degrees.to_radians().sin_cos();
    let t = 1.0 - c;

    #[rustfmt::skip]
    let m = Matrix4::new(
        t * x * x + c,     t * x * y + s * z, t * x * z - s * y, 0.0,
        t * x * y - s * z, t * y * y + c,     t * y * z + s * x, 0.0,
        t * x * z + s * y, t * y * z - s * x, t * z * z + c,     0.0,
        0.0,               0.0,               0.0,               1.0,
    );
    m
}

/// Maps the box `[left, right] x [bottom, top] x [-near, -far]` onto the
/// canonical clip cube `[-1, 1]^3`.
///
/// The z scale is negated to go from right-handed view space to left-handed
/// clip space.
pub fn ortho_matrix(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4<f32> {
    let width = right - left;
    let height = top - bottom;
    let depth = far - near;

    #[rustfmt::skip]
    let m = Matrix4::new(
        2.0 / width,              0.0,                       0.0,                     0.0,
        0.0,                      2.0 / height,              0.0,                     0.0,
        0.0,                      0.0,                       -2.0 / depth,            0.0,
        -(right + left) / width,  -(top + bottom) / height,  -(far + near) / depth,   1.0,
    );
    m
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, InnerSpace, SquareMatrix, Vector4};

    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_matrix_eq(actual: Matrix4<f32>, expected: Matrix4<f32>) {
        let actual: [[f32; 4]; 4] = actual.into();
        let expected: [[f32; 4]; 4] = expected.into();
        for col in 0..4 {
            for row in 0..4 {
                assert!(
                    (actual[col][row] - expected[col][row]).abs() < EPSILON,
                    "mismatch at column {col}, row {row}: {} != {}",
                    actual[col][row],
                    expected[col][row]
                );
            }
        }
    }

    fn assert_vec_eq(actual: Vector4<f32>, expected: Vector4<f32>) {
        assert!(
            (actual - expected).magnitude() < EPSILON,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn zero_angle_is_identity() {
        for axis in [[1.0, 0.0, 0.0], [0.0, 3.0, 0.0], [1.0, -2.0, 0.5], [-7.0, 7.0, 7.0]] {
            assert_matrix_eq(
                rotation_matrix(0.0, axis[0], axis[1], axis[2]),
                Matrix4::identity(),
            );
        }
    }

    #[test]
    fn rotation_about_x_keeps_x_and_turns_yz() {
        for angle in [15.0_f32, 90.0, 135.0, -60.0] {
            let m = rotation_matrix(angle, 1.0, 0.0, 0.0);
            let (s, c) = angle.to_radians().sin_cos();

            assert_vec_eq(m * Vector4::unit_x(), Vector4::unit_x());
            assert_vec_eq(m * Vector4::unit_y(), Vector4::new(0.0, c, s, 0.0));
            assert_vec_eq(m * Vector4::unit_z(), Vector4::new(0.0, -s, c, 0.0));
            assert_vec_eq(m * Vector4::unit_w(), Vector4::unit_w());
        }
    }

    #[test]
    fn axis_is_normalized() {
        assert_matrix_eq(
            rotation_matrix(42.0, 0.0, 0.0, 10.0),
            rotation_matrix(42.0, 0.0, 0.0, 1.0),
        );
    }

    #[test]
    fn rotation_agrees_with_cgmath() {
        let axis = cgmath::Vector3::new(1.0_f32, 2.0, -0.5);
        let expected = Matrix4::from_axis_angle(axis.normalize(), Deg(73.0));
        assert_matrix_eq(rotation_matrix(73.0, axis.x, axis.y, axis.z), expected);
    }

    #[test]
    fn rotation_struct_builds_the_same_matrix() {
        let rotation = RotationSpec::new(30.0, [0.0, 1.0, 1.0]);
        assert_matrix_eq(rotation.matrix(), rotation_matrix(30.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn ortho_maps_box_corners_to_clip_cube() {
        let ortho = OrthoSpec {
            left: -3.0,
            right: 5.0,
            bottom: -1.0,
            top: 2.0,
            near: 0.5,
            far: 20.0,
        };
        let m = ortho.matrix();

        assert_vec_eq(
            m * Vector4::new(ortho.left, ortho.bottom, -ortho.near, 1.0),
            Vector4::new(-1.0, -1.0, -1.0, 1.0),
        );
        assert_vec_eq(
            m * Vector4::new(ortho.right, ortho.top, -ortho.far, 1.0),
            Vector4::new(1.0, 1.0, 1.0, 1.0),
        );
    }

    #[test]
    fn ortho_agrees_with_cgmath() {
        assert_matrix_eq(
            ortho_matrix(-2.0, 2.0, -1.5, 1.5, -10.0, 10.0),
            cgmath::ortho(-2.0, 2.0, -1.5, 1.5, -10.0, 10.0),
        );
    }

    #[test]
    fn wgpu_remap_moves_depth_into_unit_range() {
        let clip = OPENGL_TO_WGPU_MATRIX * Vector4::new(0.3, -0.2, -1.0, 1.0);
        assert_vec_eq(clip, Vector4::new(0.3, -0.2, 0.0, 1.0));
        let clip = OPENGL_TO_WGPU_MATRIX * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert_vec_eq(clip, Vector4::new(0.0, 0.0, 1.0, 1.0));
    }
}
