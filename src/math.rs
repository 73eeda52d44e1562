//! Column-major 4x4 matrix helpers.
//!
//! Matrices are plain `[f32; 16]` arrays in OpenGL order (element `col * 4 + row`)
//! and transform column vectors (`M * v`). This is the layout `cgmath::Matrix4`
//! uses internally, so rotations, translations and products are delegated to it.
//! The two projections are written out by hand: they must stay total for a zero
//! aspect ratio, which `cgmath::perspective` rejects with an assertion.
//!
//! # Key functions
//!
//! - [`multiply`] returns `A * B`; [`post_multiply`] performs `M = M * X` in place
//! - [`orthographic`] and [`perspective`] build the two projections used by the scenes

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3, Vector4};

/// A 4x4 matrix stored column-major.
pub type Mat4 = [f32; 16];

/// Vertical field of view of every perspective example, in degrees.
pub const PERSPECTIVE_FOV_DEGREES: f32 = 45.0;

fn flatten(m: Matrix4<f32>) -> Mat4 {
    *m.as_ref()
}

fn lift(m: &Mat4) -> Matrix4<f32> {
    #[rustfmt::skip]
    let lifted = Matrix4::new(
        m[0], m[1], m[2], m[3],
        m[4], m[5], m[6], m[7],
        m[8], m[9], m[10], m[11],
        m[12], m[13], m[14], m[15],
    );
    lifted
}

pub fn identity() -> Mat4 {
    flatten(Matrix4::identity())
}

pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    flatten(Matrix4::from_translation(Vector3::new(x, y, z)))
}

/// Right-handed rotation about the X axis; `degrees` is converted to radians.
pub fn rotation_x(degrees: f32) -> Mat4 {
    flatten(Matrix4::from_angle_x(Deg(degrees)))
}

/// Right-handed rotation about the Y axis.
pub fn rotation_y(degrees: f32) -> Mat4 {
    flatten(Matrix4::from_angle_y(Deg(degrees)))
}

/// Right-handed rotation about the Z axis.
pub fn rotation_z(degrees: f32) -> Mat4 {
    flatten(Matrix4::from_angle_z(Deg(degrees)))
}

/// Symmetric orthographic projection. The half width is `half_height * aspect`
/// and depth in `[near, far]` is mapped to `[-1, 1]`.
pub fn orthographic(half_height: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let half_width = half_height * aspect;
    let mut out = [0.0; 16];
    out[0] = 1.0 / half_width;
    out[5] = 1.0 / half_height;
    out[10] = -2.0 / (far - near);
    out[14] = -(far + near) / (far - near);
    out[15] = 1.0;
    out
}

/// Symmetric perspective projection (`gluPerspective` layout).
pub fn perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y_radians / 2.0).tan();
    let nf = 1.0 / (near - far);
    let mut out = [0.0; 16];
    out[0] = f / aspect;
    out[5] = f;
    out[10] = (far + near) * nf;
    out[11] = -1.0;
    out[14] = 2.0 * far * near * nf;
    out
}

/// `A * B`.
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    flatten(lift(a) * lift(b))
}

/// `M = M * X`, the accumulation step of every transform chain.
pub fn post_multiply(m: &mut Mat4, x: &Mat4) {
    let product = multiply(m, x);
    *m = product;
}

/// Multiplies `(x, y, z, 1)` by `m` and returns the homogeneous result.
pub fn transform_point(m: &Mat4, point: [f32; 3]) -> [f32; 4] {
    let v = lift(m) * Vector4::new(point[0], point[1], point[2], 1.0);
    [v.x, v.y, v.z, v.w]
}
