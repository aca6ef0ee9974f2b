//! Column-major 4x4 matrix helpers.
//!
//! Matrices are stored as four columns, `m[column][row]`, which is the
//! layout `mat4x4<f32>` has in WGSL uniform memory.

/// 4x4 column-major matrix.
pub type Matrix4 = [[f32; 4]; 4];

pub const IDENTITY: Matrix4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

pub fn to_radians(degrees: f32) -> f32 {
    degrees / 180.0 * std::f32::consts::PI
}

pub fn translation(t: [f32; 3]) -> Matrix4 {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [t[0], t[1], t[2], 1.0],
    ]
}

pub fn scale(s: [f32; 3]) -> Matrix4 {
    [
        [s[0], 0.0, 0.0, 0.0],
        [0.0, s[1], 0.0, 0.0],
        [0.0, 0.0, s[2], 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Rotation of `radians` around `axis`. The axis is normalized first.
pub fn rotation(radians: f32, axis: [f32; 3]) -> Matrix4 {
    let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
    if len == 0.0 {
        return IDENTITY;
    }
    let (x, y, z) = (axis[0] / len, axis[1] / len, axis[2] / len);
    let (st, ct) = radians.sin_cos();
    let ci = 1.0 - ct;

    [
        [ct + x * x * ci, y * x * ci + z * st, z * x * ci - y * st, 0.0],
        [x * y * ci - z * st, ct + y * y * ci, z * y * ci + x * st, 0.0],
        [x * z * ci + y * st, y * z * ci - x * st, ct + z * z * ci, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Right-handed perspective projection mapping view depth onto clip depth 0..1.
pub fn perspective_right_hand(fovy_radians: f32, aspect_ratio: f32, near_z: f32, far_z: f32) -> Matrix4 {
    let ys = 1.0 / (fovy_radians * 0.5).tan();
    let xs = ys / aspect_ratio;
    let zs = far_z / (near_z - far_z);

    [
        [xs, 0.0, 0.0, 0.0],
        [0.0, ys, 0.0, 0.0],
        [0.0, 0.0, zs, -1.0],
        [0.0, 0.0, zs * near_z, 0.0],
    ]
}

/// `a * b`, so that `multiply(a, b)` applied to a vector applies `b` first.
pub fn multiply(a: &Matrix4, b: &Matrix4) -> Matrix4 {
    let mut out = [[0.0; 4]; 4];
    for (col, out_col) in out.iter_mut().enumerate() {
        for (row, value) in out_col.iter_mut().enumerate() {
            *value = (0..4).map(|k| a[k][row] * b[col][k]).sum();
        }
    }
    out
}

/// Transform a homogeneous point.
pub fn transform_point(m: &Matrix4, p: [f32; 4]) -> [f32; 4] {
    let mut out = [0.0; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = (0..4).map(|k| m[k][row] * p[k]).sum();
    }
    out
}
