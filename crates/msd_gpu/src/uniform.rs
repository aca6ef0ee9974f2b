//! Uniform block shared with the shader stage.

use std::mem;

use bytemuck::{Pod, Zeroable};

use crate::error::{GpuError, Result};
use crate::matrix::{self, Matrix4};

/// Per-frame uniform block bound at [`crate::bindings::BufferIndex::Uniforms`].
///
/// Field order and layout are part of the shader contract: the projection
/// matrix comes first, then the model-view matrix, with no padding.
#[repr(C, align(16))]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub projection_matrix: Matrix4,
    pub model_view_matrix: Matrix4,
}

impl Uniforms {
    /// Size of the block in bytes.
    pub const SIZE: usize = mem::size_of::<Uniforms>();
    pub const PROJECTION_OFFSET: usize = mem::offset_of!(Uniforms, projection_matrix);
    pub const MODEL_VIEW_OFFSET: usize = mem::offset_of!(Uniforms, model_view_matrix);

    pub fn new(projection_matrix: Matrix4, model_view_matrix: Matrix4) -> Self {
        Self {
            projection_matrix,
            model_view_matrix,
        }
    }

    pub fn identity() -> Self {
        Self::new(matrix::IDENTITY, matrix::IDENTITY)
    }

    /// The exact bytes the shader reads.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Read a block back from its byte image. The slice need not be aligned.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bytemuck::try_pod_read_unaligned(bytes).map_err(|_| GpuError::UniformSize {
            expected: Self::SIZE,
            actual: bytes.len(),
        })
    }
}

impl Default for Uniforms {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Uniforms {
        let projection = matrix::perspective_right_hand(matrix::to_radians(65.0), 16.0 / 9.0, 0.1, 100.0);
        let model_view = matrix::multiply(
            &matrix::translation([0.0, 0.0, -8.0]),
            &matrix::rotation(0.3, [1.0, 1.0, 0.0]),
        );
        Uniforms::new(projection, model_view)
    }

    #[test]
    fn test_layout() {
        assert_eq!(Uniforms::SIZE, 2 * 16 * mem::size_of::<f32>());
        assert_eq!(Uniforms::SIZE, 128);
        assert_eq!(mem::align_of::<Uniforms>(), 16);
        assert_eq!(Uniforms::PROJECTION_OFFSET, 0);
        assert_eq!(Uniforms::MODEL_VIEW_OFFSET, 64);
    }

    #[test]
    fn test_default_is_identity() {
        let u = Uniforms::default();
        assert_eq!(u.projection_matrix, matrix::IDENTITY);
        assert_eq!(u.model_view_matrix, matrix::IDENTITY);
    }

    #[test]
    fn test_fields_read_back_bit_identical() {
        let s = sample();
        let mut u = Uniforms::zeroed();
        u.projection_matrix = s.projection_matrix;
        u.model_view_matrix = s.model_view_matrix;

        let bits = |m: &Matrix4| m.iter().flatten().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&u.projection_matrix), bits(&s.projection_matrix));
        assert_eq!(bits(&u.model_view_matrix), bits(&s.model_view_matrix));
    }

    #[test]
    fn test_byte_image_matches_field_order() {
        let u = sample();
        let bytes = u.as_bytes();
        assert_eq!(bytes.len(), Uniforms::SIZE);
        assert_eq!(
            &bytes[Uniforms::PROJECTION_OFFSET..Uniforms::MODEL_VIEW_OFFSET],
            bytemuck::bytes_of(&u.projection_matrix)
        );
        assert_eq!(
            &bytes[Uniforms::MODEL_VIEW_OFFSET..],
            bytemuck::bytes_of(&u.model_view_matrix)
        );

        let first = f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(first.to_bits(), u.projection_matrix[0][0].to_bits());
    }

    #[test]
    fn test_from_bytes() {
        let u = sample();
        assert_eq!(Uniforms::from_bytes(u.as_bytes()), Ok(u));

        // Unaligned source
        let mut shifted = vec![0u8; Uniforms::SIZE + 1];
        shifted[1..].copy_from_slice(u.as_bytes());
        assert_eq!(Uniforms::from_bytes(&shifted[1..]), Ok(u));

        assert_eq!(
            Uniforms::from_bytes(&shifted),
            Err(GpuError::UniformSize {
                expected: 128,
                actual: 129
            })
        );
    }
}
