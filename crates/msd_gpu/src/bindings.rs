//! Shader binding constants.
//!
//! This module defines the slot numbers shared between Rust code and the
//! shader stage. Both sides must agree on every value here; a mismatch does
//! not fail anywhere, it just binds the wrong data to the wrong slot.
//!
//! # Usage
//!
//! In Rust code:
//! ```ignore
//! use msd_gpu::bindings::{BufferIndex, TextureIndex, VertexSemantic};
//! pass.set_vertex_buffer(BufferIndex::MeshPositions.index(), positions.slice(..));
//! ```
//!
//! In WGSL shaders, the same numbers come from [`crate::prelude::wgsl_prelude`]:
//! ```wgsl
//! @group(0) @binding(2)  // UNIFORM_GROUP, BUFFER_INDEX_UNIFORMS
//! var<uniform> uniforms: Uniforms;
//! ```
//!
//! Buffer and texture indices carry explicit values and must never be
//! renumbered. Vertex semantics are numbered by declaration order, so new
//! semantics may only be appended.

use crate::error::GpuError;

/// Group 0: the uniform block, bound at `BufferIndex::Uniforms`.
pub const UNIFORM_GROUP: u32 = 0;
/// Group 1: textures at `TextureIndex::index()`, samplers at `TextureIndex::sampler_binding()`.
pub const TEXTURE_GROUP: u32 = 1;

/// Input buffer slot a vertex stream or uniform block is bound to.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BufferIndex {
    MeshPositions = 0,
    MeshGenerics = 1,
    Uniforms = 2,
}

impl BufferIndex {
    pub const COUNT: u32 = 3;

    pub const ALL: [BufferIndex; 3] = [
        BufferIndex::MeshPositions,
        BufferIndex::MeshGenerics,
        BufferIndex::Uniforms,
    ];

    /// Slot number as seen by the shader.
    pub const fn index(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            BufferIndex::MeshPositions => "MeshPositions",
            BufferIndex::MeshGenerics => "MeshGenerics",
            BufferIndex::Uniforms => "Uniforms",
        }
    }

    /// Whether this slot carries per-vertex data rather than a uniform block.
    pub const fn is_vertex_stream(self) -> bool {
        matches!(self, BufferIndex::MeshPositions | BufferIndex::MeshGenerics)
    }
}

impl From<BufferIndex> for u32 {
    fn from(index: BufferIndex) -> Self {
        index.index()
    }
}

impl TryFrom<u32> for BufferIndex {
    type Error = GpuError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(GpuError::UnknownIndex {
                kind: "BufferIndex",
                value,
            })
    }
}

/// Logical meaning of a vertex attribute channel.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexSemantic {
    Position = 0,
    Normal,
    Tangent,
    Color,
    BoneIndices,
    BoneWeights,
    Texcoord0,
    Texcoord1,
    Texcoord2,
    Texcoord3,
    Texcoord4,
    Texcoord5,
    Texcoord6,
    Texcoord7,
}

impl VertexSemantic {
    pub const COUNT: u32 = 14;

    /// Number of texture coordinate channels.
    pub const TEXCOORD_CHANNELS: u32 = 8;

    pub const ALL: [VertexSemantic; 14] = [
        VertexSemantic::Position,
        VertexSemantic::Normal,
        VertexSemantic::Tangent,
        VertexSemantic::Color,
        VertexSemantic::BoneIndices,
        VertexSemantic::BoneWeights,
        VertexSemantic::Texcoord0,
        VertexSemantic::Texcoord1,
        VertexSemantic::Texcoord2,
        VertexSemantic::Texcoord3,
        VertexSemantic::Texcoord4,
        VertexSemantic::Texcoord5,
        VertexSemantic::Texcoord6,
        VertexSemantic::Texcoord7,
    ];

    /// Attribute location as seen by the shader.
    pub const fn index(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            VertexSemantic::Position => "Position",
            VertexSemantic::Normal => "Normal",
            VertexSemantic::Tangent => "Tangent",
            VertexSemantic::Color => "Color",
            VertexSemantic::BoneIndices => "BoneIndices",
            VertexSemantic::BoneWeights => "BoneWeights",
            VertexSemantic::Texcoord0 => "Texcoord0",
            VertexSemantic::Texcoord1 => "Texcoord1",
            VertexSemantic::Texcoord2 => "Texcoord2",
            VertexSemantic::Texcoord3 => "Texcoord3",
            VertexSemantic::Texcoord4 => "Texcoord4",
            VertexSemantic::Texcoord5 => "Texcoord5",
            VertexSemantic::Texcoord6 => "Texcoord6",
            VertexSemantic::Texcoord7 => "Texcoord7",
        }
    }

    /// Texture coordinate semantic for `channel`, if the channel exists.
    pub fn texcoord(channel: u32) -> Option<Self> {
        if channel < Self::TEXCOORD_CHANNELS {
            Self::try_from(VertexSemantic::Texcoord0.index() + channel).ok()
        } else {
            None
        }
    }

    /// Inverse of [`VertexSemantic::texcoord`].
    pub fn texcoord_channel(self) -> Option<u32> {
        self.index().checked_sub(VertexSemantic::Texcoord0.index())
    }
}

impl From<VertexSemantic> for u32 {
    fn from(semantic: VertexSemantic) -> Self {
        semantic.index()
    }
}

impl TryFrom<u32> for VertexSemantic {
    type Error = GpuError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(GpuError::UnknownIndex {
                kind: "VertexSemantic",
                value,
            })
    }
}

/// Texture binding slot a sampled texture occupies.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureIndex {
    Color = 0,
}

impl TextureIndex {
    pub const COUNT: u32 = 1;

    pub const ALL: [TextureIndex; 1] = [TextureIndex::Color];

    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Sampler binding paired with this texture. Samplers follow all texture slots.
    pub const fn sampler_binding(self) -> u32 {
        Self::COUNT + self.index()
    }

    pub fn name(self) -> &'static str {
        match self {
            TextureIndex::Color => "Color",
        }
    }
}

impl From<TextureIndex> for u32 {
    fn from(index: TextureIndex) -> Self {
        index.index()
    }
}

impl TryFrom<u32> for TextureIndex {
    type Error = GpuError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(GpuError::UnknownIndex {
                kind: "TextureIndex",
                value,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_indices_are_explicit() {
        assert_eq!(BufferIndex::MeshPositions as u32, 0);
        assert_eq!(BufferIndex::MeshGenerics as u32, 1);
        assert_eq!(BufferIndex::Uniforms as u32, 2);

        let values: Vec<u32> = BufferIndex::ALL.iter().map(|b| b.index()).collect();
        assert_eq!(values, vec![0, 1, 2]);
    }

    #[test]
    fn test_vertex_semantics_are_sequential() {
        for (expected, semantic) in VertexSemantic::ALL.iter().enumerate() {
            assert_eq!(semantic.index(), expected as u32, "{:?}", semantic);
        }
        assert_eq!(VertexSemantic::ALL.len() as u32, VertexSemantic::COUNT);
        assert_eq!(VertexSemantic::Position.index(), 0);
        assert_eq!(VertexSemantic::BoneWeights.index(), 5);
    }

    #[test]
    fn test_texcoords_are_trailing() {
        let trailing = &VertexSemantic::ALL[VertexSemantic::ALL.len() - 8..];
        for (channel, semantic) in trailing.iter().enumerate() {
            assert_eq!(VertexSemantic::texcoord(channel as u32), Some(*semantic));
            assert_eq!(semantic.texcoord_channel(), Some(channel as u32));
        }
        assert_eq!(VertexSemantic::Texcoord7.index(), VertexSemantic::COUNT - 1);
        assert_eq!(VertexSemantic::texcoord(8), None);
        assert_eq!(VertexSemantic::Normal.texcoord_channel(), None);
    }

    #[test]
    fn test_texture_color_is_zero() {
        assert_eq!(TextureIndex::Color as u32, 0);
        assert_eq!(TextureIndex::Color.sampler_binding(), 1);
    }

    #[test]
    fn test_groups() {
        assert_eq!(UNIFORM_GROUP, 0);
        assert_eq!(TEXTURE_GROUP, 1);
    }

    #[test]
    fn test_try_from_rejects_unknown_values() {
        assert_eq!(BufferIndex::try_from(2), Ok(BufferIndex::Uniforms));
        assert_eq!(
            BufferIndex::try_from(3),
            Err(GpuError::UnknownIndex {
                kind: "BufferIndex",
                value: 3
            })
        );
        assert_eq!(VertexSemantic::try_from(13), Ok(VertexSemantic::Texcoord7));
        assert!(VertexSemantic::try_from(14).is_err());
        assert_eq!(TextureIndex::try_from(0), Ok(TextureIndex::Color));
        assert!(TextureIndex::try_from(1).is_err());
    }

    #[test]
    fn test_contract_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}

        assert_send_sync::<BufferIndex>();
        assert_send_sync::<VertexSemantic>();
        assert_send_sync::<TextureIndex>();
        assert_send_sync::<crate::uniform::Uniforms>();
    }

    #[test]
    fn test_only_mesh_slots_are_vertex_streams() {
        assert!(BufferIndex::MeshPositions.is_vertex_stream());
        assert!(BufferIndex::MeshGenerics.is_vertex_stream());
        assert!(!BufferIndex::Uniforms.is_vertex_stream());
    }
}
