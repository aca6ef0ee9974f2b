//! Vertex descriptor mapping semantics onto mesh buffer slots.
//!
//! Each attribute is placed at `shader_location == semantic.index()` inside
//! the vertex stream bound at its [`BufferIndex`]. The wgpu layouts returned
//! by [`VertexDescriptor::buffer_layouts`] are ordered so that the position
//! in the list equals the buffer slot.

use std::collections::BTreeMap;

use crate::bindings::{BufferIndex, VertexSemantic};
use crate::error::{GpuError, Result};

/// One per-vertex stream bound at a mesh buffer slot.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexStream {
    pub buffer: BufferIndex,
    pub stride: u64,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexStream {
    pub fn layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// Validated set of vertex streams.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexDescriptor {
    streams: Vec<VertexStream>,
}

impl VertexDescriptor {
    pub fn builder() -> VertexDescriptorBuilder {
        VertexDescriptorBuilder::default()
    }

    /// Mesh layout used by the default render path: positions in their own
    /// stream, first texture coordinate channel in the generic stream.
    pub fn mesh_default() -> Self {
        Self {
            streams: vec![
                VertexStream {
                    buffer: BufferIndex::MeshPositions,
                    stride: 12,
                    attributes: vec![wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: VertexSemantic::Position.index(),
                    }],
                },
                VertexStream {
                    buffer: BufferIndex::MeshGenerics,
                    stride: 8,
                    attributes: vec![wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 0,
                        shader_location: VertexSemantic::Texcoord0.index(),
                    }],
                },
            ],
        }
    }

    /// Streams in ascending buffer slot order.
    pub fn streams(&self) -> &[VertexStream] {
        &self.streams
    }

    pub fn stream(&self, buffer: BufferIndex) -> Option<&VertexStream> {
        self.streams.iter().find(|s| s.buffer == buffer)
    }

    pub fn stride(&self, buffer: BufferIndex) -> Option<u64> {
        self.stream(buffer).map(|s| s.stride)
    }

    /// Find where a semantic lives.
    pub fn attribute(&self, semantic: VertexSemantic) -> Option<(BufferIndex, &wgpu::VertexAttribute)> {
        self.streams.iter().find_map(|s| {
            s.attributes
                .iter()
                .find(|a| a.shader_location == semantic.index())
                .map(|a| (s.buffer, a))
        })
    }

    /// wgpu layouts indexed by buffer slot. Unused slots below the highest
    /// used one get an empty layout so that later slots keep their number.
    pub fn buffer_layouts(&self) -> Vec<wgpu::VertexBufferLayout<'_>> {
        let Some(last) = self.streams.last() else {
            return Vec::new();
        };

        (0..=last.buffer.index())
            .map(|slot| match self.streams.iter().find(|s| s.buffer.index() == slot) {
                Some(stream) => stream.layout(),
                None => wgpu::VertexBufferLayout {
                    array_stride: 0,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[],
                },
            })
            .collect()
    }
}

impl Default for VertexDescriptor {
    fn default() -> Self {
        Self::mesh_default()
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingAttribute {
    semantic: VertexSemantic,
    format: wgpu::VertexFormat,
    buffer: BufferIndex,
    offset: u64,
}

/// Builder for [`VertexDescriptor`].
///
/// # Example
/// ```ignore
/// let descriptor = VertexDescriptor::builder()
///     .attribute(VertexSemantic::Position, wgpu::VertexFormat::Float32x3, BufferIndex::MeshPositions, 0)
///     .attribute(VertexSemantic::Normal, wgpu::VertexFormat::Float32x3, BufferIndex::MeshGenerics, 0)
///     .attribute(VertexSemantic::Texcoord0, wgpu::VertexFormat::Float32x2, BufferIndex::MeshGenerics, 12)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct VertexDescriptorBuilder {
    attributes: Vec<PendingAttribute>,
    strides: BTreeMap<BufferIndex, u64>,
}

impl VertexDescriptorBuilder {
    /// Place `semantic` at byte `offset` of the stream bound at `buffer`.
    pub fn attribute(
        mut self,
        semantic: VertexSemantic,
        format: wgpu::VertexFormat,
        buffer: BufferIndex,
        offset: u64,
    ) -> Self {
        self.attributes.push(PendingAttribute {
            semantic,
            format,
            buffer,
            offset,
        });
        self
    }

    /// Set an explicit stride. Without one the stream is tightly packed.
    pub fn stride(mut self, buffer: BufferIndex, stride: u64) -> Self {
        self.strides.insert(buffer, stride);
        self
    }

    pub fn build(self) -> Result<VertexDescriptor> {
        let mut streams: BTreeMap<BufferIndex, Vec<PendingAttribute>> = BTreeMap::new();

        for (i, attr) in self.attributes.iter().enumerate() {
            if !attr.buffer.is_vertex_stream() {
                return Err(GpuError::NotAVertexBuffer(attr.buffer));
            }
            if self.attributes[..i].iter().any(|a| a.semantic == attr.semantic) {
                return Err(GpuError::DuplicateSemantic(attr.semantic));
            }
            streams.entry(attr.buffer).or_default().push(*attr);
        }

        for buffer in self.strides.keys() {
            if !buffer.is_vertex_stream() {
                return Err(GpuError::NotAVertexBuffer(*buffer));
            }
        }

        let streams = streams
            .into_iter()
            .map(|(buffer, mut attrs)| {
                attrs.sort_by_key(|a| a.semantic);
                let ends = attrs
                    .iter()
                    .map(|a| {
                        a.offset
                            .checked_add(a.format.size())
                            .ok_or(GpuError::AttributeOverflow {
                                semantic: a.semantic,
                                offset: a.offset,
                            })
                    })
                    .collect::<Result<Vec<u64>>>()?;
                let packed = ends.iter().copied().max().unwrap_or(0);
                let stride = self.strides.get(&buffer).copied().unwrap_or(packed);

                if let Some((a, end)) = attrs.iter().zip(&ends).find(|(_, end)| **end > stride) {
                    return Err(GpuError::AttributeOutOfStride {
                        semantic: a.semantic,
                        end: *end,
                        stride,
                    });
                }

                log::debug!(
                    "Vertex stream {} (slot {}): stride {}, {} attribute(s)",
                    buffer.name(),
                    buffer.index(),
                    stride,
                    attrs.len()
                );

                Ok(VertexStream {
                    buffer,
                    stride,
                    attributes: attrs
                        .iter()
                        .map(|a| wgpu::VertexAttribute {
                            format: a.format,
                            offset: a.offset,
                            shader_location: a.semantic.index(),
                        })
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(VertexDescriptor { streams })
    }
}
