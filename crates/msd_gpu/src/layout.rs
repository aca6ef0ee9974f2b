//! Bind group layout entries built from the binding constants.
//!
//! Entries are collected without a device so the table can be inspected and
//! tested; [`BindingTable::create_layout`] turns it into a wgpu layout.

use std::num::NonZeroU64;

use crate::bindings::{BufferIndex, TextureIndex};
use crate::uniform::Uniforms;

/// Entries for one bind group.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    entries: Vec<wgpu::BindGroupLayoutEntry>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform group: the [`Uniforms`] block at `BufferIndex::Uniforms`.
    ///
    /// Use `dynamic_offset` when the block lives in a [`crate::upload::UniformRing`].
    pub fn uniforms(visibility: wgpu::ShaderStages, dynamic_offset: bool) -> Self {
        Self::new().add_uniform_buffer(
            BufferIndex::Uniforms.index(),
            visibility,
            dynamic_offset,
            NonZeroU64::new(Uniforms::SIZE as u64),
        )
    }

    /// Texture group: each texture with its filtering sampler.
    pub fn textures(textures: &[TextureIndex], visibility: wgpu::ShaderStages) -> Self {
        textures.iter().fold(Self::new(), |table, texture| {
            table
                .add_texture_2d(texture.index(), visibility)
                .add_sampler(texture.sampler_binding(), visibility)
        })
    }

    /// Add a uniform buffer entry.
    pub fn add_uniform_buffer(
        mut self,
        binding: u32,
        visibility: wgpu::ShaderStages,
        has_dynamic_offset: bool,
        min_binding_size: Option<NonZeroU64>,
    ) -> Self {
        self.entries.push(wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset,
                min_binding_size,
            },
            count: None,
        });
        self
    }

    /// Add a 2D texture entry.
    pub fn add_texture_2d(mut self, binding: u32, visibility: wgpu::ShaderStages) -> Self {
        self.entries.push(wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        });
        self
    }

    /// Add a filtering sampler entry.
    pub fn add_sampler(mut self, binding: u32, visibility: wgpu::ShaderStages) -> Self {
        self.entries.push(wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
        self
    }

    pub fn entries(&self) -> &[wgpu::BindGroupLayoutEntry] {
        &self.entries
    }

    pub fn entry(&self, binding: u32) -> Option<&wgpu::BindGroupLayoutEntry> {
        self.entries.iter().find(|e| e.binding == binding)
    }

    /// Build the bind group layout.
    pub fn create_layout(&self, device: &wgpu::Device, label: Option<&str>) -> wgpu::BindGroupLayout {
        log::debug!(
            "Creating bind group layout {:?} with bindings {:?}",
            label,
            self.entries.iter().map(|e| e.binding).collect::<Vec<_>>()
        );
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label,
            entries: &self.entries,
        })
    }
}
