//! Binding layout contract between the host and the shader stage.
//!
//! Buffer slots, vertex semantics, texture slots and the uniform block
//! layout live in [`bindings`] and [`uniform`]; the remaining modules turn
//! them into wgpu layouts, WGSL source and per-frame uploads.

pub mod bindings;
pub mod config;
pub mod error;
pub mod layout;
pub mod matrix;
pub mod prelude;
pub mod uniform;
pub mod upload;
pub mod vertex;

pub use bindings::{BufferIndex, TextureIndex, VertexSemantic};
pub use config::UploadConfig;
pub use error::{GpuError, Result};
pub use layout::BindingTable;
pub use matrix::Matrix4;
pub use prelude::{wgsl_prelude, write_wgsl_prelude};
pub use uniform::Uniforms;
pub use upload::{FramePool, UniformRing};
pub use vertex::{VertexDescriptor, VertexDescriptorBuilder, VertexStream};
