//! Human-readable summary of the binding contract.

use std::fmt::{self, Write};

use msd_gpu::bindings::{TEXTURE_GROUP, UNIFORM_GROUP};
use msd_gpu::{
    BufferIndex, GpuError, TextureIndex, UploadConfig, Uniforms, VertexDescriptor, VertexSemantic,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error(transparent)]
    Layout(#[from] GpuError),

    #[error("Failed to write report: {0}")]
    Format(#[from] fmt::Error),
}

/// Write the slot tables, uniform layout and upload sizes for `upload`.
///
/// Sizes are computed from the configuration; no staging memory is allocated.
pub fn write_report<W: Write>(out: &mut W, upload: &UploadConfig) -> Result<(), ReportError> {
    upload.validate()?;
    let uniform_slot = upload.uniform_slot_size(Uniforms::SIZE as u64)?;
    let uniform_buffer = upload.uniform_buffer_size(Uniforms::SIZE as u64)?;
    let pool_buffer = upload.pool_buffer_size()?;
    let mesh = VertexDescriptor::mesh_default();

    writeln!(out, "Buffer slots")?;
    for buffer in BufferIndex::ALL {
        writeln!(out, "  {:<16}{:>3}", buffer.name(), buffer.index())?;
    }

    writeln!(out, "Vertex semantics")?;
    for semantic in VertexSemantic::ALL {
        write!(out, "  {:<16}{:>3}", semantic.name(), semantic.index())?;
        if let Some((buffer, attr)) = mesh.attribute(semantic) {
            write!(out, "  {:?} @ {}+{}", attr.format, buffer.name(), attr.offset)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Texture slots (group {})", TEXTURE_GROUP)?;
    for texture in TextureIndex::ALL {
        writeln!(
            out,
            "  {:<16}{:>3}  sampler {}",
            texture.name(),
            texture.index(),
            texture.sampler_binding()
        )?;
    }

    writeln!(out, "Uniforms (group {}, binding {})", UNIFORM_GROUP, BufferIndex::Uniforms.index())?;
    writeln!(out, "  size              {}", Uniforms::SIZE)?;
    writeln!(out, "  projection_matrix @{}", Uniforms::PROJECTION_OFFSET)?;
    writeln!(out, "  model_view_matrix @{}", Uniforms::MODEL_VIEW_OFFSET)?;

    writeln!(out, "Uploads ({} frames in flight)", upload.frames_in_flight)?;
    writeln!(
        out,
        "  uniform ring      {} x {} = {} bytes",
        upload.frames_in_flight, uniform_slot, uniform_buffer
    )?;
    writeln!(
        out,
        "  frame pool        {} x {} = {} bytes",
        upload.frames_in_flight, upload.pool_size, pool_buffer
    )?;
    Ok(())
}

/// Render [`write_report`] into a new string.
pub fn layout_report(upload: &UploadConfig) -> Result<String, ReportError> {
    let mut out = String::new();
    write_report(&mut out, upload)?;
    log::debug!("Rendered layout report ({} bytes)", out.len());
    Ok(out)
}
