//! WGSL source for the shader side of the binding contract.
//!
//! Shaders prepend [`wgsl_prelude`] to their own source so that slot numbers
//! and the uniform block layout come from the same definitions the host uses.

use std::fmt::{self, Write};

use crate::bindings::{BufferIndex, TextureIndex, VertexSemantic, TEXTURE_GROUP, UNIFORM_GROUP};

/// `MeshPositions` -> `MESH_POSITIONS`, `Texcoord0` -> `TEXCOORD0`.
fn screaming_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}

fn write_const<W: Write>(out: &mut W, prefix: &str, name: &str, value: u32) -> fmt::Result {
    writeln!(out, "const {}_{}: u32 = {}u;", prefix, screaming_snake(name), value)
}

/// Write the WGSL declarations for every binding constant and the uniform block.
pub fn write_wgsl_prelude<W: Write>(out: &mut W) -> fmt::Result {
    writeln!(out, "// Binding contract shared with the host. Generated, do not edit.")?;
    writeln!(out)?;

    for buffer in BufferIndex::ALL {
        write_const(out, "BUFFER_INDEX", buffer.name(), buffer.index())?;
    }
    writeln!(out)?;

    for semantic in VertexSemantic::ALL {
        write_const(out, "VERTEX_SEMANTIC", semantic.name(), semantic.index())?;
    }
    writeln!(out)?;

    for texture in TextureIndex::ALL {
        write_const(out, "TEXTURE_INDEX", texture.name(), texture.index())?;
        write_const(
            out,
            "TEXTURE_INDEX",
            &format!("{}Sampler", texture.name()),
            texture.sampler_binding(),
        )?;
    }
    writeln!(out)?;

    writeln!(out, "const UNIFORM_GROUP: u32 = {}u;", UNIFORM_GROUP)?;
    writeln!(out, "const TEXTURE_GROUP: u32 = {}u;", TEXTURE_GROUP)?;
    writeln!(out)?;

    writeln!(out, "struct Uniforms {{")?;
    writeln!(out, "    projection_matrix: mat4x4<f32>,")?;
    writeln!(out, "    model_view_matrix: mat4x4<f32>,")?;
    writeln!(out, "}};")
}

/// Render [`write_wgsl_prelude`] into a new string.
pub fn wgsl_prelude() -> String {
    let mut out = String::new();
    if let Err(e) = write_wgsl_prelude(&mut out) {
        // String's fmt::Write impl never returns an error
        log::error!("Failed to render WGSL prelude: {}", e);
    }
    out
}
