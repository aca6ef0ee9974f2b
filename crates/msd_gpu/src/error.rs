use thiserror::Error;

use crate::bindings::{BufferIndex, VertexSemantic};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GpuError {
    #[error("Unknown {kind} value: {value}")]
    UnknownIndex { kind: &'static str, value: u32 },

    #[error("Uniform block size mismatch: expected {expected} bytes, got {actual}")]
    UniformSize { expected: usize, actual: usize },

    #[error("Vertex semantic {0:?} is bound more than once")]
    DuplicateSemantic(VertexSemantic),

    #[error("Buffer slot {0:?} does not carry vertex data")]
    NotAVertexBuffer(BufferIndex),

    #[error("Attribute {semantic:?} ends at byte {end} but its stream stride is {stride}")]
    AttributeOutOfStride {
        semantic: VertexSemantic,
        end: u64,
        stride: u64,
    },

    #[error("Attribute {semantic:?} at offset {offset} overflows the address range")]
    AttributeOverflow { semantic: VertexSemantic, offset: u64 },

    #[error("Frame pool exhausted: requested {requested} bytes, {remaining} remaining")]
    PoolExhausted { requested: u64, remaining: u64 },

    #[error("Invalid upload configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GpuError>;
