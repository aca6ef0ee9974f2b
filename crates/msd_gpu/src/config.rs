//! Configuration for uniform and per-draw uploads.
//!
//! Defaults match what wgpu guarantees on every backend: three frames in
//! flight and 256-byte uniform offset alignment.

use serde::{Deserialize, Serialize};

use crate::error::{GpuError, Result};
use crate::upload::align_to;

/// Largest GPU buffer an upload helper may ask for. Same as
/// `wgpu::Limits::default().max_buffer_size`.
pub const MAX_BUFFER_SIZE: u64 = 256 << 20;

/// Configuration for [`crate::upload::UniformRing`] and [`crate::upload::FramePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Number of buffer regions cycled between frames.
    pub frames_in_flight: usize,
    /// Alignment of each uniform ring slot in bytes.
    pub uniform_alignment: u64,
    /// Bytes available to the per-draw pool in each frame.
    pub pool_size: u64,
    /// Alignment of each per-draw allocation in bytes.
    pub pool_alignment: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            frames_in_flight: 3,
            uniform_alignment: 256,
            pool_size: 128_000,
            pool_alignment: 256,
        }
    }
}

impl UploadConfig {
    /// Take alignments from the device limits.
    pub fn from_limits(limits: &wgpu::Limits) -> Self {
        Self::default()
            .with_uniform_alignment(limits.min_uniform_buffer_offset_alignment as u64)
            .with_pool_alignment(limits.min_uniform_buffer_offset_alignment as u64)
    }

    /// Set number of frames in flight.
    pub fn with_frames_in_flight(mut self, frames: usize) -> Self {
        self.frames_in_flight = frames;
        self
    }

    /// Set uniform slot alignment.
    pub fn with_uniform_alignment(mut self, alignment: u64) -> Self {
        self.uniform_alignment = alignment;
        self
    }

    /// Set per-frame pool size.
    pub fn with_pool_size(mut self, size: u64) -> Self {
        self.pool_size = size;
        self
    }

    /// Set per-draw allocation alignment.
    pub fn with_pool_alignment(mut self, alignment: u64) -> Self {
        self.pool_alignment = alignment;
        self
    }

    /// Size of one uniform ring slot holding a value of `value_size` bytes.
    pub fn uniform_slot_size(&self, value_size: u64) -> Result<u64> {
        align_to(value_size, self.uniform_alignment).ok_or_else(|| {
            GpuError::InvalidConfig(format!(
                "uniform slot for {} bytes overflows at alignment {}",
                value_size, self.uniform_alignment
            ))
        })
    }

    /// Size of the GPU buffer backing a uniform ring of `value_size` values.
    pub fn uniform_buffer_size(&self, value_size: u64) -> Result<u64> {
        let slot = self.uniform_slot_size(value_size)?;
        self.frames_size("uniform ring", slot)
    }

    /// Size of the GPU buffer backing every frame pool region.
    pub fn pool_buffer_size(&self) -> Result<u64> {
        self.frames_size("frame pool", self.pool_size)
    }

    fn frames_size(&self, what: &str, region: u64) -> Result<u64> {
        u64::try_from(self.frames_in_flight)
            .ok()
            .and_then(|frames| region.checked_mul(frames))
            .filter(|size| *size <= MAX_BUFFER_SIZE)
            .ok_or_else(|| {
                GpuError::InvalidConfig(format!(
                    "{} of {} x {} bytes exceeds the {} byte buffer limit",
                    what, self.frames_in_flight, region, MAX_BUFFER_SIZE
                ))
            })
    }

    pub fn validate(&self) -> Result<()> {
        if self.frames_in_flight == 0 {
            return Err(GpuError::InvalidConfig(
                "frames_in_flight must be at least 1".to_string(),
            ));
        }
        for (name, alignment) in [
            ("uniform_alignment", self.uniform_alignment),
            ("pool_alignment", self.pool_alignment),
        ] {
            if !alignment.is_power_of_two() {
                return Err(GpuError::InvalidConfig(format!(
                    "{} {} is not a power of two",
                    name, alignment
                )));
            }
            if alignment > MAX_BUFFER_SIZE {
                return Err(GpuError::InvalidConfig(format!(
                    "{} {} exceeds the {} byte buffer limit",
                    name, alignment, MAX_BUFFER_SIZE
                )));
            }
        }
        if self.pool_size == 0 {
            return Err(GpuError::InvalidConfig("pool_size must be non-zero".to_string()));
        }
        self.pool_buffer_size()?;
        self.uniform_buffer_size(1)?;
        Ok(())
    }
}
