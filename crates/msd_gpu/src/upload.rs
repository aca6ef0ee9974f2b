//! CPU-side staging for uniform and per-draw uploads.
//!
//! Both types keep one buffer region per frame in flight so the CPU can
//! write the next frame while the GPU still reads the previous ones. Callers
//! are responsible for not reusing a region before its frame completes.

use std::marker::PhantomData;
use std::mem;

use bytemuck::Pod;

use crate::config::UploadConfig;
use crate::error::{GpuError, Result};

/// Round `size` up to a multiple of `alignment` (a power of two).
/// `None` when the rounded size does not fit in a `u64`.
pub fn align_to(size: u64, alignment: u64) -> Option<u64> {
    debug_assert!(alignment.is_power_of_two());
    let mask = alignment - 1;
    size.checked_add(mask).map(|padded| padded & !mask)
}

fn staging(size: u64) -> Result<Vec<u8>> {
    let len = usize::try_from(size).map_err(|_| {
        GpuError::InvalidConfig(format!("{} bytes do not fit in host memory", size))
    })?;
    Ok(vec![0u8; len])
}

/// A value of type `T` replicated once per frame in flight.
///
/// Bind the GPU buffer with a dynamic offset and pass [`UniformRing::offset`]
/// when drawing.
#[derive(Debug, Clone)]
pub struct UniformRing<T: Pod> {
    staging: Vec<u8>,
    slot_size: u64,
    frames: usize,
    current: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformRing<T> {
    /// Create a ring with every slot zeroed.
    pub fn new(config: &UploadConfig) -> Result<Self> {
        config.validate()?;
        let value_size = mem::size_of::<T>() as u64;
        let slot_size = config.uniform_slot_size(value_size)?;
        let staging = staging(config.uniform_buffer_size(value_size)?)?;

        log::debug!(
            "UniformRing<{}>: {} slots of {} bytes",
            std::any::type_name::<T>(),
            config.frames_in_flight,
            slot_size
        );

        Ok(Self {
            staging,
            slot_size,
            frames: config.frames_in_flight,
            current: 0,
            _marker: PhantomData,
        })
    }

    /// Aligned size of one slot.
    pub fn slot_size(&self) -> u64 {
        self.slot_size
    }

    /// Size the GPU buffer backing this ring must have.
    pub fn buffer_size(&self) -> u64 {
        self.staging.len() as u64
    }

    pub fn frames_in_flight(&self) -> usize {
        self.frames
    }

    /// Index of the current slot.
    pub fn slot(&self) -> usize {
        self.current
    }

    /// Byte offset of the current slot.
    pub fn offset(&self) -> u64 {
        self.slot_size * self.current as u64
    }

    fn slot_range(&self) -> std::ops::Range<usize> {
        let start = self.offset() as usize;
        start..start + mem::size_of::<T>()
    }

    pub fn get(&self) -> T {
        bytemuck::pod_read_unaligned(&self.staging[self.slot_range()])
    }

    pub fn set(&mut self, value: T) {
        let range = self.slot_range();
        self.staging[range].copy_from_slice(bytemuck::bytes_of(&value));
    }

    pub fn modify(&mut self, f: impl FnOnce(&mut T)) {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }

    /// Advance to the next slot.
    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.frames;
    }

    /// All slots, as laid out in the GPU buffer.
    pub fn bytes(&self) -> &[u8] {
        &self.staging
    }

    /// The current value's bytes, without slot padding.
    pub fn current_bytes(&self) -> &[u8] {
        &self.staging[self.slot_range()]
    }

    /// Create a GPU buffer sized for this ring.
    pub fn create_buffer(&self, device: &wgpu::Device, label: Option<&str>) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label,
            size: self.buffer_size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Write the current slot into `buffer` at [`UniformRing::offset`].
    pub fn upload(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        queue.write_buffer(buffer, self.offset(), self.current_bytes());
    }
}

/// Bump allocator for per-draw data, one region per frame in flight.
///
/// Running out of space fails the allocation; offsets handed out earlier in
/// the frame stay valid.
#[derive(Debug, Clone)]
pub struct FramePool {
    staging: Vec<u8>,
    region_size: u64,
    buffer_size: u64,
    alignment: u64,
    frames: usize,
    current: usize,
    cursor: u64,
}

impl FramePool {
    pub fn new(config: &UploadConfig) -> Result<Self> {
        config.validate()?;
        let buffer_size = config.pool_buffer_size()?;
        log::debug!(
            "FramePool: {} regions of {} bytes, alignment {}",
            config.frames_in_flight,
            config.pool_size,
            config.pool_alignment
        );
        Ok(Self {
            staging: staging(config.pool_size)?,
            region_size: config.pool_size,
            buffer_size,
            alignment: config.pool_alignment,
            frames: config.frames_in_flight,
            current: 0,
            cursor: 0,
        })
    }

    /// Bytes available per frame.
    pub fn capacity(&self) -> u64 {
        self.region_size
    }

    /// Size the GPU buffer backing all regions must have.
    pub fn buffer_size(&self) -> u64 {
        self.buffer_size
    }

    /// Index of the region being written.
    pub fn region(&self) -> usize {
        self.current
    }

    /// Offset of the current region inside the GPU buffer.
    pub fn region_offset(&self) -> u64 {
        self.region_size * self.current as u64
    }

    /// Start writing a frame. Earlier contents of the region are discarded.
    pub fn begin_frame(&mut self) {
        self.cursor = 0;
    }

    /// Copy `value` into the pool and return its offset inside the current region.
    pub fn append<T: Pod>(&mut self, value: &T) -> Result<u64> {
        let bytes = bytemuck::bytes_of(value);
        let start = align_to(self.cursor, self.alignment).unwrap_or(u64::MAX);
        let end = start.saturating_add(bytes.len() as u64);

        if end > self.region_size {
            let remaining = self.region_size.saturating_sub(start);
            log::warn!(
                "FramePool exhausted: {} bytes requested, {} remaining in region {}",
                bytes.len(),
                remaining,
                self.current
            );
            return Err(GpuError::PoolExhausted {
                requested: bytes.len() as u64,
                remaining,
            });
        }

        self.staging[start as usize..end as usize].copy_from_slice(bytes);
        self.cursor = end;
        Ok(start)
    }

    /// Bytes written so far this frame.
    pub fn written(&self) -> &[u8] {
        &self.staging[..self.cursor as usize]
    }

    /// Finish the frame and move to the next region. Returns the bytes written.
    pub fn finish_frame(&mut self) -> u64 {
        let written = self.cursor;
        log::trace!("FramePool region {} finished with {} bytes", self.current, written);
        self.current = (self.current + 1) % self.frames;
        written
    }

    /// Create a GPU buffer holding every region.
    pub fn create_buffer(&self, device: &wgpu::Device, label: Option<&str>) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label,
            size: self.buffer_size(),
            usage: wgpu::BufferUsages::UNIFORM
                | wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Write this frame's bytes into the current region of `buffer`.
    ///
    /// Call before [`FramePool::finish_frame`].
    pub fn upload(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        let written = self.written();
        if !written.is_empty() {
            queue.write_buffer(buffer, self.region_offset(), written);
        }
    }
}
