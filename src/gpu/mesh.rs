//! wgpu-backed particle mesh.

use std::sync::Arc;

use crate::geometry::GeometryBuffers;
use crate::mesh::{MaterialBinding, MeshSink};

/// Smallest allocation for any stream.
const MIN_BUFFER_SIZE: u64 = 256;

/// Allocation size needed to hold `len` bytes in a buffer currently of
/// `current` bytes, or `None` when no (re)allocation is needed.
///
/// Nothing is allocated for an empty stream that has no buffer yet.
fn required_size(current: Option<u64>, len: u64) -> Option<u64> {
    match current {
        Some(size) if len <= size => None,
        None if len == 0 => None,
        _ => Some(len.max(MIN_BUFFER_SIZE).next_power_of_two()),
    }
}

/// A grow-only GPU buffer refreshed with `Queue::write_buffer`.
struct UploadBuffer {
    buffer: wgpu::Buffer,
    size: u64,
}

impl UploadBuffer {
    fn new(device: &wgpu::Device, label: &'static str, usage: wgpu::BufferUsages, size: u64) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, size }
    }
}

/// One vertex or index stream, allocated the first time it carries data.
struct Stream {
    label: &'static str,
    usage: wgpu::BufferUsages,
    upload: Option<UploadBuffer>,
}

impl Stream {
    fn new(label: &'static str, usage: wgpu::BufferUsages) -> Self {
        Self {
            label,
            usage,
            upload: None,
        }
    }

    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        let len = bytes.len() as u64;
        let current = self.upload.as_ref().map(|u| u.size);
        if let Some(size) = required_size(current, len) {
            log::debug!("allocating {} at {} bytes (was {:?})", self.label, size, current);
            self.upload = Some(UploadBuffer::new(device, self.label, self.usage, size));
        }
        if let Some(upload) = &self.upload {
            if len > 0 {
                queue.write_buffer(&upload.buffer, 0, bytes);
            }
        }
    }

    fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.upload.as_ref().map(|u| &u.buffer)
    }
}

/// Vertex and index buffers on the GPU, one slot per attribute.
///
/// Vertex slots: 0 positions, 1 colors, 2 texture coordinates, 3 normals.
/// A stream gets its buffer on the first upload where it is non-empty, so a
/// system recreated with a textured template, or one whose first build was
/// empty, still reaches the GPU on later updates.
pub struct GpuMesh {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    positions: Stream,
    indices: Stream,
    colors: Stream,
    tex_coords: Stream,
    normals: Stream,
    index_count: u32,
    material: Option<MaterialBinding>,
}

impl GpuMesh {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        let vertex = wgpu::BufferUsages::VERTEX;
        Self {
            device,
            queue,
            positions: Stream::new("Particle Positions", vertex),
            indices: Stream::new("Particle Indices", wgpu::BufferUsages::INDEX),
            colors: Stream::new("Particle Colors", vertex),
            tex_coords: Stream::new("Particle TexCoords", vertex),
            normals: Stream::new("Particle Normals", vertex),
            index_count: 0,
            material: None,
        }
    }

    pub fn material(&self) -> Option<&MaterialBinding> {
        self.material.as_ref()
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Bind buffers and issue one indexed draw. Skips empty meshes.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let (Some(positions), Some(indices)) = (self.positions.buffer(), self.indices.buffer()) else {
            return;
        };
        if self.index_count == 0 {
            return;
        }

        pass.set_vertex_buffer(0, positions.slice(..));
        let optional = [&self.colors, &self.tex_coords, &self.normals];
        for (slot, stream) in optional.iter().enumerate() {
            if let Some(buffer) = stream.buffer() {
                pass.set_vertex_buffer(slot as u32 + 1, buffer.slice(..));
            }
        }
        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    fn upload(&mut self, buffers: &GeometryBuffers) {
        let device = &self.device;
        let queue = &self.queue;
        self.positions.write(device, queue, buffers.position_bytes());
        self.indices.write(device, queue, buffers.index_bytes());
        self.colors.write(device, queue, buffers.color_bytes());
        self.tex_coords.write(device, queue, buffers.tex_coord_bytes());
        self.normals.write(device, queue, buffers.normal_bytes());
        self.index_count = buffers.index_count() as u32;
    }
}

impl MeshSink for GpuMesh {
    fn create(&mut self, buffers: &GeometryBuffers, material: &MaterialBinding) {
        self.material = Some(material.clone());
        self.upload(buffers);
    }

    fn update(&mut self, buffers: &GeometryBuffers) {
        self.upload(buffers);
    }
}
