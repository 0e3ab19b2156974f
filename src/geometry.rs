//! Billboard geometry builder.
//!
//! Every refresh turns the pool's live particles into flat, renderer-ready
//! arrays: one quad (4 vertices, 2 triangles) per particle. Buffers are
//! rebuilt from scratch each time; nothing is diffed.
//!
//! | Buffer | Floats / indices per particle | Present when |
//! |--------|-------------------------------|--------------|
//! | positions | 12 | always |
//! | indices | 6 | always |
//! | colors | 12 | color output enabled |
//! | tex_coords | 8 | texture output enabled |
//! | normals | 12 | texture output enabled |

use crate::lifecycle::brightness;
use crate::particle::Particle;
use crate::pool::ParticlePool;
use glam::Vec3;

/// Vertices per billboard quad.
pub const VERTICES_PER_QUAD: usize = 4;
/// Indices per billboard quad (two triangles).
pub const INDICES_PER_QUAD: usize = 6;

/// Unit-square texture coordinates in corner emission order.
const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
/// Triangle corners relative to a quad's first vertex.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Which optional buffers a refresh fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub has_texture: bool,
    pub has_color: bool,
}

impl Capabilities {
    pub fn new(has_texture: bool, has_color: bool) -> Self {
        Self { has_texture, has_color }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            has_texture: false,
            has_color: true,
        }
    }
}

/// One draw batch: an inclusive index span and the vertices it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start: u32,
    pub end: u32,
    pub min_vertex: u32,
    pub max_vertex: u32,
}

impl IndexRange {
    /// Range covering `count` quads, or `None` when there are none.
    pub fn for_quads(count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        Some(Self {
            start: 0,
            end: (count * INDICES_PER_QUAD - 1) as u32,
            min_vertex: 0,
            max_vertex: (count * VERTICES_PER_QUAD - 1) as u32,
        })
    }
}

/// Flat vertex/index arrays for one particle system.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffers {
    pub(crate) positions: Vec<f32>,
    pub(crate) indices: Vec<u32>,
    pub(crate) colors: Vec<f32>,
    pub(crate) tex_coords: Vec<f32>,
    pub(crate) normals: Vec<f32>,
    pub(crate) range: Option<IndexRange>,
}

impl GeometryBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty every array and drop the index range.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.indices.clear();
        self.colors.clear();
        self.tex_coords.clear();
        self.normals.clear();
        self.range = None;
    }

    /// XYZ triples, four per quad.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Triangle list indices, six per quad.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// RGB triples, four per quad. Empty when color output is off.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// UV pairs, four per quad. Empty when texture output is off.
    pub fn tex_coords(&self) -> &[f32] {
        &self.tex_coords
    }

    /// XYZ triples, all zero. Empty when texture output is off.
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// The single draw batch, `None` for an empty pool.
    pub fn index_range(&self) -> Option<IndexRange> {
        self.range
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn quad_count(&self) -> usize {
        self.vertex_count() / VERTICES_PER_QUAD
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position data as bytes for upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Index data as bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Color data as bytes for upload.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Texture coordinate data as bytes for upload.
    pub fn tex_coord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tex_coords)
    }

    /// Normal data as bytes for upload.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }
}

/// Rebuilds [`GeometryBuffers`] from a pool.
#[derive(Debug, Clone, Default)]
pub struct GeometryBuilder {
    buffers: GeometryBuffers,
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers produced by the last [`rebuild`](Self::rebuild).
    pub fn buffers(&self) -> &GeometryBuffers {
        &self.buffers
    }

    /// Regenerate all buffers for the pool's current particles.
    ///
    /// Storage is reused between calls; each array is sized to exactly fit
    /// the live particle count.
    pub fn rebuild(&mut self, pool: &ParticlePool, caps: Capabilities) -> &GeometryBuffers {
        let n = pool.len();
        let out = &mut self.buffers;
        out.clear();

        out.positions.reserve_exact(n * VERTICES_PER_QUAD * 3);
        out.indices.reserve_exact(n * INDICES_PER_QUAD);
        if caps.has_color {
            out.colors.reserve_exact(n * VERTICES_PER_QUAD * 3);
        }
        if caps.has_texture {
            out.tex_coords.reserve_exact(n * VERTICES_PER_QUAD * 2);
            out.normals.reserve_exact(n * VERTICES_PER_QUAD * 3);
        }

        let base_color = pool.template().color;
        for (i, particle) in pool.particles().iter().enumerate() {
            for corner in quad_corners(particle) {
                out.positions.extend_from_slice(&corner.to_array());
            }

            let first = (i * VERTICES_PER_QUAD) as u32;
            out.indices.extend(QUAD_INDICES.iter().map(|&k| first + k));

            if caps.has_color {
                let rgb = base_color * brightness(particle.age_fraction());
                for _ in 0..VERTICES_PER_QUAD {
                    out.colors.extend_from_slice(&rgb.to_array());
                }
            }

            if caps.has_texture {
                for uv in QUAD_TEX_COORDS {
                    out.tex_coords.extend_from_slice(&uv);
                }
                // normals are not derived from the quad
                out.normals.extend_from_slice(&[0.0; VERTICES_PER_QUAD * 3]);
            }
        }

        out.range = IndexRange::for_quads(n);
        out
    }
}

/// World-space corners in emission order: top-left, top-right,
/// bottom-right, bottom-left.
pub fn quad_corners(particle: &Particle) -> [Vec3; 4] {
    let half_w = particle.size.x / 2.0;
    let half_h = particle.size.y / 2.0;

    let mut top_left = particle.transform;
    top_left.move_left(half_w);
    top_left.move_up(half_h);

    let mut top_right = particle.transform;
    top_right.move_right(half_w);
    top_right.move_up(half_h);

    let mut bottom_left = particle.transform;
    bottom_left.move_left(half_w);
    bottom_left.move_down(half_h);

    let mut bottom_right = particle.transform;
    bottom_right.move_right(half_w);
    bottom_right.move_down(half_h);

    [
        top_left.position,
        top_right.position,
        bottom_right.position,
        bottom_left.position,
    ]
}
