//! Mesh hand-off to the renderer.
//!
//! The particle system never talks to a graphics API directly. After each
//! rebuild it hands the buffers to a [`MeshSink`]: the first build creates the
//! mesh and binds its material, later builds only refresh contents.

use crate::geometry::GeometryBuffers;
use crate::template::ParticleTemplate;

/// Shading technique requested for the particle mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Technique {
    /// Whatever the renderer uses for plain meshes.
    #[default]
    Default,
    /// Per-vertex colored mesh with minimal lighting.
    ColoredMinimal,
}

/// Material chosen for a particle system at first build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MaterialBinding {
    /// Texture identifier, if the template names one.
    pub texture: Option<String>,
    pub technique: Technique,
}

impl MaterialBinding {
    /// Derive the binding from a template and the color capability.
    pub fn for_template(template: &ParticleTemplate, has_color: bool) -> Self {
        Self {
            texture: template.has_texture().then(|| template.texture.clone()),
            technique: if has_color {
                Technique::ColoredMinimal
            } else {
                Technique::Default
            },
        }
    }
}

/// Receiver of rebuilt particle geometry.
///
/// Both methods run while the render context is owned.
pub trait MeshSink {
    /// Allocate the mesh and bind its material. Called once, on first build.
    fn create(&mut self, buffers: &GeometryBuffers, material: &MaterialBinding);

    /// Refresh the mesh contents. Called on every later build.
    fn update(&mut self, buffers: &GeometryBuffers);
}

impl<S: MeshSink + ?Sized> MeshSink for &mut S {
    fn create(&mut self, buffers: &GeometryBuffers, material: &MaterialBinding) {
        (**self).create(buffers, material)
    }

    fn update(&mut self, buffers: &GeometryBuffers) {
        (**self).update(buffers)
    }
}

/// Mesh kept in CPU memory.
///
/// Holds a copy of the latest buffers; useful for headless runs and for
/// renderers that pull geometry instead of receiving uploads.
#[derive(Debug, Clone, Default)]
pub struct CpuMesh {
    buffers: GeometryBuffers,
    material: Option<MaterialBinding>,
    updates: usize,
}

impl CpuMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`MeshSink::create`] has run.
    pub fn is_created(&self) -> bool {
        self.material.is_some()
    }

    pub fn material(&self) -> Option<&MaterialBinding> {
        self.material.as_ref()
    }

    pub fn buffers(&self) -> &GeometryBuffers {
        &self.buffers
    }

    /// Number of refreshes since creation.
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl MeshSink for CpuMesh {
    fn create(&mut self, buffers: &GeometryBuffers, material: &MaterialBinding) {
        self.buffers.clone_from(buffers);
        self.material = Some(material.clone());
        self.updates = 0;
    }

    fn update(&mut self, buffers: &GeometryBuffers) {
        self.buffers.clone_from(buffers);
        self.updates += 1;
    }
}
