use crate::{aggregate::Bvh, light::Light, shape::Triangle, surface::Surface};

/// Everything a pass reads: the surfaces and the lights. Assembled single
/// threaded, then only borrowed immutably while rendering or ranging, which
/// is what makes the read-only sharing across workers sound.
#[derive(Default)]
pub struct Scene {
    pub surfaces: Vec<Surface>,
    pub lights: Vec<Light>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_surface(&mut self, surface: Surface) -> usize {
        self.surfaces.push(surface);
        self.surfaces.len() - 1
    }

    pub fn insert_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Copy every surface's triangles out, stamping the owning surface's
    /// index into each copy. This is the only link from a primitive back to
    /// its surface.
    pub fn collect_triangles(&self) -> Vec<Triangle> {
        let mut triangles = Vec::with_capacity(self.surfaces.iter().map(|s| s.triangles.len()).sum());
        for (index, surface) in self.surfaces.iter().enumerate() {
            triangles.extend(surface.triangles.iter().map(|tri| {
                let mut tri = tri.clone();
                tri.surface = index as u32;
                tri
            }));
        }
        triangles
    }

    pub fn build_index(&self) -> Bvh {
        Bvh::build(self.collect_triangles())
    }
}
