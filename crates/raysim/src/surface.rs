use std::sync::Arc;

use crate::{
    color::Rgb,
    material::{IndexMap, Material},
    math::{Mat3, Scalar, Vec2, Vec3},
    shape::{face_normal, Triangle},
};

/// Mesh geometry in the object's local frame, as handed over by a model
/// loader. `normals`, `uvs` and `colors` may be empty; missing attributes
/// are filled with flat normals, zero UVs and white.
#[derive(Debug, Default, Clone)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub colors: Vec<Rgb>,
    pub indices: Vec<[u32; 3]>,
}

/// A rigid entity in the scene: exclusive owner of its triangles, a small
/// palette of shared materials and the UV-indexed selector over it.
///
/// There is no transform graph. The local-frame geometry is retained and
/// every pose setter rebakes the world-space triangles immediately, so a
/// triangle handed to the intersection index always reflects the current
/// pose. The setters are the only writers of primitive data and must not
/// run concurrently with a render or ranging pass.
pub struct Surface {
    position: Vec3,
    rotation: Mat3,
    scale: Scalar,

    local: Vec<Triangle>,
    pub triangles: Vec<Triangle>,

    pub materials: Vec<Arc<Material>>,
    pub material_map: IndexMap,
    pub smooth_shading: bool,
}

impl Surface {
    pub fn new(
        mesh: MeshData,
        materials: Vec<Arc<Material>>,
        material_map: IndexMap,
        smooth_shading: bool,
    ) -> Self {
        let local = mesh
            .indices
            .iter()
            .map(|idx| {
                let fetch = |i: u32| mesh.positions[i as usize];
                let vertices = [fetch(idx[0]), fetch(idx[1]), fetch(idx[2])];
                let normals = if mesh.normals.is_empty() {
                    [face_normal(&vertices); 3]
                } else {
                    [
                        mesh.normals[idx[0] as usize],
                        mesh.normals[idx[1] as usize],
                        mesh.normals[idx[2] as usize],
                    ]
                };
                let uvs = if mesh.uvs.is_empty() {
                    [Vec2::ZERO; 3]
                } else {
                    [
                        mesh.uvs[idx[0] as usize],
                        mesh.uvs[idx[1] as usize],
                        mesh.uvs[idx[2] as usize],
                    ]
                };
                let colors = if mesh.colors.is_empty() {
                    [Rgb::WHITE; 3]
                } else {
                    [
                        mesh.colors[idx[0] as usize],
                        mesh.colors[idx[1] as usize],
                        mesh.colors[idx[2] as usize],
                    ]
                };
                Triangle::new(vertices, normals, uvs, colors)
            })
            .collect();

        Self::from_local_triangles(local, materials, material_map, smooth_shading)
    }

    /// Build directly from local-frame triangles.
    pub fn from_local_triangles(
        local: Vec<Triangle>,
        materials: Vec<Arc<Material>>,
        material_map: IndexMap,
        smooth_shading: bool,
    ) -> Self {
        let mut this = Self {
            position: Vec3::ZERO,
            rotation: Mat3::IDENTITY,
            scale: 1.0,
            triangles: Vec::new(),
            local,
            materials,
            material_map,
            smooth_shading,
        };
        this.bake();
        this
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    pub fn scale(&self) -> Scalar {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.bake();
    }

    pub fn set_rotation(&mut self, rotation: Mat3) {
        self.rotation = rotation;
        self.bake();
    }

    pub fn set_scale(&mut self, scale: Scalar) {
        self.scale = scale;
        self.bake();
    }

    pub fn set_pose(&mut self, position: Vec3, rotation: Mat3) {
        self.position = position;
        self.rotation = rotation;
        self.bake();
    }

    /// Resolve the material palette at a shading UV.
    pub fn material(&self, u: Scalar, v: Scalar) -> &Material {
        let index = self.material_map.index(u, v).min(self.materials.len() - 1);
        &self.materials[index]
    }

    /// Rewrite world-space vertex data from the retained local geometry:
    /// vertices get scale, rotation and translation; vertex normals the
    /// rotation only; face normals are re-derived.
    fn bake(&mut self) {
        self.triangles = self
            .local
            .iter()
            .map(|tri| {
                let vertices = tri
                    .vertices
                    .map(|p| self.rotation * (self.scale * p) + self.position);
                let normals = tri.normals.map(|n| self.rotation * n);
                Triangle {
                    vertices,
                    normals,
                    uvs: tri.uvs,
                    colors: tri.colors,
                    normal: face_normal(&vertices),
                    surface: tri.surface,
                }
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use crate::math::mat3_from_rows;

    use super::*;

    fn quad() -> Vec<Triangle> {
        vec![
            Triangle::flat([
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ]),
            Triangle::flat([
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ]),
        ]
    }

    fn surface() -> Surface {
        Surface::from_local_triangles(
            quad(),
            vec![Arc::new(Material::Lambertian {
                albedo: crate::material::ColorMap::Uniform(Rgb::WHITE),
            })],
            IndexMap::Constant(0),
            false,
        )
    }

    #[test]
    fn set_position_is_idempotent() {
        let mut s = surface();
        s.set_position(Vec3::new(3.0, 0.0, 0.0));
        let first = s.triangles[0].vertices;
        s.set_position(Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(s.triangles[0].vertices, first);
        assert_eq!(first[0], Vec3::new(2.0, -1.0, 0.0));
    }

    #[test]
    fn rotation_rebakes_normals() {
        let mut s = surface();
        // -90 degrees about X: +Z normals become +Y.
        s.set_rotation(mat3_from_rows(Vec3::X, Vec3::Z, Vec3::NEG_Y));
        assert!((s.triangles[0].normal - Vec3::Y).length() < 1e-5);
        assert!((s.triangles[0].normals[0] - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn scale_is_applied_before_translation() {
        let mut s = surface();
        s.set_position(Vec3::new(0.0, 0.0, -5.0));
        s.set_scale(2.0);
        assert_eq!(s.triangles[0].vertices[0], Vec3::new(-2.0, -2.0, -5.0));
    }

    #[test]
    fn palette_lookup_clamps_to_last_material() {
        let mut s = surface();
        s.material_map = IndexMap::Constant(7);
        // One material in the palette: index 7 still resolves.
        let _ = s.material(0.5, 0.5);
    }
}
