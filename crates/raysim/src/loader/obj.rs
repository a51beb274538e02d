use std::path::Path;

use anyhow::{bail, Context};

use crate::{
    color::Rgb,
    math::{Scalar, Vec2, Vec3},
    surface::MeshData,
};

/// Load a Wavefront OBJ into local-frame mesh data, concatenating all of
/// the file's models into one triangle set.
///
/// Anything but `.obj` is refused; the caller treats that as fatal for the
/// run. Normals, UVs and vertex colors are carried over when the file has
/// them and left empty otherwise.
pub fn load_obj<P: AsRef<Path>>(path: P) -> anyhow::Result<MeshData> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if extension != "obj" {
        bail!(
            "unsupported model format {:?} for {}: only .obj is supported",
            extension,
            path.display()
        );
    }

    let mut options = tobj::GPU_LOAD_OPTIONS;
    options.single_index = true;
    let (models, _materials) = tobj::load_obj(path, &options)
        .with_context(|| format!("loading model {}", path.display()))?;

    let mut mesh = MeshData::default();
    for model in models {
        let m = model.mesh;
        let base = mesh.positions.len() as u32;

        mesh.positions.extend(
            m.positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0] as Scalar, p[1] as Scalar, p[2] as Scalar)),
        );
        mesh.normals.extend(
            m.normals
                .chunks_exact(3)
                .map(|n| Vec3::new(n[0] as Scalar, n[1] as Scalar, n[2] as Scalar)),
        );
        mesh.uvs.extend(
            m.texcoords
                .chunks_exact(2)
                .map(|t| Vec2::new(t[0] as Scalar, t[1] as Scalar)),
        );
        mesh.colors.extend(
            m.vertex_color
                .chunks_exact(3)
                .map(|c| Rgb::from_array([c[0] as Scalar, c[1] as Scalar, c[2] as Scalar])),
        );
        mesh.indices.extend(
            m.indices
                .chunks_exact(3)
                .map(|i| [base + i[0], base + i[1], base + i[2]]),
        );

        log::debug!(
            "model {:?}: {} vertices, {} faces",
            model.name,
            m.positions.len() / 3,
            m.indices.len() / 3
        );
    }

    // Mixed files where only some models carry an attribute would misalign
    // the shared index; fall back to the defaults instead.
    if mesh.normals.len() != mesh.positions.len() {
        mesh.normals.clear();
    }
    if mesh.uvs.len() != mesh.positions.len() {
        mesh.uvs.clear();
    }
    if mesh.colors.len() != mesh.positions.len() {
        mesh.colors.clear();
    }

    Ok(mesh)
}
