use crate::{
    color::Rgb,
    math::{bounds::Bounds, Mat3, Scalar, Vec2, Vec3},
    ray::Ray,
};

/// A world-space triangle with fully baked vertex data.
///
/// Vertex positions, normals, UVs and colors always reflect the current
/// pose of the owning [`crate::surface::Surface`]; pose changes rewrite
/// them eagerly. `surface` is the back-reference into the scene's surface
/// list and survives the copy into the intersection index.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
    pub normals: [Vec3; 3],
    pub uvs: [Vec2; 3],
    pub colors: [Rgb; 3],
    /// Geometric (face) normal, unit length.
    pub normal: Vec3,
    pub surface: u32,
}

impl Triangle {
    pub fn new(vertices: [Vec3; 3], normals: [Vec3; 3], uvs: [Vec2; 3], colors: [Rgb; 3]) -> Self {
        Self {
            vertices,
            normals,
            uvs,
            colors,
            normal: face_normal(&vertices),
            surface: 0,
        }
    }

    /// Flat-shaded triangle: vertex normals are the face normal, UVs zero,
    /// colors white.
    pub fn flat(vertices: [Vec3; 3]) -> Self {
        let normal = face_normal(&vertices);
        Self {
            vertices,
            normals: [normal; 3],
            uvs: [Vec2::ZERO; 3],
            colors: [Rgb::WHITE; 3],
            normal,
            surface: 0,
        }
    }

    /// Möller–Trumbore through a 3x3 solve: with `[e0, e1, d]` as columns,
    /// solving for `(u, v, t)` against `v2 - origin` expresses the hit as
    /// `u*v0 + v*v1 + (1-u-v)*v2`.
    ///
    /// Returns `(t, u, v)` when the hit lies inside the triangle and the
    /// ray's valid interval.
    pub fn intersect(&self, ray: &Ray) -> Option<(Scalar, Scalar, Scalar)> {
        let [v0, v1, v2] = self.vertices;
        let m = Mat3::from_cols(v2 - v0, v2 - v1, ray.direction);
        if m.determinant() == 0.0 {
            return None;
        }

        let uvt = m.inverse() * (v2 - ray.origin);
        let (u, v, t) = (uvt.x, uvt.y, uvt.z);
        let w = 1.0 - u - v;
        if u >= 0.0 && v >= 0.0 && w >= 0.0 && ray.range().contains(&t) {
            Some((t, u, v))
        } else {
            None
        }
    }

    /// Barycentric interpolation convention: `u` weights vertex 0, `v`
    /// weights vertex 1, `1-u-v` weights vertex 2 — so `u = v = 0` lands on
    /// the third vertex.
    pub fn point_at(&self, u: Scalar, v: Scalar) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        u * v0 + v * v1 + (1.0 - u - v) * v2
    }

    pub fn normal_at(&self, u: Scalar, v: Scalar) -> Vec3 {
        let [n0, n1, n2] = self.normals;
        (u * n0 + v * n1 + (1.0 - u - v) * n2).normalize_or_zero()
    }

    pub fn uv_at(&self, u: Scalar, v: Scalar) -> Vec2 {
        let [t0, t1, t2] = self.uvs;
        u * t0 + v * t1 + (1.0 - u - v) * t2
    }

    pub fn color_at(&self, u: Scalar, v: Scalar) -> Rgb {
        let [c0, c1, c2] = self.colors;
        u * c0 + v * c1 + (1.0 - u - v) * c2
    }

    /// Interpolated vertex normal under smooth shading, face normal
    /// otherwise.
    pub fn shading_normal(&self, u: Scalar, v: Scalar, smooth: bool) -> Vec3 {
        if smooth {
            self.normal_at(u, v)
        } else {
            self.normal
        }
    }

    pub fn bounding_box(&self) -> Bounds {
        Bounds::from_points(&self.vertices)
    }
}

pub fn face_normal(vertices: &[Vec3; 3]) -> Vec3 {
    (vertices[1] - vertices[0])
        .cross(vertices[2] - vertices[0])
        .normalize_or_zero()
}
