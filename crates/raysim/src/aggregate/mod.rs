//! The intersection service: a spatial index built once over the scene's
//! triangles, then queried read-only from any number of workers.
//!
//! Consumers only rely on the [`Intersector`] contract; the BVH behind it
//! is deliberately simple (top-down median split) and is not part of the
//! rendering core proper.

use crate::{
    math::{bounds::Bounds, Scalar},
    ray::Ray,
    shape::Triangle,
};

/// Closest-hit record: the primitive and where on it the ray landed.
/// `u` weights vertex 0, `v` vertex 1, `1-u-v` vertex 2.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub prim: u32,
    pub t: Scalar,
    pub u: Scalar,
    pub v: Scalar,
}

pub trait Intersector: Sync + Send {
    /// Nearest intersection within the ray's valid interval, if any.
    fn closest_hit(&self, ray: &Ray) -> Option<Hit>;

    /// Whether anything at all intersects within the ray's valid interval.
    /// Used for shadow tests; may return on the first hit found.
    fn any_hit(&self, ray: &Ray) -> bool;
}

const LEAF_SIZE: usize = 4;

enum Node {
    Branch {
        bounds: Bounds,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        bounds: Bounds,
        /// Range into the permuted primitive order.
        first: u32,
        count: u32,
    },
}

/// Bounding volume hierarchy over an owned copy of the scene triangles.
///
/// Owning the copy keeps the index free of references back into the
/// surfaces; the only link that survives is each triangle's `surface`
/// index.
pub struct Bvh {
    triangles: Vec<Triangle>,
    order: Vec<u32>,
    root: Option<Node>,
}

impl Bvh {
    /// An empty triangle set is a valid degenerate scene: every query
    /// misses.
    pub fn build(triangles: Vec<Triangle>) -> Self {
        let mut order: Vec<u32> = (0..triangles.len() as u32).collect();
        let root = if triangles.is_empty() {
            None
        } else {
            Some(build_node(&triangles, &mut order, 0))
        };
        Self {
            triangles,
            order,
            root,
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    fn leaf_closest(&self, first: u32, count: u32, ray: &Ray, best: &mut Option<Hit>) {
        for &prim in &self.order[first as usize..(first + count) as usize] {
            let mut clipped = *ray;
            if let Some(hit) = best {
                clipped.bounds.1 = hit.t;
            }
            if let Some((t, u, v)) = self.triangles[prim as usize].intersect(&clipped) {
                *best = Some(Hit { prim, t, u, v });
            }
        }
    }

    fn node_closest(&self, node: &Node, ray: &Ray, best: &mut Option<Hit>) {
        let t_max = best.map_or(ray.bounds.1, |hit| hit.t);
        match node {
            Node::Branch {
                bounds,
                left,
                right,
            } => {
                if bounds.hit(ray, ray.bounds.0, t_max) {
                    self.node_closest(left, ray, best);
                    self.node_closest(right, ray, best);
                }
            }
            Node::Leaf {
                bounds,
                first,
                count,
            } => {
                if bounds.hit(ray, ray.bounds.0, t_max) {
                    self.leaf_closest(*first, *count, ray, best);
                }
            }
        }
    }

    fn node_any(&self, node: &Node, ray: &Ray) -> bool {
        match node {
            Node::Branch {
                bounds,
                left,
                right,
            } => {
                bounds.hit(ray, ray.bounds.0, ray.bounds.1)
                    && (self.node_any(left, ray) || self.node_any(right, ray))
            }
            Node::Leaf {
                bounds,
                first,
                count,
            } => {
                bounds.hit(ray, ray.bounds.0, ray.bounds.1)
                    && self.order[*first as usize..(*first + *count) as usize]
                        .iter()
                        .any(|&prim| self.triangles[prim as usize].intersect(ray).is_some())
            }
        }
    }
}

impl Intersector for Bvh {
    fn closest_hit(&self, ray: &Ray) -> Option<Hit> {
        let mut best = None;
        if let Some(root) = &self.root {
            self.node_closest(root, ray, &mut best);
        }
        best
    }

    fn any_hit(&self, ray: &Ray) -> bool {
        self.root
            .as_ref()
            .is_some_and(|root| self.node_any(root, ray))
    }
}

fn bounds_of(triangles: &[Triangle], order: &[u32]) -> Bounds {
    order.iter().fold(Bounds::EMPTY, |b, &i| {
        b.union(triangles[i as usize].bounding_box())
    })
}

fn build_node(triangles: &[Triangle], order: &mut [u32], first: u32) -> Node {
    let bounds = bounds_of(triangles, order);
    if order.len() <= LEAF_SIZE {
        return Node::Leaf {
            bounds,
            first,
            count: order.len() as u32,
        };
    }

    // Median split along the widest axis of the node bounds.
    let diag = bounds.diag();
    let axis = if diag.x >= diag.y && diag.x >= diag.z {
        0
    } else if diag.y >= diag.z {
        1
    } else {
        2
    };
    order.sort_by(|&a, &b| {
        let ca = triangles[a as usize].bounding_box().centroid()[axis as usize];
        let cb = triangles[b as usize].bounding_box().centroid()[axis as usize];
        ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let half = order.len() / 2;
    let (front, back) = order.split_at_mut(half);
    Node::Branch {
        bounds,
        left: Box::new(build_node(triangles, front, first)),
        right: Box::new(build_node(triangles, back, first + half as u32)),
    }
}
