//! Offline CPU renderer and ranging-sensor simulator.
//!
//! Scenes are triangle soups owned by [`surface::Surface`]s; a
//! [`camera::Camera`] or a [`lidar::Lidar`] turns them into images or range
//! measurements through the passes in [`renderer`] and [`lidar`]. All ray
//! queries go through the [`aggregate::Intersector`] contract, served by the
//! in-repo BVH.

pub mod aggregate;
pub mod camera;
pub mod color;
pub mod lidar;
pub mod light;
pub mod loader;
pub mod material;
pub mod math;
pub mod ray;
pub mod renderer;
pub mod scene;
pub mod shape;
pub mod surface;
pub mod utils;

pub use rand_xoshiro::Xoshiro256StarStar as Rng;

/// Deterministic seed for one unit of parallel work (a pixel, a batch entry).
///
/// Hashing the base seed together with the unit coordinates gives every
/// worker its own independent stream while keeping the whole pass
/// reproducible from a single `u64`.
#[derive(Debug, Copy, Clone, Hash)]
pub struct Seed {
    pub seed: u64,
    pub x: u32,
    pub y: u32,
}

impl Seed {
    pub fn into_rng(self) -> Rng {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        std::hash::Hash::hash(&self, &mut hasher);
        <Rng as rand::SeedableRng>::seed_from_u64(std::hash::Hasher::finish(&hasher))
    }
}
