use std::path::Path;

use anyhow::Context;

use crate::{color::Rgb, math::Scalar};

/// Decoded RGBA8 texture with nearest-texel lookup.
#[derive(Debug, Clone)]
pub struct ImageMap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageMap {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("decoding texture {}", path.display()))?
            .to_rgba8();
        let (width, height) = (image.width(), image.height());
        Ok(Self {
            width,
            height,
            pixels: image.into_raw(),
        })
    }

    /// Build from raw RGBA8 rows. `pixels.len()` must be `4 * width * height`.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(pixels.len(), 4 * (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn sample(&self, u: Scalar, v: Scalar) -> Rgb {
        let x = ((u * self.width as Scalar + 0.5) as u32).min(self.width - 1);
        let y = ((v * self.height as Scalar + 0.5) as u32).min(self.height - 1);
        let idx = (4 * (self.width * y + x)) as usize;

        Rgb::from_array([
            self.pixels[idx] as Scalar / 255.0,
            self.pixels[idx + 1] as Scalar / 255.0,
            self.pixels[idx + 2] as Scalar / 255.0,
        ])
    }
}

/// Spatially varying color parameter.
#[derive(Debug, Clone)]
pub enum ColorMap {
    Uniform(Rgb),
    Image(ImageMap),
}

impl ColorMap {
    pub fn color(&self, u: Scalar, v: Scalar) -> Rgb {
        match self {
            ColorMap::Uniform(c) => *c,
            ColorMap::Image(map) => map.sample(u, v),
        }
    }
}

/// Material selector: maps a shading UV to an index into the owning
/// surface's material palette, without any per-triangle storage.
#[derive(Debug, Clone)]
pub enum IndexMap {
    Constant(usize),
    /// Red channel scaled to `levels` material slots.
    Image { map: ImageMap, levels: usize },
}

impl IndexMap {
    pub fn index(&self, u: Scalar, v: Scalar) -> usize {
        match self {
            IndexMap::Constant(i) => *i,
            IndexMap::Image { map, levels } => {
                (map.sample(u, v).0[0] * *levels as Scalar + 0.5) as usize
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> ImageMap {
        // 2x2: black, white / white, black.
        #[rustfmt::skip]
        let pixels = vec![
            0, 0, 0, 255,       255, 255, 255, 255,
            255, 255, 255, 255, 0, 0, 0, 255,
        ];
        ImageMap::from_raw(2, 2, pixels)
    }

    #[test]
    fn nearest_texel_lookup() {
        let map = checker();
        assert_eq!(map.sample(0.0, 0.0), Rgb::BLACK);
        assert_eq!(map.sample(0.6, 0.0), Rgb::WHITE);
        assert_eq!(map.sample(0.0, 0.6), Rgb::WHITE);
        // Out-of-range coordinates clamp to the last texel.
        assert_eq!(map.sample(1.0, 1.0), Rgb::BLACK);
    }

    #[test]
    fn index_map_selects_materials() {
        assert_eq!(IndexMap::Constant(3).index(0.9, 0.1), 3);

        let by_image = IndexMap::Image {
            map: checker(),
            levels: 1,
        };
        assert_eq!(by_image.index(0.0, 0.0), 0);
        assert_eq!(by_image.index(0.6, 0.0), 1);
    }
}
