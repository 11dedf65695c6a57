//! The alpha map that shapes each point sprite.
//!
//! The fragment shader samples the map's green channel as the point's
//! opacity. A map can be loaded from a PNG/JPEG file or generated
//! procedurally as a soft disc.

use std::path::Path;

use crate::error::TextureError;

/// Side length of the procedural disc.
pub const DEFAULT_ALPHA_MAP_SIZE: u32 = 64;

/// RGBA8 pixel data for the point sprite alpha map.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMap {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl AlphaMap {
    /// Create an alpha map from raw RGBA data.
    ///
    /// Returns `None` if `data` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self { data, width, height })
    }

    /// Load an alpha map from an image file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path.as_ref())?;
        let img = image::load_from_memory(&bytes)?.into_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            data: img.into_raw(),
            width,
            height,
        })
    }

    /// Load from `path` if given, falling back to [`AlphaMap::soft_disc`]
    /// when there is no path or the file can't be used.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => match Self::from_file(path) {
                Ok(map) => {
                    log::info!("Loaded alpha map {} ({}x{})", path.display(), map.width, map.height);
                    map
                }
                Err(e) => {
                    log::warn!("{} ({}); using procedural alpha map", e, path.display());
                    Self::soft_disc(DEFAULT_ALPHA_MAP_SIZE)
                }
            },
            None => Self::soft_disc(DEFAULT_ALPHA_MAP_SIZE),
        }
    }

    /// White disc whose opacity falls off smoothly from the center to the
    /// edge. Corners are fully transparent.
    pub fn soft_disc(size: u32) -> Self {
        let size = size.max(1);
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        let half = size as f32 * 0.5;
        for y in 0..size {
            for x in 0..size {
                let dx = (x as f32 + 0.5 - half) / half;
                let dy = (y as f32 + 0.5 - half) / half;
                let d = (dx * dx + dy * dy).sqrt();
                let v = falloff(d);
                data.extend_from_slice(&[v, v, v, v]);
            }
        }
        Self {
            data,
            width: size,
            height: size,
        }
    }

    /// Green channel at `(x, y)`, the value the shader uses as alpha.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4 + 1) as usize;
        self.data.get(i).copied()
    }
}

impl Default for AlphaMap {
    fn default() -> Self {
        Self::soft_disc(DEFAULT_ALPHA_MAP_SIZE)
    }
}

/// Smoothstep from 1 at the center down to 0 at the rim.
fn falloff(d: f32) -> u8 {
    let t = (1.0 - d).clamp(0.0, 1.0);
    let s = t * t * (3.0 - 2.0 * t);
    (s * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_disc_shape() {
        let map = AlphaMap::soft_disc(32);
        assert_eq!(map.data.len(), 32 * 32 * 4);
        let center = map.alpha_at(16, 16).unwrap();
        let mid = map.alpha_at(24, 16).unwrap();
        assert!(center > 240);
        assert!(mid < center);
        assert_eq!(map.alpha_at(0, 0), Some(0));
        assert_eq!(map.alpha_at(32, 0), None);
    }

    #[test]
    fn test_from_rgba_checks_size() {
        assert!(AlphaMap::from_rgba(vec![0; 16], 2, 2).is_some());
        assert!(AlphaMap::from_rgba(vec![0; 15], 2, 2).is_none());
        assert!(AlphaMap::from_rgba(Vec::new(), 0, 0).is_none());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AlphaMap::from_file("does/not/exist.png").unwrap_err();
        assert!(matches!(err, TextureError::Io(_)));
    }

    #[test]
    fn test_missing_file_falls_back_to_disc() {
        let map = AlphaMap::load_or_default(Some(Path::new("does/not/exist.png")));
        assert_eq!(map, AlphaMap::soft_disc(DEFAULT_ALPHA_MAP_SIZE));
    }

    #[test]
    fn test_load_png_from_disk() {
        let path = std::env::temp_dir().join("galaxy_alpha_map_test.png");
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 200, 30, 255]));
        img.save(&path).unwrap();

        let map = AlphaMap::from_file(&path).unwrap();
        assert_eq!((map.width, map.height), (4, 2));
        assert_eq!(map.alpha_at(3, 1), Some(200));
        let _ = std::fs::remove_file(&path);
    }
}
