//! Fixed-grid sprite atlas packing.

use crate::error::{ExporterError, Result};
use crate::resource_pack::texture::{encode_png, load_texture_from_bytes};
use image::{imageops, RgbaImage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 64;

/// A named, still encoded image to place in the atlas.
#[derive(Debug, Clone)]
pub struct SpriteImage {
    pub name: String,
    /// PNG bytes.
    pub data: Vec<u8>,
}

impl SpriteImage {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Placement of one sprite in the atlas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Layout description written next to the atlas image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteAtlasManifest {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub cols: u32,
    pub rows: u32,
    pub sprites: BTreeMap<String, SpriteRegion>,
}

/// A packed atlas image and its manifest.
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    pub image: RgbaImage,
    pub manifest: SpriteAtlasManifest,
}

impl SpriteAtlas {
    /// Encode the atlas image as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
            .map_err(|e| ExporterError::AtlasBuild(format!("Failed to encode PNG: {}", e)))
    }

    /// Pretty-printed manifest JSON.
    pub fn manifest_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.manifest)?)
    }

    pub fn region(&self, name: &str) -> Option<&SpriteRegion> {
        self.manifest.sprites.get(name)
    }
}

/// Grid dimensions for `count` sprites: `(cols, rows)`.
pub fn grid_size(count: usize) -> (u32, u32) {
    if count == 0 {
        return (0, 0);
    }
    let cols = (count as f64).sqrt().ceil() as u32;
    let rows = (count as u32 + cols - 1) / cols;
    (cols, rows)
}

/// Pack images into a square-ish grid of `tile_size` tiles, row-major in input order.
///
/// Every image is scaled to exactly one tile with nearest-neighbour sampling.
/// An image that fails to decode keeps its slot empty and gets no manifest
/// entry.
pub fn pack_sprites(images: &[SpriteImage], tile_size: u32) -> Result<SpriteAtlas> {
    if images.is_empty() {
        return Err(ExporterError::AtlasBuild("No sprites to pack".to_string()));
    }
    if tile_size == 0 {
        return Err(ExporterError::AtlasBuild("Tile size must be positive".to_string()));
    }

    let (cols, rows) = grid_size(images.len());
    let width = cols * tile_size;
    let height = rows * tile_size;
    let mut atlas = RgbaImage::new(width, height);
    let mut sprites = BTreeMap::new();

    for (i, sprite) in images.iter().enumerate() {
        let col = i as u32 % cols;
        let row = i as u32 / cols;
        let x = col * tile_size;
        let y = row * tile_size;

        let decoded = match load_texture_from_bytes(&sprite.data) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::error!("Failed to render {}: {}", sprite.name, e);
                continue;
            }
        };

        let tile = imageops::resize(&decoded, tile_size, tile_size, imageops::FilterType::Nearest);
        imageops::replace(&mut atlas, &tile, i64::from(x), i64::from(y));

        sprites.insert(
            sprite.name.clone(),
            SpriteRegion {
                x,
                y,
                width: tile_size,
                height: tile_size,
            },
        );
    }

    tracing::debug!(
        "Packed {} of {} sprites into {}x{} atlas",
        sprites.len(),
        images.len(),
        width,
        height
    );

    Ok(SpriteAtlas {
        image: atlas,
        manifest: SpriteAtlasManifest {
            width,
            height,
            tile_size,
            cols,
            rows,
            sprites,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sprite(name: &str, width: u32, height: u32, color: [u8; 4]) -> SpriteImage {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        SpriteImage::new(name, encode_png(&img).unwrap())
    }

    #[test]
    fn test_grid_size() {
        assert_eq!(grid_size(1), (1, 1));
        assert_eq!(grid_size(2), (2, 1));
        assert_eq!(grid_size(4), (2, 2));
        assert_eq!(grid_size(5), (3, 2));
        assert_eq!(grid_size(10), (4, 3));
    }

    #[test]
    fn test_five_sprites_layout() {
        let images: Vec<SpriteImage> = (0..5)
            .map(|i| sprite(&format!("s{}", i), 16, 16, [i as u8 * 40, 0, 0, 255]))
            .collect();

        let atlas = pack_sprites(&images, DEFAULT_TILE_SIZE).unwrap();
        let manifest = &atlas.manifest;
        assert_eq!((manifest.cols, manifest.rows), (3, 2));
        assert_eq!((manifest.width, manifest.height), (192, 128));
        assert_eq!(atlas.image.dimensions(), (192, 128));
        assert_eq!(
            atlas.region("s0"),
            Some(&SpriteRegion { x: 0, y: 0, width: 64, height: 64 })
        );
        assert_eq!(atlas.region("s3").map(|r| (r.x, r.y)), Some((0, 64)));
        assert_eq!(atlas.region("s4").map(|r| (r.x, r.y)), Some((64, 64)));

        // Nearest-neighbour scale fills the whole tile with the source colour
        assert_eq!(*atlas.image.get_pixel(64 + 63, 63), Rgba([40, 0, 0, 255]));
        // The unused sixth slot stays transparent
        assert_eq!(atlas.image.get_pixel(150, 100)[3], 0);
    }

    #[test]
    fn test_undecodable_sprite_keeps_slot() {
        let images = vec![
            sprite("a", 8, 8, [255, 0, 0, 255]),
            SpriteImage::new("broken", b"not a png".to_vec()),
            sprite("c", 32, 16, [0, 0, 255, 255]),
        ];

        let atlas = pack_sprites(&images, 16).unwrap();
        assert_eq!(atlas.manifest.sprites.len(), 2);
        assert!(atlas.region("broken").is_none());
        assert_eq!(atlas.region("c").map(|r| (r.x, r.y)), Some((0, 16)));
        assert_eq!(atlas.image.get_pixel(16, 0)[3], 0);
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(matches!(
            pack_sprites(&[], DEFAULT_TILE_SIZE),
            Err(ExporterError::AtlasBuild(_))
        ));
    }

    #[test]
    fn test_manifest_json_shape() {
        let atlas = pack_sprites(&[sprite("block:stone", 16, 16, [1, 1, 1, 255])], 64).unwrap();
        let json: serde_json::Value = serde_json::from_str(&atlas.manifest_json().unwrap()).unwrap();
        assert_eq!(json["tileSize"], 64);
        assert_eq!(json["cols"], 1);
        assert_eq!(json["sprites"]["block:stone"]["width"], 64);

        let png = atlas.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
