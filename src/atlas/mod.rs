//! Sprite atlas packing.
//!
//! Combines rendered sprites into one fixed-grid image plus a JSON manifest
//! of where each sprite landed.

mod builder;

pub use builder::{
    grid_size, pack_sprites, SpriteAtlas, SpriteAtlasManifest, SpriteImage, SpriteRegion,
    DEFAULT_TILE_SIZE,
};
