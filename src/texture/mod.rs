//! Face textures, default UVs and animated texture playback.

pub mod animation;
pub mod cache;
pub mod face;
pub mod uv;

pub use animation::AnimatedTexture;
pub use cache::TextureCache;
pub use face::build_face_texture;
pub use uv::{default_uv, face_uv, Uv, FULL_UV};
