//! Shared types used throughout the library.

mod direction;
mod transform;
pub mod vector;

pub use direction::{Axis, Direction};
pub use transform::ElementRotation;
pub use vector::Vec3;

/// Strip the default `minecraft:` namespace from a resource id.
///
/// "minecraft:block/stone" -> "block/stone"; other namespaces are kept.
pub fn strip_namespace(resource_location: &str) -> &str {
    resource_location
        .strip_prefix("minecraft:")
        .unwrap_or(resource_location)
}

/// Final path segment of an asset id with its extension removed.
///
/// "models/block/stone.json" -> "stone"
pub fn asset_name(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    }
}
