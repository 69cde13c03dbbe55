//! Per-face material selection.

use crate::resolver::{decode_texture_ref, placeholder_for, texture_path, ResolvedModel};
use crate::resolver::texture_ref::MISSING_TEXTURE_COLOR;
use crate::resource_pack::ModelElement;
use crate::texture::{build_face_texture, face_uv, TextureCache};
use crate::types::Direction;
use image::RgbaImage;

/// Texels with alpha below this are discarded.
pub const ALPHA_TEST: f32 = 0.1;

/// Pixels a textured material samples from.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    /// A face texture built for this face alone.
    Static(RgbaImage),
    /// The shared frame buffer of an animated texture, by texture path.
    Animated(String),
}

/// How one side of an element is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Nothing is drawn.
    Invisible,
    /// Flat colour, used when the texture could not be found.
    Placeholder { color: u32, opacity: f32 },
    /// Alpha-tested texture, lit unless `shaded` is false.
    Textured {
        source: TextureSource,
        shaded: bool,
        alpha_test: f32,
    },
}

impl Material {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Material::Invisible)
    }

    /// Flat colour as normalised RGB.
    pub fn color_rgb(color: u32) -> [f32; 3] {
        [
            ((color >> 16) & 0xff) as f32 / 255.0,
            ((color >> 8) & 0xff) as f32 / 255.0,
            (color & 0xff) as f32 / 255.0,
        ]
    }
}

/// Choose the material for one side of an element.
///
/// In priority order: no face is invisible, an unresolved reference is a
/// placeholder, a texture missing from the cache is gray, and anything else
/// is textured.
pub fn select_material(
    element: &ModelElement,
    direction: Direction,
    model: &ResolvedModel,
    cache: &TextureCache,
) -> Material {
    let Some(face) = element.face(direction) else {
        return Material::Invisible;
    };

    let reference = match decode_texture_ref(&face.texture, &model.textures) {
        Ok(Some(reference)) => reference,
        Ok(None) => {
            tracing::debug!("Texture reference {} not found in model textures", face.texture);
            return placeholder(&face.texture);
        }
        Err(e) => {
            tracing::warn!("{}", e);
            return placeholder(&face.texture);
        }
    };

    let path = texture_path(&reference);
    let Some(image) = cache.image(path).filter(|image| image.width() > 0) else {
        return Material::Placeholder {
            color: MISSING_TEXTURE_COLOR,
            opacity: 1.0,
        };
    };

    let source = if cache.is_animated(path) {
        TextureSource::Animated(path.to_string())
    } else {
        let uv = face_uv(face.uv, direction, element.from, element.to);
        TextureSource::Static(build_face_texture(image, uv, face.rotation, direction))
    };

    Material::Textured {
        source,
        shaded: element.shade,
        alpha_test: ALPHA_TEST,
    }
}

fn placeholder(reference: &str) -> Material {
    let (color, opacity) = placeholder_for(reference);
    Material::Placeholder { color, opacity }
}
