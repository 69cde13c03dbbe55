//! Texture image and animation metadata decoding.

use crate::error::{ExporterError, Result};
use image::{ImageEncoder, RgbaImage};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Length of one game tick in milliseconds.
pub const TICK_MS: u64 = 50;

/// Animation block of a `.png.mcmeta` document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationMeta {
    /// Blend between frames (parsed, not used for playback).
    #[serde(default)]
    pub interpolate: bool,
    /// Frame width in pixels.
    #[serde(default, rename = "width", skip_serializing_if = "Option::is_none")]
    pub frame_width: Option<u32>,
    /// Frame height in pixels. Defaults to the image width (square frames).
    #[serde(default, rename = "height", skip_serializing_if = "Option::is_none")]
    pub frame_height: Option<u32>,
    /// Ticks each frame stays visible (1 tick = 50ms).
    #[serde(default = "default_frametime")]
    pub frametime: u32,
    /// Explicit playback order. Sequential strip order when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<AnimationFrame>>,
}

fn default_frametime() -> u32 {
    1
}

/// One entry of an explicit frame list: a bare index or `{index, time}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimationFrame {
    Index(u32),
    Timed {
        index: u32,
        #[serde(default)]
        time: Option<u32>,
    },
}

impl AnimationFrame {
    /// Strip index this frame shows. The `time` field is ignored.
    pub fn index(&self) -> u32 {
        match self {
            AnimationFrame::Index(index) => *index,
            AnimationFrame::Timed { index, .. } => *index,
        }
    }
}

impl AnimationMeta {
    /// How long one frame stays visible (`frametime` ticks of 50ms).
    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.frametime.max(1)) * TICK_MS)
    }

    /// Explicit frame list, if one is present and non-empty.
    pub fn frame_list(&self) -> Option<&[AnimationFrame]> {
        self.frames
            .as_deref()
            .filter(|frames| !frames.is_empty())
    }
}

#[derive(Deserialize)]
struct McMeta {
    animation: Option<AnimationMeta>,
}

/// Parse the `animation` section of a `.png.mcmeta` document.
///
/// Returns None for malformed documents and documents without animation.
pub fn parse_mcmeta(contents: &str) -> Option<AnimationMeta> {
    match serde_json::from_str::<McMeta>(contents) {
        Ok(meta) => meta.animation,
        Err(e) => {
            tracing::debug!("Ignoring malformed mcmeta: {}", e);
            None
        }
    }
}

/// Decode a texture from PNG bytes into RGBA8.
pub fn load_texture_from_bytes(data: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(data)?;
    Ok(img.to_rgba8())
}

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let cursor = std::io::Cursor::new(&mut bytes);
    let encoder = image::codecs::png::PngEncoder::new(cursor);

    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| ExporterError::Export(format!("Failed to encode PNG: {}", e)))?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_parse_mcmeta_defaults() {
        let meta = parse_mcmeta(r#"{"animation": {}}"#).unwrap();
        assert_eq!(meta.frametime, 1);
        assert_eq!(meta.frame_height, None);
        assert!(meta.frame_list().is_none());
        assert_eq!(meta.frame_duration(), Duration::from_millis(50));
    }

    #[test]
    fn test_parse_mcmeta_frames() {
        let meta = parse_mcmeta(
            r#"{"animation": {"frametime": 2, "height": 16, "frames": [0, {"index": 3, "time": 7}, 1]}}"#,
        )
        .unwrap();
        assert_eq!(meta.frametime, 2);
        assert_eq!(meta.frame_height, Some(16));
        let frames: Vec<u32> = meta.frame_list().unwrap().iter().map(|f| f.index()).collect();
        assert_eq!(frames, vec![0, 3, 1]);
    }

    #[test]
    fn test_parse_mcmeta_not_animated() {
        assert!(parse_mcmeta(r#"{"texture": {"blur": true}}"#).is_none());
        assert!(parse_mcmeta("not json").is_none());
    }

    #[test]
    fn test_png_roundtrip() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 128]));

        let png = encode_png(&img).unwrap();
        let decoded = load_texture_from_bytes(&png).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_corrupt_image_is_error() {
        assert!(load_texture_from_bytes(b"definitely not a png").is_err());
    }
}
