//! Frame-strip animated textures.

use crate::resource_pack::AnimationMeta;
use image::{imageops, RgbaImage};
use std::time::Duration;

/// Playback state of one animated texture.
///
/// The source image is a vertical strip of frames. `buffer` always holds the
/// frame currently visible; `dirty` is raised whenever it is redrawn so the
/// renderer knows to re-upload it.
#[derive(Debug, Clone)]
pub struct AnimatedTexture {
    meta: AnimationMeta,
    source: RgbaImage,
    buffer: RgbaImage,
    frame_height: u32,
    total_frames: u32,
    /// Position in the playback order (explicit frame list or strip order).
    current_frame: usize,
    elapsed: Duration,
    dirty: bool,
}

impl AnimatedTexture {
    /// Start an animation at its first frame. Returns None for a zero-width image.
    pub fn new(source: RgbaImage, meta: AnimationMeta) -> Option<Self> {
        let width = source.width();
        if width == 0 {
            return None;
        }

        let frame_height = meta
            .frame_height
            .filter(|h| *h > 0)
            .unwrap_or(width)
            .min(source.height().max(1));
        let total_frames = (source.height() / frame_height).max(1);

        let mut texture = Self {
            meta,
            source,
            buffer: RgbaImage::new(width, frame_height),
            frame_height,
            total_frames,
            current_frame: 0,
            elapsed: Duration::ZERO,
            dirty: true,
        };
        texture.draw_frame(0);
        Some(texture)
    }

    /// Add elapsed time and step through as many frames as it covers.
    ///
    /// Leftover time below one frame duration carries over to the next call.
    /// Returns the number of frames stepped.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        let frame_duration = self.meta.frame_duration();
        self.elapsed += delta;

        let mut steps = 0;
        while self.elapsed >= frame_duration {
            self.elapsed -= frame_duration;
            self.current_frame = (self.current_frame + 1) % self.cycle_len();
            steps += 1;
        }

        if steps > 0 {
            self.draw_frame(self.strip_index());
            self.dirty = true;
        }
        steps
    }

    /// Strip index shown at the current playback position.
    pub fn strip_index(&self) -> u32 {
        match self.meta.frame_list() {
            Some(frames) => frames[self.current_frame % frames.len()].index() % self.total_frames,
            None => self.current_frame as u32 % self.total_frames,
        }
    }

    fn cycle_len(&self) -> usize {
        self.meta
            .frame_list()
            .map(|frames| frames.len())
            .unwrap_or(self.total_frames as usize)
    }

    fn draw_frame(&mut self, strip_index: u32) {
        let y = strip_index * self.frame_height;
        let slice = imageops::crop_imm(&self.source, 0, y, self.source.width(), self.frame_height);
        self.buffer = slice.to_image();
    }

    /// The currently visible frame.
    pub fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    pub fn meta(&self) -> &AnimationMeta {
        &self.meta
    }
}
