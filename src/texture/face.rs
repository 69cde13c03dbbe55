//! Static per-face texture construction.

use super::uv::Uv;
use crate::types::Direction;
use image::{imageops, Rgba, RgbaImage};

/// Build the texture for one face: crop to the UV rectangle, rotate about
/// the centre, then mirror according to the UV corner order.
///
/// UV units are 1/16 of the texture width, so a 32px texture maps 1 unit to
/// 2px. `down` faces have their horizontal mirror inverted.
pub fn build_face_texture(
    source: &RgbaImage,
    uv: Uv,
    rotation: f32,
    direction: Direction,
) -> RgbaImage {
    let mut face = crop_uv(source, uv);

    if rotation.rem_euclid(360.0) != 0.0 {
        face = rotate_about_center(&face, rotation);
    }

    let mut flip_x = uv[0] > uv[2];
    let flip_y = uv[1] > uv[3];
    if direction == Direction::Down {
        flip_x = !flip_x;
    }

    if flip_x {
        imageops::flip_horizontal_in_place(&mut face);
    }
    if flip_y {
        imageops::flip_vertical_in_place(&mut face);
    }

    face
}

/// Crop the normalised UV rectangle out of `source`. Never returns an empty image.
pub fn crop_uv(source: &RgbaImage, uv: Uv) -> RgbaImage {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return RgbaImage::new(1, 1);
    }

    let scale = width as f32 / 16.0;
    let u0 = uv[0].min(uv[2]) * scale;
    let v0 = uv[1].min(uv[3]) * scale;
    let du = (uv[2] - uv[0]).abs() * scale;
    let dv = (uv[3] - uv[1]).abs() * scale;

    let x = (u0.floor().max(0.0) as u32).min(width - 1);
    let y = (v0.floor().max(0.0) as u32).min(height - 1);
    let w = (du.round() as u32).clamp(1, width - x);
    let h = (dv.round() as u32).clamp(1, height - y);

    imageops::crop_imm(source, x, y, w, h).to_image()
}

/// Rotate an image clockwise by `degrees` about its centre, keeping its size.
///
/// Nearest-neighbour sampling; pixels that rotate in from outside the source
/// are transparent.
pub fn rotate_about_center(image: &RgbaImage, degrees: f32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let (sin, cos) = degrees.to_radians().sin_cos();
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;

    RgbaImage::from_fn(width, height, |x, y| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        // Inverse rotation maps each destination pixel back to its source.
        let sx = cx + dx * cos + dy * sin;
        let sy = cy - dx * sin + dy * cos;
        if sx < 0.0 || sy < 0.0 {
            return Rgba([0, 0, 0, 0]);
        }
        let (sx, sy) = (sx.floor() as u32, sy.floor() as u32);
        if sx < width && sy < height {
            *image.get_pixel(sx, sy)
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::uv::FULL_UV;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    /// 2x2 image: red green / blue white.
    fn quad() -> RgbaImage {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, RED);
        img.put_pixel(1, 0, GREEN);
        img.put_pixel(0, 1, BLUE);
        img.put_pixel(1, 1, WHITE);
        img
    }

    #[test]
    fn test_full_uv_is_identity() {
        let img = quad();
        assert_eq!(build_face_texture(&img, FULL_UV, 0.0, Direction::North), img);
    }

    #[test]
    fn test_crop_scales_with_texture_width() {
        // 32px texture: one UV unit is two pixels
        let mut img = RgbaImage::new(32, 32);
        img.put_pixel(16, 16, RED);
        let face = crop_uv(&img, [8.0, 8.0, 16.0, 16.0]);
        assert_eq!(face.dimensions(), (16, 16));
        assert_eq!(*face.get_pixel(0, 0), RED);
    }

    #[test]
    fn test_crop_degenerate_uv() {
        let img = quad();
        let face = crop_uv(&img, [4.0, 4.0, 4.0, 4.0]);
        assert_eq!(face.dimensions(), (1, 1));
    }

    #[test]
    fn test_reversed_u_mirrors() {
        let img = quad();
        let face = build_face_texture(&img, [16.0, 0.0, 0.0, 16.0], 0.0, Direction::North);
        assert_eq!(*face.get_pixel(0, 0), GREEN);
        assert_eq!(*face.get_pixel(1, 1), BLUE);
    }

    #[test]
    fn test_down_face_inverts_horizontal_flip() {
        let img = quad();
        let face = build_face_texture(&img, FULL_UV, 0.0, Direction::Down);
        assert_eq!(*face.get_pixel(0, 0), GREEN);

        let unflipped = build_face_texture(&img, [16.0, 0.0, 0.0, 16.0], 0.0, Direction::Down);
        assert_eq!(unflipped, img);
    }

    #[test]
    fn test_reversed_v_mirrors_vertically() {
        let img = quad();
        let face = build_face_texture(&img, [0.0, 16.0, 16.0, 0.0], 0.0, Direction::Down);
        // down: horizontal flip from the inversion, vertical from the UVs
        assert_eq!(*face.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_quarter_turn_is_clockwise() {
        let face = rotate_about_center(&quad(), 90.0);
        assert_eq!(*face.get_pixel(1, 0), RED);
        assert_eq!(*face.get_pixel(1, 1), GREEN);
        assert_eq!(*face.get_pixel(0, 0), BLUE);
        assert_eq!(*face.get_pixel(0, 1), WHITE);
    }

    #[test]
    fn test_full_turn_is_skipped() {
        let img = quad();
        assert_eq!(build_face_texture(&img, FULL_UV, 360.0, Direction::Up), img);
    }

    #[test]
    fn test_odd_angle_keeps_size() {
        let img = RgbaImage::from_pixel(4, 4, RED);
        let face = rotate_about_center(&img, 45.0);
        assert_eq!(face.dimensions(), (4, 4));
        // Corners rotate in from outside the source
        assert_eq!(face.get_pixel(0, 0)[3], 0);
        assert_eq!(*face.get_pixel(2, 2), RED);
    }
}
