//! Texture loading with a visible fallback
//!
//! A missing or corrupt image never produces a dangling texture handle: the
//! loader reports the failure and hands back a magenta/black checkerboard so
//! the affected surface is obvious on screen.

use macroquad::prelude::*;

const PLACEHOLDER_SIZE: u16 = 64;
const PLACEHOLDER_CELL: u16 = 8;

/// Magenta/black checkerboard used wherever a real texture failed to load
pub fn placeholder_texture() -> Texture2D {
    let texture = Texture2D::from_rgba8(
        PLACEHOLDER_SIZE,
        PLACEHOLDER_SIZE,
        &placeholder_pixels(PLACEHOLDER_SIZE, PLACEHOLDER_CELL),
    );
    texture.set_filter(FilterMode::Nearest);
    texture
}

fn placeholder_pixels(size: u16, cell: u16) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
    for y in 0..size {
        for x in 0..size {
            let odd = ((x / cell) + (y / cell)) % 2 == 1;
            if odd {
                pixels.extend_from_slice(&[0, 0, 0, 255]);
            } else {
                pixels.extend_from_slice(&[255, 0, 255, 255]);
            }
        }
    }
    pixels
}

/// One-pixel solid texture, used to disable a map (black specular or
/// emissive contributes nothing).
pub fn solid_texture(rgba: [u8; 4]) -> Texture2D {
    Texture2D::from_rgba8(1, 1, &rgba)
}

/// Decode image bytes into a texture. Images are flipped vertically so uv
/// origin matches the mesh data (image rows grow downward, uv grows upward).
pub fn texture_from_bytes(bytes: &[u8]) -> Result<Texture2D, image::ImageError> {
    let img = image::load_from_memory(bytes)?.flipv().to_rgba8();
    let (width, height) = img.dimensions();
    let texture = Texture2D::from_rgba8(width as u16, height as u16, &img.into_raw());
    texture.set_filter(FilterMode::Linear);
    Ok(texture)
}

/// Load a texture from disk, falling back to the checkerboard placeholder.
pub async fn load_texture_or_placeholder(path: &str) -> Texture2D {
    match load_file(path).await {
        Ok(bytes) => match texture_from_bytes(&bytes) {
            Ok(texture) => {
                println!("Loaded texture {}", path);
                texture
            }
            Err(e) => {
                eprintln!("Failed to decode {}: {}", path, e);
                placeholder_texture()
            }
        },
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            placeholder_texture()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_pixels_checker() {
        let pixels = placeholder_pixels(4, 2);
        assert_eq!(pixels.len(), 4 * 4 * 4);
        // (0,0) magenta, (2,0) black, (2,2) magenta
        assert_eq!(&pixels[0..4], &[255, 0, 255, 255]);
        assert_eq!(&pixels[2 * 4..2 * 4 + 4], &[0, 0, 0, 255]);
        let idx = (2 * 4 + 2) * 4;
        assert_eq!(&pixels[idx..idx + 4], &[255, 0, 255, 255]);
    }
}
