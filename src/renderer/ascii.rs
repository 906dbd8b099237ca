use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

use crate::resolver::Resolve;

/// Glyphs from densest to sparsest, indexed by quantized luminance
pub const ASCII_RAMP: &[u8; 16] = b"MND8OZ$7I?+=~:,.";

pub const MAX_IMAGE_WIDTH: u32 = 75;
pub const MAX_IMAGE_HEIGHT: u32 = 30;

/// Turns image destinations into ASCII art
pub struct AsciiConverter<'a> {
    resolver: &'a dyn Resolve,
}

impl<'a> AsciiConverter<'a> {
    pub fn new(resolver: &'a dyn Resolve) -> Self {
        Self { resolver }
    }

    pub fn to_ascii(&self, destination: &str) -> Result<String> {
        let bytes = self
            .resolver
            .resolve(destination)
            .with_context(|| format!("Failed to fetch image {}", destination))?;
        bytes_to_ascii(&bytes).with_context(|| format!("Failed to convert image {}", destination))
    }
}

/// Decode raw image bytes and convert them to ASCII art
pub fn bytes_to_ascii(bytes: &[u8]) -> Result<String> {
    let img = image::load_from_memory(bytes).context("Failed to decode image")?;
    Ok(image_to_ascii(&img))
}

/// Shrink `img` to fit the bounding box, preserving aspect ratio.
/// Images that already fit are never enlarged.
pub fn thumbnail(img: &DynamicImage) -> DynamicImage {
    if img.width() <= MAX_IMAGE_WIDTH && img.height() <= MAX_IMAGE_HEIGHT {
        return img.clone();
    }
    img.resize(MAX_IMAGE_WIDTH, MAX_IMAGE_HEIGHT, FilterType::Triangle)
}

/// One line per pixel row, one glyph per pixel, each row ending in `\n`
pub fn image_to_ascii(img: &DynamicImage) -> String {
    let gray = thumbnail(img).to_luma8();
    debug!(
        width = gray.width(),
        height = gray.height(),
        "converting image to ascii"
    );

    let mut art = String::with_capacity(((gray.width() + 1) * gray.height()) as usize);
    for row in gray.rows() {
        art.extend(row.map(|pixel| ramp_char(pixel.0[0])));
        art.push('\n');
    }
    art
}

pub fn ramp_char(luma: u8) -> char {
    let bucket = (u32::from(luma) * 16 / 255).min(15) as usize;
    ASCII_RAMP[bucket] as char
}
