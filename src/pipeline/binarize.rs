//! Page-image preparation for OCR: grayscale, then Otsu binarisation.
//!
//! Otsu picks the threshold that best separates the two intensity classes
//! of the histogram, which for a scanned page means ink and paper. Pixels
//! strictly above the level become white (255), the rest black (0).

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use tracing::debug;

/// Convert a rendered page to a black-and-white image.
pub fn binarize(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    let level = otsu_level(&gray);
    debug!(
        "Binarising {}x{} page at Otsu level {}",
        gray.width(),
        gray.height(),
        level
    );
    apply_threshold(&gray, level)
}

fn apply_threshold(gray: &GrayImage, level: u8) -> GrayImage {
    let mut out = gray.clone();
    for Luma([value]) in out.pixels_mut() {
        *value = if *value > level { 255 } else { 0 };
    }
    out
}
