/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The placeholder image buffers handed to the compositor for rendering.

use euclid::default::Size2D;

use image::Rgba;
use image::RgbaImage;

/// An RGBA8 image buffer backing a window while no client buffer is bound.
#[derive(Clone, Debug)]
pub struct Pixmap {
    image: RgbaImage,
}

impl Pixmap {
    /// Creates a pixmap of the given size filled with a solid color.
    ///
    /// Dimensions are not validated; a non-positive width or height yields
    /// an empty pixmap, matching the null-pixmap behavior of the toolkit
    /// image types this replaces.
    pub fn new(size: Size2D<i32>, color: Rgba<u8>) -> Pixmap {
        let width = size.width.max(0) as u32;
        let height = size.height.max(0) as u32;
        Pixmap {
            image: RgbaImage::from_pixel(width, height, color),
        }
    }

    pub fn size(&self) -> Size2D<i32> {
        Size2D::new(self.image.width() as i32, self.image.height() as i32)
    }

    /// Refills every pixel with a solid color.
    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// The raw RGBA8 bytes, row-major and tightly packed.
    pub fn data(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// True if every pixel equals `color`.
    pub fn is_solid(&self, color: Rgba<u8>) -> bool {
        self.image.pixels().all(|pixel| *pixel == color)
    }
}

impl PartialEq for Pixmap {
    fn eq(&self, other: &Pixmap) -> bool {
        self.size() == other.size() && self.data() == other.data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    #[test]
    fn new_pixmap_is_solid() {
        let pixmap = Pixmap::new(Size2D::new(4, 3), RED);
        assert_eq!(pixmap.size(), Size2D::new(4, 3));
        assert_eq!(pixmap.data().len(), 4 * 3 * 4);
        assert!(pixmap.is_solid(RED));
        assert!(!pixmap.is_solid(GREEN));
    }

    #[test]
    fn fill_replaces_every_pixel() {
        let mut pixmap = Pixmap::new(Size2D::new(2, 2), RED);
        pixmap.fill(GREEN);
        assert!(pixmap.is_solid(GREEN));
    }

    #[test]
    fn negative_dimensions_yield_an_empty_pixmap() {
        let pixmap = Pixmap::new(Size2D::new(-4, 3), RED);
        assert_eq!(pixmap.size(), Size2D::new(0, 3));
        assert!(pixmap.data().is_empty());
    }
}
