use super::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::shapes::Color;
use std::path::Path;

/// Write ABGR pixel to slice (RGBA8888 little-endian byte order)
#[inline]
fn write_pixel(dest: &mut [u8], color: Color) {
    dest[0] = color.a; // A
    dest[1] = color.b; // B
    dest[2] = color.g; // G
    dest[3] = color.r; // R
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering.
/// Every shape is rasterized into this surface; the viewer uploads it as a
/// streaming texture and the exporter writes it out as PNG.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer with default resolution (500x500)
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a new pixel buffer with custom resolution, cleared to transparent black
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width as usize) * (height as usize) * 4],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The full surface as a clip window
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Strict interior test: true only for points at least one pixel away from
    /// every edge. Shapes whose points all fail this are skipped.
    #[inline]
    pub fn is_inside(&self, p: Point) -> bool {
        p.x > 0 && p.y > 0 && p.x < self.width as i32 - 1 && p.y < self.height as i32 - 1
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }

    /// Clear to a solid color
    /// Optimized: uses u32 fill for maximum speed
    pub fn clear(&mut self, color: Color) {
        // Create ABGR u32 pattern
        let pixel = u32::from_ne_bytes([color.a, color.b, color.g, color.r]);

        // Safety: pixels.len() is always divisible by 4 (width * height * 4).
        // We use write_unaligned to avoid assuming alignment of Vec<u8>.
        let ptr = self.pixels.as_mut_ptr() as *mut u32;
        let len = self.pixels.len() / 4;

        for i in 0..len {
            // Safety: i < len keeps every write inside the allocation
            unsafe {
                ptr.add(i).write_unaligned(pixel);
            }
        }
    }

    /// Reallocate for a new resolution. Contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; (width as usize) * (height as usize) * 4];
    }

    /// Set a single pixel (bounds checked, out-of-range writes are dropped)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            write_pixel(&mut self.pixels[idx..idx + 4], color);
        }
    }

    /// Set a single pixel from raw channels
    #[inline]
    pub fn set_pixel_rgba(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        self.set_pixel(x, y, Color::rgba(r, g, b, a));
    }

    /// Set a single pixel from unit-range channels (clamped)
    #[inline]
    pub fn set_pixel_f64(&mut self, x: i32, y: i32, r: f64, g: f64, b: f64, a: f64) {
        self.set_pixel(x, y, Color::from_f64(r, g, b, a));
    }

    /// Read a pixel from the buffer (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some(Color::rgba(
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
                self.pixels[idx],     // A
            ))
        } else {
            None
        }
    }

    /// Draw a horizontal span, clipped to the buffer
    /// Computes starting index once, then increments by 4
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, color: Color) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let mut idx = self.pixel_index(start as u32, y as u32);
        for _ in start..=end {
            write_pixel(&mut self.pixels[idx..idx + 4], color);
            idx += 4;
        }
    }

    /// Number of pixels exactly equal to `color`
    pub fn count_color(&self, color: Color) -> usize {
        let pattern = [color.a, color.b, color.g, color.r];
        self.pixels
            .chunks_exact(4)
            .filter(|px| *px == pattern)
            .count()
    }

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Convert to a straight RGBA image
    pub fn to_image(&self) -> image::RgbaImage {
        let rgba: Vec<u8> = self
            .pixels
            .chunks_exact(4)
            .flat_map(|px| [px[3], px[2], px[1], px[0]])
            .collect();
        image::RgbaImage::from_raw(self.width, self.height, rgba)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    /// Export the surface as a PNG file
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        tracing::info!(
            "Exported {}x{} surface to {}",
            self.width,
            self.height,
            path.display()
        );
        Ok(())
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_and_get() {
        let mut buf = PixelBuffer::with_size(4, 3);
        buf.clear(Color::rgb(10, 20, 30));
        assert_eq!(buf.get_pixel(3, 2), Some(Color::rgb(10, 20, 30)));
        assert_eq!(buf.count_color(Color::rgb(10, 20, 30)), 12);
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_dropped() {
        let mut buf = PixelBuffer::with_size(4, 4);
        buf.clear(Color::WHITE);
        buf.set_pixel(-1, 0, Color::BLACK);
        buf.set_pixel(4, 0, Color::BLACK);
        buf.set_pixel(0, 4, Color::BLACK);
        assert_eq!(buf.count_color(Color::WHITE), 16);
        assert_eq!(buf.get_pixel(4, 0), None);
    }

    #[test]
    fn test_byte_layout_is_abgr() {
        let mut buf = PixelBuffer::with_size(1, 1);
        buf.set_pixel_rgba(0, 0, 1, 2, 3, 4);
        assert_eq!(buf.as_bytes(), &[4, 3, 2, 1]);
        assert_eq!(buf.get_pixel(0, 0), Some(Color::rgba(1, 2, 3, 4)));
    }

    #[test]
    fn test_set_pixel_f64_clamps() {
        let mut buf = PixelBuffer::with_size(1, 1);
        buf.set_pixel_f64(0, 0, 2.0, 0.0, -1.0, 1.0);
        assert_eq!(buf.get_pixel(0, 0), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_hline_clips_and_orders() {
        let mut buf = PixelBuffer::with_size(5, 2);
        buf.clear(Color::WHITE);
        buf.hline(10, -3, 1, Color::BLACK);
        assert_eq!(buf.count_color(Color::BLACK), 5);
        buf.hline(0, 4, 7, Color::BLACK);
        assert_eq!(buf.count_color(Color::BLACK), 5);
    }

    #[test]
    fn test_is_inside_excludes_border() {
        let buf = PixelBuffer::with_size(10, 10);
        assert!(buf.is_inside(Point::new(1, 1)));
        assert!(buf.is_inside(Point::new(8, 8)));
        assert!(!buf.is_inside(Point::new(0, 5)));
        assert!(!buf.is_inside(Point::new(9, 5)));
        assert!(!buf.is_inside(Point::new(5, -3)));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut buf = PixelBuffer::with_size(2, 2);
        buf.resize(3, 5);
        assert_eq!(buf.as_bytes().len(), 3 * 5 * 4);
        assert_eq!(buf.bounds(), Rect::from_size(3, 5));
    }

    #[test]
    fn test_png_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut buf = PixelBuffer::with_size(3, 2);
        buf.clear(Color::WHITE);
        buf.set_pixel(1, 1, Color::rgb(255, 0, 0));
        buf.save_png(&path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
