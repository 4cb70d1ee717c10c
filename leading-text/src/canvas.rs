//! Canvas — CPU-side RGBA8 pixel buffer that lines are rasterized into.
//!
//! Glyph coverage is composited with source-over blending. Writes that
//! fall outside the canvas are dropped, so glyphs hanging off an edge are
//! clipped instead of wrapping around.

/// RGBA8 pixel buffer, row-major, straight alpha.
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    /// Whether data has changed since the last [`Canvas::take_dirty`].
    dirty: bool,
}

impl Canvas {
    /// Create a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
            dirty: false,
        }
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: [f32; 4]) {
        let rgba = to_rgba8(color);
        for pixel in self.data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
        self.dirty = true;
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let idx = self.index(x as i64, y as i64)?;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.data[idx..idx + 4]);
        Some(out)
    }

    /// Number of pixels with non-zero alpha.
    pub fn inked_pixels(&self) -> usize {
        self.data.chunks_exact(4).filter(|p| p[3] > 0).count()
    }

    /// Report and reset the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Composite an alpha mask tinted with `color` at `(x, y)`.
    ///
    /// `mask` holds one coverage byte per pixel, `width * height` long.
    pub fn blend_mask(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        mask: &[u8],
        color: [f32; 4],
    ) {
        let tint = to_rgba8(color);
        for row in 0..height {
            for col in 0..width {
                let src_idx = (row * width + col) as usize;
                let Some(&coverage) = mask.get(src_idx) else {
                    return;
                };
                if coverage == 0 {
                    continue;
                }
                let alpha = (coverage as u16 * tint[3] as u16 / 255) as u8;
                self.blend_pixel(
                    x as i64 + col as i64,
                    y as i64 + row as i64,
                    [tint[0], tint[1], tint[2], alpha],
                );
            }
        }
    }

    /// Composite a straight-alpha RGBA bitmap (color glyphs) at `(x, y)`.
    pub fn blend_rgba(&mut self, x: i32, y: i32, width: u32, height: u32, bitmap: &[u8]) {
        for row in 0..height {
            for col in 0..width {
                let src_idx = ((row * width + col) * 4) as usize;
                let Some(src) = bitmap.get(src_idx..src_idx + 4) else {
                    return;
                };
                self.blend_pixel(
                    x as i64 + col as i64,
                    y as i64 + row as i64,
                    [src[0], src[1], src[2], src[3]],
                );
            }
        }
    }

    // ---------------------------------------------------------------
    // Internal helpers
    // ---------------------------------------------------------------

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + x as usize) * 4)
    }

    /// Source-over blend of one straight-alpha pixel.
    fn blend_pixel(&mut self, x: i64, y: i64, src: [u8; 4]) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let src_a = src[3] as f32 / 255.0;
        if src_a <= 0.0 {
            return;
        }
        let dst = &mut self.data[idx..idx + 4];
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        for c in 0..3 {
            let s = src[c] as f32 / 255.0;
            let d = dst[c] as f32 / 255.0;
            let out = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
            dst[c] = (out * 255.0).round() as u8;
        }
        dst[3] = (out_a * 255.0).round() as u8;
        self.dirty = true;
    }
}

fn to_rgba8(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

// ===================================================================
// Tests
// ===================================================================
