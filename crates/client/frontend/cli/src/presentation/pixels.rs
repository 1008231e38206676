//! Half-block pixel surface.
//!
//! The board is rasterized into an RGBA buffer one pixel per column and two
//! per row, then shown with `▀` cells whose foreground is the upper pixel and
//! whose background is the lower one.
use client_frontend_core::geometry::{Point, quad_contains};
use client_frontend_core::{Rect as SurfaceRect, Rgba, Sprite, Surface};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

const UPPER_HALF: char = '▀';

pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; (width * height) as usize],
        }
    }

    /// Reallocates for a new size; contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (self.width, self.height) == (width, height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![[0, 0, 0, 255]; (width * height) as usize];
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let index = (y as u32 * self.width + x as u32) as usize;
        if let Some(dst) = self.pixels.get_mut(index) {
            *dst = blend_over(*dst, color);
        }
    }

    /// Inclusive-exclusive pixel range covering `[lo, hi)`, clipped to `limit`.
    fn span(lo: f32, hi: f32, limit: u32) -> std::ops::Range<i64> {
        let start = lo.floor().max(0.0) as i64;
        let end = (hi.ceil() as i64).min(limit as i64);
        start..end.max(start)
    }
}

fn blend_over(dst: Rgba, src: Rgba) -> Rgba {
    let alpha = src[3] as u32;
    match alpha {
        0 => dst,
        255 => [src[0], src[1], src[2], 255],
        _ => {
            let inv = 255 - alpha;
            let mix = |s: u8, d: u8| ((s as u32 * alpha + d as u32 * inv + 127) / 255) as u8;
            [mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), 255]
        }
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    fn fill_quad(&mut self, quad: &[Point; 4], color: Rgba) {
        let (min_x, max_x) = quad.iter().fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
        let (min_y, max_y) = quad.iter().fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        for y in Self::span(min_y, max_y, self.height) {
            for x in Self::span(min_x, max_x, self.width) {
                if quad_contains(quad, Point::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn stroke_quad(&mut self, quad: &[Point; 4], color: Rgba) {
        for i in 0..4 {
            let (a, b) = (quad[i], quad[(i + 1) % 4]);
            let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as u32;
            for step in 0..=steps {
                let p = a.lerp(b, step as f32 / steps as f32);
                self.blend(p.x.floor() as i64, p.y.floor() as i64, color);
            }
        }
    }

    fn blit(&mut self, sprite: &Sprite, dest: SurfaceRect, opacity: f32) {
        if dest.width <= 0.0 || dest.height <= 0.0 || opacity <= 0.0 {
            return;
        }
        let opacity = opacity.min(1.0);
        for y in Self::span(dest.y, dest.y + dest.height, self.height) {
            let v = ((y as f32 + 0.5 - dest.y) / dest.height * sprite.height as f32).floor();
            if v < 0.0 {
                continue;
            }
            for x in Self::span(dest.x, dest.x + dest.width, self.width) {
                let u = ((x as f32 + 0.5 - dest.x) / dest.width * sprite.width as f32).floor();
                if u < 0.0 {
                    continue;
                }
                if let Some(mut color) = sprite.pixel(u as u32, v as u32) {
                    color[3] = (color[3] as f32 * opacity).round() as u8;
                    self.blend(x, y, color);
                }
            }
        }
    }
}

fn to_color(rgba: Rgba) -> Color {
    Color::Rgb(rgba[0], rgba[1], rgba[2])
}

impl Widget for &PixelSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let columns = area.width.min(self.width as u16);
        let rows = area.height.min((self.height / 2) as u16);
        for cy in 0..rows {
            for cx in 0..columns {
                let top = self.pixel(cx as u32, cy as u32 * 2).unwrap_or([0, 0, 0, 255]);
                let bottom = self.pixel(cx as u32, cy as u32 * 2 + 1).unwrap_or([0, 0, 0, 255]);
                if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                    cell.set_char(UPPER_HALF)
                        .set_fg(to_color(top))
                        .set_bg(to_color(bottom));
                }
            }
        }
    }
}
