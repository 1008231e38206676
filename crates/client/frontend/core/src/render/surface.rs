//! Drawing target abstraction and tile highlight flags.
use bitflags::bitflags;

use crate::geometry::Point;
use crate::sprite::{Rgba, Sprite};

bitflags! {
    /// Independent highlight layers for one tile. Any combination may be set
    /// at once and each is drawn on top of the others.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TileHighlight: u8 {
        const LEGAL     = 1 << 0;
        const DECISION  = 1 << 1;
        const CHECK     = 1 << 2;
        const SELECTED  = 1 << 3;
        const LAST_MOVE = 1 << 4;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Anything the renderer can paint a frame onto.
pub trait Surface {
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, color: Rgba);

    /// Fills a convex quad, alpha-blending `color` over what is there.
    fn fill_quad(&mut self, quad: &[Point; 4], color: Rgba);

    /// Draws the quad's outline.
    fn stroke_quad(&mut self, quad: &[Point; 4], color: Rgba);

    /// Draws `sprite` scaled into `dest`, multiplying its alpha by `opacity`.
    fn blit(&mut self, sprite: &Sprite, dest: Rect, opacity: f32);
}

/// Colour scheme for tiles and highlights.
#[derive(Clone, Copy, Debug)]
pub struct BoardPalette {
    pub background: Rgba,
    pub light: Rgba,
    pub dark: Rgba,
    pub last_move: Rgba,
    pub selected: Rgba,
    pub legal: Rgba,
    pub decision: Rgba,
    pub check: Rgba,
}

impl Default for BoardPalette {
    fn default() -> Self {
        Self {
            background: [18, 16, 26, 255],
            light: [196, 178, 146, 255],
            dark: [112, 86, 70, 255],
            last_move: [214, 196, 80, 96],
            selected: [90, 170, 230, 120],
            legal: [120, 230, 140, 255],
            decision: [186, 110, 255, 150],
            check: [236, 60, 60, 170],
        }
    }
}

pub(crate) fn with_alpha(color: Rgba, factor: f32) -> Rgba {
    let alpha = (color[3] as f32 * factor.clamp(0.0, 1.0)).round() as u8;
    [color[0], color[1], color[2], alpha]
}
