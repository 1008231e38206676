//! Isometric board projection and square hit testing.
//!
//! Board squares are first mapped to *view* coordinates `(f, r)`, which depend
//! on the perspective: the viewing side's first rank is always nearest the
//! bottom of the screen. View coordinates are then projected with
//!
//! ```text
//! x = ox + (f - r) * hw
//! y = oy + (f + r) * hh
//! ```
//!
//! whose exact inverse is `f = (u + v) / 2`, `r = (v - u) / 2` with
//! `u = (x - ox) / hw` and `v = (y - oy) / hh`. Each tile is the diamond
//! spanned by its centre `± (hw, 0)` and `± (0, hh)`.
use game_core::{Side, Square};

/// Fraction of the viewport the board may occupy.
const FIT_MARGIN: f32 = 0.96;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Point, t: f32) -> Point {
        Point::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }

    fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// z-component of `(b - a) x (p - a)`.
fn cross(a: Point, b: Point, p: Point) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Point-in-convex-quad accepting either winding. Edges are inclusive so a
/// point on a shared border is claimed by whichever candidate is tested
/// first, and a point outside both tiles is never claimed.
pub fn quad_contains(quad: &[Point; 4], p: Point) -> bool {
    let signs = [
        cross(quad[0], quad[1], p),
        cross(quad[1], quad[2], p),
        cross(quad[2], quad[3], p),
        cross(quad[3], quad[0], p),
    ];
    signs.iter().all(|s| *s >= 0.0) || signs.iter().all(|s| *s <= 0.0)
}

/// Pure isometric transform for one viewport and perspective.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsoProjection {
    half_width: f32,
    half_height: f32,
    origin: Point,
    perspective: Side,
}

impl IsoProjection {
    pub fn new(half_width: f32, half_height: f32, origin: Point, perspective: Side) -> Self {
        Self {
            half_width: half_width.max(f32::EPSILON),
            half_height: half_height.max(f32::EPSILON),
            origin,
            perspective,
        }
    }

    /// Largest 2:1 projection that fits the whole board inside `width x height`,
    /// centred. The board spans `16 hw` horizontally and `16 hh` vertically.
    pub fn fit(width: f32, height: f32, perspective: Side) -> Self {
        let half_width = (width / 16.0).min(height / 8.0).max(1.0) * FIT_MARGIN;
        let half_height = half_width / 2.0;
        let origin = Point::new(width / 2.0, (height - 16.0 * half_height) / 2.0 + half_height);
        Self::new(half_width, half_height, origin, perspective)
    }

    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    /// Tile width in whole pixels, used as the sprite size key.
    pub fn tile_width(&self) -> u32 {
        (self.half_width * 2.0).round().max(1.0) as u32
    }

    pub fn perspective(&self) -> Side {
        self.perspective
    }

    pub fn with_perspective(self, perspective: Side) -> Self {
        Self {
            perspective,
            ..self
        }
    }

    /// View coordinates of a square.
    pub fn view_coords(&self, square: Square) -> (u8, u8) {
        match self.perspective {
            Side::White => (square.file(), 7 - square.rank()),
            Side::Black => (7 - square.file(), square.rank()),
        }
    }

    /// Board square at integer view coordinates.
    pub fn square_from_view(&self, view_file: i32, view_rank: i32) -> Option<Square> {
        if !(0..8).contains(&view_file) || !(0..8).contains(&view_rank) {
            return None;
        }
        let (vf, vr) = (view_file as u8, view_rank as u8);
        match self.perspective {
            Side::White => Square::from_coords(vf, 7 - vr),
            Side::Black => Square::from_coords(7 - vf, vr),
        }
    }

    pub fn view_to_screen(&self, f: f32, r: f32) -> Point {
        Point::new(
            self.origin.x + (f - r) * self.half_width,
            self.origin.y + (f + r) * self.half_height,
        )
    }

    pub fn screen_to_view(&self, p: Point) -> (f32, f32) {
        let u = (p.x - self.origin.x) / self.half_width;
        let v = (p.y - self.origin.y) / self.half_height;
        ((u + v) / 2.0, (v - u) / 2.0)
    }

    pub fn square_center(&self, square: Square) -> Point {
        let (f, r) = self.view_coords(square);
        self.view_to_screen(f as f32, r as f32)
    }

    /// Projects a continuous board position (`x` = file, `y` = rank).
    pub fn board_to_screen(&self, board: Point) -> Point {
        match self.perspective {
            Side::White => self.view_to_screen(board.x, 7.0 - board.y),
            Side::Black => self.view_to_screen(7.0 - board.x, board.y),
        }
    }

    /// Diamond corners in order top, right, bottom, left.
    pub fn tile_quad(&self, square: Square) -> [Point; 4] {
        let c = self.square_center(square);
        [
            Point::new(c.x, c.y - self.half_height),
            Point::new(c.x + self.half_width, c.y),
            Point::new(c.x, c.y + self.half_height),
            Point::new(c.x - self.half_width, c.y),
        ]
    }

    /// Square under a screen point, or `None` off the board.
    pub fn square_at(&self, p: Point) -> Option<Square> {
        let (f, r) = self.screen_to_view(p);
        let (rf, rr) = (f.round() as i32, r.round() as i32);

        let mut best: Option<(Square, f32)> = None;
        for dr in -1..=1 {
            for df in -1..=1 {
                let Some(square) = self.square_from_view(rf + df, rr + dr) else {
                    continue;
                };
                if quad_contains(&self.tile_quad(square), p) {
                    let d = self.square_center(square).distance_sq(p);
                    if best.is_none_or(|(_, bd)| d < bd) {
                        best = Some((square, d));
                    }
                }
            }
        }

        best.map(|(square, _)| square)
            .or_else(|| self.square_from_view(rf, rr))
    }

    /// Squares in back-to-front paint order: ascending `view_file + view_rank`.
    pub fn paint_order(&self) -> Vec<Square> {
        let mut squares: Vec<Square> = Square::all().collect();
        squares.sort_by_key(|sq| {
            let (f, r) = self.view_coords(*sq);
            (f + r, r)
        });
        squares
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(side: Side) -> IsoProjection {
        IsoProjection::fit(640.0, 360.0, side)
    }

    #[test]
    fn every_square_center_hits_itself() {
        for side in [Side::White, Side::Black] {
            let proj = projection(side);
            for square in Square::all() {
                assert_eq!(proj.square_at(proj.square_center(square)), Some(square), "{side} {square}");
            }
        }
    }

    #[test]
    fn inverse_is_exact_for_centres() {
        let proj = projection(Side::White);
        let (f, r) = proj.screen_to_view(proj.view_to_screen(3.0, 5.0));
        assert!((f - 3.0).abs() < 1e-4);
        assert!((r - 5.0).abs() < 1e-4);
    }

    #[test]
    fn points_off_the_board_miss() {
        let proj = projection(Side::White);
        assert_eq!(proj.square_at(Point::new(-500.0, -500.0)), None);
        assert_eq!(proj.square_at(Point::new(5000.0, 5000.0)), None);
    }

    #[test]
    fn near_edge_points_stay_in_their_tile() {
        let proj = projection(Side::White);
        let e4: Square = "e4".parse().unwrap();
        let quad = proj.tile_quad(e4);
        let centre = proj.square_center(e4);
        for corner in quad {
            let inside = centre.lerp(corner, 0.9);
            assert_eq!(proj.square_at(inside), Some(e4));
        }
    }

    #[test]
    fn white_first_rank_is_nearest_the_viewer() {
        let proj = projection(Side::White);
        let a1 = proj.square_center("a1".parse().unwrap());
        let a8 = proj.square_center("a8".parse().unwrap());
        assert!(a1.y > a8.y);

        let flipped = proj.with_perspective(Side::Black);
        assert!(flipped.square_center("a8".parse().unwrap()).y > flipped.square_center("a1".parse().unwrap()).y);
    }

    #[test]
    fn fitted_board_stays_inside_viewport() {
        let proj = projection(Side::White);
        for square in Square::all() {
            for corner in proj.tile_quad(square) {
                assert!((0.0..=640.0).contains(&corner.x));
                assert!((0.0..=360.0).contains(&corner.y));
            }
        }
    }

    #[test]
    fn paint_order_runs_back_to_front() {
        let proj = projection(Side::White);
        let order = proj.paint_order();
        let first = proj.square_center(order[0]);
        let last = proj.square_center(order[63]);
        assert!(first.y < last.y);
    }
}
