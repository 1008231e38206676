//! Diff-driven board renderer.
//!
//! The renderer keeps a [`PieceLayer`] of visual pieces in step with the
//! authoritative snapshot. A hard cut ([`Renderer::sync_snapshot`]) rebuilds
//! the layer outright; a settled action ([`Renderer::apply_result`]) turns the
//! diff into tweens so pieces glide, fade out and fade in. Drawing is done onto
//! any [`Surface`], leaving pixels to the frontend.
mod piece;
mod surface;

use std::collections::{BTreeSet, HashMap};
use std::f32::consts::PI;
use std::time::Duration;

use game_core::{Move, PieceId, Side, Snapshot, SnapshotDiff, Square};

use crate::animation::{AnimationEngine, Easing, Tween};
use crate::config::AnimationConfig;
use crate::geometry::{IsoProjection, Point};
use crate::sprite::{SpriteCache, SpriteKey, SpriteQuality};

pub use piece::{PieceLayer, VisualPiece, board_point};
pub use surface::{BoardPalette, Rect, Surface, TileHighlight};

use surface::with_alpha;

/// Peak extra scale at the middle of a move.
const MOVE_BOUNCE: f32 = 0.08;
/// Scale a removed piece shrinks towards.
const REMOVE_SCALE: f32 = 0.7;
/// Scale an added piece grows from.
const ADD_SCALE: f32 = 0.85;
/// Highlight pulses per second.
const PULSE_HZ: f32 = 1.5;

/// Externally supplied highlights for one frame.
#[derive(Clone, Debug, Default)]
pub struct DrawOverlays {
    pub decision: Vec<Square>,
    pub check: Option<Square>,
}

/// What a [`Renderer::draw`] call actually painted, back to front.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub tiles: usize,
    pub pieces: Vec<PieceId>,
}

pub struct Renderer {
    projection: IsoProjection,
    viewport: (u32, u32),
    quality: SpriteQuality,
    sprites: SpriteCache,
    layer: PieceLayer,
    engine: AnimationEngine<PieceLayer>,
    timings: AnimationConfig,
    palette: BoardPalette,
    legal_index: HashMap<Square, BTreeSet<Square>>,
    selection: Option<Square>,
    destinations: BTreeSet<Square>,
    clock: Duration,
}

impl Renderer {
    pub fn new(timings: AnimationConfig, quality: SpriteQuality) -> Self {
        let engine = AnimationEngine::new(timings.max_tweens);
        Self {
            projection: IsoProjection::fit(1.0, 1.0, Side::White),
            viewport: (0, 0),
            quality,
            sprites: SpriteCache::new(),
            layer: PieceLayer::default(),
            engine,
            timings,
            palette: BoardPalette::default(),
            legal_index: HashMap::new(),
            selection: None,
            destinations: BTreeSet::new(),
            clock: Duration::ZERO,
        }
    }

    pub fn with_palette(mut self, palette: BoardPalette) -> Self {
        self.palette = palette;
        self
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Refits the board to a new viewport and drops sprites sized for the old one.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.viewport == (width, height) {
            return;
        }
        self.viewport = (width, height);
        self.projection = IsoProjection::fit(width as f32, height as f32, self.projection.perspective());
        self.sprites.clear();
        tracing::debug!(width, height, tile = self.projection.tile_width(), "renderer resized");
    }

    pub fn perspective(&self) -> Side {
        self.projection.perspective()
    }

    /// Views the board from `side`. Visual positions live in board space, so
    /// nothing else needs rebuilding.
    pub fn set_perspective(&mut self, side: Side) {
        self.projection = self.projection.with_perspective(side);
    }

    pub fn projection(&self) -> &IsoProjection {
        &self.projection
    }

    pub fn quality(&self) -> SpriteQuality {
        self.quality
    }

    pub fn set_quality(&mut self, quality: SpriteQuality) {
        if self.quality != quality {
            self.quality = quality;
            self.sprites.clear();
        }
    }

    pub fn sprite_cache(&self) -> &SpriteCache {
        &self.sprites
    }

    pub fn square_at_screen(&self, x: f32, y: f32) -> Option<Square> {
        self.projection.square_at(Point::new(x, y))
    }

    // ------------------------------------------------------------------
    // Reconciliation
    // ------------------------------------------------------------------

    /// Hard cut: rebuilds the visual set from `snapshot` with no animation.
    pub fn sync_snapshot(&mut self, snapshot: &Snapshot) {
        self.engine.clear();
        self.layer.clear();
        for piece in &snapshot.pieces {
            self.layer.spawn(piece, 1.0, 1.0);
        }
        tracing::debug!(pieces = self.layer.len(), ply = snapshot.ply, "renderer synced");
    }

    /// Animates a settled diff. Tweens still running from an earlier diff are
    /// finished first so every new tween starts from a resting state.
    pub fn apply_result(&mut self, diff: &SnapshotDiff) {
        self.engine.finish_all(&mut self.layer);

        for removed in &diff.removed {
            self.schedule_remove(removed.uid);
        }
        for moved in &diff.moved {
            self.schedule_move(moved.uid, moved.to);
        }
        for piece in &diff.added {
            if self.layer.get(piece.uid).is_some() {
                tracing::debug!(uid = %piece.uid, "added piece already visible; recreating");
            }
            let generation = self.layer.spawn(piece, 0.0, ADD_SCALE);
            let id = piece.uid;
            let tween = Tween::new(self.timings.add_duration, Easing::EaseOutCubic, move |layer: &mut PieceLayer, t| {
                if let Some(p) = layer.live_mut(id, generation) {
                    p.opacity = t;
                    p.scale = ADD_SCALE + (1.0 - ADD_SCALE) * t;
                }
            })
            .on_complete(move |layer: &mut PieceLayer| {
                if let Some(p) = layer.live_mut(id, generation) {
                    p.opacity = 1.0;
                    p.scale = 1.0;
                }
            });
            self.engine.push(tween, &mut self.layer);
        }
        for change in &diff.meta_changed {
            match self.layer.get_mut(change.uid) {
                Some(p) => p.meta = change.after.clone(),
                None => tracing::debug!(uid = %change.uid, "meta change for unknown piece ignored"),
            }
        }
    }

    fn schedule_move(&mut self, id: PieceId, to: Square) {
        let Some(piece) = self.layer.get_mut(id) else {
            tracing::debug!(uid = %id, "move for unknown piece ignored");
            return;
        };
        let generation = piece.generation;
        let from = piece.position;
        let target = board_point(to);
        piece.square = to;

        let tween = Tween::new(self.timings.move_duration, Easing::EaseInOutCubic, move |layer: &mut PieceLayer, t| {
            if let Some(p) = layer.live_mut(id, generation) {
                p.position = from.lerp(target, t);
                p.scale = 1.0 + MOVE_BOUNCE * (PI * t).sin();
            }
        })
        .on_complete(move |layer: &mut PieceLayer| {
            if let Some(p) = layer.live_mut(id, generation) {
                p.position = target;
                p.scale = 1.0;
            }
        });
        self.engine.push(tween, &mut self.layer);
    }

    fn schedule_remove(&mut self, id: PieceId) {
        let Some(piece) = self.layer.get_mut(id) else {
            tracing::debug!(uid = %id, "removal for unknown piece ignored");
            return;
        };
        piece.leaving = true;
        let generation = piece.generation;

        let tween = Tween::new(self.timings.remove_duration, Easing::Linear, move |layer: &mut PieceLayer, t| {
            if let Some(p) = layer.live_mut(id, generation) {
                p.opacity = 1.0 - t;
                p.scale = 1.0 - (1.0 - REMOVE_SCALE) * t;
            }
        })
        .on_complete(move |layer: &mut PieceLayer| {
            layer.despawn(id, generation);
        });
        self.engine.push(tween, &mut self.layer);
    }

    /// Advances animations by `dt`.
    pub fn step(&mut self, dt: Duration) {
        self.clock = self.clock.saturating_add(dt);
        self.engine.step(dt, &mut self.layer);
    }

    pub fn is_animating(&self) -> bool {
        !self.engine.is_empty()
    }

    pub fn active_tweens(&self) -> usize {
        self.engine.len()
    }

    /// Jumps every running animation to its end state.
    pub fn finish_animations(&mut self) {
        self.engine.finish_all(&mut self.layer);
    }

    pub fn pieces(&self) -> &PieceLayer {
        &self.layer
    }

    pub fn piece(&self, id: PieceId) -> Option<&VisualPiece> {
        self.layer.get(id)
    }

    // ------------------------------------------------------------------
    // Selection & legal destinations
    // ------------------------------------------------------------------

    pub fn set_legal_moves(&mut self, moves: &[Move]) {
        self.legal_index.clear();
        for mv in moves {
            self.legal_index.entry(mv.from).or_default().insert(mv.to);
        }
        self.refresh_destinations();
    }

    pub fn set_selection_square(&mut self, square: Option<Square>) {
        self.selection = square;
        self.refresh_destinations();
    }

    pub fn selection(&self) -> Option<Square> {
        self.selection
    }

    pub fn destinations(&self) -> &BTreeSet<Square> {
        &self.destinations
    }

    /// True when some legal move starts on `square`.
    pub fn has_moves_from(&self, square: Square) -> bool {
        self.legal_index.contains_key(&square)
    }

    fn refresh_destinations(&mut self) {
        self.destinations = self
            .selection
            .and_then(|sq| self.legal_index.get(&sq).cloned())
            .unwrap_or_default();
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Highlight flags per square index for the current frame.
    pub fn tile_highlights(&self, snapshot: &Snapshot, overlays: &DrawOverlays) -> [TileHighlight; 64] {
        let mut flags = [TileHighlight::empty(); Square::COUNT];
        for sq in &self.destinations {
            flags[sq.index() as usize] |= TileHighlight::LEGAL;
        }
        for sq in &overlays.decision {
            flags[sq.index() as usize] |= TileHighlight::DECISION;
        }
        if let Some(sq) = overlays.check {
            flags[sq.index() as usize] |= TileHighlight::CHECK;
        }
        if let Some(sq) = self.selection {
            flags[sq.index() as usize] |= TileHighlight::SELECTED;
        }
        if let Some(last) = &snapshot.last_move {
            flags[last.from.index() as usize] |= TileHighlight::LAST_MOVE;
            flags[last.to.index() as usize] |= TileHighlight::LAST_MOVE;
        }
        flags
    }

    fn pulse(&self) -> f32 {
        0.55 + 0.45 * (self.clock.as_secs_f32() * PULSE_HZ * 2.0 * PI).sin()
    }

    /// Paints one frame: tiles back to front, then pieces by ascending screen y.
    pub fn draw(&mut self, snapshot: &Snapshot, overlays: &DrawOverlays, surface: &mut dyn Surface) -> FrameReport {
        let palette = self.palette;
        let highlights = self.tile_highlights(snapshot, overlays);
        let pulse = self.pulse();
        let mut report = FrameReport::default();

        surface.clear(palette.background);
        for square in self.projection.paint_order() {
            let quad = self.projection.tile_quad(square);
            let flags = highlights[square.index() as usize];
            let base = if (square.file() + square.rank()) % 2 == 0 {
                palette.dark
            } else {
                palette.light
            };
            surface.fill_quad(&quad, base);
            if flags.contains(TileHighlight::LAST_MOVE) {
                surface.fill_quad(&quad, palette.last_move);
            }
            if flags.contains(TileHighlight::SELECTED) {
                surface.fill_quad(&quad, palette.selected);
            }
            if flags.contains(TileHighlight::DECISION) {
                surface.fill_quad(&quad, with_alpha(palette.decision, pulse));
            }
            if flags.contains(TileHighlight::CHECK) {
                surface.fill_quad(&quad, with_alpha(palette.check, pulse));
            }
            if flags.contains(TileHighlight::LEGAL) {
                surface.stroke_quad(&quad, palette.legal);
            }
            report.tiles += 1;
        }

        let projection = self.projection;
        let mut visible: Vec<(f32, &VisualPiece)> = self
            .layer
            .iter()
            .filter(|p| p.opacity > 0.0)
            .map(|p| (projection.board_to_screen(p.position).y, p))
            .collect();
        visible.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));

        let tile_width = projection.tile_width();
        for (_, piece) in visible {
            let sprite = self.sprites.get(SpriteKey {
                kind: piece.kind,
                side: piece.side,
                quality: self.quality,
                tile_width,
            });
            let foot = projection.board_to_screen(piece.position);
            let width = sprite.width as f32 * piece.scale;
            let height = sprite.height as f32 * piece.scale;
            let dest = Rect::new(
                foot.x - width / 2.0,
                foot.y + projection.half_height() * 0.5 - height,
                width,
                height,
            );
            surface.blit(&sprite, dest, piece.opacity);
            report.pieces.push(piece.id);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::sprite::{Rgba, Sprite};
    use game_core::{MovedPiece, Piece, PieceKind, PieceRef};

    #[derive(Default)]
    struct RecordingSurface {
        fills: usize,
        strokes: usize,
        blits: Vec<Rect>,
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> (u32, u32) {
            (320, 200)
        }
        fn clear(&mut self, _color: Rgba) {}
        fn fill_quad(&mut self, _quad: &[Point; 4], _color: Rgba) {
            self.fills += 1;
        }
        fn stroke_quad(&mut self, _quad: &[Point; 4], _color: Rgba) {
            self.strokes += 1;
        }
        fn blit(&mut self, _sprite: &Sprite, dest: Rect, _opacity: f32) {
            self.blits.push(dest);
        }
    }

    fn renderer() -> Renderer {
        let mut renderer = Renderer::new(AnimationConfig::default(), SpriteQuality::Low);
        renderer.resize(320, 200);
        renderer
    }

    fn sq(index: u8) -> Square {
        Square::new(index).unwrap()
    }

    fn run_out(renderer: &mut Renderer) {
        for _ in 0..40 {
            renderer.step(Duration::from_millis(16));
        }
    }

    #[test]
    fn sync_matches_snapshot_ids_with_no_tweens() {
        let mut r = renderer();
        let snapshot = Snapshot::standard();
        r.sync_snapshot(&snapshot);
        let visual: BTreeSet<_> = r.pieces().ids().collect();
        let expected: BTreeSet<_> = snapshot.pieces.iter().map(|p| p.uid).collect();
        assert_eq!(visual, expected);
        assert_eq!(r.active_tweens(), 0);
    }

    #[test]
    fn move_diff_lands_on_target_with_unit_scale() {
        let mut r = renderer();
        let mut snapshot = Snapshot::empty();
        snapshot.pieces.push(Piece::new(1, Side::White, PieceKind::Pawn, sq(12)));
        r.sync_snapshot(&snapshot);

        r.apply_result(&SnapshotDiff {
            moved: vec![MovedPiece {
                uid: PieceId(1),
                from: sq(12),
                to: sq(20),
            }],
            ..SnapshotDiff::default()
        });
        assert!(r.is_animating());
        r.step(Duration::from_millis(110));
        let mid = r.piece(PieceId(1)).unwrap();
        assert!(mid.scale > 1.0);

        run_out(&mut r);
        let piece = r.piece(PieceId(1)).unwrap();
        assert_eq!(piece.square, sq(20));
        assert_eq!(piece.position, board_point(sq(20)));
        assert_eq!(piece.scale, 1.0);
        assert!(!r.is_animating());
    }

    #[test]
    fn removed_piece_disappears_and_is_not_drawn() {
        let mut r = renderer();
        let snapshot = Snapshot::standard();
        r.sync_snapshot(&snapshot);
        r.apply_result(&SnapshotDiff {
            removed: vec![PieceRef {
                uid: PieceId(5),
                pos: None,
            }],
            ..SnapshotDiff::default()
        });
        run_out(&mut r);
        assert!(r.piece(PieceId(5)).is_none());

        let mut surface = RecordingSurface::default();
        let report = r.draw(&snapshot, &DrawOverlays::default(), &mut surface);
        assert!(!report.pieces.contains(&PieceId(5)));
        assert_eq!(report.pieces.len(), 31);
        assert_eq!(report.tiles, 64);
    }

    #[test]
    fn added_piece_fades_in_from_reduced_scale() {
        let mut r = renderer();
        r.sync_snapshot(&Snapshot::empty());
        r.apply_result(&SnapshotDiff {
            added: vec![Piece::new(40, Side::Black, PieceKind::Queen, sq(35))],
            ..SnapshotDiff::default()
        });
        let fresh = r.piece(PieceId(40)).unwrap();
        assert_eq!(fresh.opacity, 0.0);
        assert_eq!(fresh.scale, ADD_SCALE);
        run_out(&mut r);
        let done = r.piece(PieceId(40)).unwrap();
        assert_eq!((done.opacity, done.scale), (1.0, 1.0));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut r = renderer();
        r.sync_snapshot(&Snapshot::empty());
        r.apply_result(&SnapshotDiff {
            moved: vec![MovedPiece {
                uid: PieceId(77),
                from: sq(0),
                to: sq(1),
            }],
            removed: vec![PieceRef {
                uid: PieceId(78),
                pos: None,
            }],
            ..SnapshotDiff::default()
        });
        assert_eq!(r.active_tweens(), 0);
        assert!(r.pieces().is_empty());
    }

    #[test]
    fn stale_tween_does_not_touch_recreated_piece() {
        let mut r = renderer();
        let mut snapshot = Snapshot::empty();
        let pawn = Piece::new(3, Side::White, PieceKind::Pawn, sq(8));
        snapshot.pieces.push(pawn);
        r.sync_snapshot(&snapshot);

        // uid 3 leaves and comes back within one diff
        r.apply_result(&SnapshotDiff {
            removed: vec![PieceRef {
                uid: PieceId(3),
                pos: None,
            }],
            added: vec![Piece::new(3, Side::White, PieceKind::Pawn, sq(16))],
            ..SnapshotDiff::default()
        });
        assert_eq!(r.active_tweens(), 2);
        run_out(&mut r);
        let piece = r.piece(PieceId(3)).unwrap();
        assert_eq!(piece.opacity, 1.0);
        assert_eq!(piece.square, sq(16));
        assert!(!piece.leaving);
    }

    #[test]
    fn pieces_are_drawn_back_to_front() {
        let mut r = renderer();
        let snapshot = Snapshot::standard();
        r.sync_snapshot(&snapshot);
        let mut surface = RecordingSurface::default();
        r.draw(&snapshot, &DrawOverlays::default(), &mut surface);
        let bottoms: Vec<f32> = surface.blits.iter().map(|d| d.y + d.height).collect();
        assert!(bottoms.windows(2).all(|w| w[0] <= w[1] + 1e-3));
    }

    #[test]
    fn highlights_are_additive() {
        let mut r = renderer();
        let mut snapshot = Snapshot::standard();
        snapshot.check = true;
        r.set_legal_moves(&[Move::new(sq(12), sq(28)), Move::new(sq(12), sq(20))]);
        r.set_selection_square(Some(sq(12)));
        assert_eq!(r.destinations().len(), 2);

        let overlays = DrawOverlays {
            decision: vec![sq(28)],
            check: Some(sq(28)),
        };
        let flags = r.tile_highlights(&snapshot, &overlays);
        assert_eq!(
            flags[28],
            TileHighlight::LEGAL | TileHighlight::DECISION | TileHighlight::CHECK
        );
        assert_eq!(flags[12], TileHighlight::SELECTED);

        let mut surface = RecordingSurface::default();
        r.draw(&snapshot, &overlays, &mut surface);
        assert_eq!(surface.strokes, 2);

        r.set_selection_square(None);
        assert!(r.destinations().is_empty());
    }

    #[test]
    fn resize_invalidates_sprite_cache() {
        let mut r = renderer();
        let snapshot = Snapshot::standard();
        r.sync_snapshot(&snapshot);
        let mut surface = RecordingSurface::default();
        r.draw(&snapshot, &DrawOverlays::default(), &mut surface);
        assert!(!r.sprite_cache().is_empty());
        r.resize(640, 400);
        assert!(r.sprite_cache().is_empty());
    }

    #[test]
    fn square_at_screen_inverts_projection() {
        let r = renderer();
        let centre = r.projection().square_center(sq(27));
        assert_eq!(r.square_at_screen(centre.x, centre.y), Some(sq(27)));
    }

    #[test]
    fn tween_count_never_exceeds_cap() {
        let timings = AnimationConfig {
            max_tweens: 4,
            ..AnimationConfig::default()
        };
        let mut r = Renderer::new(timings, SpriteQuality::Low);
        r.resize(320, 200);
        r.sync_snapshot(&Snapshot::empty());
        let added: Vec<Piece> = (0..10)
            .map(|i| Piece::new(100 + i, Side::White, PieceKind::Pawn, sq(i as u8)))
            .collect();
        r.apply_result(&SnapshotDiff {
            added,
            ..SnapshotDiff::default()
        });
        assert_eq!(r.active_tweens(), 4);
        assert_eq!(r.pieces().len(), 10);
    }
}
