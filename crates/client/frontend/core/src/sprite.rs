//! Procedurally drawn piece sprites and their memoizing cache.
//!
//! A sprite is a pure function of [`SpriteKey`], so the cache never has to
//! compare images: equal keys always yield identical pixels.
use std::collections::HashMap;
use std::sync::Arc;

use game_core::{PieceKind, Side};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SpriteQuality {
    /// One coverage sample per pixel.
    Low,
    /// 2x2 supersampled coverage for anti-aliased edges.
    #[default]
    High,
}

impl SpriteQuality {
    pub const fn samples_per_axis(self) -> u32 {
        match self {
            SpriteQuality::Low => 1,
            SpriteQuality::High => 2,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            SpriteQuality::Low => SpriteQuality::High,
            SpriteQuality::High => SpriteQuality::Low,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteKey {
    pub kind: PieceKind,
    pub side: Side,
    pub quality: SpriteQuality,
    pub tile_width: u32,
}

pub type Rgba = [u8; 4];

/// Row-major RGBA image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgba>,
}

impl Sprite {
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Renders the sprite for `key`.
    pub fn render(key: SpriteKey) -> Self {
        let width = (key.tile_width * 3 / 5).max(3);
        let height = (width * 7 / 5).max(4);
        let samples = key.quality.samples_per_axis();
        let total = (samples * samples) as f32;
        let (fill, edge) = palette(key.side);

        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let mut hits = 0u32;
                let mut interior = 0u32;
                for sy in 0..samples {
                    for sx in 0..samples {
                        let u = (x as f32 + (sx as f32 + 0.5) / samples as f32) / width as f32;
                        let v = (y as f32 + (sy as f32 + 0.5) / samples as f32) / height as f32;
                        if silhouette(key.kind, u, v) {
                            hits += 1;
                            if silhouette(key.kind, 0.5 + (u - 0.5) * 1.12, 0.5 + (v - 0.5) * 1.06) {
                                interior += 1;
                            }
                        }
                    }
                }
                if hits == 0 {
                    pixels.push([0, 0, 0, 0]);
                    continue;
                }
                let base = if interior * 2 >= hits { fill } else { edge };
                let alpha = (255.0 * hits as f32 / total).round() as u8;
                pixels.push([base[0], base[1], base[2], alpha]);
            }
        }

        Self {
            width,
            height,
            pixels,
        }
    }
}

fn palette(side: Side) -> ([u8; 3], [u8; 3]) {
    match side {
        Side::White => ([236, 230, 214], [120, 108, 92]),
        Side::Black => ([52, 48, 66], [190, 182, 210]),
    }
}

fn ellipse(u: f32, v: f32, cu: f32, cv: f32, ru: f32, rv: f32) -> bool {
    let du = (u - cu) / ru;
    let dv = (v - cv) / rv;
    du * du + dv * dv <= 1.0
}

/// Unit-square silhouette, `u` rightwards and `v` downwards.
fn silhouette(kind: PieceKind, u: f32, v: f32) -> bool {
    let dx = (u - 0.5).abs();
    let base = (0.84..=0.96).contains(&v) && dx <= 0.36;
    let taper = |top: f32, top_half: f32, bottom_half: f32| {
        (top..=0.84).contains(&v) && dx <= top_half + (v - top) / (0.84 - top) * (bottom_half - top_half)
    };

    base || match kind {
        PieceKind::Pawn => ellipse(u, v, 0.5, 0.36, 0.15, 0.13) || taper(0.46, 0.07, 0.24),
        PieceKind::Rook => {
            let body = (0.26..=0.84).contains(&v) && dx <= 0.24;
            let crenel = (0.12..0.26).contains(&v) && dx <= 0.3 && ((u * 7.0) as u32) % 2 == 1;
            body || crenel
        }
        PieceKind::Knight => {
            let neck = taper(0.4, 0.14, 0.26);
            let head = ellipse(u, v, 0.46, 0.3, 0.2, 0.14);
            let snout = (0.26..=0.4).contains(&v) && (0.2..=0.5).contains(&u);
            let ear = ellipse(u, v, 0.56, 0.14, 0.05, 0.07);
            neck || head || snout || ear
        }
        PieceKind::Bishop => {
            ellipse(u, v, 0.5, 0.38, 0.15, 0.2)
                || ellipse(u, v, 0.5, 0.12, 0.05, 0.05)
                || taper(0.5, 0.08, 0.26)
        }
        PieceKind::Queen => {
            let crown = (0.18..=0.36).contains(&v) && dx <= 0.26 && {
                let phase = ((u - 0.24) * 10.0).rem_euclid(1.0);
                v >= 0.18 + 0.18 * (1.0 - (phase - 0.5).abs() * 2.0)
            };
            let jewels = [0.28, 0.5, 0.72]
                .iter()
                .any(|cu| ellipse(u, v, *cu, 0.15, 0.04, 0.04));
            crown || jewels || taper(0.34, 0.16, 0.28)
        }
        PieceKind::King => {
            let cross_v = dx <= 0.04 && (0.04..=0.3).contains(&v);
            let cross_h = (0.1..=0.17).contains(&v) && dx <= 0.12;
            let cap = ellipse(u, v, 0.5, 0.36, 0.2, 0.1);
            cross_v || cross_h || cap || taper(0.36, 0.15, 0.28)
        }
    }
}

/// Memoizes [`Sprite::render`]. Cleared wholesale on resize or quality change.
#[derive(Debug, Default)]
pub struct SpriteCache {
    entries: HashMap<SpriteKey, Arc<Sprite>>,
    hits: u64,
    misses: u64,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, key: SpriteKey) -> Arc<Sprite> {
        if let Some(sprite) = self.entries.get(&key) {
            self.hits += 1;
            return Arc::clone(sprite);
        }
        self.misses += 1;
        let sprite = Arc::new(Sprite::render(key));
        self.entries.insert(key, Arc::clone(&sprite));
        sprite
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn key(kind: PieceKind, quality: SpriteQuality) -> SpriteKey {
        SpriteKey {
            kind,
            side: Side::White,
            quality,
            tile_width: 48,
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        for kind in PieceKind::iter() {
            let k = key(kind, SpriteQuality::High);
            assert_eq!(Sprite::render(k), Sprite::render(k));
        }
    }

    #[test]
    fn every_kind_has_visible_pixels() {
        for kind in PieceKind::iter() {
            let sprite = Sprite::render(key(kind, SpriteQuality::Low));
            assert!(sprite.pixels.iter().any(|p| p[3] > 0), "{kind} is blank");
        }
    }

    #[test]
    fn high_quality_produces_partial_coverage() {
        let sprite = Sprite::render(key(PieceKind::Pawn, SpriteQuality::High));
        assert!(sprite.pixels.iter().any(|p| p[3] > 0 && p[3] < 255));
        let low = Sprite::render(key(PieceKind::Pawn, SpriteQuality::Low));
        assert!(low.pixels.iter().all(|p| p[3] == 0 || p[3] == 255));
    }

    #[test]
    fn cache_memoizes_and_clears() {
        let mut cache = SpriteCache::new();
        let k = key(PieceKind::Rook, SpriteQuality::High);
        let first = cache.get(k);
        let second = cache.get(k);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));

        cache.clear();
        assert!(cache.is_empty());
        cache.get(k);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn parses_quality_names() {
        assert_eq!("LOW".parse::<SpriteQuality>(), Ok(SpriteQuality::Low));
        assert_eq!("High".parse::<SpriteQuality>(), Ok(SpriteQuality::High));
        assert!("ultra".parse::<SpriteQuality>().is_err());
        assert_eq!(SpriteQuality::Low.to_string(), "low");
    }
}
