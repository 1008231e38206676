//! Board panel: the isometric pixel surface inside a titled frame.
use client_frontend_core::{Renderer, Surface};
use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, Borders},
};

use crate::presentation::pixels::PixelSurface;

const CURSOR_COLOR: [u8; 4] = [255, 255, 255, 220];

/// Outer block for the board; returns the inner area the surface covers.
pub fn frame_block(frame: &mut Frame, area: Rect, title: String) -> Rect {
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Outlines the keyboard cursor tile on top of a drawn frame.
pub fn draw_cursor(surface: &mut PixelSurface, renderer: &Renderer, cursor: game_core::Square) {
    let quad = renderer.projection().tile_quad(cursor);
    surface.stroke_quad(&quad, CURSOR_COLOR);
}

pub fn render(frame: &mut Frame, area: Rect, surface: &PixelSurface) {
    frame.render_widget(surface, area);
}
