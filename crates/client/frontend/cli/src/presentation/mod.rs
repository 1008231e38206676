//! Terminal presentation: setup, pixel rasterizer, theme and widgets.
pub mod pixels;
pub mod terminal;
pub mod theme;
pub mod ui;
pub mod widgets;
