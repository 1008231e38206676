//! Handler methods for [`super::EventLoop`], split by concern:
//! - `input`: keyboard and mouse, per application mode
//! - `rendering`: drawing a frame

mod input;
mod rendering;
