//! Panels and popups composed by [`crate::presentation::ui`].
pub mod board;
pub mod decision;
pub mod footer;
pub mod header;
pub mod help;
pub mod loadout_editor;
pub mod side_panel;
pub mod topup_menu;
pub mod variant_picker;
