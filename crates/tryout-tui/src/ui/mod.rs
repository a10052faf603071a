//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, the form, overlays and the confirmation view
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling

pub mod input;
pub mod render;
pub mod styles;
