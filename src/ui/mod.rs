//! Immediate-mode UI for the settings panel

mod input;
mod panel;
mod rect;
pub mod widgets;

pub use input::{MouseState, UiContext};
pub use panel::{settings_panel, PanelAction, PanelState, PANEL_WIDTH};
pub use rect::Rect;
