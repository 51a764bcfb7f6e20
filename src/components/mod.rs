//! Reusable UI components
//!
//! - `keybindings` - step-aware key registry
//! - `help_overlay` - help popup
//! - `nav_bar` - bottom key hints

pub mod help_overlay;
pub mod keybindings;
pub mod nav_bar;

pub use help_overlay::HelpOverlay;
pub use keybindings::{KeyAction, KeybindingContext};
pub use nav_bar::NavBar;
