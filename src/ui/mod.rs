//! UI rendering module for the user list
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod user_list;

pub use help_overlay::render as render_help_overlay;
pub use user_list::render_user_list;
