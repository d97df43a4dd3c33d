//! UI module
//!
//! Contains all terminal UI components:
//! - Styles for consistent theming
//! - The view node model and tree rendering
//! - Detail pane for tooltips and patches
//! - Header and footer
//! - Popups and overlays

mod styles;
pub mod nodes;
pub mod tree_view;
mod detail;
mod header;
mod footer;
mod popup;

pub use styles::Styles;
pub use nodes::{NodeKind, ViewNode};
pub use tree_view::render_tree_view;
pub use detail::{render_detail, Detail};
pub use header::render_header;
pub use footer::{render_footer, StatusMessage};
pub use popup::{render_confirm_popup, render_help_popup, render_input_popup};
