//! Render engine: themed HTML and PDF output for documents

pub mod html;
pub mod pdf;
pub mod theme;

pub use html::*;
pub use pdf::*;
pub use theme::*;
