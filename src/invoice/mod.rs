//! Invoice module containing line items, the editor, document summaries,
//! documents, and the form session

pub mod document;
pub mod editor;
pub mod form;
pub mod line_item;
pub mod summary;

pub use document::*;
pub use editor::*;
pub use form::*;
pub use line_item::*;
pub use summary::*;
