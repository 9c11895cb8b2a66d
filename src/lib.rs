//! # Billing Core
//!
//! A billing library providing GST-compliant document workflows: tax and
//! discount calculation, line-item editing, document summaries, payment
//! settlement, and themed HTML/PDF rendering.
//!
//! ## Features
//!
//! - **GST calculations**: Indian GST compliance with CGST/SGST/IGST and cess
//! - **Line-item editing**: Catalog-driven lines with discounts and rate overrides
//! - **Document summaries**: Per-rate tax grouping with TCS on the grand total
//! - **Settlement**: Greedy payment allocation with per-document TDS
//! - **Rendering**: Sixteen themes over HTML and single-page A4 PDF output
//! - **Storage abstraction**: Backend-agnostic design with trait-based storage
//!
//! ## Quick Start
//!
//! ```rust
//! use billing_core::{GstBreakup, GstRate};
//! use bigdecimal::BigDecimal;
//!
//! let rate = GstRate::intra_state(BigDecimal::from(18), BigDecimal::from(0));
//! let breakup = GstBreakup::calculate(BigDecimal::from(1000), rate).unwrap();
//! assert_eq!(breakup.total_gst_amount, BigDecimal::from(180));
//! ```

pub mod invoice;
pub mod render;
pub mod settlement;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use invoice::*;
pub use render::{render_html, render_pdf, InvoiceView, Palette, PdfOutput, ThemeKey};
pub use settlement::{
    allocate, Allocation, AllocationEntry, AppliedWithholding, Outstanding, Settlement,
    SettlementForm,
};
pub use tax::*;
pub use traits::*;
pub use types::*;
