//! Tax module containing the GST engine and TCS/TDS withholding rates

pub mod gst;
pub mod tcs;

pub use gst::*;
pub use tcs::*;
