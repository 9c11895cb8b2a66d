//! Settlement module containing the greedy payment allocator and the
//! payment-receipt form session

pub mod allocator;
pub mod form;

pub use allocator::*;
pub use form::*;
