// Application layer - use cases on top of a voucher repository

mod error;
mod service;

pub use error::*;
pub use service::*;
