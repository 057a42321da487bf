//! Type definitions for partnerdash

mod error;
mod metrics;
mod records;
mod table;

pub use error::*;
pub use metrics::*;
pub use records::*;
pub use table::*;
