//! HTTP handlers for configuration entries and the service endpoints around them.

pub mod common;
pub mod configs;
pub use common::*;
pub use configs::*;
