//! Utility functions and helpers
//!
//! ## Modules
//!
//! - [`timing`] - Phase timing with log output

pub mod timing;
