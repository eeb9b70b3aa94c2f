//! # triphub-core
//!
//! Core crate for the TripHub admin client. Contains configuration
//! schemas, typed identifiers, REST envelope types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other TripHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
