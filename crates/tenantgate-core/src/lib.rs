//! # tenantgate-core
//!
//! Core crate for TenantGate. Contains configuration schemas, named policy
//! constants, typed identifiers, the injectable clock and stamp-store seams,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other TenantGate crates.

pub mod config;
pub mod error;
pub mod policy;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
