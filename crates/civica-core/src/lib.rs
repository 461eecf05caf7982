//! # Civica Core
//!
//! Core types, errors, and utilities for the Civica API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Password hashing and verification
//! - [`permissions`]: Permission naming scheme (`entity.action`, `users.create.<role>`)
//!
//! # Example
//!
//! ```ignore
//! use civica_core::errors::AppError;
//! use civica_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("User not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod password;
pub mod permissions;

pub use errors::AppError;
pub use password::{hash_password, verify_password};
