//! # Civica Auth
//!
//! Authentication types and JWT utilities for the Civica API.
//!
//! - [`claims`]: Access token claims
//! - [`jwt`]: Token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use civica_auth::{create_access_token, verify_token};
//! use civica_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(&user, permissions, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, user.role);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
