//! Request extractors for authentication and permission checks.
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] verifies the JWT and exposes its claims
//! 3. Permission extractors such as [`auth::RequireUsersRead`] reject with
//!    403 when the claim set lacks the permission
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, RequireUsersRead};
//!
//! async fn get_user(RequireUsersRead(auth_user): RequireUsersRead) -> impl IntoResponse {
//!     let acting = auth_user.role();
//!     // ...
//! }
//! ```

pub mod auth;
