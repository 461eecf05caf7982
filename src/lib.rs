//! # Civica API
//!
//! A REST API built with Rust, Axum, and PostgreSQL for running the field
//! operations of an electoral campaign: collaborators, their roles, and the
//! organizational entities each collaborator is allowed to work on.
//!
//! ## Overview
//!
//! - **Authentication**: JWT access tokens carrying the role and its permissions
//! - **Role hierarchy**: a fixed table of which role may create which
//! - **Scoped access**: every collaborator is bound to localidades, circuitos,
//!   escuelas or mesas, validated against the role that assigns them
//! - **Territory**: the `localidad → circuito → escuela → mesa` tree
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Auth extractor and permission extractors
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Login
//! │   ├── users/       # Collaborator creation, lookup and deletion
//! │   ├── access/      # Assignable levels and access grants
//! │   ├── roles/       # Roles, permission catalog, creatable roles
//! │   └── territory/   # Organizational entities
//! ├── docs.rs           # OpenAPI document
//! ├── router.rs         # Route tree and layers
//! ├── state.rs          # Shared application state
//! └── validator.rs      # Validated JSON extractor
//! ```
//!
//! Each feature module has the same shape:
//!
//! - `controller.rs`: HTTP handlers with their OpenAPI annotations
//! - `service.rs`: Business logic over the store traits
//! - `router.rs`: Axum router configuration
//!
//! The domain model lives in the workspace crates: `civica-access` holds the
//! hierarchy, the resolver and the store traits, `civica-db` the PostgreSQL
//! store.
//!
//! ## Role Hierarchy
//!
//! ```text
//! admin
//!   ↓ creates
//! jefe_campana
//!   ↓ creates
//! responsable_localidad
//!   ↓ creates
//! responsable_seccion
//!   ↓ creates
//! responsable_circuito
//!   ↓ creates
//! fiscal_general, logistica
//!   ↓ creates
//! fiscal_mesa
//! ```
//!
//! A role may assign a level to a new collaborator only when the level is
//! both grantable by the acting role and required by the target role.
//!
//! ## Error Handling
//!
//! Handlers return `Result<T, AppError>`; the body of every error is
//! `{"success": false, "error": "<message>"}`.
//!
//! | Status | Meaning |
//! |--------|---------|
//! | 400 | Malformed JSON body |
//! | 401 | Missing, invalid or expired token |
//! | 403 | Role or level not assignable by the caller |
//! | 404 | User or role not found |
//! | 409 | Email already registered, duplicate grant |
//! | 422 | Validation error, unknown role or level, missing entity |
//!
//! ## API Documentation
//!
//! Interactive documentation is served by Scalar at `/scalar`.

pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use civica_access;
pub use civica_auth;
pub use civica_config;
pub use civica_core;
pub use civica_db;
pub use civica_models;
