//! # Civica Models
//!
//! Domain models and DTOs for the Civica API: database rows, request/response
//! bodies and the closed enumerations of the access-control model.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed integer ids
//! - [`value_types`]: Text-backed enumerations and their parse errors
//! - [`roles`]: Role names, ranks, permissions
//! - [`levels`]: Organizational levels, level sets and entities
//! - [`access`]: Access grants and assignability DTOs
//! - [`users`]: Collaborator accounts
//! - [`auth`]: Login DTOs
//!
//! # Example
//!
//! ```ignore
//! use civica_models::{Level, LevelSet, RoleName};
//!
//! let role: RoleName = "fiscal_general".parse()?;
//! assert_eq!(role.rank(), 6);
//! assert!(LevelSet::ALL.contains(Level::Mesa));
//! ```

pub mod access;
pub mod auth;
pub mod ids;
pub mod levels;
pub mod roles;
pub mod users;
pub mod value_types;

pub use access::{
    AccessGrant, AccessGrantView, AccessLevelRequest, AssignableLevel, AssignableLevelsQuery,
    AssignableLevelsResponse, NewGrant, ReplaceAccessDto, Selection, UserAccessResponse,
};
pub use auth::{LoginRequest, LoginResponse};
pub use ids::{AccessGrantId, EntityId, PermissionId, RoleId, UserId};
pub use levels::{CreateEntityDto, EntityFilterParams, Level, LevelSet, OrgEntity};
pub use roles::{Permission, PermissionAction, Role, RoleName, RoleOption, RolePermission, RoleWithPermissions};
pub use users::{CollaboratorResponse, CreateCollaboratorDto, NewUser, User};
pub use value_types::{Status, ValueTypeError};
