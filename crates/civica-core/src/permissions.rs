//! Permission naming scheme for the Civica API.
//!
//! Permissions are plain strings stored in the `permissions` table. CRUD
//! capabilities are named `entity.action`; the role-scoped user-creation
//! capabilities are named `users.create.<role>`.
//!
//! # Example
//!
//! ```ignore
//! use civica_core::permissions;
//!
//! assert_eq!(permissions::permission_name("mesas", "read"), "mesas.read");
//! assert_eq!(permissions::create_user_permission("fiscal_mesa"), "users.create.fiscal_mesa");
//! ```

/// Every entity the administration exposes CRUD pages for.
pub const ENTITIES: [&str; 11] = [
    "users",
    "roles",
    "permissions",
    "affiliates",
    "localidades",
    "secciones",
    "circuitos",
    "escuelas",
    "mesas",
    "citizens",
    "activities",
];

pub const USERS_READ: &str = "users.read";
pub const ROLES_READ: &str = "roles.read";

/// Prefix shared by all role-scoped user-creation permissions.
pub const CREATE_USER_PREFIX: &str = "users.create.";

/// Builds an `entity.action` permission name.
pub fn permission_name(entity: &str, action: &str) -> String {
    format!("{}.{}", entity, action)
}

/// Builds the `users.create.<role>` permission name.
pub fn create_user_permission(role: &str) -> String {
    format!("{}{}", CREATE_USER_PREFIX, role)
}
