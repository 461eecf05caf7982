//! # Civica Access
//!
//! The role-scoped access-control model: who may create a collaborator with
//! which role, and which organizational entities that collaborator may be
//! scoped to.
//!
//! - [`hierarchy`]: Role creation table
//! - [`catalog`]: Permission catalog plan and bootstrap
//! - [`resolver`]: Assignable-level resolver
//! - [`selection`]: Collaborator form selection state
//! - [`assignment`]: Validation pipeline for requested access levels
//! - [`store`]: Storage traits
//! - [`memory`]: In-memory store, used by tests and database-less runs
//! - [`cache`]: Per-operation entity cache
//! - [`error`]: Error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use civica_access::resolver::assignable_levels;
//! use civica_models::{Level, RoleName};
//!
//! let levels = assignable_levels(RoleName::ResponsableCircuito, RoleName::FiscalGeneral);
//! assert_eq!(levels[0].level, Level::Escuela);
//! ```

pub mod assignment;
pub mod cache;
pub mod catalog;
pub mod error;
pub mod hierarchy;
pub mod memory;
pub mod resolver;
pub mod selection;
pub mod store;

pub use catalog::{BootstrapMode, BootstrapOutcome, CatalogCounts, CatalogPlan, bootstrap};
pub use error::{AccessError, AccessResult};
pub use hierarchy::{can_create, creatable};
pub use memory::InMemoryStore;
pub use resolver::assignable_levels;
pub use selection::AccessSelection;
pub use store::{AccessGrantStore, CatalogStore, DirectoryStore, Store, UserStore};
