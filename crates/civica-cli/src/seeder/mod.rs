//! Database seeding.
//!
//! - [`catalog`]: role and permission catalog
//! - [`admin`]: admin accounts
//! - [`territory`]: fake organizational tree

pub mod admin;
pub mod catalog;
pub mod models;
pub mod territory;

pub use admin::create_admin;
pub use catalog::seed_catalog;
pub use models::{EntitySeed, TerritoryConfig};
pub use territory::{clear_territory, generate_children, generate_localidades, seed_territory};
