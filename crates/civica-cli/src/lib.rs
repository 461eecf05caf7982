//! # Civica CLI
//!
//! Administrative utilities: catalog bootstrap, admin account creation and
//! fake territory generation for development.
//!
//! ## Usage
//!
//! ```ignore
//! use civica_cli::seeder::{TerritoryConfig, seed_territory};
//!
//! let config = TerritoryConfig::new(3).with_circuitos(4);
//! seed_territory(&pool, &config).await?;
//! ```

pub mod seeder;
