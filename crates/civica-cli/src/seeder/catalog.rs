//! Role and permission catalog seeding.

use civica_access::{AccessResult, BootstrapMode, BootstrapOutcome, CatalogStore, bootstrap};
use std::time::Instant;

/// Seed the catalog, or wipe and reseed it with `reset`.
pub async fn seed_catalog(store: &dyn CatalogStore, reset: bool) -> AccessResult<BootstrapOutcome> {
    let start_time = Instant::now();
    let mode = if reset {
        println!("🔄 Resetting role and permission catalog...");
        BootstrapMode::Reset
    } else {
        println!("🔐 Seeding role and permission catalog...");
        BootstrapMode::IfEmpty
    };

    let outcome = bootstrap(store, mode).await?;
    match outcome {
        BootstrapOutcome::Seeded(counts) => println!(
            "   ✓ {} roles, {} permissions, {} role permissions in {:?}",
            counts.roles,
            counts.permissions,
            counts.role_permissions,
            start_time.elapsed()
        ),
        BootstrapOutcome::AlreadySeeded => {
            println!("   ✓ Catalog already seeded, nothing to do (use --reset to reseed)")
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use civica_access::InMemoryStore;

    #[tokio::test]
    async fn test_seed_twice_then_reset() {
        let store = InMemoryStore::new();
        assert!(matches!(
            seed_catalog(&store, false).await.unwrap(),
            BootstrapOutcome::Seeded(_)
        ));
        assert_eq!(
            seed_catalog(&store, false).await.unwrap(),
            BootstrapOutcome::AlreadySeeded
        );
        assert!(matches!(
            seed_catalog(&store, true).await.unwrap(),
            BootstrapOutcome::Seeded(_)
        ));
    }
}
