//! Validation of requested access levels for a collaborator.
//!
//! Turns the raw `[{entity_type, entity_id}]` list of a create or replace
//! request into grants ready to be written, checking in order:
//!
//! 1. the acting role may create the target role;
//! 2. the acting role can scope the target role to at least one level;
//! 3. at least one level was requested;
//! 4. every requested level is assignable;
//! 5. single-select levels carry at most one entity;
//! 6. every entity exists (its parent id is copied from the directory).

use civica_models::{AccessLevelRequest, AssignableLevel, Level, NewGrant, RoleName, Selection};
use tracing::instrument;

use crate::cache::EntityCache;
use crate::error::{AccessError, AccessResult};
use crate::hierarchy::can_create;
use crate::resolver::assignable_levels;
use crate::store::DirectoryStore;

/// Steps 1 and 2: may `acting` create `target`, and at which levels.
pub fn authorize_target(
    acting: RoleName,
    target: RoleName,
) -> AccessResult<Vec<AssignableLevel>> {
    if !can_create(acting, target) {
        return Err(AccessError::denied(format!(
            "Role {} cannot create users with role {}",
            acting, target
        )));
    }
    let levels = assignable_levels(acting, target);
    if levels.is_empty() {
        return Err(AccessError::NoAssignableLevels { acting, target });
    }
    Ok(levels)
}

/// Run the full pipeline and return the grants to write, ordered by level
/// then entity id.
#[instrument(skip(directory, requested), fields(requested = requested.len()))]
pub async fn resolve_grants(
    directory: &dyn DirectoryStore,
    acting: RoleName,
    target: RoleName,
    requested: &[AccessLevelRequest],
) -> AccessResult<Vec<NewGrant>> {
    let levels = authorize_target(acting, target)?;

    if requested.is_empty() {
        return Err(AccessError::validation(
            "At least one access level is required",
        ));
    }

    let mut parsed = Vec::with_capacity(requested.len());
    for request in requested {
        let level: Level = request.entity_type.parse()?;
        if !levels.iter().any(|l| l.level == level) {
            return Err(AccessError::denied(format!(
                "Role {} cannot assign level {} to role {}",
                acting, level, target
            )));
        }
        parsed.push((level, request.entity_id));
    }

    for offered in levels.iter().filter(|l| l.selection == Selection::Single) {
        let picked = parsed.iter().filter(|(l, _)| *l == offered.level).count();
        if picked > 1 {
            return Err(AccessError::validation(format!(
                "Only one {} can be assigned to role {}",
                offered.level, target
            )));
        }
    }

    let mut cache = EntityCache::new(directory);
    let mut grants = Vec::with_capacity(parsed.len());
    for (level, entity_id) in parsed {
        let entity = cache.require(level, entity_id).await?;
        grants.push(NewGrant::new(level, entity_id, entity.parent_id));
    }
    grants.sort();
    Ok(grants)
}
