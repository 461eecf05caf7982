//! Selection state of the collaborator form.
//!
//! Tracks the role picked for a new collaborator and the entities chosen for
//! it. The set of levels offered always follows the resolver; changing the
//! role discards every previous choice.

use civica_models::{AssignableLevel, EntityId, Level, NewGrant, RoleName, Selection};

use crate::error::{AccessError, AccessResult};
use crate::resolver::assignable_levels;

#[derive(Debug, Clone)]
pub struct AccessSelection {
    acting: RoleName,
    target: Option<RoleName>,
    levels: Vec<AssignableLevel>,
    chosen: Vec<NewGrant>,
}

impl AccessSelection {
    pub fn new(acting: RoleName) -> Self {
        Self {
            acting,
            target: None,
            levels: Vec::new(),
            chosen: Vec::new(),
        }
    }

    pub fn acting(&self) -> RoleName {
        self.acting
    }

    pub fn target(&self) -> Option<RoleName> {
        self.target
    }

    /// Levels currently offered, ordered by rank.
    pub fn levels(&self) -> &[AssignableLevel] {
        &self.levels
    }

    pub fn select_role(&mut self, target: RoleName) {
        if self.target == Some(target) {
            return;
        }
        self.target = Some(target);
        self.levels = assignable_levels(self.acting, target);
        self.chosen.clear();
    }

    pub fn choose(
        &mut self,
        level: Level,
        entity_id: EntityId,
        parent_id: Option<EntityId>,
    ) -> AccessResult<()> {
        let target = self
            .target
            .ok_or_else(|| AccessError::validation("Select a role before choosing access levels"))?;
        let selection = self
            .levels
            .iter()
            .find(|l| l.level == level)
            .map(|l| l.selection)
            .ok_or_else(|| {
                AccessError::denied(format!(
                    "Role {} cannot assign level {} to role {}",
                    self.acting, level, target
                ))
            })?;

        let grant = NewGrant::new(level, entity_id, parent_id);
        match selection {
            Selection::Single => {
                self.chosen.retain(|g| g.level != level);
                self.chosen.push(grant);
            }
            Selection::Multiple => {
                if !self.chosen.iter().any(|g| g.key() == grant.key()) {
                    self.chosen.push(grant);
                }
            }
        }
        Ok(())
    }

    /// Returns whether anything was removed.
    pub fn remove(&mut self, level: Level, entity_id: EntityId) -> bool {
        let before = self.chosen.len();
        self.chosen.retain(|g| g.key() != (level, entity_id));
        before != self.chosen.len()
    }

    /// Chosen grants ordered by level, then entity id.
    pub fn grants(&self) -> Vec<NewGrant> {
        let mut grants = self.chosen.clone();
        grants.sort();
        grants
    }
}
