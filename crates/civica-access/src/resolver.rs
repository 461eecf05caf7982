//! Assignable-level resolver.
//!
//! Given the role of the acting user and the role chosen for a collaborator,
//! computes the organizational levels the collaborator may be scoped to:
//! the levels the acting role can hand out, intersected with the levels the
//! target role needs.

use civica_models::{AssignableLevel, Level, LevelSet, RoleName, Selection};

use Level::*;
use RoleName::*;

/// Levels a user with `role` may hand out to others.
pub const fn levels_grantable_by(role: RoleName) -> LevelSet {
    match role {
        Admin => LevelSet::ALL,
        ResponsableLocalidad => LevelSet::of(&[Circuito, Escuela, Mesa]),
        ResponsableCircuito => LevelSet::of(&[Escuela, Mesa]),
        FiscalGeneral => LevelSet::of(&[Mesa]),
        JefeCampana | ResponsableSeccion | FiscalMesa | Logistica => LevelSet::EMPTY,
    }
}

/// Levels at which a user with `role` must be scoped.
pub const fn levels_required_by(role: RoleName) -> LevelSet {
    match role {
        FiscalMesa => LevelSet::of(&[Mesa]),
        FiscalGeneral => LevelSet::of(&[Escuela]),
        JefeCampana => LevelSet::ALL,
        Logistica => LevelSet::of(&[Circuito, Escuela]),
        ResponsableCircuito => LevelSet::of(&[Circuito, Escuela]),
        ResponsableLocalidad => LevelSet::of(&[Localidad, Circuito, Escuela]),
        ResponsableSeccion => LevelSet::of(&[Circuito, Escuela]),
        Admin => LevelSet::EMPTY,
    }
}

/// How many entities of `level` a collaborator with `target` may hold.
pub const fn selection_for(target: RoleName, level: Level) -> Selection {
    match (target, level) {
        (FiscalGeneral, Escuela) | (FiscalMesa, Mesa) => Selection::Single,
        _ => Selection::Multiple,
    }
}

pub const fn assignable_set(acting: RoleName, target: RoleName) -> LevelSet {
    levels_grantable_by(acting).intersection(levels_required_by(target))
}

/// Assignable levels ordered by level rank, each with its selection arity.
///
/// An empty result is a valid answer: the acting role cannot scope the
/// target role at all.
pub fn assignable_levels(acting: RoleName, target: RoleName) -> Vec<AssignableLevel> {
    assignable_set(acting, target)
        .iter()
        .map(|level| AssignableLevel {
            level,
            selection: selection_for(target, level),
        })
        .collect()
}
