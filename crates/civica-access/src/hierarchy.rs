//! Role hierarchy: which roles each role may create.
//!
//! The creatable sets are enumerated per role. They are not derived from the
//! rank ordering and are not inherited from more privileged roles; a role
//! reaches exactly the roles listed for it, all of which rank strictly below it.

use civica_models::RoleName;

use RoleName::*;

/// Roles a user holding `role` may create.
pub const fn creatable(role: RoleName) -> &'static [RoleName] {
    match role {
        Admin => &[
            JefeCampana,
            ResponsableLocalidad,
            ResponsableSeccion,
            ResponsableCircuito,
            FiscalGeneral,
            FiscalMesa,
            Logistica,
        ],
        JefeCampana => &[
            ResponsableLocalidad,
            ResponsableSeccion,
            ResponsableCircuito,
            FiscalGeneral,
            FiscalMesa,
            Logistica,
        ],
        ResponsableLocalidad => &[
            ResponsableSeccion,
            ResponsableCircuito,
            FiscalGeneral,
            FiscalMesa,
            Logistica,
        ],
        ResponsableSeccion => &[ResponsableCircuito, FiscalGeneral, FiscalMesa, Logistica],
        ResponsableCircuito => &[FiscalGeneral, FiscalMesa, Logistica],
        FiscalGeneral => &[FiscalMesa],
        FiscalMesa | Logistica => &[],
    }
}

pub fn can_create(acting: RoleName, target: RoleName) -> bool {
    creatable(acting).contains(&target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn set(roles: &[RoleName]) -> HashSet<RoleName> {
        roles.iter().copied().collect()
    }

    #[test]
    fn test_responsable_circuito_creatable_set() {
        assert_eq!(
            set(creatable(ResponsableCircuito)),
            set(&[FiscalGeneral, FiscalMesa, Logistica])
        );
        assert!(!can_create(ResponsableCircuito, ResponsableSeccion));
    }

    #[test]
    fn test_every_creatable_set_matches_enumeration() {
        let expected: [(RoleName, &[RoleName]); 8] = [
            (
                Admin,
                &[
                    JefeCampana,
                    ResponsableLocalidad,
                    ResponsableSeccion,
                    ResponsableCircuito,
                    FiscalGeneral,
                    FiscalMesa,
                    Logistica,
                ],
            ),
            (
                JefeCampana,
                &[
                    ResponsableLocalidad,
                    ResponsableSeccion,
                    ResponsableCircuito,
                    FiscalGeneral,
                    FiscalMesa,
                    Logistica,
                ],
            ),
            (
                ResponsableLocalidad,
                &[
                    ResponsableSeccion,
                    ResponsableCircuito,
                    FiscalGeneral,
                    FiscalMesa,
                    Logistica,
                ],
            ),
            (
                ResponsableSeccion,
                &[ResponsableCircuito, FiscalGeneral, FiscalMesa, Logistica],
            ),
            (ResponsableCircuito, &[FiscalGeneral, FiscalMesa, Logistica]),
            (FiscalGeneral, &[FiscalMesa]),
            (FiscalMesa, &[]),
            (Logistica, &[]),
        ];
        for (role, roles) in expected {
            assert_eq!(set(creatable(role)), set(roles), "creatable({})", role);
        }
    }

    #[test]
    fn test_creatable_roles_rank_strictly_below() {
        for role in RoleName::ALL {
            for target in creatable(role) {
                assert!(
                    target.is_below(role),
                    "{} must rank below {}",
                    target,
                    role
                );
            }
        }
    }

    #[test]
    fn test_no_role_creates_itself_or_admin() {
        for role in RoleName::ALL {
            assert!(!can_create(role, role));
            assert!(!can_create(role, Admin));
        }
    }
}
