//! Organizational levels and entities.
//!
//! The territory is a four-level tree: `localidad → circuito → escuela → mesa`.
//! Each level lives in its own table and every non-root row references its
//! parent one level up.

use crate::ids::EntityId;
use crate::value_types::{Status, ValueTypeError, impl_text_type};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

/// An organizational level. Ordered by rank: `Localidad < Circuito < Escuela < Mesa`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Localidad = 1,
    Circuito = 2,
    Escuela = 3,
    Mesa = 4,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Localidad, Level::Circuito, Level::Escuela, Level::Mesa];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Localidad => "localidad",
            Self::Circuito => "circuito",
            Self::Escuela => "escuela",
            Self::Mesa => "mesa",
        }
    }

    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Table holding the entities of this level.
    pub const fn table(self) -> &'static str {
        match self {
            Self::Localidad => "localidades",
            Self::Circuito => "circuitos",
            Self::Escuela => "escuelas",
            Self::Mesa => "mesas",
        }
    }

    /// The level one rung up, `None` for the root.
    pub const fn parent(self) -> Option<Level> {
        match self {
            Self::Localidad => None,
            Self::Circuito => Some(Self::Localidad),
            Self::Escuela => Some(Self::Circuito),
            Self::Mesa => Some(Self::Escuela),
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8 - 1)
    }
}

impl FromStr for Level {
    type Err = ValueTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ValueTypeError::UnknownLevel(s.to_string()))
    }
}

impl_text_type!(Level);

/// A set of levels, iterated in rank order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LevelSet(u8);

impl LevelSet {
    pub const EMPTY: LevelSet = LevelSet(0);
    pub const ALL: LevelSet = LevelSet::of(&Level::ALL);

    pub const fn of(levels: &[Level]) -> LevelSet {
        let mut bits = 0;
        let mut i = 0;
        while i < levels.len() {
            bits |= levels[i].bit();
            i += 1;
        }
        LevelSet(bits)
    }

    pub const fn contains(self, level: Level) -> bool {
        self.0 & level.bit() != 0
    }

    pub const fn intersection(self, other: LevelSet) -> LevelSet {
        LevelSet(self.0 & other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn insert(&mut self, level: Level) {
        self.0 |= level.bit();
    }

    pub fn iter(self) -> impl Iterator<Item = Level> {
        Level::ALL.into_iter().filter(move |level| self.contains(*level))
    }

    pub fn to_vec(self) -> Vec<Level> {
        self.iter().collect()
    }
}

impl FromIterator<Level> for LevelSet {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        let mut set = LevelSet::EMPTY;
        for level in iter {
            set.insert(level);
        }
        set
    }
}

impl fmt::Debug for LevelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for LevelSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// A row of one of the organizational tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrgEntity {
    pub id: EntityId,
    pub level: Level,
    pub name: String,
    /// `None` only for localidades.
    pub parent_id: Option<EntityId>,
    pub status: Status,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEntityDto {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Name must be between 1 and 200 characters"
    ))]
    pub name: String,
    /// Required for every level except `localidad`.
    pub parent_id: Option<EntityId>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct EntityFilterParams {
    /// Restrict the listing to children of this entity.
    pub parent_id: Option<EntityId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_order_is_rank_order() {
        assert!(Level::Localidad < Level::Circuito);
        assert!(Level::Circuito < Level::Escuela);
        assert!(Level::Escuela < Level::Mesa);
        assert_eq!(Level::Mesa.rank(), 4);
    }

    #[test]
    fn test_level_parse_rejects_unknown() {
        assert_eq!("mesa".parse::<Level>().unwrap(), Level::Mesa);
        assert_eq!(
            "seccion".parse::<Level>(),
            Err(ValueTypeError::UnknownLevel("seccion".into()))
        );
        assert!("Mesa".parse::<Level>().is_err());
    }

    #[test]
    fn test_parent_chain() {
        assert_eq!(Level::Localidad.parent(), None);
        assert_eq!(Level::Circuito.parent(), Some(Level::Localidad));
        assert_eq!(Level::Mesa.parent(), Some(Level::Escuela));
    }

    #[test]
    fn test_level_set_operations() {
        let a = LevelSet::of(&[Level::Escuela, Level::Mesa]);
        let b = LevelSet::of(&[Level::Circuito, Level::Escuela]);
        assert_eq!(a.intersection(b).to_vec(), vec![Level::Escuela]);
        assert!(LevelSet::EMPTY.is_empty());
        assert_eq!(LevelSet::ALL.len(), 4);
    }

    #[test]
    fn test_level_set_iterates_in_rank_order() {
        let set: LevelSet = [Level::Mesa, Level::Localidad, Level::Escuela]
            .into_iter()
            .collect();
        assert_eq!(
            set.to_vec(),
            vec![Level::Localidad, Level::Escuela, Level::Mesa]
        );
        assert_eq!(
            serde_json::to_string(&set).unwrap(),
            r#"["localidad","escuela","mesa"]"#
        );
    }

    #[test]
    fn test_create_entity_dto_validation() {
        let valid = CreateEntityDto {
            name: "Escuela N° 12".to_string(),
            parent_id: Some(EntityId::new(3)),
        };
        assert!(valid.validate().is_ok());

        let empty = CreateEntityDto {
            name: String::new(),
            parent_id: None,
        };
        assert!(empty.validate().is_err());
    }
}
