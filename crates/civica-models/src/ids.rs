//! Strongly-typed ID newtypes for domain entities.
//!
//! Every table uses an integer surrogate key (`BIGSERIAL`). Wrapping the raw
//! `i64` per entity prevents passing a `UserId` where an `EntityId` is
//! expected.
//!
//! # Example
//!
//! ```ignore
//! use civica_models::ids::{UserId, EntityId};
//!
//! fn list_grants(user: UserId) { /* ... */ }
//!
//! list_grants(UserId::new(7));      // OK
//! // list_grants(EntityId::new(7)); // Compile error
//! ```

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use utoipa::ToSchema;

macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(transparent)]
        #[schema(value_type = i64)]
        pub struct $name(pub i64);

        impl $name {
            #[inline]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            #[inline]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            #[inline]
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            #[inline]
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <i64 as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <i64 as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <i64 as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <i64 as Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <i64 as PgHasArrayType>::array_type_info()
            }
        }
    };
}

define_id!(
    /// Strongly-typed ID for users (collaborator accounts).
    UserId
);

define_id!(
    /// Strongly-typed ID for roles.
    RoleId
);

define_id!(
    /// Strongly-typed ID for permissions.
    PermissionId
);

define_id!(
    /// Strongly-typed ID for organizational entities (localidad, circuito, escuela, mesa).
    ///
    /// Each level lives in its own table, so an `EntityId` is only meaningful
    /// together with its [`Level`](crate::levels::Level).
    EntityId
);

define_id!(
    /// Strongly-typed ID for access grant rows.
    AccessGrantId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_debug() {
        let id = UserId::new(42);
        assert_eq!(format!("{}", id), "42");
        assert_eq!(format!("{:?}", id), "UserId(42)");
    }

    #[test]
    fn test_id_from_str() {
        let id: EntityId = "17".parse().unwrap();
        assert_eq!(id.get(), 17);
        assert!("seventeen".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&RoleId::new(3)).unwrap();
        assert_eq!(json, "3");
        let back: RoleId = serde_json::from_str("3").unwrap();
        assert_eq!(back, RoleId::new(3));
    }

    #[test]
    fn test_ids_order_by_value() {
        let mut ids = vec![EntityId::new(9), EntityId::new(2), EntityId::new(5)];
        ids.sort();
        assert_eq!(ids, vec![EntityId::new(2), EntityId::new(5), EntityId::new(9)]);
    }
}
