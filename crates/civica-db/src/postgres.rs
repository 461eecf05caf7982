//! PostgreSQL store.
//!
//! Every write runs inside one transaction; a failure anywhere rolls the
//! whole operation back when the transaction is dropped.

use std::collections::HashMap;

use async_trait::async_trait;
use civica_access::catalog::{CatalogCounts, CatalogPlan};
use civica_access::store::{
    AccessGrantStore, CatalogStore, DirectoryStore, UserStore, parent_link,
};
use civica_access::{AccessError, AccessResult};
use civica_models::{
    AccessGrant, EntityId, Level, NewGrant, NewUser, OrgEntity, Permission, Role, RoleName, User,
    UserId,
};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

const USER_COLUMNS: &str = "u.id, u.first_name, u.last_name, u.email, u.password_hash, \
     r.name AS role, u.status, u.created_at";

const GRANT_COLUMNS: &str = "id, user_id, entity_type, entity_id, parent_id, created_at";

fn storage(err: sqlx::Error) -> AccessError {
    AccessError::storage(err)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// Columns of an organizational table, shaped as an [`OrgEntity`] row.
fn entity_columns(level: Level) -> String {
    let parent = if level.parent().is_some() {
        "parent_id"
    } else {
        "NULL::bigint AS parent_id"
    };
    format!(
        "id, '{}'::text AS level, name, {}, status, created_at",
        level.as_str(),
        parent
    )
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn entity_exists(conn: &mut PgConnection, level: Level, id: EntityId) -> AccessResult<bool> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
        level.table()
    );
    sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .fetch_one(conn)
        .await
        .map_err(storage)
}

/// Locks the user row until the transaction ends, so grant writes for the
/// same user run one after another.
const LOCK_USER: &str = "SELECT id FROM users WHERE id = $1 FOR UPDATE";

async fn require_user(conn: &mut PgConnection, user_id: UserId) -> AccessResult<()> {
    let locked = sqlx::query_scalar::<_, UserId>(LOCK_USER)
        .bind(user_id)
        .fetch_optional(conn)
        .await
        .map_err(storage)?;
    match locked {
        Some(_) => Ok(()),
        None => Err(AccessError::NotFound(format!("User {}", user_id))),
    }
}

async fn insert_grant(
    conn: &mut PgConnection,
    user_id: UserId,
    grant: NewGrant,
) -> AccessResult<AccessGrant> {
    if !entity_exists(&mut *conn, grant.level, grant.entity_id).await? {
        return Err(AccessError::DanglingReference {
            level: grant.level,
            entity_id: grant.entity_id,
        });
    }

    let sql = format!(
        "INSERT INTO user_accesses (user_id, entity_type, entity_id, parent_id) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        GRANT_COLUMNS
    );
    sqlx::query_as::<_, AccessGrant>(&sql)
        .bind(user_id)
        .bind(grant.level)
        .bind(grant.entity_id)
        .bind(grant.parent_id)
        .fetch_one(conn)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AccessError::DuplicateGrant {
                    user_id,
                    level: grant.level,
                    entity_id: grant.entity_id,
                }
            } else {
                storage(err)
            }
        })
}

async fn fetch_grants(conn: &mut PgConnection, user_id: UserId) -> AccessResult<Vec<AccessGrant>> {
    let sql = format!(
        "SELECT {} FROM user_accesses WHERE user_id = $1",
        GRANT_COLUMNS
    );
    let mut grants = sqlx::query_as::<_, AccessGrant>(&sql)
        .bind(user_id)
        .fetch_all(conn)
        .await
        .map_err(storage)?;
    grants.sort_by_key(|g| (g.entity_type, g.entity_id));
    Ok(grants)
}

async fn fetch_user(conn: &mut PgConnection, user_id: UserId) -> AccessResult<Option<User>> {
    let sql = format!(
        "SELECT {} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.id = $1",
        USER_COLUMNS
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .fetch_optional(conn)
        .await
        .map_err(storage)
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn is_seeded(&self) -> AccessResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM roles)")
            .fetch_one(&self.pool)
            .await
            .map_err(storage)
    }

    #[instrument(skip(self, plan))]
    async fn apply_plan(&self, plan: &CatalogPlan, reset: bool) -> AccessResult<CatalogCounts> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        if reset {
            // Roles are upserted below so that users keep their role ids.
            sqlx::query("DELETE FROM role_permissions")
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
            sqlx::query("DELETE FROM permissions")
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        let mut role_ids: HashMap<RoleName, i64> = HashMap::new();
        for seed in &plan.roles {
            let id = sqlx::query_scalar::<_, i64>(
                "INSERT INTO roles (name, display_name, rank, is_system) VALUES ($1, $2, $3, TRUE) \
                 ON CONFLICT (name) DO UPDATE \
                 SET display_name = EXCLUDED.display_name, rank = EXCLUDED.rank \
                 RETURNING id",
            )
            .bind(seed.name)
            .bind(seed.display_name)
            .bind(seed.rank)
            .fetch_one(&mut *tx)
            .await
            .map_err(storage)?;
            role_ids.insert(seed.name, id);
        }

        let mut permission_ids: HashMap<&str, i64> = HashMap::new();
        for seed in &plan.permissions {
            let id = sqlx::query_scalar::<_, i64>(
                "INSERT INTO permissions (name, entity, action, is_system) \
                 VALUES ($1, $2, $3, TRUE) RETURNING id",
            )
            .bind(&seed.name)
            .bind(seed.entity)
            .bind(seed.action)
            .fetch_one(&mut *tx)
            .await
            .map_err(storage)?;
            permission_ids.insert(seed.name.as_str(), id);
        }

        for (role, permission) in &plan.grants {
            let role_id = role_ids
                .get(role)
                .ok_or_else(|| AccessError::BootstrapFailure(format!("unknown role {}", role)))?;
            let permission_id = permission_ids.get(permission.as_str()).ok_or_else(|| {
                AccessError::BootstrapFailure(format!("unknown permission {}", permission))
            })?;
            sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)")
                .bind(role_id)
                .bind(permission_id)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        tx.commit().await.map_err(storage)?;
        Ok(plan.counts())
    }

    async fn list_roles(&self) -> AccessResult<Vec<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, display_name, rank, is_system, status, created_at \
             FROM roles ORDER BY rank, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage)
    }

    async fn list_permissions(&self) -> AccessResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT id, name, entity, action, is_system, created_at FROM permissions ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage)
    }

    async fn role_permissions(&self, role: RoleName) -> AccessResult<Vec<Permission>> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1)")
                .bind(role)
                .fetch_one(&self.pool)
                .await
                .map_err(storage)?;
        if !exists {
            return Err(AccessError::NotFound(format!("Role {}", role)));
        }

        sqlx::query_as::<_, Permission>(
            "SELECT p.id, p.name, p.entity, p.action, p.is_system, p.created_at \
             FROM permissions p \
             JOIN role_permissions rp ON rp.permission_id = p.id \
             JOIN roles r ON r.id = rp.role_id \
             WHERE r.name = $1 \
             ORDER BY p.name",
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)
    }
}

#[async_trait]
impl DirectoryStore for PgStore {
    #[instrument(skip(self))]
    async fn create_entity(
        &self,
        level: Level,
        name: &str,
        parent_id: Option<EntityId>,
    ) -> AccessResult<OrgEntity> {
        let parent = parent_link(level, parent_id)?;
        let mut tx = self.pool.begin().await.map_err(storage)?;

        if let Some((parent_level, parent)) = parent {
            if !entity_exists(&mut tx, parent_level, parent).await? {
                return Err(AccessError::DanglingReference {
                    level: parent_level,
                    entity_id: parent,
                });
            }
        }

        let sql = match parent {
            Some(_) => format!(
                "INSERT INTO {} (name, parent_id) VALUES ($1, $2) RETURNING {}",
                level.table(),
                entity_columns(level)
            ),
            None => format!(
                "INSERT INTO {} (name) VALUES ($1) RETURNING {}",
                level.table(),
                entity_columns(level)
            ),
        };
        let mut query = sqlx::query_as::<_, OrgEntity>(&sql).bind(name);
        if let Some((_, parent)) = parent {
            query = query.bind(parent);
        }
        let entity = query.fetch_one(&mut *tx).await.map_err(|err| {
            match (is_foreign_key_violation(&err), parent) {
                (true, Some((parent_level, parent))) => AccessError::DanglingReference {
                    level: parent_level,
                    entity_id: parent,
                },
                _ => storage(err),
            }
        })?;

        tx.commit().await.map_err(storage)?;
        Ok(entity)
    }

    async fn find_entity(&self, level: Level, id: EntityId) -> AccessResult<Option<OrgEntity>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            entity_columns(level),
            level.table()
        );
        sqlx::query_as::<_, OrgEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)
    }

    async fn list_entities(
        &self,
        level: Level,
        parent_id: Option<EntityId>,
    ) -> AccessResult<Vec<OrgEntity>> {
        match (level.parent(), parent_id) {
            // Localidades have no parent to filter on.
            (None, Some(_)) => Ok(Vec::new()),
            (_, Some(parent)) => {
                let sql = format!(
                    "SELECT {} FROM {} WHERE parent_id = $1 ORDER BY id",
                    entity_columns(level),
                    level.table()
                );
                sqlx::query_as::<_, OrgEntity>(&sql)
                    .bind(parent)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(storage)
            }
            (_, None) => {
                let sql = format!(
                    "SELECT {} FROM {} ORDER BY id",
                    entity_columns(level),
                    level.table()
                );
                sqlx::query_as::<_, OrgEntity>(&sql)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(storage)
            }
        }
    }

    #[instrument(skip(self))]
    async fn clear_entities(&self) -> AccessResult<u64> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        sqlx::query("DELETE FROM user_accesses")
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        let mut removed = 0;
        for level in Level::ALL.into_iter().rev() {
            let sql = format!("DELETE FROM {}", level.table());
            removed += sqlx::query(&sql)
                .execute(&mut *tx)
                .await
                .map_err(storage)?
                .rows_affected();
        }

        tx.commit().await.map_err(storage)?;
        Ok(removed)
    }
}

#[async_trait]
impl AccessGrantStore for PgStore {
    #[instrument(skip(self))]
    async fn grant(&self, user_id: UserId, grant: NewGrant) -> AccessResult<AccessGrant> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        require_user(&mut tx, user_id).await?;
        let row = insert_grant(&mut tx, user_id, grant).await?;
        tx.commit().await.map_err(storage)?;
        Ok(row)
    }

    #[instrument(skip(self, grants), fields(count = grants.len()))]
    async fn replace_grants(
        &self,
        user_id: UserId,
        grants: &[NewGrant],
    ) -> AccessResult<Vec<AccessGrant>> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        require_user(&mut tx, user_id).await?;

        sqlx::query("DELETE FROM user_accesses WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        for grant in grants {
            insert_grant(&mut tx, user_id, *grant).await?;
        }

        let written = fetch_grants(&mut tx, user_id).await?;
        tx.commit().await.map_err(storage)?;
        Ok(written)
    }

    async fn list_grants(&self, user_id: UserId) -> AccessResult<Vec<AccessGrant>> {
        let mut conn = self.pool.acquire().await.map_err(storage)?;
        fetch_grants(&mut conn, user_id).await
    }

    async fn revoke_all(&self, user_id: UserId) -> AccessResult<u64> {
        let result = sqlx::query("DELETE FROM user_accesses WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl UserStore for PgStore {
    #[instrument(skip(self, user, grants), fields(email = %user.email, role = %user.role))]
    async fn create_user(
        &self,
        user: NewUser,
        grants: &[NewGrant],
    ) -> AccessResult<(User, Vec<AccessGrant>)> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let role_id = sqlx::query_scalar::<_, i64>("SELECT id FROM roles WHERE name = $1")
            .bind(user.role)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?
            .ok_or_else(|| {
                AccessError::validation(format!("Role {} has not been seeded", user.role))
            })?;

        let user_id = sqlx::query_scalar::<_, UserId>(
            "INSERT INTO users (first_name, last_name, email, password_hash, role_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(role_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AccessError::DuplicateEmail(user.email.clone())
            } else {
                storage(err)
            }
        })?;

        for grant in grants {
            insert_grant(&mut tx, user_id, *grant).await?;
        }

        let row = fetch_user(&mut tx, user_id)
            .await?
            .ok_or_else(|| AccessError::storage("inserted user vanished"))?;
        let written = fetch_grants(&mut tx, user_id).await?;

        tx.commit().await.map_err(storage)?;
        Ok((row, written))
    }

    async fn find_user(&self, id: UserId) -> AccessResult<Option<User>> {
        let mut conn = self.pool.acquire().await.map_err(storage)?;
        fetch_user(&mut conn, id).await
    }

    async fn find_user_by_email(&self, email: &str) -> AccessResult<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.email = $1",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: UserId) -> AccessResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        if result.rows_affected() == 0 {
            return Err(AccessError::NotFound(format!("User {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_columns_shape_rows() {
        assert_eq!(
            entity_columns(Level::Localidad),
            "id, 'localidad'::text AS level, name, NULL::bigint AS parent_id, status, created_at"
        );
        assert_eq!(
            entity_columns(Level::Mesa),
            "id, 'mesa'::text AS level, name, parent_id, status, created_at"
        );
    }

    #[test]
    fn test_user_lock_is_row_level() {
        assert!(LOCK_USER.ends_with("FOR UPDATE"));
    }

    async fn seeded_user(store: &PgStore) -> (User, OrgEntity, OrgEntity) {
        civica_access::bootstrap(store, civica_access::BootstrapMode::IfEmpty)
            .await
            .unwrap();
        let localidad = store
            .create_entity(Level::Localidad, "Villa Norte", None)
            .await
            .unwrap();
        let circuito = store
            .create_entity(Level::Circuito, "Circuito 1", Some(localidad.id))
            .await
            .unwrap();
        let first = store
            .create_entity(Level::Escuela, "Escuela Belgrano", Some(circuito.id))
            .await
            .unwrap();
        let second = store
            .create_entity(Level::Escuela, "Escuela Moreno", Some(circuito.id))
            .await
            .unwrap();
        let (user, _) = store
            .create_user(
                NewUser {
                    first_name: "Ana".to_string(),
                    last_name: "Gómez".to_string(),
                    email: "ana@example.com".to_string(),
                    password_hash: "x".to_string(),
                    role: RoleName::FiscalGeneral,
                },
                &[],
            )
            .await
            .unwrap();
        (user, first, second)
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore = "Requires DATABASE_URL"]
    async fn test_concurrent_replaces_never_mix(pool: PgPool) {
        let store = PgStore::new(pool);
        let (user, first, second) = seeded_user(&store).await;
        let a = [NewGrant::new(Level::Escuela, first.id, first.parent_id)];
        let b = [NewGrant::new(Level::Escuela, second.id, second.parent_id)];

        for _ in 0..20 {
            let (ra, rb) = tokio::join!(
                store.replace_grants(user.id, &a),
                store.replace_grants(user.id, &b)
            );
            ra.unwrap();
            rb.unwrap();

            let grants = store.list_grants(user.id).await.unwrap();
            assert_eq!(grants.len(), 1);
            assert!(grants[0].entity_id == first.id || grants[0].entity_id == second.id);
        }
    }
}
