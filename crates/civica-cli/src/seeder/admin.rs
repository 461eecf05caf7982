//! Admin account creation.

use civica_access::{AccessError, AccessResult, UserStore};
use civica_core::hash_password;
use civica_models::{NewUser, RoleName, User};

/// Create an admin account. Admins are not scoped to any territory, so the
/// account carries no access grants.
pub async fn create_admin(
    store: &dyn UserStore,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> AccessResult<User> {
    if password.len() < 8 {
        return Err(AccessError::validation(
            "Password must be at least 8 characters",
        ));
    }
    let password_hash = hash_password(password).map_err(AccessError::storage)?;

    let (user, _) = store
        .create_user(
            NewUser {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                password_hash,
                role: RoleName::Admin,
            },
            &[],
        )
        .await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use civica_access::{AccessGrantStore, InMemoryStore};
    use civica_core::verify_password;

    #[tokio::test]
    async fn test_create_admin() {
        let store = InMemoryStore::new();
        let user = create_admin(&store, "Root", "User", "root@example.com", "supersecret")
            .await
            .unwrap();
        assert_eq!(user.role, RoleName::Admin);
        assert!(verify_password("supersecret", &user.password_hash).unwrap());
        assert!(store.list_grants(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_admin_rejects_short_password() {
        let store = InMemoryStore::new();
        let err = create_admin(&store, "Root", "User", "root@example.com", "short")
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_admin_duplicate_email() {
        let store = InMemoryStore::new();
        create_admin(&store, "A", "B", "dup@example.com", "password1")
            .await
            .unwrap();
        let err = create_admin(&store, "C", "D", "dup@example.com", "password2")
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::DuplicateEmail(_)));
    }
}
