#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use civica::router::init_router;
use civica::state::AppState;
use civica_access::{
    AccessGrantStore, BootstrapMode, DirectoryStore, InMemoryStore, UserStore, bootstrap,
};
use civica_config::{CorsConfig, JwtConfig};
use civica_core::password::hash_password_with_cost;
use civica_models::{EntityId, Level, NewGrant, NewUser, OrgEntity, RoleName, User};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "testpassword123";

static EMAIL_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn generate_unique_email() -> String {
    let n = EMAIL_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("collaborator{}@example.com", n)
}

/// A small territory:
///
/// ```text
/// localidad_a ─ circuito_a1 ─ escuela_a1 ─ mesa_a1, mesa_a2
///             │              └ escuela_a2
///             └ circuito_a2 ─ escuela_a3
/// localidad_b ─ circuito_b1
/// ```
pub struct Territory {
    pub localidad_a: OrgEntity,
    pub localidad_b: OrgEntity,
    pub circuito_a1: OrgEntity,
    pub circuito_a2: OrgEntity,
    pub circuito_b1: OrgEntity,
    pub escuela_a1: OrgEntity,
    pub escuela_a2: OrgEntity,
    pub escuela_a3: OrgEntity,
    pub mesa_a1: OrgEntity,
    pub mesa_a2: OrgEntity,
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub territory: Territory,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

async fn create(store: &InMemoryStore, level: Level, name: &str, parent: Option<EntityId>) -> OrgEntity {
    store.create_entity(level, name, parent).await.unwrap()
}

async fn seed_territory(store: &InMemoryStore) -> Territory {
    let localidad_a = create(store, Level::Localidad, "Villa Norte", None).await;
    let localidad_b = create(store, Level::Localidad, "Puerto Sur", None).await;
    let circuito_a1 = create(store, Level::Circuito, "Circuito 1", Some(localidad_a.id)).await;
    let circuito_a2 = create(store, Level::Circuito, "Circuito 2", Some(localidad_a.id)).await;
    let circuito_b1 = create(store, Level::Circuito, "Circuito 3", Some(localidad_b.id)).await;
    let escuela_a1 = create(store, Level::Escuela, "Escuela Belgrano", Some(circuito_a1.id)).await;
    let escuela_a2 = create(store, Level::Escuela, "Escuela Sarmiento", Some(circuito_a1.id)).await;
    let escuela_a3 = create(store, Level::Escuela, "Escuela Moreno", Some(circuito_a2.id)).await;
    let mesa_a1 = create(store, Level::Mesa, "Mesa 101", Some(escuela_a1.id)).await;
    let mesa_a2 = create(store, Level::Mesa, "Mesa 102", Some(escuela_a1.id)).await;

    Territory {
        localidad_a,
        localidad_b,
        circuito_a1,
        circuito_a2,
        circuito_b1,
        escuela_a1,
        escuela_a2,
        escuela_a3,
        mesa_a1,
        mesa_a2,
    }
}

/// Router over a fresh in-memory store with the catalog and a territory seeded.
pub async fn setup_test_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    bootstrap(store.as_ref(), BootstrapMode::IfEmpty)
        .await
        .unwrap();
    app_over(store).await
}

/// Same territory, but the role/permission catalog is left empty.
pub async fn setup_test_app_without_catalog() -> TestApp {
    app_over(Arc::new(InMemoryStore::new())).await
}

async fn app_over(store: Arc<InMemoryStore>) -> TestApp {
    let territory = seed_territory(&store).await;

    let state = AppState::new(store.clone(), test_jwt_config(), CorsConfig::default());

    TestApp {
        router: init_router(state),
        store,
        territory,
    }
}

/// Inserts a user directly into the store, bypassing the HTTP pipeline.
pub async fn create_test_user(store: &InMemoryStore, role: RoleName, grants: &[NewGrant]) -> User {
    let new_user = NewUser {
        first_name: "Test".to_string(),
        last_name: role.display_name().to_string(),
        email: generate_unique_email(),
        password_hash: hash_password_with_cost(TEST_PASSWORD, 4).unwrap(),
        role,
    };
    let (user, _) = store.create_user(new_user, grants).await.unwrap();
    user
}

pub fn grant_of(entity: &OrgEntity) -> NewGrant {
    NewGrant::new(entity.level, entity.id, entity.parent_id)
}

pub fn access_level(entity: &OrgEntity) -> Value {
    json!({ "entity_type": entity.level.as_str(), "entity_id": entity.id })
}

/// Sends one request and returns the status with the parsed JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "Non-JSON response. Status: {}, Body: {:?}",
                status,
                String::from_utf8_lossy(&bytes)
            )
        })
    };
    (status, body)
}

pub async fn get_auth_token(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["access_token"]
        .as_str()
        .unwrap_or_else(|| panic!("No access_token in response: {}", body))
        .to_string()
}

/// Creates a user of `role` with `grants` and logs it in.
pub async fn login_as(app: &TestApp, role: RoleName, grants: &[NewGrant]) -> (User, String) {
    let user = create_test_user(&app.store, role, grants).await;
    let token = get_auth_token(&app.router, &user.email).await;
    (user, token)
}

pub fn collaborator_body(role: &str, access_levels: Vec<Value>) -> Value {
    json!({
        "first_name": "Ana",
        "last_name": "Gómez",
        "email": generate_unique_email(),
        "password": "a-strong-password",
        "role": role,
        "access_levels": access_levels,
    })
}

pub async fn grants_of(store: &InMemoryStore, user: &User) -> Vec<(Level, EntityId)> {
    store
        .list_grants(user.id)
        .await
        .unwrap()
        .into_iter()
        .map(|g| (g.entity_type, g.entity_id))
        .collect()
}
