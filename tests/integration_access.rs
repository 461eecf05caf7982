mod common;

use axum::http::StatusCode;
use civica_models::{Level, RoleName};
use common::{access_level, grant_of, grants_of, login_as, send, setup_test_app};
use serde_json::json;

#[tokio::test]
async fn test_assignable_levels_for_fiscal_general() {
    let app = setup_test_app().await;
    let (_, token) = login_as(
        &app,
        RoleName::ResponsableCircuito,
        &[grant_of(&app.territory.circuito_a1)],
    )
    .await;

    let (status, body) = send(
        &app.router,
        "GET",
        "/api/access/levels?target_role=fiscal_general",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acting_role"], "responsable_circuito");
    assert_eq!(body["target_role"], "fiscal_general");
    assert_eq!(
        body["levels"],
        json!([{ "level": "escuela", "selection": "single" }])
    );
}

#[tokio::test]
async fn test_assignable_levels_in_hierarchy_order() {
    let app = setup_test_app().await;
    let (_, token) = login_as(&app, RoleName::Admin, &[]).await;

    let (status, body) = send(
        &app.router,
        "GET",
        "/api/access/levels?target_role=responsable_localidad",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let levels: Vec<&str> = body["levels"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["level"].as_str().unwrap())
        .collect();
    assert_eq!(levels, vec!["localidad", "circuito", "escuela"]);
    assert!(
        body["levels"]
            .as_array()
            .unwrap()
            .iter()
            .all(|l| l["selection"] == "multiple")
    );
}

#[tokio::test]
async fn test_fiscal_mesa_can_assign_nothing() {
    let app = setup_test_app().await;
    let (_, token) = login_as(&app, RoleName::FiscalMesa, &[grant_of(&app.territory.mesa_a1)]).await;

    for target in RoleName::ALL {
        let (status, body) = send(
            &app.router,
            "GET",
            &format!("/api/access/levels?target_role={}", target),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["levels"], json!([]), "target {}", target);
    }
}

#[tokio::test]
async fn test_assignable_levels_unknown_role() {
    let app = setup_test_app().await;
    let (_, token) = login_as(&app, RoleName::Admin, &[]).await;

    let (status, body) = send(
        &app.router,
        "GET",
        "/api/access/levels?target_role=root",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Unknown role 'root'");
}

#[tokio::test]
async fn test_list_user_access_includes_entity_names() {
    let app = setup_test_app().await;
    let (_, token) = login_as(&app, RoleName::Admin, &[]).await;
    let (logistica, _) = login_as(
        &app,
        RoleName::Logistica,
        &[
            grant_of(&app.territory.escuela_a1),
            grant_of(&app.territory.circuito_a2),
        ],
    )
    .await;

    let (status, body) = send(
        &app.router,
        "GET",
        &format!("/api/users/{}/access", logistica.id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "logistica");
    assert_eq!(
        body["access"],
        json!([
            {
                "entity_type": "circuito",
                "entity_id": app.territory.circuito_a2.id,
                "entity_name": "Circuito 2",
                "parent_id": app.territory.localidad_a.id,
            },
            {
                "entity_type": "escuela",
                "entity_id": app.territory.escuela_a1.id,
                "entity_name": "Escuela Belgrano",
                "parent_id": app.territory.circuito_a1.id,
            }
        ])
    );
}

#[tokio::test]
async fn test_replace_access() {
    let app = setup_test_app().await;
    let (_, token) = login_as(&app, RoleName::Admin, &[]).await;
    let (logistica, _) = login_as(
        &app,
        RoleName::Logistica,
        &[grant_of(&app.territory.circuito_a1)],
    )
    .await;

    let (status, body) = send(
        &app.router,
        "PUT",
        &format!("/api/users/{}/access", logistica.id),
        Some(&token),
        Some(json!({
            "access_levels": [
                access_level(&app.territory.escuela_a3),
                access_level(&app.territory.circuito_b1),
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["access"].as_array().unwrap().len(), 2);
    assert_eq!(
        grants_of(&app.store, &logistica).await,
        vec![
            (Level::Circuito, app.territory.circuito_b1.id),
            (Level::Escuela, app.territory.escuela_a3.id),
        ]
    );
}

#[tokio::test]
async fn test_replace_access_is_all_or_nothing() {
    let app = setup_test_app().await;
    let (_, token) = login_as(&app, RoleName::Admin, &[]).await;
    let (logistica, _) = login_as(
        &app,
        RoleName::Logistica,
        &[grant_of(&app.territory.circuito_a1)],
    )
    .await;
    let before = grants_of(&app.store, &logistica).await;

    let (status, _) = send(
        &app.router,
        "PUT",
        &format!("/api/users/{}/access", logistica.id),
        Some(&token),
        Some(json!({
            "access_levels": [
                access_level(&app.territory.escuela_a3),
                { "entity_type": "escuela", "entity_id": 999_999 },
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(grants_of(&app.store, &logistica).await, before);

    let (status, _) = send(
        &app.router,
        "PUT",
        &format!("/api/users/{}/access", logistica.id),
        Some(&token),
        Some(json!({
            "access_levels": [
                access_level(&app.territory.escuela_a3),
                access_level(&app.territory.escuela_a3),
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(grants_of(&app.store, &logistica).await, before);
}

#[tokio::test]
async fn test_replace_access_uses_current_role() {
    let app = setup_test_app().await;
    let (_, token) = login_as(
        &app,
        RoleName::ResponsableCircuito,
        &[grant_of(&app.territory.circuito_a1)],
    )
    .await;
    let (fiscal, _) = login_as(
        &app,
        RoleName::FiscalGeneral,
        &[grant_of(&app.territory.escuela_a1)],
    )
    .await;

    // Single-select for fiscal_general escuelas.
    let (status, _) = send(
        &app.router,
        "PUT",
        &format!("/api/users/{}/access", fiscal.id),
        Some(&token),
        Some(json!({
            "access_levels": [
                access_level(&app.territory.escuela_a1),
                access_level(&app.territory.escuela_a2),
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app.router,
        "PUT",
        &format!("/api/users/{}/access", fiscal.id),
        Some(&token),
        Some(json!({ "access_levels": [access_level(&app.territory.escuela_a2)] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(
        grants_of(&app.store, &fiscal).await,
        vec![(Level::Escuela, app.territory.escuela_a2.id)]
    );
}

#[tokio::test]
async fn test_replace_access_of_superior_is_denied() {
    let app = setup_test_app().await;
    let (_, token) = login_as(&app, RoleName::FiscalGeneral, &[grant_of(&app.territory.escuela_a1)]).await;
    let (superior, _) = login_as(
        &app,
        RoleName::ResponsableCircuito,
        &[grant_of(&app.territory.circuito_a1)],
    )
    .await;

    let (status, _) = send(
        &app.router,
        "PUT",
        &format!("/api/users/{}/access", superior.id),
        Some(&token),
        Some(json!({ "access_levels": [access_level(&app.territory.escuela_a2)] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        grants_of(&app.store, &superior).await,
        vec![(Level::Circuito, app.territory.circuito_a1.id)]
    );
}
