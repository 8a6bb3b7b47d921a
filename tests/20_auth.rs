mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use activities_api::auth::{generate_jwt, Claims};
use common::TestApp;

#[tokio::test]
async fn update_without_token_is_unauthorized() -> Result<()> {
    let app = TestApp::new().await;
    let id = app.create_activity("run").await?;

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/activities/{}", id),
            None,
            Some(json!({ "activity": { "title": "walk" } })),
        )
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn delete_with_garbage_token_is_unauthorized() -> Result<()> {
    let app = TestApp::new().await;
    let id = app.create_activity("run").await?;

    let (status, _) = app
        .send(Method::DELETE, &format!("/activities/{}", id), Some("not-a-jwt"), None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.repo.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn expired_token_is_unauthorized() -> Result<()> {
    let app = TestApp::new().await;
    let id = app.create_activity("run").await?;

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: app.owner.id,
        exp: now - 3600,
        iat: now - 7200,
    };
    let token = generate_jwt(&claims, &app.config.security)?;

    let (status, _) = app
        .send(Method::DELETE, &format!("/activities/{}", id), Some(&token), None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn auth_is_checked_before_existence() -> Result<()> {
    let app = TestApp::new().await;

    let (status, _) = app
        .send(Method::DELETE, &format!("/activities/{}", uuid::Uuid::new_v4()), None, None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn reads_and_create_need_no_token() -> Result<()> {
    let app = TestApp::new().await;
    let id = app.create_activity("run").await?;

    let (status, _) = app.send(Method::GET, "/activities", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send(Method::GET, &format!("/activities/{}", id), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
