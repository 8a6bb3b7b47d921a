#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt; // for oneshot

use activities_api::auth::issue_token;
use activities_api::config::AppConfig;
use activities_api::database::models::User;
use activities_api::database::MemoryActivityRepository;
use activities_api::upstream::{ActivityProvider, UpstreamError};
use activities_api::{app, AppState};

/// Upstream stand-in: either a fixed body or a failure status
pub struct StubProvider {
    pub response: Result<Value, u16>,
}

#[async_trait]
impl ActivityProvider for StubProvider {
    async fn random_activity(&self) -> Result<Value, UpstreamError> {
        self.response.clone().map_err(UpstreamError::Status)
    }
}

pub struct TestApp {
    pub router: Router,
    pub repo: MemoryActivityRepository,
    pub config: AppConfig,
    pub owner: User,
    pub stranger: User,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_provider(StubProvider {
            response: Ok(serde_json::json!({ "activity": "Learn to juggle", "type": "education" })),
        })
        .await
    }

    pub async fn with_provider(provider: StubProvider) -> Self {
        let config = AppConfig::development();
        let repo = MemoryActivityRepository::new();
        let owner = repo.insert_user(User::new("owner@example.com")).await;
        let stranger = repo.insert_user(User::new("stranger@example.com")).await;

        let state = AppState::new(Arc::new(repo.clone()), Arc::new(provider), config.clone());

        Self {
            router: app(state),
            repo,
            config,
            owner,
            stranger,
        }
    }

    pub fn token_for(&self, user: &User) -> String {
        issue_token(user.id, &self.config.security).expect("token")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, json))
    }

    /// Create an activity owned by `owner` and return its id
    pub async fn create_activity(&self, title: &str) -> Result<String> {
        let (status, body) = self
            .send(
                Method::POST,
                "/activities",
                None,
                Some(serde_json::json!({ "activity": { "title": title, "owner": self.owner.id } })),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create failed: {} {}", status, body);
        body["activity"]["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("missing id in {}", body))
    }
}
