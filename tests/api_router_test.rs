use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use clubdesk::{
    api,
    config::Settings,
    email::fake::FakeMailer,
    service::ServiceContext,
    storage::fake::FakeObjectStorage,
};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

async fn test_app() -> anyhow::Result<Router> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    let service_context = Arc::new(ServiceContext::new(
        pool,
        Arc::new(FakeObjectStorage::new()),
        None,
        None,
        Arc::new(FakeMailer::new()),
    ));

    Ok(api::create_app(service_context, Arc::new(Settings::default())))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn test_duplicate_signup_returns_conflict() -> anyhow::Result<()> {
    let app = test_app().await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/events",
            json!({
                "title": "SEO Bootcamp",
                "description": "Hands-on workshop",
                "starts_at": "2026-09-15T17:00:00Z"
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let event = json_body(response).await?;
    let event_id = event["id"].as_str().unwrap().to_string();

    let signup = json!({"student_name": "Jane Doe", "email": "jane@x.edu"});
    let uri = format!("/public/events/{}/register", event_id);

    let response = app
        .clone()
        .oneshot(json_request("POST", &uri, signup.clone()))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same email for the same event hits UNIQUE(event_id, email).
    let response = app.clone().oneshot(json_request("POST", &uri, signup)).await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn test_blog_update_rejects_title_with_empty_slug() -> anyhow::Result<()> {
    let app = test_app().await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/blog",
            json!({
                "title": "Analytics Basics",
                "content": "Start with the funnel...",
                "author": "Priya Sharma"
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let post = json_body(response).await?;
    let post_id = post["id"].as_str().unwrap().to_string();
    assert_eq!(post["slug"], "analytics-basics");

    // A title of punctuation only would slugify to the empty string.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/blog/{}", post_id),
            json!({"title": "!!!"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // The post is untouched and still reachable by its slug.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/blog/{}", post_id))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let post = json_body(response).await?;
    assert_eq!(post["slug"], "analytics-basics");
    assert_eq!(post["title"], "Analytics Basics");

    Ok(())
}
