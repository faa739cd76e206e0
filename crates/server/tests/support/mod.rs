#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use server::{routes, state::ServerState};
use service::books::domain::Book;
use service::books::repository::mock::MockBookRepository;
use service::users::repository::mock::MockUserRepository;
use service::users::service::AuthConfig;

pub const DUNE: i64 = 9780441013593;
pub const EARTHSEA: i64 = 9780547773742;

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

pub fn seed_books() -> Vec<Book> {
    vec![
        Book { isbn: DUNE, author: "Frank Herbert".into(), title: "Dune".into(), reviews: vec![] },
        Book { isbn: EARTHSEA, author: "Ursula K. Le Guin".into(), title: "A Wizard of Earthsea".into(), reviews: vec![] },
    ]
}

/// Router over in-memory repositories seeded with two books.
pub fn build_app(jwt_secret: Option<&str>) -> Router {
    let books = Arc::new(MockBookRepository::with_books(seed_books()));
    let users = Arc::new(MockUserRepository::default());
    let auth = AuthConfig { jwt_secret: jwt_secret.map(str::to_string), ..AuthConfig::default() };
    routes::build_router(ServerState::new(books, users, auth), cors())
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let (status, _headers, json) = send_full(app, method, uri, body).await?;
    Ok((status, json))
}

pub async fn send_full(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, axum::http::HeaderMap, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&v)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    Ok((status, headers, json))
}

pub async fn register(app: &Router, username: &str, password: &str) -> anyhow::Result<StatusCode> {
    let (status, _) = send(app, "POST", "/users", Some(serde_json::json!({"username": username, "password": password}))).await?;
    Ok(status)
}
