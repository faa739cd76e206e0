use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

use service::users::domain::{AuthUser, LoginInput, RegisterInput};

use crate::extract::ApiJson;
use crate::{errors::JsonApiError, state::ServerState};

pub const AUTH_COOKIE: &str = "auth_token";

/// Login response: the public user, plus a token when signing is configured.
#[derive(Debug, Serialize)]
pub struct LoginOutput {
    #[serde(flatten)]
    pub user: AuthUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[utoipa::path(
    post, path = "/users", tag = "users",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = crate::openapi::UserDoc),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(State(state): State<ServerState>, ApiJson(input): ApiJson<RegisterInput>) -> Result<(StatusCode, Json<AuthUser>), JsonApiError> {
    let user = state.users.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post, path = "/login", tag = "users",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = crate::openapi::LoginResponse),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "User not found")
    )
)]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, ApiJson(input): ApiJson<LoginInput>) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.users.login(input).await?;
    let jar = match &session.token {
        Some(token) => {
            let mut cookie = Cookie::new(AUTH_COOKIE, token.clone());
            cookie.set_path("/");
            cookie.set_http_only(true);
            cookie.set_secure(false);
            cookie.set_same_site(SameSite::Lax);
            jar.add(cookie)
        }
        None => jar,
    };
    Ok((jar, Json(LoginOutput { user: session.user, token: session.token })))
}
