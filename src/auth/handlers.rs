use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse, PublicUser, SignupRequest},
        error::AuthError,
        extractors::AuthUser,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    state
        .auth
        .sign_up(&payload.email, &payload.password, payload.name.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let (token, user) = state.auth.log_in(&payload.email, &payload.password).await?;
    Ok(Json(LoginResponse { token, user }))
}

#[instrument(skip(state, claims))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<PublicUser>, AuthError> {
    let user = state.auth.load_profile(claims.sub).await?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_omits_absent_name() {
        let with_name = PublicUser {
            id: uuid::Uuid::new_v4(),
            email: "a@x.com".to_string(),
            name: Some("A".to_string()),
        };
        let json = serde_json::to_string(&with_name).unwrap();
        assert!(json.contains("\"name\":\"A\""));

        let without_name = PublicUser {
            id: uuid::Uuid::new_v4(),
            email: "b@x.com".to_string(),
            name: None,
        };
        let json = serde_json::to_string(&without_name).unwrap();
        assert!(!json.contains("name"));
        assert!(!json.contains("password"));
    }
}
