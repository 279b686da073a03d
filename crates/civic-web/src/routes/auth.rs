//! Login and logout routes.

use axum::extract::State;
use axum::Json;
use database::Role;
use engine::EngineError;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::auth::AuthSession;
use crate::error::Result;
use crate::routes::ApiJson;
use crate::state::AppState;
use crate::views::SessionView;

/// Request for a citizen login code.
#[derive(Deserialize)]
pub struct OtpRequest {
    #[serde(default)]
    pub phone: String,
}

/// Citizen code verification.
#[derive(Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub otp: String,
}

/// Official password login.
#[derive(Deserialize)]
pub struct OfficialLoginRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
    pub pincode: Option<String>,
}

/// Issue a login code to a registered phone.
pub async fn request_otp(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<OtpRequest>,
) -> Result<Json<Value>> {
    let issued = state.engine.otp.issue(&req.phone).await?;

    let mut body = json!({
        "success": true,
        "message": "OTP sent",
        "expires_at": issued.expires_at,
    });
    if state.otp_demo_mode {
        body["message"] = json!(format!("OTP sent. Demo OTP: {}", issued.code));
        body["demo_otp"] = json!(issued.code);
    }
    Ok(Json(body))
}

/// Verify a citizen's code and open a session.
pub async fn verify_otp(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VerifyRequest>,
) -> Result<Json<Value>> {
    let session = state.engine.citizen_login(&req.phone, &req.otp).await?;
    let view = SessionView::from(&session);
    let token = state.sessions.issue(session).await;
    let active = state.sessions.len().await;
    debug!(active, "Session opened");

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "role": view.role,
        "token": token,
        "session": view,
    })))
}

/// Authenticate an official and open a session.
pub async fn official_login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<OfficialLoginRequest>,
) -> Result<Json<Value>> {
    let role: Role = req
        .role
        .parse()
        .map_err(|_| EngineError::InvalidCredentials)?;
    let session = state
        .engine
        .official_login(&req.user_id, &req.password, role, req.pincode.as_deref())
        .await?;
    let view = SessionView::from(&session);
    let token = state.sessions.issue(session).await;
    let active = state.sessions.len().await;
    debug!(active, "Session opened");

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "role": view.role,
        "token": token,
        "session": view,
    })))
}

/// End the caller's session.
pub async fn logout(State(state): State<AppState>, auth: AuthSession) -> Json<Value> {
    state.sessions.revoke(&auth.token).await;
    info!(user_id = auth.context.user_id, "Logged out");
    Json(json!({
        "success": true,
        "message": "Logged out",
    }))
}
