//! Complaint routes.

use axum::extract::{Path, State};
use axum::Json;
use database::{Priority, Status};
use engine::{ComplaintSubmission, EngineError, StatusUpdate};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::AuthSession;
use crate::error::Result;
use crate::routes::ApiJson;
use crate::state::AppState;
use crate::views::{ComplaintView, InvestigationView};

/// Citizen complaint form.
#[derive(Deserialize)]
pub struct SubmitRequest {
    #[serde(rename = "type")]
    pub category: Option<String>,
    pub district: Option<String>,
    pub pincode: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub coordinates: Option<String>,
    pub name: Option<String>,
    pub mobile_number: Option<String>,
    pub priority: Option<String>,
    pub photo: Option<String>,
}

#[derive(Deserialize)]
pub struct ForwardRequest {
    #[serde(default)]
    pub department: String,
}

#[derive(Deserialize)]
pub struct AssignRequest {
    pub assigned_to: i64,
}

#[derive(Deserialize)]
pub struct NotesRequest {
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
    pub notes: Option<String>,
    pub resolved_coordinates: Option<String>,
    pub resolved_photo: Option<String>,
}

#[derive(Deserialize)]
pub struct ReasonRequest {
    #[serde(default)]
    pub reason: String,
    pub evidence: Option<String>,
}

fn updated(message: impl Into<String>, complaint: &database::Complaint) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message.into(),
        "complaint": ComplaintView::from(complaint),
    }))
}

/// File a complaint.
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthSession,
    ApiJson(req): ApiJson<SubmitRequest>,
) -> Result<Json<Value>> {
    let priority = match req.priority.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(p) => Some(
            p.parse::<Priority>()
                .map_err(|e| EngineError::Validation(e.to_string()))?,
        ),
    };

    let submission = ComplaintSubmission {
        category: req.category,
        district: req.district,
        pincode: req.pincode,
        location: req.location,
        description: req.description,
        coordinates: req.coordinates,
        reporter_name: req.name,
        contact_phone: req.mobile_number,
        priority,
        photo: req.photo,
    };
    let complaint = state.engine.complaints.submit(&auth.context, submission).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Complaint submitted successfully",
        "complaint_id": complaint.reference_code,
        "complaint": ComplaintView::from(&complaint),
    })))
}

/// Complaints visible to the caller, newest first.
pub async fn list(State(state): State<AppState>, auth: AuthSession) -> Result<Json<Value>> {
    let complaints = state.engine.complaints.list(&auth.context).await?;
    let views: Vec<ComplaintView> = complaints.iter().map(ComplaintView::from).collect();

    Ok(Json(json!({
        "success": true,
        "message": format!("{} complaints", views.len()),
        "complaints": views,
    })))
}

/// One complaint, if visible to the caller.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: AuthSession,
) -> Result<Json<Value>> {
    let detail = state.engine.complaints.detail(&auth.context, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "ok",
        "complaint": ComplaintView::from(&detail.complaint),
        "investigation": detail.investigation.as_ref().map(InvestigationView::from),
    })))
}

pub async fn forward(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: AuthSession,
    ApiJson(req): ApiJson<ForwardRequest>,
) -> Result<Json<Value>> {
    let complaint = state
        .engine
        .complaints
        .forward(&auth.context, id, &req.department)
        .await?;
    let message = format!(
        "Complaint forwarded to {}",
        complaint.forwarded_department.as_deref().unwrap_or_default()
    );
    Ok(updated(message, &complaint))
}

pub async fn assign(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: AuthSession,
    ApiJson(req): ApiJson<AssignRequest>,
) -> Result<Json<Value>> {
    let complaint = state
        .engine
        .complaints
        .assign(&auth.context, id, req.assigned_to)
        .await?;
    Ok(updated("Complaint assigned", &complaint))
}

pub async fn start_work(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: AuthSession,
) -> Result<Json<Value>> {
    let complaint = state.engine.complaints.start_work(&auth.context, id).await?;
    Ok(updated("Complaint marked as In Progress", &complaint))
}

pub async fn resolve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: AuthSession,
    ApiJson(req): ApiJson<NotesRequest>,
) -> Result<Json<Value>> {
    let complaint = state
        .engine
        .complaints
        .resolve(&auth.context, id, req.notes.as_deref())
        .await?;
    Ok(updated("Complaint resolved", &complaint))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: AuthSession,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> Result<Json<Value>> {
    let status: Status = req
        .status
        .parse()
        .map_err(|_| EngineError::Validation("Invalid status".to_string()))?;
    let update = StatusUpdate {
        status,
        notes: req.notes,
        resolved_coordinates: req.resolved_coordinates,
        resolved_photo: req.resolved_photo,
    };
    let complaint = state
        .engine
        .complaints
        .update_status(&auth.context, id, update)
        .await?;
    Ok(updated(format!("Status updated to {}", complaint.status), &complaint))
}

/// Department closure of a fake complaint.
pub async fn mark_fake(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: AuthSession,
    ApiJson(req): ApiJson<ReasonRequest>,
) -> Result<Json<Value>> {
    let complaint = state
        .engine
        .complaints
        .mark_fake(&auth.context, id, Some(&req.reason))
        .await?;
    Ok(updated("Complaint marked as fake and closed", &complaint))
}

/// Police report opening an investigation.
pub async fn report_fake(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: AuthSession,
    ApiJson(req): ApiJson<ReasonRequest>,
) -> Result<Json<Value>> {
    let (complaint, investigation) = state
        .engine
        .complaints
        .report_fake(&auth.context, id, &req.reason, req.evidence.as_deref())
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Complaint marked as fake",
        "complaint": ComplaintView::from(&complaint),
        "investigation": InvestigationView::from(&investigation),
    })))
}
