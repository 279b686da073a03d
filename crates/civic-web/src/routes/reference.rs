//! Static reference data for client forms.

use axum::Json;
use engine::catalog::{COMPLAINT_CATEGORIES, DEPARTMENTS, DISTRICTS};
use serde::Serialize;

#[derive(Serialize)]
pub struct ReferenceData {
    pub success: bool,
    pub message: String,
    pub categories: &'static [&'static str],
    pub departments: &'static [&'static str],
    pub districts: &'static [&'static str],
    pub priorities: [&'static str; 4],
}

/// Complaint categories, departments and districts.
pub async fn reference() -> Json<ReferenceData> {
    Json(ReferenceData {
        success: true,
        message: "ok".to_string(),
        categories: COMPLAINT_CATEGORIES,
        departments: DEPARTMENTS,
        districts: DISTRICTS,
        priorities: ["low", "medium", "high", "urgent"],
    })
}
