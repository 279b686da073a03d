//! Demo users for local development.

use chrono::Utc;
use database::{complaint, user, Database, NewComplaint, NewUser, Priority, Role, Status};
use tracing::info;

use crate::error::Result;
use crate::identity::hash_password;
use crate::reference::REFERENCE_PREFIX;

/// Password shared by every seeded official.
pub const DEMO_PASSWORD: &str = "password123";

/// Insert the demo citizens and officials.
///
/// Does nothing when the store already holds any user. Returns the number of
/// users inserted.
pub async fn seed_demo_users(db: &Database) -> Result<usize> {
    if user::count_users(db.pool()).await? > 0 {
        info!("Users already present, skipping demo seed");
        return Ok(0);
    }

    let hash = hash_password(DEMO_PASSWORD)?;
    let official = |role: Role, external_id: &str, name: &str| {
        NewUser::official(role, external_id, hash.clone(), name).with_pincode("600001")
    };

    let users = [
        NewUser::citizen("9876543210", "Rajesh Kumar"),
        NewUser::citizen("9876543211", "Priya Singh"),
        official(Role::Municipal, "MUN001", "Municipal Officer"),
        official(Role::Department, "DEPT001", "Municipal Corp Officer")
            .with_department("Municipal Corporation"),
        official(Role::Department, "DEPT002", "Electrical Board Officer")
            .with_department("Electrical Board"),
        official(Role::Department, "DEPT003", "Fire Station Officer")
            .with_department("Fire Station"),
        official(Role::Police, "POLICE001", "Police Officer"),
    ];

    let mut tx = db.begin().await?;
    for new in &users {
        user::create_user(&mut *tx, new).await?;
    }
    Database::commit(tx).await?;

    info!(count = users.len(), "Seeded demo users");
    Ok(users.len())
}

/// Insert two sample complaints filed by the demo citizens: one fresh, one
/// already forwarded to the Electrical Board and in progress.
///
/// Does nothing when any complaint exists or the demo citizens are missing.
pub async fn seed_demo_complaints(db: &Database) -> Result<usize> {
    if complaint::count_complaints(db.pool()).await? > 0 {
        info!("Complaints already present, skipping demo seed");
        return Ok(0);
    }

    let mut tx = db.begin().await?;
    let rajesh = user::find_by_phone(&mut *tx, "9876543210").await?;
    let priya = user::find_by_phone(&mut *tx, "9876543211").await?;
    let (Some(rajesh), Some(priya)) = (rajesh, priya) else {
        info!("Demo citizens not found, skipping complaint seed");
        return Ok(0);
    };
    let municipal = user::find_by_external_id(&mut *tx, "MUN001", Role::Municipal).await?;

    let now = Utc::now();
    let stamp = now.format("%Y%m%d%H%M%S").to_string();
    let sample = |suffix: u16, reporter: &database::User| NewComplaint {
        reference_code: format!("{REFERENCE_PREFIX}-{stamp}-{suffix:04}"),
        reporter_id: reporter.id,
        reporter_name: Some(reporter.name.clone()),
        contact_phone: reporter.phone.clone(),
        category: String::new(),
        description: String::new(),
        district: "Chennai".to_string(),
        pincode: "600001".to_string(),
        location: String::new(),
        coordinates: None,
        priority: Priority::Medium,
        photo_path: None,
        created_at: now,
    };

    complaint::create_complaint(
        &mut *tx,
        &NewComplaint {
            category: "Roads".to_string(),
            description: "Large pothole in the middle of the road near the market.".to_string(),
            location: "Market Road, Central Street".to_string(),
            coordinates: Some("13.0827, 80.2707".to_string()),
            ..sample(1, &rajesh)
        },
    )
    .await?;

    let mut street_light = complaint::create_complaint(
        &mut *tx,
        &NewComplaint {
            category: "Electricity".to_string(),
            description: "Street light not working for a week, causing safety issues at night."
                .to_string(),
            location: "Subway Lane, Block B".to_string(),
            coordinates: Some("13.0850, 80.2750".to_string()),
            ..sample(2, &priya)
        },
    )
    .await?;
    street_light.status = Status::InProgress;
    street_light.forwarded_department = Some("Electrical Board".to_string());
    street_light.verified_by = municipal.map(|u| u.id);
    street_light.resolution_notes =
        Some("Work started. Replacing the bulb and fixing wiring.".to_string());
    complaint::update_complaint(&mut *tx, &street_light).await?;

    Database::commit(tx).await?;

    info!(count = 2, "Seeded demo complaints");
    Ok(2)
}
