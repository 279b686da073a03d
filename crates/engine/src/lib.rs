//! Complaint lifecycle and authorization engine.
//!
//! The engine ties together the parts of the civic complaint tracker that
//! decide who may do what:
//!
//! - [`identity`]: official login against stored Argon2 password hashes
//! - [`otp`]: one-time codes for citizen phone login
//! - [`lifecycle`]: role-gated complaint transitions and scoped reads
//! - [`visibility`]: which complaints a session may see
//! - [`media`]: photo decoding and storage
//!
//! Callers authenticate to obtain a [`SessionContext`] and pass it explicitly
//! into every complaint operation.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use engine::{Engine, EngineConfig, LogNotifier, MemoryBlobStore, ComplaintSubmission};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = database::Database::in_memory().await?;
//! engine::seed::seed_demo_users(&db).await?;
//!
//! let engine = Engine::new(
//!     db,
//!     Arc::new(LogNotifier::new()),
//!     Arc::new(MemoryBlobStore::new()),
//!     EngineConfig::default(),
//! );
//!
//! let issued = engine.otp.issue("9876543210").await?;
//! let session = engine.citizen_login("9876543210", &issued.code).await?;
//!
//! let complaint = engine
//!     .complaints
//!     .submit(
//!         &session,
//!         ComplaintSubmission {
//!             category: Some("Roads".into()),
//!             district: Some("Chennai".into()),
//!             pincode: Some("600001".into()),
//!             location: Some("Market Road".into()),
//!             description: Some("Pothole".into()),
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//! println!("filed {}", complaint.reference_code);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod media;
pub mod notifier;
pub mod otp;
pub mod reference;
pub mod seed;
pub mod session;
pub mod visibility;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use identity::Identity;
pub use lifecycle::{ComplaintDetail, ComplaintSubmission, Lifecycle, StatusUpdate, Transition};
pub use media::{AttachmentError, BlobStore, FsBlobStore, MediaHandler, MemoryBlobStore};
pub use notifier::{LogNotifier, Notifier, NotifyError};
pub use otp::{IssuedOtp, OtpManager};
pub use session::{Jurisdiction, SessionContext};
pub use visibility::Visibility;

use std::sync::Arc;

use database::{Database, Role};

/// The engine's services, sharing one database.
#[derive(Clone)]
pub struct Engine {
    pub identity: Identity,
    pub otp: OtpManager,
    pub complaints: Lifecycle,
}

impl Engine {
    pub fn new(
        db: Database,
        notifier: Arc<dyn Notifier>,
        blobs: Arc<dyn BlobStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            identity: Identity::new(db.clone()),
            otp: OtpManager::new(db.clone(), notifier, config.otp_ttl),
            complaints: Lifecycle::new(db, MediaHandler::new(blobs)),
        }
    }

    /// Verify a citizen's code and open their session.
    pub async fn citizen_login(&self, phone: &str, code: &str) -> Result<SessionContext> {
        let user = self.otp.verify(phone, code).await?;
        if user.role != Role::Citizen {
            return Err(EngineError::AccessDenied);
        }
        Ok(SessionContext::citizen(&user))
    }

    /// Authenticate an official and open their session.
    pub async fn official_login(
        &self,
        external_id: &str,
        password: &str,
        role: Role,
        pincode: Option<&str>,
    ) -> Result<SessionContext> {
        self.identity
            .official_login(external_id, password, role, pincode)
            .await
    }
}
