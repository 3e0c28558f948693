//! src/state.rs
//!
//! Shared handler state: the connection pool, the parsed configuration,
//! and one instance of every domain service. Built once at startup and
//! cloned into each request by axum.

use crate::config::AppConfig;
use crate::services::auth_service::AuthService;
use crate::services::detection_log_service::DetectionLogService;
use crate::services::detection_service::{AiDetector, Detector, MockDetector};
use crate::services::favorite_service::FavoriteService;
use crate::services::medicine_service::MedicineService;
use crate::services::member_service::MemberService;
use crate::services::search_service::SearchService;
use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,

    /// Parsed application configuration.
    pub config: Arc<AppConfig>,

    /// Photo detection backend (AI endpoint or mock).
    pub detector: Arc<dyn Detector>,

    pub members: MemberService,
    pub medicines: MedicineService,
    pub search: SearchService,
    pub favorites: FavoriteService,
    pub detection_logs: DetectionLogService,
    pub auth: AuthService,
}

/// Build an HTTP client with appropriate timeouts for the outbound calls
/// (OAuth2 provider, leaflet host, AI endpoint). A silent peer must not
/// hold a request longer than the 5s read timeout.
fn build_http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .read_timeout(Duration::from_secs(5))
        .build()?;
    Ok(client)
}

impl AppState {
    /// Wire every service onto the pool and pick the detector backend.
    pub fn new(db: Arc<SqlitePool>, config: AppConfig) -> Result<Self> {
        let http = build_http_client()?;

        let members = MemberService::new(db.clone());
        let medicines =
            MedicineService::new(db.clone(), http.clone(), config.leaflet_base_url.clone());
        let search = SearchService::new(db.clone());
        let favorites = FavoriteService::new(db.clone(), medicines.clone());
        let detection_logs = DetectionLogService::new(db.clone(), medicines.clone());
        let auth = AuthService::new(
            db.clone(),
            http.clone(),
            config.oauth.clone(),
            members.clone(),
        );

        let detector: Arc<dyn Detector> = match &config.ai_url {
            Some(url) => {
                info!("using AI detection endpoint {}", url);
                Arc::new(AiDetector::new(http, url.clone()))
            }
            None => {
                info!("no AI endpoint configured, using mock detector");
                Arc::new(MockDetector::new(db.clone()))
            }
        };

        Ok(Self {
            db,
            config: Arc::new(config),
            detector,
            members,
            medicines,
            search,
            favorites,
            detection_logs,
            auth,
        })
    }
}
