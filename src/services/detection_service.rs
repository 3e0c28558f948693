//! src/services/detection_service.rs
//!
//! Pill photo detection. `Detector` abstracts the external AI service; the
//! real implementation forwards the image as multipart and applies the
//! confidence threshold, while the mock picks a random stored medicine so
//! the rest of the flow works without an AI endpoint configured.

use crate::errors::ApiError;
use async_trait::async_trait;
use axum::http::StatusCode;
use bytes::Bytes;
use serde::Deserialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Minimum accepted confidence, in percent of the provider's 0..1 score.
const CONFIDENCE_THRESHOLD: f64 = 70.0;

#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("no medicine detected in the image")]
    NotDetect,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type DetectionResult<T> = Result<T, DetectionError>;

impl From<DetectionError> for ApiError {
    fn from(err: DetectionError) -> Self {
        let message = err.to_string();
        match err {
            DetectionError::NotDetect => {
                ApiError::new("MEDICINE_NOT_DETECT", StatusCode::BAD_REQUEST, message)
            }
            DetectionError::Sqlx(_) => ApiError::internal(message),
        }
    }
}

/// One detection answer from the AI service.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DetectionHit {
    /// Medicine row id the provider resolved.
    pub id: i64,

    /// Medicine name as the provider knows it.
    pub name: String,

    /// Confidence in 0..1.
    pub scores: f64,
}

/// Resolves a pill photo to a medicine id.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(
        &self,
        image: Bytes,
        content_type: Option<String>,
    ) -> DetectionResult<DetectionHit>;
}

/// Detector backed by the external AI inference endpoint.
pub struct AiDetector {
    http: reqwest::Client,
    url: String,
}

impl AiDetector {
    pub fn new(http: reqwest::Client, url: String) -> Self {
        Self { http, url }
    }
}

#[async_trait]
impl Detector for AiDetector {
    /// POST the image as a multipart `image` part and parse the answer.
    ///
    /// Transport errors, non-2xx answers, unparsable bodies, and hits below
    /// the confidence threshold all surface as NotDetect.
    async fn detect(
        &self,
        image: Bytes,
        content_type: Option<String>,
    ) -> DetectionResult<DetectionHit> {
        let mut part = reqwest::multipart::Part::bytes(image.to_vec()).file_name("image");
        if let Some(mime) = content_type.as_deref() {
            part = match part.mime_str(mime) {
                Ok(part) => part,
                Err(err) => {
                    warn!("rejecting detection upload content type {}: {}", mime, err);
                    return Err(DetectionError::NotDetect);
                }
            };
        }
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = match self.http.post(&self.url).multipart(form).send().await {
            Ok(resp) => resp,
            Err(err) => {
                warn!("detection call to {} failed: {}", self.url, err);
                return Err(DetectionError::NotDetect);
            }
        };
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(err) => {
                warn!("detection call to {} failed: {}", self.url, err);
                return Err(DetectionError::NotDetect);
            }
        };
        let hit = match response.json::<DetectionHit>().await {
            Ok(hit) => hit,
            Err(err) => {
                warn!("detection answer from {} unparsable: {}", self.url, err);
                return Err(DetectionError::NotDetect);
            }
        };

        if below_threshold(hit.scores) {
            debug!("detection hit {} below threshold: {}", hit.id, hit.scores);
            return Err(DetectionError::NotDetect);
        }

        Ok(hit)
    }
}

/// Detector used when no AI endpoint is configured: answers with a random
/// stored medicine at full confidence.
pub struct MockDetector {
    db: Arc<SqlitePool>,
}

impl MockDetector {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Detector for MockDetector {
    async fn detect(
        &self,
        _image: Bytes,
        _content_type: Option<String>,
    ) -> DetectionResult<DetectionHit> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM medicines ORDER BY RANDOM() LIMIT 1",
        )
        .fetch_optional(&*self.db)
        .await?;

        match row {
            Some((id, name)) => Ok(DetectionHit {
                id,
                name,
                scores: 1.0,
            }),
            None => Err(DetectionError::NotDetect),
        }
    }
}

/// True when a 0..1 provider score falls under the accepted confidence.
fn below_threshold(scores: f64) -> bool {
    scores * 100.0 < CONFIDENCE_THRESHOLD
}
