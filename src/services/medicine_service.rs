//! src/services/medicine_service.rs
//!
//! MedicineService — medicine lookups plus assembly of the full client
//! detail. Effect/usage/precaution text comes from the regulator's leaflet
//! host as HTML, fetched per code; stored column text is the fallback when
//! the host is unreachable.

use crate::errors::ApiError;
use crate::models::medicine::{Medicine, MedicineRes};
use axum::http::StatusCode;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Leaflet sections appended to `{base}/{code}`.
const LEAFLET_EFFECT: &str = "EE";
const LEAFLET_USAGES: &str = "UD";
const LEAFLET_PRECAUTIONS: &str = "NB";

#[derive(Debug, Error)]
pub enum MedicineError {
    #[error("medicine does not exist")]
    NotExist,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type MedicineResult<T> = Result<T, MedicineError>;

impl From<MedicineError> for ApiError {
    fn from(err: MedicineError) -> Self {
        let message = err.to_string();
        match err {
            MedicineError::NotExist => {
                ApiError::new("MEDICINE_NOT_EXIST", StatusCode::NOT_FOUND, message)
            }
            MedicineError::Sqlx(_) => ApiError::internal(message),
        }
    }
}

#[derive(Clone)]
pub struct MedicineService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,

    /// Outbound client for the leaflet host.
    http: reqwest::Client,

    /// Leaflet host base URL, no trailing slash.
    leaflet_base_url: String,
}

impl MedicineService {
    pub fn new(db: Arc<SqlitePool>, http: reqwest::Client, leaflet_base_url: String) -> Self {
        Self {
            db,
            http,
            leaflet_base_url,
        }
    }

    /// Fetch a medicine by row id. Returns NotExist when absent.
    pub async fn get_by_id(&self, id: i64) -> MedicineResult<Medicine> {
        sqlx::query_as::<_, Medicine>(
            "SELECT id, code, name, company, ingredient, image, effect, usages, precautions,
                    created_at, updated_at
             FROM medicines WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => MedicineError::NotExist,
            other => MedicineError::Sqlx(other),
        })
    }

    /// Fetch a medicine by registry product code.
    pub async fn get_by_code(&self, code: &str) -> MedicineResult<Medicine> {
        sqlx::query_as::<_, Medicine>(
            "SELECT id, code, name, company, ingredient, image, effect, usages, precautions,
                    created_at, updated_at
             FROM medicines WHERE code = ?",
        )
        .bind(code)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => MedicineError::NotExist,
            other => MedicineError::Sqlx(other),
        })
    }

    /// Whether this member has favorited this medicine.
    pub async fn is_favorite(&self, member_id: i64, medicine_id: i64) -> MedicineResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE member_id = ? AND medicine_id = ?)",
        )
        .bind(member_id)
        .bind(medicine_id)
        .fetch_one(&*self.db)
        .await?;
        Ok(exists)
    }

    /// Assemble the full client detail for a medicine.
    ///
    /// The three leaflet sections are fetched concurrently. `is_favorite`
    /// reflects the requesting member.
    pub async fn medicine_res(
        &self,
        member_id: i64,
        medicine: Medicine,
    ) -> MedicineResult<MedicineRes> {
        let is_favorite = self.is_favorite(member_id, medicine.id).await?;

        let (effect, usages, precautions) = futures::join!(
            self.leaflet_html(&medicine.code, LEAFLET_EFFECT, &medicine.effect),
            self.leaflet_html(&medicine.code, LEAFLET_USAGES, &medicine.usages),
            self.leaflet_html(&medicine.code, LEAFLET_PRECAUTIONS, &medicine.precautions),
        );

        Ok(MedicineRes {
            id: medicine.id,
            code: medicine.code,
            name: medicine.name,
            company: medicine.company,
            ingredient: split_ingredients(&medicine.ingredient),
            image: medicine.image,
            effect,
            usages,
            precautions,
            is_favorite,
        })
    }

    /// Download one leaflet section as HTML, falling back to the stored
    /// column text when the host cannot be reached.
    async fn leaflet_html(&self, code: &str, section: &str, fallback: &str) -> String {
        let url = format!("{}/{}/{}", self.leaflet_base_url, code, section);
        let response = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(err) => {
                warn!("leaflet fetch {} failed: {}", url, err);
                return fallback.to_string();
            }
        };

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(err) => {
                warn!("leaflet fetch {} failed: {}", url, err);
                return fallback.to_string();
            }
        };

        match response.text().await {
            Ok(html) => html,
            Err(err) => {
                warn!("leaflet body {} failed: {}", url, err);
                fallback.to_string()
            }
        }
    }
}

/// Split the stored `|`-separated ingredient string into a list.
/// Blank segments are dropped.
pub fn split_ingredients(ingredient: &str) -> Vec<String> {
    ingredient
        .split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_pipe() {
        assert_eq!(
            split_ingredients("potassium citrate|glucose|sodium chloride"),
            vec!["potassium citrate", "glucose", "sodium chloride"]
        );
    }

    #[test]
    fn single_ingredient_is_one_entry() {
        assert_eq!(split_ingredients("oseltamivir"), vec!["oseltamivir"]);
    }

    #[test]
    fn blank_segments_are_dropped() {
        assert_eq!(split_ingredients(""), Vec::<String>::new());
        assert_eq!(split_ingredients("a||b|"), vec!["a", "b"]);
        assert_eq!(split_ingredients(" a | b "), vec!["a", "b"]);
    }
}
