//! Street-view image entity models and DTOs.
//!
//! An image is the root of zero or more edit chains. It is created once
//! per map selection and never mutated afterwards except for soft-delete.

use omm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    pub url: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    /// Property-boundary geometry as resolved by the map layer (GeoJSON).
    pub boundary: Option<serde_json::Value>,
    pub created_by_id: DbId,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a new map selection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateImage {
    pub url: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub boundary: Option<serde_json::Value>,
    /// Filled from the authenticated identity, not the request body.
    #[serde(skip_deserializing)]
    pub created_by_id: DbId,
}
