//! Select-box options

use axum::Json;
use shared::Catalog;

/// List the crops and features a client may ask for
pub async fn get_catalog() -> Json<Catalog> {
    Json(Catalog::new())
}
