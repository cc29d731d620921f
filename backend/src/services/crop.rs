//! Crop service for static crop reference data

use shared::{Crop, CropDetailRecord, FetchOutcome};
use sqlx::PgPool;

use super::settle;
use crate::error::AppResult;

/// Crop service for reading optimal growing conditions
#[derive(Clone)]
pub struct CropService {
    db: PgPool,
}

pub(crate) fn crop_detail_query(crop: Crop) -> String {
    format!(
        "SELECT row_to_json(t) AS record FROM {table} t LIMIT 1",
        table = crop.detail_table(),
    )
}

impl CropService {
    /// Create a new CropService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Fetch the detail row of a crop, if the table has one
    pub async fn fetch_crop_detail(&self, crop: Crop) -> FetchOutcome<Option<CropDetailRecord>> {
        let result = self.query_detail(crop).await;
        settle(result, "crop details", &format!("crop: {}", crop))
    }

    async fn query_detail(&self, crop: Crop) -> AppResult<Option<CropDetailRecord>> {
        let sql = crop_detail_query(crop);
        tracing::debug!(crop = %crop, table = crop.detail_table(), "Querying crop details");

        let row = sqlx::query_scalar::<_, serde_json::Value>(&sql)
            .fetch_optional(&self.db)
            .await?;

        let detail = row
            .map(|row| CropDetailRecord::from_row(crop, row))
            .transpose()?;

        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_reads_detail_table() {
        assert_eq!(
            crop_detail_query(Crop::Potatoes),
            "SELECT row_to_json(t) AS record FROM potatoes_data t LIMIT 1"
        );
    }
}
