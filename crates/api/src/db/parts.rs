//! Part (catalog) repository.

use async_trait::async_trait;

use pc_house_core::PartId;

use super::{PgStore, RepositoryError, map_unique_violation};
use crate::models::{NewPart, Part};

/// Storage operations for catalog parts.
#[async_trait]
pub trait PartRepository: Send + Sync {
    /// Insert a new part.
    ///
    /// Returns `RepositoryError::Conflict` if the business id is taken; the
    /// existing part is left untouched.
    async fn insert_part(&self, part: NewPart) -> Result<Part, RepositoryError>;

    /// Look up a part by business id.
    async fn get_part(&self, id: &PartId) -> Result<Option<Part>, RepositoryError>;

    /// All parts, most recently added first.
    async fn list_parts(&self) -> Result<Vec<Part>, RepositoryError>;

    /// Add `delta` (possibly negative) to the available quantity in a single
    /// update. No floor is enforced. Returns `None` if the part does not exist.
    async fn adjust_available(
        &self,
        id: &PartId,
        delta: i32,
    ) -> Result<Option<Part>, RepositoryError>;
}

pub(crate) const PART_COLUMNS: &str =
    "record_id, id, name, image, price, minimum, available, description, added_by, created_at";

#[async_trait]
impl PartRepository for PgStore {
    async fn insert_part(&self, part: NewPart) -> Result<Part, RepositoryError> {
        let part = part.into_part();
        sqlx::query_as::<_, Part>(&format!(
            r"
            INSERT INTO parts ({PART_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PART_COLUMNS}
            "
        ))
        .bind(part.record_id)
        .bind(&part.id)
        .bind(&part.name)
        .bind(&part.image)
        .bind(part.price)
        .bind(part.minimum)
        .bind(part.available)
        .bind(&part.description)
        .bind(&part.added_by)
        .bind(part.created_at)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_unique_violation(e, "part id"))
    }

    async fn get_part(&self, id: &PartId) -> Result<Option<Part>, RepositoryError> {
        let part = sqlx::query_as::<_, Part>(&format!(
            "SELECT {PART_COLUMNS} FROM parts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(part)
    }

    async fn list_parts(&self) -> Result<Vec<Part>, RepositoryError> {
        let parts = sqlx::query_as::<_, Part>(&format!(
            "SELECT {PART_COLUMNS} FROM parts ORDER BY seq DESC"
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(parts)
    }

    async fn adjust_available(
        &self,
        id: &PartId,
        delta: i32,
    ) -> Result<Option<Part>, RepositoryError> {
        let part = sqlx::query_as::<_, Part>(&format!(
            r"
            UPDATE parts SET available = available + $2
             WHERE id = $1
            RETURNING {PART_COLUMNS}
            "
        ))
        .bind(id)
        .bind(delta)
        .fetch_optional(self.pool())
        .await?;

        Ok(part)
    }
}
