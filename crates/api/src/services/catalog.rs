//! Product catalog.

use rust_decimal::Decimal;
use serde::Deserialize;

use pc_house_core::{PartId, Price, Uid};

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{NewPart, Part};

/// Body of `POST /add-product`. Every field is required.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PartRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: Option<Decimal>,
    pub minimum: Option<i64>,
    pub available: Option<i64>,
    pub description: Option<String>,
}

fn missing(field: &str) -> AppError {
    AppError::BadRequest(format!("{field} is required"))
}

fn text(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(field))
}

fn quantity(value: Option<i64>, field: &str) -> Result<i32> {
    let value = value.ok_or_else(|| missing(field))?;
    i32::try_from(value)
        .ok()
        .filter(|v| *v >= 0)
        .ok_or_else(|| AppError::BadRequest(format!("{field} must be a non-negative integer")))
}

impl PartRequest {
    /// Validate into an insertable part listed by `creator`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a missing field, a non-positive
    /// price, a negative quantity, `minimum < 1` or `minimum > available`.
    pub fn validate(self, creator: &Uid) -> Result<NewPart> {
        let id = text(self.id, "id")?;
        let id = PartId::parse(&id).map_err(|e| AppError::BadRequest(e.to_string()))?;
        let name = text(self.name, "name")?;
        let image = text(self.image, "image")?;
        let price = self.price.ok_or_else(|| missing("price"))?;
        let price = Price::new(price).map_err(|e| AppError::BadRequest(e.to_string()))?;
        let minimum = quantity(self.minimum, "minimum")?;
        let available = quantity(self.available, "available")?;
        let description = text(self.description, "description")?;

        if minimum < 1 {
            return Err(AppError::BadRequest("minimum must be at least 1".to_string()));
        }
        if minimum > available {
            return Err(AppError::BadRequest(
                "minimum cannot exceed available".to_string(),
            ));
        }

        Ok(NewPart {
            id,
            name,
            image,
            price,
            minimum,
            available,
            description,
            added_by: creator.clone(),
        })
    }
}

/// Catalog operations.
pub struct CatalogService<'a> {
    store: &'a dyn Store,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// All parts, most recently added first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn list_products(&self) -> Result<Vec<Part>> {
        Ok(self.store.list_parts().await?)
    }

    /// A part by business id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if absent.
    pub async fn get_product(&self, id: &str) -> Result<Part> {
        let id = PartId::parse(id).map_err(|e| AppError::BadRequest(e.to_string()))?;
        self.store
            .get_part(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("part".to_string()))
    }

    /// List a new part.
    ///
    /// # Errors
    ///
    /// - `AppError::BadRequest` if validation fails
    /// - `AppError::Conflict` if the business id exists; the stored part is
    ///   left untouched
    pub async fn add_product(&self, creator: &Uid, request: PartRequest) -> Result<Part> {
        let part = request.validate(creator)?;
        let part = self.store.insert_part(part).await?;

        tracing::info!(part_id = %part.id, added_by = %part.added_by, "Part added");
        Ok(part)
    }

    /// Add `delta` to a part's available quantity. No floor is enforced.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the part does not exist.
    pub async fn adjust_available(&self, id: &PartId, delta: i32) -> Result<Part> {
        let part = self
            .store
            .adjust_available(id, delta)
            .await?
            .ok_or_else(|| AppError::NotFound("part".to_string()))?;

        tracing::info!(part_id = %id, delta, available = part.available, "Stock adjusted");
        Ok(part)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn admin() -> Uid {
        Uid::parse("admin").unwrap()
    }

    fn request(id: &str) -> PartRequest {
        PartRequest {
            id: Some(id.to_string()),
            name: Some("RTX 4090".to_string()),
            image: Some("https://img.example.com/4090.png".to_string()),
            price: Some(Decimal::new(159_999, 2)),
            minimum: Some(1),
            available: Some(5),
            description: Some("Graphics card".to_string()),
        }
    }

    #[test]
    fn test_validation_rejects_bad_fields() {
        let cases = [
            PartRequest {
                name: None,
                ..request("a")
            },
            PartRequest {
                price: Some(Decimal::ZERO),
                ..request("a")
            },
            PartRequest {
                available: Some(-1),
                ..request("a")
            },
            PartRequest {
                minimum: Some(6),
                ..request("a")
            },
            PartRequest {
                minimum: Some(0),
                ..request("a")
            },
        ];

        for case in cases {
            assert!(matches!(
                case.validate(&admin()),
                Err(AppError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn test_validation_stamps_creator() {
        let part = request("gpu").validate(&admin()).unwrap();
        assert_eq!(part.added_by, admin());
        assert_eq!(part.id.as_str(), "gpu");
    }

    #[tokio::test]
    async fn test_duplicate_id_conflicts_without_mutation() {
        let store = MemoryStore::new();
        let catalog = CatalogService::new(&store);
        catalog.add_product(&admin(), request("gpu")).await.unwrap();

        let mut dup = request("gpu");
        dup.name = Some("Impostor".to_string());
        let err = catalog.add_product(&admin(), dup).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let stored = catalog.get_product("gpu").await.unwrap();
        assert_eq!(stored.name, "RTX 4090");
        assert_eq!(catalog.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let store = MemoryStore::new();
        let err = CatalogService::new(&store)
            .get_product("nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_adjust_available() {
        let store = MemoryStore::new();
        let catalog = CatalogService::new(&store);
        let part = catalog.add_product(&admin(), request("gpu")).await.unwrap();

        let part = catalog.adjust_available(&part.id, -7).await.unwrap();
        assert_eq!(part.available, -2);

        let missing = PartId::parse("ghost").unwrap();
        assert!(matches!(
            catalog.adjust_available(&missing, 1).await,
            Err(AppError::NotFound(_))
        ));
    }
}
