//! Part stock commands.
//!
//! # Usage
//!
//! ```bash
//! # Receive 25 units
//! pc-cli stock adjust gpu-4070 25
//!
//! # Write off 3 damaged units
//! pc-cli stock adjust gpu-4070 -3
//! ```

use pc_house_api::services::CatalogService;
use pc_house_core::PartId;

use super::{CommandError, connect};

/// Add `delta` to the part's available quantity and log the new level.
///
/// # Errors
///
/// - `CommandError::InvalidArgument` if `part_id` is blank
/// - `CommandError::Service` if the part does not exist
pub async fn adjust(part_id: &str, delta: i32) -> Result<(), CommandError> {
    let id = PartId::parse(part_id).map_err(|e| CommandError::InvalidArgument(e.to_string()))?;
    let store = connect().await?;

    let part = CatalogService::new(&store).adjust_available(&id, delta).await?;

    tracing::info!(
        part_id = %part.id,
        available = part.available,
        "Stock level updated"
    );
    Ok(())
}
