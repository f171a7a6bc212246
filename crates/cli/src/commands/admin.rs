//! Admin user management commands.
//!
//! There is no HTTP route that can create the first admin, so the bootstrap
//! admin is promoted here. The user must have called `/get-jwt` once so that a
//! record exists.
//!
//! # Usage
//!
//! ```bash
//! pc-cli admin promote firebase-uid-123
//! ```

use pc_house_api::db::UserRepository;
use pc_house_core::{Role, Uid};

use super::{CommandError, connect};

/// Grant the admin role to `uid`. Idempotent.
///
/// # Errors
///
/// - `CommandError::InvalidArgument` if `uid` is blank
/// - `CommandError::UnknownUser` if no record exists for `uid`
pub async fn promote(uid: &str) -> Result<(), CommandError> {
    let uid = Uid::parse(uid).map_err(|e| CommandError::InvalidArgument(e.to_string()))?;
    let store = connect().await?;

    tracing::info!(uid = %uid, "Promoting user to admin");
    let user = store
        .set_role(&uid, Role::Admin)
        .await
        .map_err(pc_house_api::error::AppError::from)?
        .ok_or_else(|| CommandError::UnknownUser(uid.to_string()))?;

    tracing::info!(uid = %user.uid, email = ?user.email, "Admin role granted");
    Ok(())
}
