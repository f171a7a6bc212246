//! User repository.

use async_trait::async_trait;

use pc_house_core::{Role, Uid};

use super::{PgStore, RepositoryError};
use crate::models::{ProfileUpdate, User};

/// Storage operations for user profiles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user or refresh `name`/`email` on an existing one.
    ///
    /// `None` fields leave the stored value untouched. Role is never changed.
    async fn upsert_user(
        &self,
        uid: &Uid,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User, RepositoryError>;

    /// Look up a user by identity.
    async fn get_user(&self, uid: &Uid) -> Result<Option<User>, RepositoryError>;

    /// Apply a partial profile update. Returns `None` if the user does not exist.
    async fn update_profile(
        &self,
        uid: &Uid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, RepositoryError>;

    /// Set a user's role. Returns `None` if the user does not exist.
    async fn set_role(&self, uid: &Uid, role: Role) -> Result<Option<User>, RepositoryError>;

    /// All users, most recently created first.
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;
}

const USER_COLUMNS: &str = "uid, name, email, phone, address, image, role";

#[async_trait]
impl UserRepository for PgStore {
    async fn upsert_user(
        &self,
        uid: &Uid,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r"
            INSERT INTO users (uid, name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (uid) DO UPDATE
               SET name = COALESCE(EXCLUDED.name, users.name),
                   email = COALESCE(EXCLUDED.email, users.email),
                   updated_at = now()
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(uid)
        .bind(name)
        .bind(email)
        .fetch_one(self.pool())
        .await?;

        Ok(user)
    }

    async fn get_user(&self, uid: &Uid) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE uid = $1"
        ))
        .bind(uid)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    async fn update_profile(
        &self,
        uid: &Uid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r"
            UPDATE users
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   phone = COALESCE($4, phone),
                   address = COALESCE($5, address),
                   image = COALESCE($6, image),
                   updated_at = now()
             WHERE uid = $1
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(uid)
        .bind(update.name)
        .bind(update.email)
        .bind(update.phone)
        .bind(update.address)
        .bind(update.image)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    async fn set_role(&self, uid: &Uid, role: Role) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r"
            UPDATE users SET role = $2, updated_at = now()
             WHERE uid = $1
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(uid)
        .bind(role)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY seq DESC"
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(users)
    }
}
