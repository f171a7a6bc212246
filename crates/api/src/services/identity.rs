//! User identity, profiles and roles.

use serde::Deserialize;

use pc_house_core::{Email, Role, Uid};

use crate::auth::{AccessContext, Claims, Policy, TokenService};
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{ProfileUpdate, User};

/// Body of `POST /get-jwt`.
#[derive(Debug, Default, Deserialize)]
pub struct SessionRequest {
    pub uid: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Body of `PATCH /profile`.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    /// When present it must match the caller.
    pub uid: Option<String>,
    #[serde(flatten)]
    pub update: ProfileUpdate,
}

/// Blank strings count as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Identity operations.
pub struct IdentityService<'a> {
    store: &'a dyn Store,
    tokens: &'a TokenService,
}

impl<'a> IdentityService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store, tokens: &'a TokenService) -> Self {
        Self { store, tokens }
    }

    /// Upsert the user and issue a fresh token for them.
    ///
    /// Repeated calls with the same `uid` update the one record.
    ///
    /// # Errors
    ///
    /// - `AppError::InvalidIdentity` if `uid` is missing or blank
    /// - `AppError::Internal` if signing fails
    pub async fn issue_session(&self, request: SessionRequest) -> Result<(String, User)> {
        let uid = request
            .uid
            .as_deref()
            .and_then(|raw| Uid::parse(raw).ok())
            .ok_or(AppError::InvalidIdentity)?;

        let user = self
            .store
            .upsert_user(&uid, non_blank(request.name), non_blank(request.email))
            .await?;
        let token = self
            .tokens
            .issue(&uid)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(uid = %uid, "Session issued");
        Ok((token, user))
    }

    /// The caller's own profile.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no user record exists.
    pub async fn get_profile(&self, uid: &Uid) -> Result<User> {
        self.store
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound("user".to_string()))
    }

    /// Apply a partial profile update to the caller's own record.
    ///
    /// # Errors
    ///
    /// - `AppError::Forbidden` if the body names another `uid`
    /// - `AppError::BadRequest` if a supplied email is invalid
    /// - `AppError::NotFound` if no user record exists
    pub async fn update_profile(&self, caller: &Claims, request: ProfileRequest) -> Result<User> {
        let target = match request.uid.as_deref() {
            Some(raw) => Uid::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))?,
            None => caller.uid.clone(),
        };
        Policy::SelfOnly(&target)
            .evaluate(&AccessContext::new(caller, None))
            .map_err(|denial| AppError::Forbidden(denial.to_string()))?;

        let mut update = request.update;
        if let Some(email) = update.email.take() {
            let email = Email::parse(&email).map_err(|e| AppError::BadRequest(e.to_string()))?;
            update.email = Some(email.into_inner());
        }

        self.store
            .update_profile(&target, update)
            .await?
            .ok_or_else(|| AppError::NotFound("user".to_string()))
    }

    /// Make a user an admin. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the user does not exist.
    pub async fn promote_to_admin(&self, uid: &Uid) -> Result<User> {
        let user = self
            .store
            .set_role(uid, Role::Admin)
            .await?
            .ok_or_else(|| AppError::NotFound("user".to_string()))?;

        tracing::info!(uid = %uid, "User promoted to admin");
        Ok(user)
    }

    /// Whether `uid` is an admin; `false` for unknown users.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the lookup fails.
    pub async fn is_admin(&self, uid: &Uid) -> Result<bool> {
        Ok(self
            .store
            .get_user(uid)
            .await?
            .is_some_and(|user| user.role.is_admin()))
    }

    /// All users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the store fails.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.store.list_users().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;
    use crate::config::AuthConfig;
    use crate::db::{MemoryStore, UserRepository};

    fn tokens() -> TokenService {
        TokenService::new(&AuthConfig {
            jwt_secret: SecretString::from("k7Qm2vX9pL4rT8wZ1nB6cF3hJ5sD0gYa".to_string()),
            token_ttl: Duration::from_secs(3600),
        })
    }

    fn session(uid: Option<&str>, name: Option<&str>) -> SessionRequest {
        SessionRequest {
            uid: uid.map(str::to_string),
            email: Some("a@x.com".to_string()),
            name: name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_issue_session_upserts_once() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let service = IdentityService::new(&store, &tokens);

        let (token, user) = service
            .issue_session(session(Some("u1"), Some("Ann")))
            .await
            .unwrap();
        assert_eq!(tokens.verify(&token).unwrap().uid, user.uid);
        assert_eq!(user.name.as_deref(), Some("Ann"));

        let (_, user) = service
            .issue_session(session(Some("u1"), Some("Annie")))
            .await
            .unwrap();
        assert_eq!(user.name.as_deref(), Some("Annie"));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_issue_session_requires_uid() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let service = IdentityService::new(&store, &tokens);

        for uid in [None, Some("   ")] {
            let err = service.issue_session(session(uid, None)).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidIdentity));
        }
        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_is_self_only_and_partial() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let service = IdentityService::new(&store, &tokens);
        let (token, _) = service
            .issue_session(session(Some("u1"), Some("Ann")))
            .await
            .unwrap();
        let caller = tokens.verify(&token).unwrap();

        let err = service
            .update_profile(
                &caller,
                ProfileRequest {
                    uid: Some("u2".to_string()),
                    ..ProfileRequest::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let user = service
            .update_profile(
                &caller,
                ProfileRequest {
                    uid: None,
                    update: ProfileUpdate {
                        phone: Some("555-0100".to_string()),
                        ..ProfileUpdate::default()
                    },
                },
            )
            .await
            .unwrap();
        assert_eq!(user.name.as_deref(), Some("Ann"));
        assert_eq!(user.phone.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn test_promote_and_is_admin() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let service = IdentityService::new(&store, &tokens);
        let uid = Uid::parse("u1").unwrap();

        assert!(!service.is_admin(&uid).await.unwrap());
        assert!(matches!(
            service.promote_to_admin(&uid).await,
            Err(AppError::NotFound(_))
        ));

        service.issue_session(session(Some("u1"), None)).await.unwrap();
        assert!(!service.is_admin(&uid).await.unwrap());

        service.promote_to_admin(&uid).await.unwrap();
        let again = service.promote_to_admin(&uid).await.unwrap();
        assert_eq!(again.role, Role::Admin);
        assert!(service.is_admin(&uid).await.unwrap());
    }
}
