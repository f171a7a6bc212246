//! User profile types.

use serde::{Deserialize, Serialize};

use pc_house_core::{Role, Uid};

/// A storefront user, keyed by the identity provider's `uid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// External identity id.
    pub uid: Uid,
    /// Display name.
    pub name: Option<String>,
    /// Account email as reported by the identity provider.
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Avatar image URL.
    pub image: Option<String>,
    /// Omitted from JSON for standard users.
    #[serde(default, skip_serializing_if = "Role::is_standard")]
    pub role: Role,
}

impl User {
    /// A fresh standard user with only the identity set.
    #[must_use]
    pub const fn new(uid: Uid) -> Self {
        Self {
            uid,
            name: None,
            email: None,
            phone: None,
            address: None,
            image: None,
            role: Role::Standard,
        }
    }

    /// Apply a partial update; absent fields keep their current value.
    pub fn apply(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            name,
            email,
            phone,
            address,
            image,
        } = update;
        if name.is_some() {
            self.name = name;
        }
        if email.is_some() {
            self.email = email;
        }
        if phone.is_some() {
            self.phone = phone;
        }
        if address.is_some() {
            self.address = address;
        }
        if image.is_some() {
            self.image = image;
        }
    }
}

/// Editable profile fields. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
}
