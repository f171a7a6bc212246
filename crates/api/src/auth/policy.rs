//! Authorization policies.
//!
//! A [`Policy`] is a pure predicate over the verified caller and what is known
//! about them. Evaluation never touches the store; callers load the role first
//! when a policy needs it.

use thiserror::Error;

use pc_house_core::{Role, Uid};

use super::Claims;

/// Why a policy denied access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("caller {caller} may not act for {target}")]
    IdentityMismatch { caller: Uid, target: Uid },

    #[error("admin role required")]
    AdminRequired,

    #[error("no policy alternative satisfied")]
    NoAlternative,
}

/// What the policy is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct AccessContext<'a> {
    pub caller: &'a Claims,
    /// Stored role of the caller; `None` when no user record exists.
    pub role: Option<Role>,
}

impl<'a> AccessContext<'a> {
    #[must_use]
    pub const fn new(caller: &'a Claims, role: Option<Role>) -> Self {
        Self { caller, role }
    }
}

/// An access rule.
#[derive(Debug, Clone, Copy)]
pub enum Policy<'a> {
    /// The caller must be the given identity.
    SelfOnly(&'a Uid),
    /// The caller's stored role must be admin.
    Admin,
    /// At least one alternative must allow.
    AnyOf(&'a [Policy<'a>]),
}

impl Policy<'_> {
    /// Allow, or deny with a reason.
    ///
    /// # Errors
    ///
    /// Returns the [`Denial`] explaining which rule failed.
    pub fn evaluate(&self, ctx: &AccessContext<'_>) -> Result<(), Denial> {
        match self {
            Self::SelfOnly(target) => {
                if &ctx.caller.uid == *target {
                    Ok(())
                } else {
                    Err(Denial::IdentityMismatch {
                        caller: ctx.caller.uid.clone(),
                        target: (*target).clone(),
                    })
                }
            }
            Self::Admin => match ctx.role {
                Some(role) if role.is_admin() => Ok(()),
                _ => Err(Denial::AdminRequired),
            },
            Self::AnyOf(alternatives) => {
                if alternatives.iter().any(|p| p.evaluate(ctx).is_ok()) {
                    Ok(())
                } else {
                    Err(Denial::NoAlternative)
                }
            }
        }
    }
}
