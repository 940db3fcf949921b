//! Authenticated identity and the login/user-administration payloads that
//! carry it.

use serde::{Deserialize, Serialize};

use counterdesk_core::{AuditInfo, DomainError, DomainResult, Entity, UserId};

use crate::Role;

/// The authenticated user's profile record, as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    #[serde(flatten)]
    pub audit: AuditInfo,
}

impl Identity {
    pub fn has_role(&self, role: &Role) -> bool {
        self.role == *role
    }
}

impl Entity for Identity {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Successful login response: the bearer token plus the identity it speaks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "user")]
    pub identity: Identity,
}

/// Username/password pair submitted to the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.username.trim().is_empty() {
            return Err(DomainError::validation("username is required"));
        }
        if self.password.is_empty() {
            return Err(DomainError::validation("password is required"));
        }
        Ok(())
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Payload for creating a user account (admin screen).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl NewUser {
    pub fn validate(&self) -> DomainResult<()> {
        validate_username(&self.username)?;
        if self.password.len() < 6 {
            return Err(DomainError::validation(
                "password must be at least 6 characters",
            ));
        }
        validate_role(&self.role)
    }
}

impl core::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Payload for renaming a user or changing their role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

impl UserUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        validate_username(&self.username)?;
        validate_role(&self.role)
    }
}

fn validate_username(username: &str) -> DomainResult<()> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("username is required"));
    }
    if trimmed.len() != username.len() {
        return Err(DomainError::validation(
            "username must not have leading or trailing whitespace",
        ));
    }
    Ok(())
}

fn validate_role(role: &Role) -> DomainResult<()> {
    if role.as_str().trim().is_empty() {
        return Err(DomainError::validation("role is required"));
    }
    Ok(())
}
