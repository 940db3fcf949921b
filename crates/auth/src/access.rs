use serde::Serialize;
use thiserror::Error;

use crate::Role;

/// Per-route access requirements.
///
/// Declared statically by the route table; read-only to the navigation gate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteAccess {
    /// The route (or one of its ancestors) is only reachable with a session.
    pub requires_auth: bool,
    /// Roles allowed to open the route. `None` means "any role".
    pub allowed_roles: Option<Vec<Role>>,
}

impl RouteAccess {
    /// No requirements at all.
    pub const fn public() -> Self {
        Self {
            requires_auth: false,
            allowed_roles: None,
        }
    }

    /// Requires a session, any role.
    pub const fn authenticated() -> Self {
        Self {
            requires_auth: true,
            allowed_roles: None,
        }
    }

    /// Restrict to the given roles (does not by itself require a session).
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            requires_auth: false,
            allowed_roles: Some(roles.into_iter().collect()),
        }
    }

    /// Combine an ancestor's requirements with a nested route's.
    ///
    /// `requires_auth` accumulates over the whole chain; the deepest record that
    /// declares roles wins.
    pub fn nest(&self, child: &RouteAccess) -> RouteAccess {
        RouteAccess {
            requires_auth: self.requires_auth || child.requires_auth,
            allowed_roles: child
                .allowed_roles
                .clone()
                .or_else(|| self.allowed_roles.clone()),
        }
    }

    /// Whether `role` satisfies the role restriction (always true if none).
    pub fn admits(&self, role: Option<&Role>) -> bool {
        match &self.allowed_roles {
            Some(allowed) => has_any_role(role, allowed),
            None => true,
        }
    }
}

/// `allowed.contains(role ?? "")`.
///
/// A missing role is compared as the empty string, so a session without an
/// identity only passes a list that explicitly admits `""`.
pub fn has_any_role(role: Option<&Role>, allowed: &[Role]) -> bool {
    let current = role.map_or("", Role::as_str);
    allowed.iter().any(|r| r.as_str() == current)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: role '{role}' is not one of {allowed:?}")]
    Forbidden { role: String, allowed: Vec<String> },
}

/// Check a route's requirements against the current session.
///
/// - No IO
/// - No panics
pub fn check_access(
    access: &RouteAccess,
    authenticated: bool,
    role: Option<&Role>,
) -> Result<(), AccessError> {
    if access.requires_auth && !authenticated {
        return Err(AccessError::Unauthenticated);
    }
    if !access.admits(role) {
        return Err(AccessError::Forbidden {
            role: role.map(|r| r.as_str().to_string()).unwrap_or_default(),
            allowed: access
                .allowed_roles
                .iter()
                .flatten()
                .map(|r| r.as_str().to_string())
                .collect(),
        });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Access Explanation (debug logging)
// ─────────────────────────────────────────────────────────────────────────────

/// Why an access check came out the way it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessExplanation {
    pub granted: bool,
    pub reason: String,
    pub role: Option<String>,
    pub allowed_roles: Option<Vec<String>>,
    pub denial: Option<DenialKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    RoleNotAllowed,
}

pub fn explain_access(
    access: &RouteAccess,
    authenticated: bool,
    role: Option<&Role>,
) -> AccessExplanation {
    let allowed_roles = access
        .allowed_roles
        .as_ref()
        .map(|roles| roles.iter().map(|r| r.as_str().to_string()).collect());
    let role_name = role.map(|r| r.as_str().to_string());

    let (granted, reason, denial) = match check_access(access, authenticated, role) {
        Ok(()) if access.allowed_roles.is_some() => (
            true,
            format!("role '{}' is allowed", role_name.as_deref().unwrap_or("")),
            None,
        ),
        Ok(()) if access.requires_auth => (true, "session is authenticated".to_string(), None),
        Ok(()) => (true, "route has no access requirements".to_string(), None),
        Err(AccessError::Unauthenticated) => (
            false,
            "route requires an authenticated session".to_string(),
            Some(DenialKind::Unauthenticated),
        ),
        Err(err @ AccessError::Forbidden { .. }) => {
            (false, err.to_string(), Some(DenialKind::RoleNotAllowed))
        }
    };

    AccessExplanation {
        granted,
        reason,
        role: role_name,
        allowed_roles,
        denial,
    }
}
