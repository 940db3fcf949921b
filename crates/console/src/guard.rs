//! Pre-navigation authorization gate.
//!
//! Consulted by the router before every route transition. The decision is
//! pure and synchronous: no IO, no retries, exactly one outcome per attempt.

use counterdesk_auth::{Role, explain_access, has_any_role};

use crate::router::{ResolvedRoute, RouteName};

/// The session predicates the gate needs.
pub trait SessionView {
    fn is_authenticated(&self) -> bool;

    fn role(&self) -> Option<&Role>;

    fn has_any_role(&self, roles: &[Role]) -> bool {
        has_any_role(self.role(), roles)
    }
}

/// Outcome of the gate for one navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Redirect(RouteName),
}

/// Decide whether navigation to `target` may proceed.
///
/// Checks run in order and the first that fires decides:
/// 1. the route (or an ancestor) requires a session and there is none → login
/// 2. the target is the login page and a session exists → dashboard
/// 3. the route restricts roles and the session's role is not listed → unauthorized
/// 4. otherwise allow
pub fn authorize_navigation<V>(target: &ResolvedRoute, session: &V) -> NavigationDecision
where
    V: SessionView + ?Sized,
{
    let authenticated = session.is_authenticated();

    let decision = if target.access.requires_auth && !authenticated {
        NavigationDecision::Redirect(RouteName::Login)
    } else if target.name == RouteName::Login && authenticated {
        NavigationDecision::Redirect(RouteName::Dashboard)
    } else if target
        .access
        .allowed_roles
        .as_deref()
        .is_some_and(|roles| !session.has_any_role(roles))
    {
        NavigationDecision::Redirect(RouteName::Unauthorized)
    } else {
        NavigationDecision::Allow
    };

    if tracing::enabled!(tracing::Level::DEBUG) {
        let explanation = explain_access(&target.access, authenticated, session.role());
        tracing::debug!(
            route = %target.name,
            ?decision,
            granted = explanation.granted,
            reason = %explanation.reason,
            "navigation gate decided"
        );
    }

    decision
}
