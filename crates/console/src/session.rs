//! Session store: who is using the console right now.
//!
//! Token and identity are set together on login and cleared together on
//! logout; every mutation is written through to storage before returning.

use counterdesk_auth::{AuthResponse, Identity, Role, has_any_role};

use crate::guard::SessionView;
use crate::router::RouteName;
use crate::storage::{KeyValueStore, PersistentStorage, keys};

/// Route the application must navigate to after a session change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "the session change expects the caller to navigate"]
pub struct Redirect(pub RouteName);

/// Where a fresh login lands.
pub const LANDING_ROUTE: RouteName = RouteName::Home;

#[derive(Debug)]
pub struct SessionStore<S> {
    storage: PersistentStorage<S>,
    token: Option<String>,
    identity: Option<Identity>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Initialise from persisted `token` / `user` entries.
    ///
    /// A half-persisted session (only one of the two present or readable) is
    /// discarded and both entries are cleared.
    pub fn restore(backend: S) -> Self {
        let storage = PersistentStorage::new(backend);
        let token = storage.get_text(keys::TOKEN);
        let identity: Option<Identity> = storage.get(keys::USER);

        let (token, identity) = match (token, identity) {
            (Some(token), Some(identity)) => {
                tracing::debug!(username = %identity.username, "restored persisted session");
                (Some(token), Some(identity))
            }
            (None, None) => (None, None),
            (token, identity) => {
                tracing::warn!(
                    has_token = token.is_some(),
                    has_identity = identity.is_some(),
                    "discarding half-persisted session"
                );
                storage.remove(keys::TOKEN);
                storage.remove(keys::USER);
                (None, None)
            }
        };

        Self {
            storage,
            token,
            identity,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(Role::is_admin)
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.role() == Some(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        has_any_role(self.role(), roles)
    }

    pub fn role(&self) -> Option<&Role> {
        self.identity.as_ref().map(|identity| &identity.role)
    }

    /// Capture a successful login and send the user to the landing route.
    pub fn set_auth(&mut self, response: AuthResponse) -> Redirect {
        let AuthResponse { token, identity } = response;

        self.storage.set(keys::USER, &identity);
        self.storage.set_text(keys::TOKEN, &token);
        tracing::info!(
            username = %identity.username,
            role = %identity.role,
            "session started"
        );

        self.identity = Some(identity);
        self.token = Some(token);
        Redirect(LANDING_ROUTE)
    }

    /// Drop the session and send the user to the login page.
    pub fn logout(&mut self) -> Redirect {
        let previous = self.identity.take();
        self.token = None;

        self.storage.remove(keys::USER);
        self.storage.remove(keys::TOKEN);
        if let Some(identity) = previous {
            tracing::info!(username = %identity.username, "session ended");
        }

        Redirect(RouteName::Login)
    }
}

impl<S: KeyValueStore> SessionView for SessionStore<S> {
    fn is_authenticated(&self) -> bool {
        SessionStore::is_authenticated(self)
    }

    fn role(&self) -> Option<&Role> {
        SessionStore::role(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use counterdesk_core::AuditInfo;

    fn identity(username: &str, role: Role) -> Identity {
        Identity {
            id: format!("user-{username}").parse().unwrap(),
            username: username.to_string(),
            role,
            audit: AuditInfo::default(),
        }
    }

    fn login(token: &str, username: &str, role: Role) -> AuthResponse {
        AuthResponse {
            token: token.to_string(),
            identity: identity(username, role),
        }
    }

    #[test]
    fn fresh_store_is_anonymous() {
        let session = SessionStore::restore(MemoryStore::new());
        assert!(!session.is_authenticated());
        assert!(!session.is_admin());
        assert!(session.identity().is_none());
        assert!(!session.has_any_role(&[Role::ADMIN, Role::CASHIER]));
    }

    #[test]
    fn set_auth_then_logout() {
        let backend = MemoryStore::new();
        let mut session = SessionStore::restore(backend.clone());

        let redirect = session.set_auth(login("T", "mara", Role::CASHIER));
        assert_eq!(redirect, Redirect(RouteName::Home));
        assert!(session.is_authenticated());
        assert!(session.has_role(&Role::CASHIER));
        assert!(!session.is_admin());
        assert!(session.has_any_role(&[Role::ADMIN, Role::CASHIER]));
        assert_eq!(session.token(), Some("T"));

        let redirect = session.logout();
        assert_eq!(redirect, Redirect(RouteName::Login));
        assert!(!session.is_authenticated());
        assert!(session.identity().is_none());
        assert!(backend.is_empty());
    }

    #[test]
    fn session_survives_restart() {
        let backend = MemoryStore::new();
        let mut session = SessionStore::restore(backend.clone());
        let _ = session.set_auth(login("T", "root", Role::ADMIN));

        let restored = SessionStore::restore(backend);
        assert!(restored.is_authenticated());
        assert!(restored.is_admin());
        assert_eq!(restored.identity(), session.identity());
        assert_eq!(restored.token(), Some("T"));
    }

    #[test]
    fn token_is_persisted_as_plain_text() {
        let backend = MemoryStore::new();
        let mut session = SessionStore::restore(backend.clone());
        let _ = session.set_auth(login("eyJhbGciOi.payload.sig", "mara", Role::CASHIER));

        assert_eq!(
            backend.read(keys::TOKEN).unwrap().as_deref(),
            Some("eyJhbGciOi.payload.sig")
        );
    }

    #[test]
    fn restores_plain_text_token_with_json_identity() {
        let backend = MemoryStore::new();
        backend.write(keys::TOKEN, "eyJhbGciOi.payload.sig").unwrap();
        let user = serde_json::to_string(&identity("mara", Role::CASHIER)).unwrap();
        backend.write(keys::USER, &user).unwrap();

        let session = SessionStore::restore(backend.clone());
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("eyJhbGciOi.payload.sig"));
        assert_eq!(session.identity().map(|i| i.username.as_str()), Some("mara"));
        assert!(backend.read(keys::TOKEN).unwrap().is_some());
    }

    #[test]
    fn half_persisted_session_is_discarded() {
        let backend = MemoryStore::new();
        backend.write(keys::TOKEN, "\"orphan\"").unwrap();

        let session = SessionStore::restore(backend.clone());
        assert!(!session.is_authenticated());
        assert!(backend.read(keys::TOKEN).unwrap().is_none());
    }

    #[test]
    fn corrupt_identity_discards_the_session() {
        let backend = MemoryStore::new();
        backend.write(keys::TOKEN, "\"T\"").unwrap();
        backend.write(keys::USER, "{\"username\": 42}").unwrap();

        let session = SessionStore::restore(backend.clone());
        assert!(!session.is_authenticated());
        assert!(session.identity().is_none());
        assert!(backend.is_empty());
    }

    #[test]
    fn empty_token_is_not_a_session() {
        let mut session = SessionStore::restore(MemoryStore::new());
        let _ = session.set_auth(login("", "mara", Role::CASHIER));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn logout_without_session_still_redirects() {
        let mut session = SessionStore::restore(MemoryStore::new());
        assert_eq!(session.logout(), Redirect(RouteName::Login));
    }
}
