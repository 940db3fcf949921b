//! Console context: the one place session, cart, router and API meet.
//!
//! Constructed once per process (or per test) and passed around explicitly.
//! Session changes hand back a redirect; the console follows it through the
//! router so the gate sees the new session state.

use thiserror::Error;

use counterdesk_auth::{Credentials, Identity};
use counterdesk_core::DomainError;
use counterdesk_sales::SaleLine;

use crate::api::{ApiError, Dashboard, RemoteApi};
use crate::cart::CartStore;
use crate::router::{NavigationError, NavigationOutcome, ResolvedRoute, RouteName, Router};
use crate::session::{Redirect, SessionStore};
use crate::storage::KeyValueStore;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("the cart is empty")]
    EmptyCart,

    #[error("no active session")]
    NotAuthenticated,
}

pub struct Console<S, A> {
    session: SessionStore<S>,
    cart: CartStore<S>,
    router: Router,
    api: A,
}

impl<S, A> Console<S, A>
where
    S: KeyValueStore + Clone,
    A: RemoteApi,
{
    /// Restore persisted state from `backend` and hand any restored token to
    /// the API handle.
    pub fn restore(backend: S, api: A) -> Self {
        let session = SessionStore::restore(backend.clone());
        let cart = CartStore::restore(backend);
        api.set_token(session.token().map(str::to_owned));

        Self {
            session,
            cart,
            router: Router::new(),
            api,
        }
    }

    /// Initial navigation to the landing route.
    pub fn start(&mut self) -> Result<NavigationOutcome, NavigationError> {
        self.navigate(RouteName::Home)
    }

    pub fn navigate(&mut self, to: RouteName) -> Result<NavigationOutcome, NavigationError> {
        self.router.push(to, &self.session)
    }

    pub fn navigate_path(&mut self, path: &str) -> Result<NavigationOutcome, NavigationError> {
        self.router.push_path(path, &self.session)
    }

    /// Authenticate against the API.
    ///
    /// On failure the error is returned and the session is left untouched.
    pub async fn login(
        &mut self,
        credentials: &Credentials,
    ) -> Result<NavigationOutcome, ConsoleError> {
        credentials.validate()?;

        let response = match self.api.login(credentials).await {
            Ok(response) => response,
            Err(err) => {
                tracing::info!(username = %credentials.username, error = %err, "login failed");
                return Err(err.into());
            }
        };

        self.api.set_token(Some(response.token.clone()));
        let redirect = self.session.set_auth(response);
        Ok(self.follow(redirect)?)
    }

    /// End the session and go to the login page.
    ///
    /// Requests already in flight are not cancelled.
    pub fn logout(&mut self) -> Result<NavigationOutcome, NavigationError> {
        self.api.set_token(None);
        let redirect = self.session.logout();
        self.follow(redirect)
    }

    /// Submit the cart as a sale and empty it once the API accepts it.
    pub async fn checkout(&mut self) -> Result<Vec<SaleLine>, ConsoleError> {
        if !self.session.is_authenticated() {
            return Err(ConsoleError::NotAuthenticated);
        }
        let sale = self.cart.cart().to_sale().ok_or(ConsoleError::EmptyCart)?;

        for line in self.cart.cart().lines_over_stock() {
            tracing::warn!(
                product_id = %line.product_id(),
                quantity = line.quantity(),
                stock_qty = line.product().stock_qty,
                "checking out more than the last known stock"
            );
        }

        let recorded = self.api.create_sale(&sale).await?;
        self.cart.clear_cart();
        tracing::info!(lines = sale.product_sales.len(), "sale recorded");
        Ok(recorded)
    }

    /// Headline figures for the dashboard view.
    pub async fn dashboard(&self) -> Result<Dashboard, ConsoleError> {
        if !self.session.is_authenticated() {
            return Err(ConsoleError::NotAuthenticated);
        }
        Ok(self.api.get_dashboard().await?)
    }

    fn follow(&mut self, redirect: Redirect) -> Result<NavigationOutcome, NavigationError> {
        let Redirect(to) = redirect;
        self.navigate(to)
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }

    pub fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartStore<S> {
        &mut self.cart
    }

    pub fn current_route(&self) -> Option<RouteName> {
        self.router.current()
    }

    pub fn sidebar(&self) -> Vec<ResolvedRoute> {
        self.router.sidebar(&self.session)
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Bearer token for API calls, if a session exists.
    pub fn api_token(&self) -> Option<&str> {
        self.session.token()
    }
}
